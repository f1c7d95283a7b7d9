use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the natal chart collaborator
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Invalid birth data: {message}")]
    InvalidInput { message: String },
    #[error("Chart calculation failed for {city}: {message}")]
    CalculationFailed { city: String, message: String },
}

/// Errors raised by the narrative generator collaborator
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative generator unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("Narrative generation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Minor currency units
    pub amount: u64,
    pub currency: String,
}

#[derive(Error, Debug)]
pub enum SynastryError {
    #[error("Access denied: synastry quota exhausted")]
    AccessDenied {
        need_purchase: bool,
        price: Option<Price>,
    },
    #[error("Narrative generator unavailable: {reason}")]
    GeneratorUnavailable { reason: String },
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error("Entitlement ledger error: {0}")]
    Ledger(anyhow::Error),
    #[error("Narrative generation failed: {0}")]
    Generator(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<NarrativeError> for SynastryError {
    fn from(err: NarrativeError) -> Self {
        match err {
            NarrativeError::Unavailable { reason } => SynastryError::GeneratorUnavailable { reason },
            NarrativeError::Failed(message) => SynastryError::Generator(message),
        }
    }
}

/// Wire shape of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_purchase: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SynastryError {
    /// HTTP status the transport layer should use.
    pub fn status_code(&self) -> u16 {
        match self {
            SynastryError::AccessDenied { .. } => 403,
            SynastryError::GeneratorUnavailable { .. } => 503,
            SynastryError::Ephemeris(_)
            | SynastryError::Ledger(_)
            | SynastryError::Generator(_)
            | SynastryError::Internal(_) => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            SynastryError::AccessDenied {
                need_purchase,
                price,
            } => ErrorBody {
                error: self.to_string(),
                need_purchase: Some(*need_purchase),
                price: price.clone(),
                reason: None,
            },
            SynastryError::GeneratorUnavailable { reason } => ErrorBody {
                error: "Narrative generator unavailable".to_string(),
                need_purchase: None,
                price: None,
                reason: Some(reason.clone()),
            },
            _ => ErrorBody {
                error: self.to_string(),
                need_purchase: None,
                price: None,
                reason: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let denied = SynastryError::AccessDenied {
            need_purchase: true,
            price: None,
        };
        assert_eq!(denied.status_code(), 403);
        let unavailable: SynastryError = NarrativeError::Unavailable {
            reason: "rate limited".to_string(),
        }
        .into();
        assert_eq!(unavailable.status_code(), 503);
        assert_eq!(SynastryError::Internal("boom".to_string()).status_code(), 500);
    }

    #[test]
    fn test_access_denied_body() {
        let denied = SynastryError::AccessDenied {
            need_purchase: true,
            price: Some(Price {
                amount: 299,
                currency: "USD".to_string(),
            }),
        };
        let json = serde_json::to_value(denied.body()).unwrap();
        assert_eq!(json["needPurchase"], true);
        assert_eq!(json["price"]["amount"], 299);
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_unavailable_body_has_reason() {
        let err = SynastryError::GeneratorUnavailable {
            reason: "upstream timeout".to_string(),
        };
        let body = err.body();
        assert_eq!(body.reason.as_deref(), Some("upstream timeout"));
        assert_eq!(body.need_purchase, None);
    }
}
