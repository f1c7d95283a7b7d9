pub mod aspects;
pub mod bundle;
pub mod chart;
pub mod error;
pub mod narrative;
pub mod scoring;
pub mod service;
pub mod signals;
pub mod synastry;

pub use bundle::AnalysisBundle;
pub use error::{EphemerisError, NarrativeError, SynastryError};
pub use service::{SynastryOverviewSectionResponse, SynastryRequest, SynastryResponse, SynastryService};
