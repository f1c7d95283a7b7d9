use crate::aspects::Aspect;
use serde::{Deserialize, Serialize};

/// Whose planet an overlay describes. `A` means one of person A's planets
/// placed in person B's houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayPerson {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseOverlay {
    pub planet: String,
    pub house: u8,
    pub person: OverlayPerson,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynastryData {
    pub aspects: Vec<Aspect>,
    pub house_overlays: Vec<HouseOverlay>,
}
