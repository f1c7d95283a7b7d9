pub mod selector;
pub mod tables;

pub use selector::{
    rank_overlays, select_dimension, select_friction, select_overlays_in_houses, select_section,
    select_sweet, select_tight_aspects, DimensionSignals, SectionSignals,
};
pub use tables::{Dimension, SectionTable, TightAspectRule};
