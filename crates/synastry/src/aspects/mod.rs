pub mod calculator;
pub mod types;

pub use calculator::AspectCalculator;
pub use types::{Aspect, AspectDefinition, AspectType, ASPECT_DEFINITIONS};
