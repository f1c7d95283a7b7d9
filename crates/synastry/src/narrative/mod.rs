pub mod context;
pub mod sections;

pub use context::{
    build_section_context, summarize_chart, CompositeSummary, CompositeView, ContextInputs,
    NatalSummary, Placement, SectionContext,
};
pub use sections::{SectionKind, SynastryTab};
