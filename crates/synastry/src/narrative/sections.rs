use crate::narrative::context::{
    build_composite_context, build_core_dynamics_context, build_signal_context, ContextBuilder,
};
use crate::signals::tables::{self, SectionTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrative sections of a synastry report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Overview,
    Highlights,
    CoreDynamics,
    Communication,
    Intimacy,
    Conflict,
    Values,
    Growth,
    Composite,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Overview,
        SectionKind::Highlights,
        SectionKind::CoreDynamics,
        SectionKind::Communication,
        SectionKind::Intimacy,
        SectionKind::Conflict,
        SectionKind::Values,
        SectionKind::Growth,
        SectionKind::Composite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Overview => "overview",
            SectionKind::Highlights => "highlights",
            SectionKind::CoreDynamics => "core_dynamics",
            SectionKind::Communication => "communication",
            SectionKind::Intimacy => "intimacy",
            SectionKind::Conflict => "conflict",
            SectionKind::Values => "values",
            SectionKind::Growth => "growth",
            SectionKind::Composite => "composite",
        }
    }

    pub fn table(self) -> &'static SectionTable {
        match self {
            SectionKind::Overview => &tables::OVERVIEW,
            SectionKind::Highlights => &tables::HIGHLIGHTS,
            SectionKind::CoreDynamics => &tables::CORE_DYNAMICS,
            SectionKind::Communication => &tables::COMMUNICATION,
            SectionKind::Intimacy => &tables::INTIMACY,
            SectionKind::Conflict => &tables::CONFLICT,
            SectionKind::Values => &tables::VALUES,
            SectionKind::Growth => &tables::GROWTH,
            SectionKind::Composite => &tables::COMPOSITE,
        }
    }

    pub fn builder(self) -> ContextBuilder {
        match self {
            SectionKind::Overview
            | SectionKind::Highlights
            | SectionKind::Communication
            | SectionKind::Intimacy
            | SectionKind::Conflict
            | SectionKind::Values
            | SectionKind::Growth => build_signal_context,
            SectionKind::CoreDynamics => build_core_dynamics_context,
            SectionKind::Composite => build_composite_context,
        }
    }

    pub fn requires_composite(self) -> bool {
        self.table().composite_aspect_cap.is_some()
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|section| section.as_str() == needle)
            .ok_or_else(|| format!("Unknown section: {s}"))
    }
}

/// Top-level report tabs. Each tab is rendered from one section's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynastryTab {
    Main,
    Compatibility,
    Composite,
}

impl SynastryTab {
    pub fn as_str(self) -> &'static str {
        match self {
            SynastryTab::Main => "main",
            SynastryTab::Compatibility => "compatibility",
            SynastryTab::Composite => "composite",
        }
    }

    pub fn context_section(self) -> SectionKind {
        match self {
            SynastryTab::Main => SectionKind::Overview,
            SynastryTab::Compatibility => SectionKind::Highlights,
            SynastryTab::Composite => SectionKind::Composite,
        }
    }

    pub fn requires_composite(self) -> bool {
        self.context_section().requires_composite()
    }
}

impl fmt::Display for SynastryTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynastryTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "main" => Ok(SynastryTab::Main),
            "compatibility" => Ok(SynastryTab::Compatibility),
            "composite" => Ok(SynastryTab::Composite),
            other => Err(format!("Unknown tab: {other}")),
        }
    }
}
