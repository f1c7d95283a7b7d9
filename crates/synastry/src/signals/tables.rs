//! Static per-section selection tables.

pub type PlanetPair = (&'static str, &'static str);

/// A named group of planet pairs watched by one narrative section.
#[derive(Debug, Clone, Copy)]
pub struct Dimension {
    pub name: &'static str,
    pub pairs: &'static [PlanetPair],
    pub cap: usize,
}

/// Aspects touching any of `planets`, tightest first.
#[derive(Debug, Clone, Copy)]
pub struct TightAspectRule {
    pub planets: &'static [&'static str],
    pub cap: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionTable {
    pub dimensions: &'static [Dimension],
    pub sweet_cap: usize,
    pub friction_cap: usize,
    pub overlay_cap: usize,
    /// When set, only overlays in these houses are surfaced.
    pub focus_houses: Option<&'static [u8]>,
    pub tight_aspects: Option<TightAspectRule>,
    /// Cap on the composite chart's internal aspects; `None` means the
    /// section does not use the composite chart.
    pub composite_aspect_cap: Option<usize>,
}

/// Planets whose overlays are most telling, best first.
pub const OVERLAY_PLANET_PRIORITY: &[&str] = &["Sun", "Moon", "Venus", "Mars", "Mercury"];
/// Houses whose overlays are most telling, best first.
pub const OVERLAY_HOUSE_PRIORITY: &[u8] = &[7, 8, 4];
/// Rank given to planets and houses absent from the priority lists.
pub const UNRANKED: usize = 99;

pub const OVERVIEW: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "emotional_safety",
            pairs: &[
                ("Moon", "Moon"),
                ("Moon", "Venus"),
                ("Moon", "Saturn"),
                ("Sun", "Moon"),
                ("Moon", "Ascendant"),
            ],
            cap: 3,
        },
        Dimension {
            name: "attraction",
            pairs: &[
                ("Venus", "Mars"),
                ("Sun", "Venus"),
                ("Venus", "Pluto"),
                ("Mars", "Pluto"),
                ("Venus", "Ascendant"),
            ],
            cap: 3,
        },
        Dimension {
            name: "communication",
            pairs: &[
                ("Mercury", "Mercury"),
                ("Mercury", "Moon"),
                ("Mercury", "Venus"),
                ("Sun", "Mercury"),
            ],
            cap: 2,
        },
        Dimension {
            name: "stability",
            pairs: &[
                ("Sun", "Saturn"),
                ("Moon", "Saturn"),
                ("Venus", "Saturn"),
                ("Jupiter", "Saturn"),
            ],
            cap: 2,
        },
    ],
    sweet_cap: 4,
    friction_cap: 4,
    overlay_cap: 4,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const HIGHLIGHTS: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "chemistry",
            pairs: &[
                ("Venus", "Mars"),
                ("Mars", "Mars"),
                ("Sun", "Mars"),
                ("Mars", "Pluto"),
                ("Venus", "Pluto"),
                ("Venus", "Uranus"),
                ("Mars", "Ascendant"),
            ],
            cap: 5,
        },
        Dimension {
            name: "harmony",
            pairs: &[
                ("Sun", "Moon"),
                ("Sun", "Sun"),
                ("Moon", "Moon"),
                ("Moon", "Venus"),
                ("Venus", "Venus"),
                ("Sun", "Venus"),
                ("Venus", "Jupiter"),
            ],
            cap: 5,
        },
        Dimension {
            name: "growth",
            pairs: &[
                ("Sun", "Jupiter"),
                ("Moon", "Jupiter"),
                ("Jupiter", "Ascendant"),
                ("Sun", "North Node"),
                ("Moon", "North Node"),
                ("Venus", "North Node"),
            ],
            cap: 4,
        },
    ],
    sweet_cap: 6,
    friction_cap: 6,
    overlay_cap: 6,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const CORE_DYNAMICS: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "attachment",
            pairs: &[
                ("Moon", "Pluto"),
                ("Venus", "Pluto"),
                ("Moon", "Saturn"),
                ("Venus", "Saturn"),
            ],
            cap: 3,
        },
        Dimension {
            name: "drive",
            pairs: &[
                ("Mars", "Mars"),
                ("Sun", "Mars"),
                ("Mars", "Saturn"),
                ("Mars", "Pluto"),
            ],
            cap: 3,
        },
    ],
    sweet_cap: 3,
    friction_cap: 3,
    overlay_cap: 4,
    focus_houses: Some(&[4, 8]),
    tight_aspects: Some(TightAspectRule {
        planets: &["Sun", "Moon", "Venus", "Mars", "Saturn", "Pluto"],
        cap: 6,
    }),
    composite_aspect_cap: None,
};

pub const COMMUNICATION: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "dialogue",
            pairs: &[
                ("Mercury", "Mercury"),
                ("Sun", "Mercury"),
                ("Mercury", "Moon"),
                ("Mercury", "Ascendant"),
            ],
            cap: 3,
        },
        Dimension {
            name: "misreadings",
            pairs: &[
                ("Mercury", "Mars"),
                ("Mercury", "Saturn"),
                ("Mercury", "Neptune"),
                ("Mercury", "Uranus"),
            ],
            cap: 2,
        },
    ],
    sweet_cap: 3,
    friction_cap: 3,
    overlay_cap: 3,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const INTIMACY: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "desire",
            pairs: &[
                ("Venus", "Mars"),
                ("Mars", "Mars"),
                ("Mars", "Pluto"),
                ("Venus", "Pluto"),
            ],
            cap: 3,
        },
        Dimension {
            name: "tenderness",
            pairs: &[
                ("Moon", "Venus"),
                ("Venus", "Venus"),
                ("Moon", "Neptune"),
                ("Venus", "Neptune"),
            ],
            cap: 3,
        },
    ],
    sweet_cap: 3,
    friction_cap: 2,
    overlay_cap: 3,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const CONFLICT: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "triggers",
            pairs: &[
                ("Mars", "Mars"),
                ("Sun", "Mars"),
                ("Moon", "Mars"),
                ("Mars", "Saturn"),
                ("Mars", "Uranus"),
            ],
            cap: 3,
        },
        Dimension {
            name: "control",
            pairs: &[
                ("Sun", "Pluto"),
                ("Moon", "Pluto"),
                ("Sun", "Saturn"),
                ("Saturn", "Saturn"),
            ],
            cap: 3,
        },
    ],
    sweet_cap: 2,
    friction_cap: 5,
    overlay_cap: 3,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const VALUES: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "shared_values",
            pairs: &[
                ("Venus", "Venus"),
                ("Venus", "Jupiter"),
                ("Jupiter", "Jupiter"),
                ("Sun", "Venus"),
            ],
            cap: 3,
        },
        Dimension {
            name: "commitment",
            pairs: &[
                ("Sun", "Saturn"),
                ("Venus", "Saturn"),
                ("Saturn", "Ascendant"),
                ("Saturn", "MC"),
            ],
            cap: 3,
        },
    ],
    sweet_cap: 3,
    friction_cap: 3,
    overlay_cap: 3,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const GROWTH: SectionTable = SectionTable {
    dimensions: &[
        Dimension {
            name: "expansion",
            pairs: &[
                ("Sun", "Jupiter"),
                ("Moon", "Jupiter"),
                ("Mercury", "Jupiter"),
                ("Jupiter", "Ascendant"),
            ],
            cap: 3,
        },
        Dimension {
            name: "destiny",
            pairs: &[
                ("Sun", "North Node"),
                ("Moon", "North Node"),
                ("Venus", "North Node"),
                ("Saturn", "North Node"),
            ],
            cap: 3,
        },
        Dimension {
            name: "transformation",
            pairs: &[
                ("Sun", "Pluto"),
                ("Sun", "Uranus"),
                ("Moon", "Uranus"),
                ("Pluto", "Ascendant"),
            ],
            cap: 2,
        },
    ],
    sweet_cap: 3,
    friction_cap: 3,
    overlay_cap: 3,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: None,
};

pub const COMPOSITE: SectionTable = SectionTable {
    dimensions: &[Dimension {
        name: "bond",
        pairs: &[
            ("Sun", "Moon"),
            ("Sun", "Venus"),
            ("Moon", "Venus"),
            ("Venus", "Mars"),
        ],
        cap: 3,
    }],
    sweet_cap: 3,
    friction_cap: 3,
    overlay_cap: 3,
    focus_houses: None,
    tight_aspects: None,
    composite_aspect_cap: Some(6),
};
