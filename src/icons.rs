//! Icon catalog
//!
//! Every icon the game can place on a card or grid cell. The names are the
//! view layer's glyph names and are what gets persisted, so both the order of
//! [`Icon::ALL`] (it feeds the seeded shuffle) and the spelling are frozen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A renderable sport/brain icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Icon {
    Activity,
    Award,
    Bike,
    Brain,
    Camera,
    Clock,
    Compass,
    Dumbbell,
    Eye,
    Flag,
    Globe,
    Heart,
    Lightbulb,
    Map,
    Music,
    Rocket,
    Shield,
    Star,
    Target,
    Timer,
    Trophy,
    Umbrella,
    Zap,
}

/// Name that is not part of the icon catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown icon name: {0}")]
pub struct UnknownIcon(pub String);

impl Icon {
    /// Full catalog in canonical order
    pub const ALL: [Icon; 23] = [
        Icon::Activity,
        Icon::Award,
        Icon::Bike,
        Icon::Brain,
        Icon::Camera,
        Icon::Clock,
        Icon::Compass,
        Icon::Dumbbell,
        Icon::Eye,
        Icon::Flag,
        Icon::Globe,
        Icon::Heart,
        Icon::Lightbulb,
        Icon::Map,
        Icon::Music,
        Icon::Rocket,
        Icon::Shield,
        Icon::Star,
        Icon::Target,
        Icon::Timer,
        Icon::Trophy,
        Icon::Umbrella,
        Icon::Zap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Icon::Activity => "Activity",
            Icon::Award => "Award",
            Icon::Bike => "Bike",
            Icon::Brain => "Brain",
            Icon::Camera => "Camera",
            Icon::Clock => "Clock",
            Icon::Compass => "Compass",
            Icon::Dumbbell => "Dumbbell",
            Icon::Eye => "Eye",
            Icon::Flag => "Flag",
            Icon::Globe => "Globe",
            Icon::Heart => "Heart",
            Icon::Lightbulb => "Lightbulb",
            Icon::Map => "Map",
            Icon::Music => "Music",
            Icon::Rocket => "Rocket",
            Icon::Shield => "Shield",
            Icon::Star => "Star",
            Icon::Target => "Target",
            Icon::Timer => "Timer",
            Icon::Trophy => "Trophy",
            Icon::Umbrella => "Umbrella",
            Icon::Zap => "Zap",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Icon {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.name() == s)
            .ok_or_else(|| UnknownIcon(s.to_string()))
    }
}
