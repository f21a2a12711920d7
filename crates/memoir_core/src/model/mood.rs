//! Mood tags and their display palette.
//!
//! The palette is static lookup data; every mood maps to exactly one entry.

use serde::{Deserialize, Serialize};

/// Closed set of mood tags an entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Happy,
    Calm,
    Nostalgic,
    Creative,
    Energetic,
    Reflective,
    Cozy,
}

/// Display colors for one mood, as `#RRGGBB` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodPalette {
    pub label: &'static str,
    /// Day-cell background tint.
    pub bg: &'static str,
    /// Marker dot color.
    pub accent: &'static str,
    pub dark: &'static str,
}

const HAPPY: MoodPalette = MoodPalette {
    label: "Happy",
    bg: "#FFD57E",
    accent: "#FFC145",
    dark: "#B38000",
};
const CALM: MoodPalette = MoodPalette {
    label: "Calm",
    bg: "#9AD3DE",
    accent: "#78C0CE",
    dark: "#2C6E7A",
};
const NOSTALGIC: MoodPalette = MoodPalette {
    label: "Nostalgic",
    bg: "#F7C7E7",
    accent: "#EAA2C6",
    dark: "#9D4C73",
};
const CREATIVE: MoodPalette = MoodPalette {
    label: "Creative",
    bg: "#C1A3FF",
    accent: "#A380F7",
    dark: "#5E38C2",
};
const ENERGETIC: MoodPalette = MoodPalette {
    label: "Energetic",
    bg: "#FFB3B3",
    accent: "#FF8080",
    dark: "#C23838",
};
const REFLECTIVE: MoodPalette = MoodPalette {
    label: "Reflective",
    bg: "#B8D8C0",
    accent: "#96C2A2",
    dark: "#4A7055",
};
const COZY: MoodPalette = MoodPalette {
    label: "Cozy",
    bg: "#E6D3B8",
    accent: "#D4B895",
    dark: "#8F6F45",
};

impl Mood {
    /// All moods in picker order.
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Nostalgic,
        Mood::Creative,
        Mood::Energetic,
        Mood::Reflective,
        Mood::Cozy,
    ];

    pub fn palette(self) -> &'static MoodPalette {
        match self {
            Mood::Happy => &HAPPY,
            Mood::Calm => &CALM,
            Mood::Nostalgic => &NOSTALGIC,
            Mood::Creative => &CREATIVE,
            Mood::Energetic => &ENERGETIC,
            Mood::Reflective => &REFLECTIVE,
            Mood::Cozy => &COZY,
        }
    }

    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Nostalgic => "nostalgic",
            Mood::Creative => "creative",
            Mood::Energetic => "energetic",
            Mood::Reflective => "reflective",
            Mood::Cozy => "cozy",
        }
    }

    pub fn parse(value: &str) -> Option<Mood> {
        let normalized = value.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
    }
}
