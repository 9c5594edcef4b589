//! Festive color palettes
//!
//! Read-only lookup consumed by the rendering shell. Game logic never reads
//! colors; the active key is just carried in the profile.

use serde::{Deserialize, Serialize};

/// Selectable theme identifier, persisted with the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Warm,
    Pixel,
    Healing,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 3] = [ThemeKey::Warm, ThemeKey::Pixel, ThemeKey::Healing];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKey::Warm => "warm",
            ThemeKey::Pixel => "pixel",
            ThemeKey::Healing => "healing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warm" => Some(ThemeKey::Warm),
            "pixel" => Some(ThemeKey::Pixel),
            "healing" => Some(ThemeKey::Healing),
            _ => None,
        }
    }

    pub fn theme(&self) -> &'static Theme {
        match self {
            ThemeKey::Warm => &WARM,
            ThemeKey::Pixel => &PIXEL,
            ThemeKey::Healing => &HEALING,
        }
    }
}

/// One palette: CSS color strings ready for the canvas and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    /// Confetti colors for celebrations
    pub fireworks: &'static [&'static str],
}

pub const WARM: Theme = Theme {
    name: "Warm New Year",
    primary: "#D32F2F",
    secondary: "#FFD700",
    accent: "#FFB800",
    text: "#FFF5E6",
    fireworks: &["#FFD700", "#FF4D4D", "#FFF5E6"],
};

pub const PIXEL: Theme = Theme {
    name: "Pixel New Year",
    primary: "#FF0044",
    secondary: "#00FF99",
    accent: "#00CCFF",
    text: "#FFFFFF",
    fireworks: &["#FF0044", "#00FF99", "#00CCFF", "#FFFF00"],
};

pub const HEALING: Theme = Theme {
    name: "Cozy Healing",
    primary: "#FF9AA2",
    secondary: "#B5EAD7",
    accent: "#FFDAC1",
    text: "#6B7280",
    fireworks: &["#FFB7B2", "#E2F0CB", "#FFDAC1", "#FFFFD1"],
};
