//! Shared house state
//!
//! The personalized "house": both names, the relationship between them, the
//! active theme, and the luck scores earned in the mini-games. Everything is
//! persisted as one LocalStorage record; share links carry the identifying
//! fields as plain query pairs and override the stored values on load.

use serde::{Deserialize, Serialize};

use crate::scores::LuckScores;
use crate::theme::ThemeKey;

/// How the two people in the house relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    #[default]
    Friend,
    Lover,
    Family,
}

impl Relationship {
    pub const ALL: [Relationship; 3] = [
        Relationship::Friend,
        Relationship::Lover,
        Relationship::Family,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Friend => "friend",
            Relationship::Lover => "lover",
            Relationship::Family => "family",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "friend" => Some(Relationship::Friend),
            "lover" => Some(Relationship::Lover),
            "family" => Some(Relationship::Family),
            _ => None,
        }
    }
}

/// The whole persisted house record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Profile {
    pub user_name: String,
    pub friend_name: String,
    pub relationship: Relationship,
    pub theme: ThemeKey,
    pub scores: LuckScores,
}

impl Profile {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lucky_house_state";

    /// Share-link fields as plain key-value pairs. Percent-encoding is the
    /// web layer's job; there is no versioning.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("u", self.user_name.clone()),
            ("f", self.friend_name.clone()),
            ("r", self.relationship.as_str().to_string()),
        ]
    }

    /// Apply share-link fields. Unknown keys are ignored; missing or
    /// unparseable values keep whatever the profile already holds. Theme
    /// and scores never travel on links.
    pub fn apply_query_pairs<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            match key.as_str() {
                "u" if !value.is_empty() => self.user_name = value,
                "f" if !value.is_empty() => self.friend_name = value,
                "r" => {
                    if let Some(rel) = Relationship::from_str(&value) {
                        self.relationship = rel;
                    }
                }
                _ => {}
            }
        }
    }

    /// Both names filled in; the setup prompt blocks until this holds
    pub fn is_complete(&self) -> bool {
        !self.user_name.is_empty() && !self.friend_name.is_empty()
    }

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(profile) = serde_json::from_str(&json) {
                    log::info!("Loaded house state from LocalStorage");
                    return profile;
                }
            }
        }

        log::info!("No house state found, starting fresh");
        Self::default()
    }

    /// Save the profile to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("House state saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
