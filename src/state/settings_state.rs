//! Cosmetic display settings

use serde::{Deserialize, Serialize};

/// Countdown font family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Pixel,
    Sans,
}

impl Font {
    /// Parse a stored or user-supplied font name; unknown names are rejected
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pixel" => Some(Font::Pixel),
            "sans" => Some(Font::Sans),
            _ => None,
        }
    }
}

/// Display settings persisted under their own key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub night_mode: bool,
    pub font: Font,
}

/// Partial update applied by the settings endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplaySettingsUpdate {
    #[serde(alias = "nightMode")]
    pub night_mode: Option<bool>,
    pub font: Option<String>,
}

impl DisplaySettings {
    /// Apply a partial update. Unknown font names leave the font unchanged.
    /// Returns true if anything changed.
    pub fn apply(&mut self, update: &DisplaySettingsUpdate) -> bool {
        let before = *self;
        if let Some(night_mode) = update.night_mode {
            self.night_mode = night_mode;
        }
        if let Some(font) = update.font.as_deref().and_then(Font::from_name) {
            self.font = font;
        }
        *self != before
    }
}
