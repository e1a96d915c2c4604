use bincode::{Decode, Encode};
use std::fmt::{Display, Formatter};
use tilecade_proc_macros::{EnumAll, EnumDisplay, EnumFromStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Encode,
    Decode,
    EnumDisplay,
    EnumFromStr,
    EnumAll,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(tilecade_proc_macros::CustomValueEnum))]
pub enum ArcadeGame {
    #[default]
    MadMotor,
    PowerInstinct,
}

/// Per-layer toggles for the video hardware of either game.
///
/// Layers are named by Z-order rather than by the hardware's playfield numbering: on Mad Motor the
/// background is playfield 3, the midground is playfield 2 and the foreground is the text layer;
/// Power Instinct has no midground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VideoConfig {
    pub background_enabled: bool,
    pub midground_enabled: bool,
    pub foreground_enabled: bool,
    pub sprites_enabled: bool,
    /// If disabled, flashing sprites are drawn on every frame instead of every other frame
    pub sprite_flash_enabled: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            background_enabled: true,
            midground_enabled: true,
            foreground_enabled: true,
            sprites_enabled: true,
            sprite_flash_enabled: true,
        }
    }
}

impl Display for VideoConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VideoConfig {{ background={}, midground={}, foreground={}, sprites={}, sprite_flash={} }}",
            self.background_enabled,
            self.midground_enabled,
            self.foreground_enabled,
            self.sprites_enabled,
            self.sprite_flash_enabled
        )
    }
}
