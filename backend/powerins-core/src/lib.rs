//! Video hardware for Power Instinct: a banked 16x16 background, an 8x8 text layer and a list
//! of 16-byte multi-tile sprites.

pub mod api;
pub mod gfx;
mod video;

pub use api::PowerInsVideo;
pub use gfx::PowerInsGfx;
pub use video::BankedTiles;
