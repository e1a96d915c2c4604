//! Video hardware for Mad Motor: three tile playfields, one of which can switch between two
//! shapes, plus a list of 8-byte sprites.

pub mod api;
pub mod gfx;
mod video;

pub use api::MadMotorVideo;
pub use gfx::MadMotorGfx;
pub use video::Pf3View;
