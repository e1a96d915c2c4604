//! Generic tile-based video pipeline: tilemaps, sprite lists, palette usage tracking and the
//! per-frame compositor shared by the arcade video hardware crates.

pub mod bitmap;
pub mod compositor;
pub mod gfx;
pub mod palette;
pub mod registers;
pub mod savestate;
pub mod sprites;
pub mod tilemap;

pub use bitmap::{IndexedBitmap, Rect, ScreenGeometry};
pub use compositor::{FrameCompositor, FrameContext, FrameStage, FrameStats, VideoHardware};
pub use gfx::{GfxError, GfxLayout, GfxRegion, Transparency};
pub use palette::{FixedPalette, PaletteDevice, PaletteUsage};
pub use savestate::SaveStateError;

/// CPU-side access to video memory and registers.
///
/// Addresses are 68000 byte addresses; `mask` selects which bits of a 16-bit write take effect
/// (`0xFF00` for an even byte, `0x00FF` for an odd byte).
pub trait VideoBus {
    /// Returns `None` if the address is not mapped to video hardware.
    fn read_word(&self, address: u32) -> Option<u16>;

    /// Returns `false` if the address is not mapped to video hardware.
    fn write_word(&mut self, address: u32, data: u16, mask: u16) -> bool;
}
