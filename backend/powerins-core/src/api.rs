//! Public interface to the Power Instinct video hardware.

use crate::gfx::PowerInsGfx;
use crate::video::{PowerInsHardware, PowerInsState, Region};
use std::io;
use tilecade_config::{ArcadeGame, VideoConfig};
use tilemap_core::compositor::VideoHardware;
use tilemap_core::{
    FrameCompositor, FrameStats, IndexedBitmap, PaletteDevice, SaveStateError, ScreenGeometry,
    VideoBus, savestate,
};

pub use crate::video::SCREEN;

#[derive(Debug, Clone)]
pub struct PowerInsVideo {
    hardware: PowerInsHardware,
    compositor: FrameCompositor,
}

impl PowerInsVideo {
    #[must_use]
    pub fn new(gfx: PowerInsGfx, config: VideoConfig) -> Self {
        log::info!("Creating Power Instinct video hardware with config {config}");

        let hardware = PowerInsHardware::new(gfx, config);
        let compositor = FrameCompositor::new(hardware.palette_len());
        Self { hardware, compositor }
    }

    #[must_use]
    pub fn screen(&self) -> ScreenGeometry {
        self.hardware.screen()
    }

    #[must_use]
    pub fn tile_bank(&self) -> u8 {
        self.hardware.tile_bank()
    }

    #[must_use]
    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    /// The midground toggle has no effect; this board has only two tilemap layers.
    pub fn reload_config(&mut self, config: VideoConfig) {
        log::info!("Reloading Power Instinct video config: {config}");
        self.hardware.config = config;
    }

    pub fn render_frame<P: PaletteDevice + ?Sized>(
        &mut self,
        palette: &mut P,
        bitmap: &mut IndexedBitmap,
    ) -> FrameStats {
        self.compositor.run_frame(&mut self.hardware, palette, bitmap)
    }

    /// # Errors
    ///
    /// Propagates any encoding or I/O error.
    pub fn save_state<W: io::Write>(&self, writer: W) -> Result<(), SaveStateError> {
        savestate::save_state(
            ArcadeGame::PowerInstinct,
            &(&self.hardware.state, &self.compositor),
            writer,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the state cannot be decoded or was saved by a different game.
    pub fn load_state<R: io::Read>(&mut self, reader: R) -> Result<(), SaveStateError> {
        let (state, compositor): (PowerInsState, FrameCompositor) =
            savestate::load_state(ArcadeGame::PowerInstinct, reader)?;

        self.hardware.state = state;
        self.compositor = compositor;

        Ok(())
    }
}

impl VideoBus for PowerInsVideo {
    fn read_word(&self, address: u32) -> Option<u16> {
        let (region, offset) = Region::decode(address)?;
        Some(self.hardware.read(region, offset))
    }

    fn write_word(&mut self, address: u32, data: u16, mask: u16) -> bool {
        let Some((region, offset)) = Region::decode(address) else {
            log::trace!("Unmapped video write {address:06X} {data:04X}");
            return false;
        };

        self.hardware.write(region, offset, data, mask);
        true
    }
}

#[cfg(test)]
mod tests;
