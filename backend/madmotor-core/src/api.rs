//! Public interface to the Mad Motor video hardware.

use crate::gfx::MadMotorGfx;
use crate::video::{MadMotorHardware, MadMotorState, Pf3View, Region};
use std::io;
use tilecade_config::{ArcadeGame, VideoConfig};
use tilemap_core::compositor::VideoHardware;
use tilemap_core::{
    FrameCompositor, FrameStats, IndexedBitmap, PaletteDevice, SaveStateError, ScreenGeometry,
    VideoBus, savestate,
};

pub use crate::video::SCREEN;

#[derive(Debug, Clone)]
pub struct MadMotorVideo {
    hardware: MadMotorHardware,
    compositor: FrameCompositor,
}

impl MadMotorVideo {
    #[must_use]
    pub fn new(gfx: MadMotorGfx, config: VideoConfig) -> Self {
        log::info!("Creating Mad Motor video hardware with config {config}");

        let hardware = MadMotorHardware::new(gfx, config);
        let compositor = FrameCompositor::new(hardware.palette_len());
        Self { hardware, compositor }
    }

    #[must_use]
    pub fn screen(&self) -> ScreenGeometry {
        self.hardware.screen()
    }

    #[must_use]
    pub fn pf3_view(&self) -> Pf3View {
        self.hardware.pf3_view()
    }

    #[must_use]
    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn reload_config(&mut self, config: VideoConfig) {
        log::info!("Reloading Mad Motor video config: {config}");
        self.hardware.config = config;
    }

    /// Render one frame into `bitmap`, which should be sized to [`MadMotorVideo::screen`].
    pub fn render_frame<P: PaletteDevice + ?Sized>(
        &mut self,
        palette: &mut P,
        bitmap: &mut IndexedBitmap,
    ) -> FrameStats {
        self.compositor.run_frame(&mut self.hardware, palette, bitmap)
    }

    /// Save video RAM, registers and frame state. Graphics and configuration are not included.
    ///
    /// # Errors
    ///
    /// Propagates any encoding or I/O error.
    pub fn save_state<W: io::Write>(&self, writer: W) -> Result<(), SaveStateError> {
        savestate::save_state(
            ArcadeGame::MadMotor,
            &(&self.hardware.state, &self.compositor),
            writer,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the state cannot be decoded or belongs to a different game. The
    /// current state is left unchanged on error.
    pub fn load_state<R: io::Read>(&mut self, reader: R) -> Result<(), SaveStateError> {
        let (state, compositor): (MadMotorState, FrameCompositor) =
            savestate::load_state(ArcadeGame::MadMotor, reader)?;

        self.hardware.state = state;
        self.compositor = compositor;

        Ok(())
    }
}

impl VideoBus for MadMotorVideo {
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
