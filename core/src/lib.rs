pub mod emulator;
pub mod hardware;
pub mod io;
pub mod parcel;

pub use crate::emulator::{AudioSink, EmulatorMode, GameBoy};
pub use crate::hardware::cartridge::RomError;
pub use crate::hardware::ppu::palette::{DisplayColour, Rgb565};
pub use crate::hardware::ppu::{FRAMEBUFFER_SIZE, RESOLUTION_HEIGHT, RESOLUTION_WIDTH};
pub use crate::io::joypad::{InputKey, KeyState};
pub use crate::io::serial::SerialEndpoint;
pub use crate::parcel::StateError;

/// Struct wrapping the various construction options for a [`GameBoy`].
#[derive(Debug)]
pub struct GameBoyOptions {
    pub boot_rom: Option<Vec<u8>>,
    pub saved_ram: Option<Vec<u8>>,
    pub mode: EmulatorMode,
}

impl Default for GameBoyOptions {
    fn default() -> Self {
        GameBoyOptionsBuilder::new().build()
    }
}

#[derive(Debug)]
pub struct GameBoyOptionsBuilder {
    boot_rom: Option<Vec<u8>>,
    saved_ram: Option<Vec<u8>>,
    mode: EmulatorMode,
}

impl GameBoyOptionsBuilder {
    pub fn new() -> Self {
        GameBoyOptionsBuilder {
            boot_rom: None,
            saved_ram: None,
            mode: EmulatorMode::DMG,
        }
    }

    pub fn boot_rom(mut self, boot_rom: Option<Vec<u8>>) -> Self {
        self.boot_rom = boot_rom;
        self
    }

    pub fn saved_ram(mut self, saved_ram: Option<Vec<u8>>) -> Self {
        self.saved_ram = saved_ram;
        self
    }

    pub fn with_mode(mut self, mode: EmulatorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> GameBoyOptions {
        GameBoyOptions {
            boot_rom: self.boot_rom,
            saved_ram: self.saved_ram,
            mode: self.mode,
        }
    }
}

impl From<GameBoyOptions> for GameBoyOptionsBuilder {
    fn from(from: GameBoyOptions) -> Self {
        GameBoyOptionsBuilder {
            boot_rom: from.boot_rom,
            saved_ram: from.saved_ram,
            mode: from.mode,
        }
    }
}
