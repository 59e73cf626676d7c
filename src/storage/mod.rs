//! Storage driver for the bootloader region.

use crate::Error;

pub mod nor_flash;

pub use nor_flash::NorFlashBootloader;

/// Low-level driver of the storage holding the bootloader.
///
/// All calls block until the hardware is done. Failures are reported, but the
/// self-heal sequence only trusts re-verification of the written region.
#[allow(async_fn_in_trait)]
pub trait BootloaderStorage {
    /// Lift the write protection of the bootloader region.
    ///
    /// Must be safe to call again while already unprotected.
    async fn write_unlock(&mut self) -> Result<(), Error>;

    /// Re-apply the write protection of the bootloader region.
    async fn write_lock(&mut self) -> Result<(), Error>;

    /// Acquire exclusive access to the storage controller.
    async fn unlock(&mut self) -> Result<(), Error>;

    /// Release exclusive access to the storage controller.
    async fn lock(&mut self) -> Result<(), Error>;

    /// Erase a single sector, leaving it in the erased state.
    async fn erase_sector(&mut self, sector: u32) -> Result<(), Error>;

    /// Program one word at `address`, which must be word aligned.
    async fn program_word(&mut self, address: u32, word: u32) -> Result<(), Error>;
}
