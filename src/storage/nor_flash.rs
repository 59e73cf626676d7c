//! [`BootloaderStorage`] and [`Fingerprinter`] on top of any async NOR flash.

use embedded_storage_async::nor_flash::NorFlash;
use sha2::{Digest, Sha256};

use crate::{
    BootloaderLayout, Error, Fingerprint, WORD_SIZE, integrity::Fingerprinter,
    storage::BootloaderStorage,
};

/// Size of the buffer used when streaming the region through the hash engine.
const READ_CHUNK: usize = 256;

/// Bootloader region hosted on a [`NorFlash`].
///
/// Write protection and controller exclusivity are tracked in software: erase and
/// program are refused unless both [`write_unlock`](BootloaderStorage::write_unlock)
/// and [`unlock`](BootloaderStorage::unlock) were called. Protection starts applied.
pub struct NorFlashBootloader<F: NorFlash> {
    flash: F,
    layout: BootloaderLayout,
    write_protected: bool,
    exclusive: bool,
}

impl<F: NorFlash> NorFlashBootloader<F> {
    /// Fails if the layout does not fit the geometry of `flash`.
    pub fn new(flash: F, layout: BootloaderLayout) -> Result<Self, Error> {
        if layout.sector_size() as usize != F::ERASE_SIZE {
            return Err(Error::Unaligned);
        }
        if WORD_SIZE % F::WRITE_SIZE != 0 || READ_CHUNK % F::READ_SIZE != 0 {
            return Err(Error::Unaligned);
        }
        // The last chunk read is `len % READ_CHUNK` long and must stay read aligned.
        if layout.start() as usize % F::READ_SIZE != 0
            || layout.len() as usize % F::READ_SIZE != 0
        {
            return Err(Error::Unaligned);
        }
        if layout.end() as usize > flash.capacity() {
            return Err(Error::OutOfBounds);
        }

        Ok(Self {
            flash,
            layout,
            write_protected: true,
            exclusive: false,
        })
    }

    pub fn layout(&self) -> &BootloaderLayout {
        &self.layout
    }

    pub fn is_write_protected(&self) -> bool {
        self.write_protected
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    fn ensure_writable(&self) -> Result<(), Error> {
        if self.write_protected || !self.exclusive {
            return Err(Error::WriteProtected);
        }
        Ok(())
    }
}

fn flash_error<E: core::fmt::Debug>(e: E) -> Error {
    log::warn!("flash driver: {:?}", e);
    Error::Flash
}

impl<F: NorFlash> BootloaderStorage for NorFlashBootloader<F> {
    async fn write_unlock(&mut self) -> Result<(), Error> {
        self.write_protected = false;
        Ok(())
    }

    async fn write_lock(&mut self) -> Result<(), Error> {
        self.write_protected = true;
        Ok(())
    }

    async fn unlock(&mut self) -> Result<(), Error> {
        self.exclusive = true;
        Ok(())
    }

    async fn lock(&mut self) -> Result<(), Error> {
        self.exclusive = false;
        Ok(())
    }

    async fn erase_sector(&mut self, sector: u32) -> Result<(), Error> {
        self.ensure_writable()?;
        if !self.layout.contains_sector(sector) {
            return Err(Error::OutOfBounds);
        }

        let from = sector * self.layout.sector_size();
        let to = from + self.layout.sector_size();
        self.flash.erase(from, to).await.map_err(flash_error)
    }

    async fn program_word(&mut self, address: u32, word: u32) -> Result<(), Error> {
        self.ensure_writable()?;
        if address as usize % WORD_SIZE != 0 {
            return Err(Error::Unaligned);
        }
        if !self.layout.contains_word(address) {
            return Err(Error::OutOfBounds);
        }

        self.flash
            .write(address, &word.to_le_bytes())
            .await
            .map_err(flash_error)
    }
}

impl<F: NorFlash> Fingerprinter for NorFlashBootloader<F> {
    async fn fingerprint(&mut self) -> Option<Fingerprint> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; READ_CHUNK];
        let mut offset = self.layout.start();

        while offset < self.layout.end() {
            let n = ((self.layout.end() - offset) as usize).min(READ_CHUNK);
            if let Err(e) = self.flash.read(offset, &mut buf[..n]).await {
                log::warn!("reading bootloader region at {:#x} failed: {:?}", offset, e);
                return None;
            }
            hasher.update(&buf[..n]);
            offset += n as u32;
        }

        Some(Fingerprint::from_inner_digest(hasher.finalize().into()))
    }
}
