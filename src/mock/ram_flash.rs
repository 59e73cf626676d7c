use embedded_storage_async::nor_flash::{ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash};

use crate::{BootloaderLayout, mock::WearTracker};

pub const SECTOR_SIZE: u32 = 256;
pub const SECTOR_COUNT: usize = 6;
pub const CAPACITY: usize = SECTOR_SIZE as usize * SECTOR_COUNT;
pub const ERASED: u8 = 0xff;

/// NOR flash in RAM: erase sets bytes to `0xff`, programming can only clear bits.
pub struct RamFlash {
    pub data: [u8; CAPACITY],
    pub wear: WearTracker,
    /// Number of upcoming write calls that fail without touching the data.
    pub fail_writes: usize,
    pub fail_reads: bool,
}

impl RamFlash {
    pub const fn new() -> Self {
        RamFlash {
            data: [ERASED; CAPACITY],
            wear: WearTracker::new(),
            fail_writes: 0,
            fail_reads: false,
        }
    }

    /// Flash with `content` already installed in the bootloader region.
    pub fn with_region(layout: BootloaderLayout, content: &[u8]) -> Self {
        let mut flash = Self::new();
        let start = layout.start() as usize;
        flash.data[start..start + content.len()].copy_from_slice(content);
        flash
    }

    pub fn region(&self, layout: BootloaderLayout) -> &[u8] {
        &self.data[layout.start() as usize..layout.end() as usize]
    }
}

impl ErrorType for RamFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(NorFlashErrorKind::Other);
        }
        let offset = offset as usize;
        let src = self
            .data
            .get(offset..offset + bytes.len())
            .ok_or(NorFlashErrorKind::OutOfBounds)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        CAPACITY
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = SECTOR_SIZE as usize;

    async fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        if from % SECTOR_SIZE != 0 || to % SECTOR_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if to as usize > CAPACITY {
            return Err(NorFlashErrorKind::OutOfBounds);
        }

        for sector in from / SECTOR_SIZE..to / SECTOR_SIZE {
            self.wear.increase(sector);
        }
        self.data[from as usize..to as usize].fill(ERASED);
        Ok(())
    }

    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(NorFlashErrorKind::Other);
        }
        if offset as usize % Self::WRITE_SIZE != 0 || bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }

        let offset = offset as usize;
        let dst = self
            .data
            .get_mut(offset..offset + bytes.len())
            .ok_or(NorFlashErrorKind::OutOfBounds)?;
        for (d, s) in dst.iter_mut().zip(bytes) {
            *d &= *s;
        }
        Ok(())
    }
}
