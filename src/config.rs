//! Build-time parameters of the bootloader region and the self-heal sequence.

use core::num::NonZeroU8;
use core::ops::RangeInclusive;

use crate::golden::GoldenImage;

/// Minimal program granularity of the storage, in bytes.
pub const WORD_SIZE: usize = 4;

/// Number of erase+program+verify cycles before the device is declared bricked.
pub const DEFAULT_MAX_TRIES: NonZeroU8 = NonZeroU8::new(10).unwrap();

/// Where the bootloader lives in storage.
///
/// Addresses are offsets as understood by the storage driver. Sectors are uniform
/// in size and numbered from offset zero, so sector `n` spans
/// `n * sector_size..(n + 1) * sector_size`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BootloaderLayout {
    start: u32,
    len: u32,
    sector_size: u32,
}

impl BootloaderLayout {
    pub const fn new(start: u32, len: u32, sector_size: u32) -> Self {
        assert!(sector_size > 0, "sector size must be non-zero");
        assert!(len > 0, "bootloader region must not be empty");
        assert!(
            start % sector_size == 0,
            "bootloader region must start on a sector boundary"
        );
        assert!(
            len as usize % WORD_SIZE == 0,
            "bootloader region length must be word aligned"
        );
        assert!(
            start.checked_add(len).is_some(),
            "bootloader region overflows the address space"
        );

        Self {
            start,
            len,
            sector_size,
        }
    }

    pub const fn start(&self) -> u32 {
        self.start
    }

    pub const fn len(&self) -> u32 {
        self.len
    }

    pub const fn end(&self) -> u32 {
        self.start + self.len
    }

    pub const fn sector_size(&self) -> u32 {
        self.sector_size
    }

    /// Sectors spanning the region, in ascending order.
    pub fn sectors(&self) -> RangeInclusive<u32> {
        let first = self.start / self.sector_size;
        let last = (self.end() - 1) / self.sector_size;
        first..=last
    }

    pub const fn word_count(&self) -> usize {
        self.len as usize / WORD_SIZE
    }

    /// Absolute address of the `index`th word of the region.
    pub const fn word_address(&self, index: usize) -> u32 {
        self.start + (index * WORD_SIZE) as u32
    }

    pub const fn contains_sector(&self, sector: u32) -> bool {
        let first = self.start / self.sector_size;
        let last = (self.end() - 1) / self.sector_size;
        sector >= first && sector <= last
    }

    /// Whether a word written at `address` stays within the region.
    pub const fn contains_word(&self, address: u32) -> bool {
        address >= self.start && address <= self.end() - WORD_SIZE as u32
    }
}

/// Everything the check needs to know at build time.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub layout: BootloaderLayout,
    pub golden: GoldenImage,
    /// Upper bound of erase+program+verify cycles, exact rather than minimal.
    pub max_tries: NonZeroU8,
}

impl Config {
    /// Panics if the golden image does not fill the bootloader region exactly.
    pub const fn new(layout: BootloaderLayout, golden: GoldenImage) -> Self {
        assert!(
            golden.len() == layout.len() as usize,
            "golden image length must equal the bootloader region length"
        );

        Self {
            layout,
            golden,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    pub const fn with_max_tries(mut self, max_tries: NonZeroU8) -> Self {
        self.max_tries = max_tries;
        self
    }
}
