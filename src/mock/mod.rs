pub mod ram_flash;
pub mod scripted;

use std::collections::BTreeMap;
use std::vec::Vec;

use crate::{
    BootloaderLayout, Config, Device, Error, ExecutionContext, Fingerprint, GoldenImage, Notice,
    journal::{HealReport, Journal},
    mock::ram_flash::SECTOR_SIZE,
};

/// Bootloader region of the mock flash: sectors 1 and 2.
pub const LAYOUT: BootloaderLayout =
    BootloaderLayout::new(SECTOR_SIZE, 2 * SECTOR_SIZE, SECTOR_SIZE);

/// Start of the journal pages of the mock flash: sectors 4 and 5.
pub const JOURNAL_OFFSET: u32 = 4 * SECTOR_SIZE;

const fn golden_data() -> [u8; LAYOUT.len() as usize] {
    let mut data = [0u8; LAYOUT.len() as usize];
    let mut i = 0;
    while i < data.len() {
        data[i] = (i as u8).wrapping_mul(7) ^ 0x5a;
        i += 1;
    }
    data
}

pub static GOLDEN_DATA: [u8; LAYOUT.len() as usize] = golden_data();

pub fn test_config() -> Config {
    let golden = GoldenImage::new(&GOLDEN_DATA, Fingerprint::of_region(&GOLDEN_DATA));
    Config::new(LAYOUT, golden)
}

#[derive(Debug)]
pub struct WearTracker(BTreeMap<u32, usize>);

impl WearTracker {
    pub const fn new() -> Self {
        WearTracker(BTreeMap::new())
    }

    pub fn increase(&mut self, sector: u32) {
        *self.0.entry(sector).or_insert(0) += 1;
    }

    pub fn get(&self, sector: u32) -> usize {
        self.0.get(&sector).copied().unwrap_or(0)
    }
}

pub struct MockDevice {
    pub context: ExecutionContext,
    pub notices: Vec<Notice>,
}

impl MockDevice {
    pub fn new(context: ExecutionContext) -> Self {
        MockDevice {
            context,
            notices: Vec::new(),
        }
    }
}

impl Device for MockDevice {
    fn context(&self) -> ExecutionContext {
        self.context
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn halt(&mut self) -> ! {
        match self.notices.last() {
            Some(notice) => panic!("halted after {:?}", notice),
            None => panic!("halted"),
        }
    }
}

#[derive(Default)]
pub struct RecordingJournal {
    pub last: Option<HealReport>,
}

impl Journal for RecordingJournal {
    async fn record(&mut self, report: &HealReport) -> Result<(), Error> {
        self.last = Some(*report);
        Ok(())
    }
}
