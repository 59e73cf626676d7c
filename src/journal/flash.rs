//! Journal keeping the last heal report in flash.
//!
//! Leverages `sequential-storage` and `postcard` to store and serialize/deserialize
//! the report. Storing appends a new item, so an interrupted or failed store keeps
//! the previous report readable.

use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::{
    cache::KeyPointerCache,
    map::{SerializationError, Value},
};

use crate::{
    Error, FINGERPRINT_LEN,
    journal::{HealReport, Journal},
};

/// Number of flash pages backing the journal.
pub const JOURNAL_PAGES: usize = 2;

// Option tag, fingerprint, outcome variant and attempt count.
const _: () = assert!(1 + FINGERPRINT_LEN + 1 + 1 <= HealReport::max_serialized_size());

impl<'a> Value<'a> for HealReport {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let buffer = postcard::to_slice(self, buffer).map_err(|e| match e {
            postcard::Error::SerializeBufferFull => SerializationError::BufferTooSmall,
            // Unmapped error.
            _ => SerializationError::Custom(0),
        })?;

        Ok(buffer.len())
    }

    fn deserialize_from(buffer: &'a [u8]) -> Result<Self, SerializationError>
    where
        Self: Sized,
    {
        postcard::from_bytes(buffer).map_err(|e| match e {
            postcard::Error::DeserializeUnexpectedEnd => SerializationError::BufferTooSmall,
            postcard::Error::DeserializeBadVarint
            | postcard::Error::DeserializeBadBool
            | postcard::Error::DeserializeBadOption
            | postcard::Error::DeserializeBadEnum
            | postcard::Error::DeserializeBadEncoding => SerializationError::InvalidFormat,
            // Unmapped error.
            _ => SerializationError::Custom(0),
        })
    }
}

pub struct FlashJournal<NVM: NorFlash> {
    nvm: NVM,
    /// Start of the journal, page aligned.
    offset: u32,
    cache: KeyPointerCache<JOURNAL_PAGES, (), 1>,
}

impl<NVM: NorFlash> FlashJournal<NVM> {
    /// The journal occupies [`JOURNAL_PAGES`] pages starting at `offset`.
    pub fn new(nvm: NVM, offset: u32) -> Result<Self, Error> {
        if offset as usize % NVM::ERASE_SIZE != 0 {
            return Err(Error::Unaligned);
        }
        if offset as usize + JOURNAL_PAGES * NVM::ERASE_SIZE > nvm.capacity() {
            return Err(Error::OutOfBounds);
        }

        Ok(Self {
            nvm,
            offset,
            cache: KeyPointerCache::new(),
        })
    }

    pub fn into_inner(self) -> NVM {
        self.nvm
    }

    fn range(&self) -> core::ops::Range<u32> {
        self.offset..self.offset + (JOURNAL_PAGES * NVM::ERASE_SIZE) as u32
    }

    pub async fn store(&mut self, report: &HealReport) -> Result<(), Error> {
        let mut data_buffer = [0u8; HealReport::max_serialized_size()];
        let range = self.range();

        log::debug!("storing heal report {:?}", report);

        sequential_storage::map::store_item::<(), HealReport, _>(
            &mut self.nvm,
            range,
            &mut self.cache,
            &mut data_buffer,
            &(),
            report,
        )
        .await
        .map_err(|e| {
            log::warn!("storing heal report failed: {:?}", e);
            Error::Flash
        })
    }

    /// The last stored report, or `None` if none was ever stored.
    pub async fn load(&mut self) -> Result<Option<HealReport>, Error> {
        let mut data_buffer = [0u8; HealReport::max_serialized_size()];
        let range = self.range();

        let report = sequential_storage::map::fetch_item::<(), HealReport, _>(
            &mut self.nvm,
            range,
            &mut self.cache,
            &mut data_buffer,
            &(),
        )
        .await
        .map_err(|e| {
            log::warn!("loading heal report failed: {:?}", e);
            Error::Flash
        })?;

        if report.is_none() {
            log::debug!("journal does not contain a report");
        }
        Ok(report)
    }
}

impl<NVM: NorFlash> Journal for FlashJournal<NVM> {
    async fn record(&mut self, report: &HealReport) -> Result<(), Error> {
        self.store(report).await
    }
}
