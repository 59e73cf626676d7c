//! Record of the last self-heal sequence, for the application to inspect after reboot.

use serde::{Deserialize, Serialize};

use crate::{Error, Fingerprint, heal::UpdateOutcome};

#[cfg(feature = "heal_journal")]
pub mod flash;

#[cfg(feature = "heal_journal")]
pub use flash::FlashJournal;

/// What a self-heal sequence started from and how it ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HealReport {
    /// Fingerprint of the bootloader found before the rewrite, if it could be measured.
    pub previous: Option<Fingerprint>,
    pub outcome: UpdateOutcome,
}

impl HealReport {
    /// Buffer size holding any encoded report.
    pub const fn max_serialized_size() -> usize {
        64
    }
}

/// Sink for heal reports, written once per self-heal sequence.
#[allow(async_fn_in_trait)]
pub trait Journal {
    async fn record(&mut self, report: &HealReport) -> Result<(), Error>;
}

/// No journal.
impl Journal for () {
    async fn record(&mut self, _report: &HealReport) -> Result<(), Error> {
        Ok(())
    }
}
