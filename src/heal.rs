//! Self-heal sequencer rewriting the bootloader region from the golden image.
//!
//! Flash can transiently fail an erase or program cycle. Individual driver errors
//! are logged and absorbed; the only authoritative signal of success is the
//! fingerprint of the region after the rewrite. Each attempt performs the full
//! erase+program+verify cycle, and the number of attempts is exactly bounded by
//! [`Config::max_tries`].

use serde::{Deserialize, Serialize};

use crate::{
    Config, Device, Error, Notice, integrity::Fingerprinter, storage::BootloaderStorage,
};

/// Terminal state of the self-heal sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum UpdateOutcome {
    /// The region verified against the golden fingerprint after `attempts` cycles.
    Success { attempts: u8 },
    /// No cycle verified. The device cannot repair itself.
    Bricked,
}

/// Rewrite the bootloader region until it verifies or the retry budget is spent.
///
/// Emits [`Notice::UpdateInProgress`] before anything is written. Write protection
/// is lifted once for the whole sequence and re-applied before returning, on both
/// outcomes. The terminal notice is left to the caller.
pub async fn attempt_update<D, S>(device: &mut D, storage: &mut S, config: &Config) -> UpdateOutcome
where
    D: Device,
    S: BootloaderStorage + Fingerprinter,
{
    device.notify(Notice::UpdateInProgress);

    absorb("write unlock", storage.write_unlock().await);

    let mut outcome = UpdateOutcome::Bricked;
    for attempt in 1..=config.max_tries.get() {
        log::info!("rewriting bootloader, attempt {}/{}", attempt, config.max_tries);

        rewrite(storage, config).await;

        let measurement = storage.fingerprint().await;
        if config.golden.matches(measurement.as_ref()) {
            log::info!("bootloader verified after {} attempt(s)", attempt);
            outcome = UpdateOutcome::Success { attempts: attempt };
            break;
        }

        log::warn!(
            "bootloader verification failed on attempt {}: {:?}",
            attempt,
            measurement
        );
    }

    absorb("write lock", storage.write_lock().await);

    if outcome == UpdateOutcome::Bricked {
        log::error!(
            "bootloader did not verify after {} attempts",
            config.max_tries
        );
    }

    outcome
}

/// One erase+program cycle. Every step is attempted regardless of earlier failures.
async fn rewrite<S: BootloaderStorage>(storage: &mut S, config: &Config) {
    let layout = &config.layout;

    absorb("controller unlock", storage.unlock().await);

    // All sectors are erased before any word is programmed.
    for sector in layout.sectors() {
        log::debug!("erasing sector {}", sector);
        absorb("sector erase", storage.erase_sector(sector).await);
    }

    let mut failed_words = 0usize;
    for (i, word) in config.golden.words().enumerate() {
        if storage
            .program_word(layout.word_address(i), word)
            .await
            .is_err()
        {
            failed_words += 1;
        }
    }
    if failed_words > 0 {
        log::warn!(
            "{} of {} words failed to program",
            failed_words,
            layout.word_count()
        );
    }

    absorb("controller lock", storage.lock().await);
}

fn absorb(step: &str, result: Result<(), Error>) {
    if let Err(e) = result {
        log::warn!("{} failed: {}", step, e);
    }
}
