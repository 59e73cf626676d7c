//! The boot-time routine tying integrity check, privilege gate and self-heal together.

use crate::{
    Config, Device, Notice,
    integrity::{Fingerprinter, TrustPolicy},
    journal::Journal,
    storage::BootloaderStorage,
};

#[cfg(feature = "memory_protect")]
use crate::{
    heal::{UpdateOutcome, attempt_update},
    integrity::{Classification, classify},
    journal::HealReport,
};

/// Outcomes after which booting continues with the installed bootloader.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pass {
    /// Built without `memory_protect`; nothing was checked.
    Disabled,
    /// Trusted bootloader, but the context may not modify protected storage.
    InsufficientPrivilege,
    /// The installed bootloader is the golden image.
    AlreadyCurrent,
}

/// Outcomes after which the device must halt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terminal {
    /// The installed bootloader failed the trust policy. Nothing was written.
    UntrustedBootloader,
    /// The region was rewritten and verified.
    Updated { attempts: u8 },
    /// All rewrite attempts failed verification.
    UpdateExhausted,
}

impl Terminal {
    pub const fn notice(&self) -> Notice {
        match self {
            Terminal::UntrustedBootloader => Notice::UnknownBootloader,
            Terminal::Updated { .. } => Notice::UpdateFinished,
            Terminal::UpdateExhausted => Notice::UpdateBroken,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Continue(Pass),
    /// The terminal notice has already been shown; only the halt remains.
    Halt(Terminal),
}

/// Check the installed bootloader and heal it if allowed and needed.
///
/// Never halts by itself: terminal states are returned as [`Verdict::Halt`] after
/// their notice was emitted and write protection restored. Use
/// [`check_bootloader_or_halt`] to act on them.
pub async fn check_bootloader<D, S, P, J>(
    device: &mut D,
    storage: &mut S,
    policy: &P,
    journal: &mut J,
    config: &Config,
) -> Verdict
where
    D: Device,
    S: BootloaderStorage + Fingerprinter,
    P: TrustPolicy,
    J: Journal,
{
    #[cfg(feature = "memory_protect")]
    return verify_and_heal(device, storage, policy, journal, config).await;

    #[cfg(not(feature = "memory_protect"))]
    {
        let _ = (device, storage, policy, journal, config);
        Verdict::Continue(Pass::Disabled)
    }
}

#[cfg(feature = "memory_protect")]
async fn verify_and_heal<D, S, P, J>(
    device: &mut D,
    storage: &mut S,
    policy: &P,
    journal: &mut J,
    config: &Config,
) -> Verdict
where
    D: Device,
    S: BootloaderStorage + Fingerprinter,
    P: TrustPolicy,
    J: Journal,
{
    let installed = storage.fingerprint().await;
    let classification = classify(installed.as_ref(), policy, &config.golden);
    log::info!("installed bootloader {:?}: {:?}", installed, classification);

    // Fatal regardless of privilege.
    if classification == Classification::Unknown {
        return terminate(device, Terminal::UntrustedBootloader);
    }

    if !device.context().may_modify_protected_storage() {
        log::info!("unprivileged context, leaving bootloader as is");
        return Verdict::Continue(Pass::InsufficientPrivilege);
    }

    if classification == Classification::MatchesGolden {
        return Verdict::Continue(Pass::AlreadyCurrent);
    }

    let outcome = attempt_update(device, storage, config).await;

    let report = HealReport {
        previous: installed,
        outcome,
    };
    if let Err(e) = journal.record(&report).await {
        log::warn!("recording heal report failed: {}", e);
    }

    match outcome {
        UpdateOutcome::Success { attempts } => terminate(device, Terminal::Updated { attempts }),
        UpdateOutcome::Bricked => terminate(device, Terminal::UpdateExhausted),
    }
}

#[cfg(feature = "memory_protect")]
fn terminate<D: Device>(device: &mut D, terminal: Terminal) -> Verdict {
    match terminal {
        Terminal::Updated { .. } => log::info!("bootloader updated, halting"),
        _ => log::error!("bootloader check ends in {:?}, halting", terminal),
    }
    device.notify(terminal.notice());
    Verdict::Halt(terminal)
}

/// [`check_bootloader`], halting the device on every terminal verdict.
///
/// Returns only when booting may continue.
pub async fn check_bootloader_or_halt<D, S, P, J>(
    device: &mut D,
    storage: &mut S,
    policy: &P,
    journal: &mut J,
    config: &Config,
) -> Pass
where
    D: Device,
    S: BootloaderStorage + Fingerprinter,
    P: TrustPolicy,
    J: Journal,
{
    match check_bootloader(device, storage, policy, journal, config).await {
        Verdict::Continue(pass) => pass,
        Verdict::Halt(_) => device.halt(),
    }
}
