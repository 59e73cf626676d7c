//! Fingerprinting and classification of the installed bootloader.

use crate::{Fingerprint, golden::GoldenImage};

pub mod policy;

pub use policy::{AcceptAll, AllowList, TrustPolicy};

/// Hash engine producing the fingerprint of the installed bootloader region.
#[allow(async_fn_in_trait)]
pub trait Fingerprinter {
    /// Fingerprint the bootloader region as currently stored.
    ///
    /// `None` if the region could not be read or the engine failed.
    /// Only reads, never writes.
    async fn fingerprint(&mut self) -> Option<Fingerprint>;
}

/// Verdict on the installed bootloader.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Classification {
    /// Rejected by the trust policy. Fatal.
    Unknown,
    /// Trusted and identical to the golden image; nothing to do.
    MatchesGolden,
    /// Trusted but not the golden image; candidate for a rewrite.
    NeedsUpdate,
}

impl Classification {
    /// Whether the trust policy accepted the installed bootloader.
    pub const fn is_trusted(&self) -> bool {
        !matches!(self, Classification::Unknown)
    }
}

/// Classify a measurement of the installed bootloader.
///
/// The trust policy is consulted before any comparison with the golden
/// fingerprint, so a golden-looking bootloader can still be rejected. An
/// unavailable measurement never classifies as [`Classification::MatchesGolden`].
pub fn classify(
    measurement: Option<&Fingerprint>,
    policy: &impl TrustPolicy,
    golden: &GoldenImage,
) -> Classification {
    if !policy.is_trusted(measurement) {
        return Classification::Unknown;
    }

    if golden.matches(measurement) {
        Classification::MatchesGolden
    } else {
        Classification::NeedsUpdate
    }
}
