//! Trust policies deciding which installed bootloaders may run at all.

use crate::Fingerprint;

/// Pluggable allow-list over bootloader fingerprints.
pub trait TrustPolicy {
    /// `measurement` is `None` when the hash engine could not fingerprint the region.
    fn is_trusted(&self, measurement: Option<&Fingerprint>) -> bool;
}

/// Trusts any bootloader, including one that could not be measured.
///
/// Placeholder policy; only the golden comparison decides whether to rewrite.
#[derive(Clone, Copy, Default, Debug)]
pub struct AcceptAll;

impl TrustPolicy for AcceptAll {
    fn is_trusted(&self, _measurement: Option<&Fingerprint>) -> bool {
        true
    }
}

/// Trusts exactly the listed fingerprints.
///
/// An unmeasurable region is never trusted. The golden fingerprint is not
/// implied; list it explicitly if the golden bootloader itself should boot.
#[derive(Clone, Copy, Debug)]
pub struct AllowList<'a> {
    known: &'a [Fingerprint],
}

impl<'a> AllowList<'a> {
    pub const fn new(known: &'a [Fingerprint]) -> Self {
        Self { known }
    }
}

impl TrustPolicy for AllowList<'_> {
    fn is_trusted(&self, measurement: Option<&Fingerprint>) -> bool {
        measurement.is_some_and(|fp| self.known.contains(fp))
    }
}

impl<P: TrustPolicy> TrustPolicy for &P {
    fn is_trusted(&self, measurement: Option<&Fingerprint>) -> bool {
        (**self).is_trusted(measurement)
    }
}
