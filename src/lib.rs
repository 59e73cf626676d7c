//! Boot-time integrity check and self-healing update for the bootloader region.
//!
//! The routine fingerprints the installed bootloader, refuses to continue on an
//! untrusted one, and, when running privileged, rewrites the region from a golden
//! image embedded in the running firmware until the rewrite verifies or the retry
//! budget is spent.
#![no_std]

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod check;
pub mod config;
pub mod golden;
pub mod heal;
pub mod integrity;
pub mod journal;
pub mod notice;
pub mod platform;
pub mod privilege;
pub mod storage;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod mock;

pub use check::{Pass, Terminal, Verdict, check_bootloader, check_bootloader_or_halt};
pub use config::{BootloaderLayout, Config, DEFAULT_MAX_TRIES, WORD_SIZE};
pub use golden::GoldenImage;
pub use heal::{UpdateOutcome, attempt_update};
pub use integrity::{Classification, Fingerprinter, classify};
pub use notice::{Notice, Severity};
pub use privilege::ExecutionContext;
pub use storage::BootloaderStorage;

/// Length in bytes of a bootloader fingerprint.
pub const FINGERPRINT_LEN: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
    /// The underlying flash driver reported a failure.
    Flash,
    /// Erase or program attempted while write protection is applied.
    WriteProtected,
    /// Address or sector lies outside the bootloader region.
    OutOfBounds,
    /// Address or length not aligned to the storage granularity.
    Unaligned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Flash => "flash driver error",
            Error::WriteProtected => "region is write protected",
            Error::OutOfBounds => "access outside bootloader region",
            Error::Unaligned => "access not aligned to storage granularity",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}

/// Digest identifying the exact byte content of the installed bootloader region.
///
/// Two fingerprints are equal iff byte-for-byte identical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Fingerprint of a region's content: SHA-256 of the SHA-256 of the bytes.
    pub fn of_region(bytes: &[u8]) -> Self {
        Self::from_inner_digest(Sha256::digest(bytes).into())
    }

    /// Finish a fingerprint from the single SHA-256 digest of the region.
    pub(crate) fn from_inner_digest(inner: [u8; FINGERPRINT_LEN]) -> Self {
        Fingerprint(Sha256::digest(inner).into())
    }

    /// Parse a 64 digit hex string.
    ///
    /// Panics on malformed input, which fails the build when used in a `const`.
    pub const fn from_hex(hex: &str) -> Self {
        const fn nibble(c: u8) -> u8 {
            match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                b'A'..=b'F' => c - b'A' + 10,
                _ => panic!("invalid hex digit in fingerprint"),
            }
        }

        let hex = hex.as_bytes();
        assert!(
            hex.len() == FINGERPRINT_LEN * 2,
            "fingerprint must be 64 hex digits"
        );

        let mut out = [0u8; FINGERPRINT_LEN];
        let mut i = 0;
        while i < FINGERPRINT_LEN {
            out[i] = (nibble(hex[2 * i]) << 4) | nibble(hex[2 * i + 1]);
            i += 1;
        }
        Fingerprint(out)
    }

    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint(")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Representation of the concrete device running the check.
///
/// Covers everything outside of storage: the execution context, the user facing
/// notification surface and the halt primitive.
pub trait Device {
    /// Whether the current execution context may modify protected storage.
    ///
    /// Read once per run and must be free of side effects.
    fn context(&self) -> ExecutionContext;

    /// Surface a notice to the user. Fire-and-forget.
    fn notify(&mut self, notice: Notice);

    /// Stop execution for good.
    fn halt(&mut self) -> !;
}
