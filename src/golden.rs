//! The known-good bootloader baked into the running firmware.

use crate::{Fingerprint, WORD_SIZE};

/// Known-good bootloader binary together with its fingerprint.
///
/// Lives for the whole program and is never mutated. Typically built in a
/// `static` from `include_bytes!`, so a misaligned image fails the build:
///
/// ```
/// use bootmend::{Fingerprint, GoldenImage};
///
/// static GOLDEN: GoldenImage = GoldenImage::new(
///     &[0xde, 0xad, 0xbe, 0xef],
///     Fingerprint::from_hex("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"),
/// );
/// # assert_eq!(GOLDEN.words().count(), 1);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GoldenImage {
    data: &'static [u8],
    fingerprint: Fingerprint,
}

impl GoldenImage {
    pub const fn new(data: &'static [u8], fingerprint: Fingerprint) -> Self {
        assert!(!data.is_empty(), "golden image must not be empty");
        assert!(
            data.len() % WORD_SIZE == 0,
            "golden image length must be a multiple of the word size"
        );

        Self { data, fingerprint }
    }

    pub const fn data(&self) -> &'static [u8] {
        self.data
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Whether `measurement` is exactly the golden fingerprint.
    ///
    /// An unavailable measurement never matches.
    pub fn matches(&self, measurement: Option<&Fingerprint>) -> bool {
        measurement == Some(&self.fingerprint)
    }

    /// The image as little-endian words, in ascending offset order.
    pub fn words(&self) -> impl Iterator<Item = u32> {
        self.data.chunks_exact(WORD_SIZE).map(|w| {
            // chunks_exact guarantees WORD_SIZE bytes.
            u32::from_le_bytes([w[0], w[1], w[2], w[3]])
        })
    }
}
