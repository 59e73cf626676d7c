//! Building blocks for implementing [`Device`](crate::Device) on concrete targets.

#[cfg(feature = "cortex_m")]
pub mod cortex_m;
