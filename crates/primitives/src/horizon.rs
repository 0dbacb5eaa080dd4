//! Forward-return horizon type.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// A forward-return horizon: a positive number of periods ahead.
///
/// The panel column holding the `h`-period forward return is named by
/// [`Horizon::fwd_return_column`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize,
    Deserialize,
)]
pub struct Horizon(u32);

impl Horizon {
    /// Create a new horizon.
    #[must_use]
    pub const fn new(periods: u32) -> Self {
        Self(periods)
    }

    /// Number of periods ahead.
    #[must_use]
    pub const fn periods(&self) -> u32 {
        self.0
    }

    /// Name of the panel column holding this horizon's forward return.
    #[must_use]
    pub fn fwd_return_column(&self) -> String {
        format!("fwd_ret_{}", self.0)
    }
}
