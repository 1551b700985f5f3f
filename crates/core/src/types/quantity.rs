//! Cart line quantities.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative quantity.
    #[error("quantity must be greater than 0 (got {0})")]
    NotPositive(i64),
    /// Quantity does not fit the storage type.
    #[error("quantity must be at most {max} (got {got})")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
        /// Requested quantity.
        got: i64,
    },
}

/// A strictly positive item count.
///
/// A cart never stores a zero quantity: setting a line to zero removes it,
/// so the stored type makes zero unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// Create a quantity from an untrusted integer (e.g. a request body).
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not positive or exceeds `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        let value = u32::try_from(value).map_err(|_| QuantityError::TooLarge {
            max: u32::MAX,
            got: value,
        })?;
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(QuantityError::NotPositive(0))
    }

    /// Get the count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, or `None` if the sum exceeds `u32::MAX`.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.get()).map(Self)
    }
}

impl From<NonZeroU32> for Quantity {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
