//! Strongly-typed integer identifiers used across the domain.
//!
//! All records are numbered sequentially: a new record takes
//! `max(existing ids) + 1`, or 1 for an empty collection.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Common behaviour of sequential integer identifiers.
pub trait SequentialId: Copy + Ord {
    fn from_u64(value: u64) -> Self;
    fn value(self) -> u64;
}

/// Next identifier for a collection: `max + 1`, or 1 when empty.
pub fn next_id<I: SequentialId>(existing: impl IntoIterator<Item = I>) -> I {
    let max = existing.into_iter().map(SequentialId::value).max().unwrap_or(0);
    I::from_u64(max + 1)
}

macro_rules! impl_int_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(u64);

        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl SequentialId for $t {
            fn from_u64(value: u64) -> Self {
                Self(value)
            }

            fn value(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(
    /// Identifier of a back-office user (the acting principal).
    UserId,
    "UserId"
);
impl_int_newtype!(
    /// Identifier of an item category.
    CategoryId,
    "CategoryId"
);
impl_int_newtype!(
    /// Identifier of a linen item type (1..=18 for the built-in catalog).
    ItemId,
    "ItemId"
);
impl_int_newtype!(
    /// Identifier of a log book entry.
    LogEntryId,
    "LogEntryId"
);
impl_int_newtype!(
    /// Identifier of a guest laundry order.
    OrderId,
    "OrderId"
);
impl_int_newtype!(
    /// Identifier of a laundry service in the price list.
    ServiceId,
    "ServiceId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_is_max_plus_one() {
        let ids = [LogEntryId::new(3), LogEntryId::new(7), LogEntryId::new(5)];
        assert_eq!(next_id(ids), LogEntryId::new(8));
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(Vec::<CategoryId>::new()), CategoryId::new(1));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!("12".parse::<OrderId>().is_ok());
        let err = "abc".parse::<OrderId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.starts_with("OrderId")));
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&ItemId::new(4)).unwrap();
        assert_eq!(json, "4");
    }
}
