//! `laundrydesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod date;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use date::parse_iso_date;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{CategoryId, ItemId, LogEntryId, OrderId, SequentialId, ServiceId, UserId, next_id};
