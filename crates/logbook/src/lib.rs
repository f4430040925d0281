//! Log book domain module: daily pick-up records for the linen laundry and
//! the tracking of pending items coming back.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod entry;

pub use entry::{
    AddLogEntry, DeleteLogEntry, EditLogEntry, LogEntry, LogEntryAdded, LogEntryCommand,
    LogEntryDeleted, LogEntryEdited, LogEntryEvent, Quantities, RecordReturn, ReturnRecorded,
    ReturnStatus,
};
