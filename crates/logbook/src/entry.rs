use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use laundrydesk_catalog::{LINEN_CATALOG, linen_item_name};
use laundrydesk_core::{
    Aggregate, AggregateRoot, DomainError, Event, ItemId, LogEntryId, parse_iso_date,
};

/// Quantities entered for a pick-up.
///
/// The three values are entered independently; nothing ties
/// `out_quantity` to `in_quantity + pending_quantity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantities {
    pub out_quantity: u32,
    pub in_quantity: u32,
    pub pending_quantity: u32,
}

/// Return-tracking state, derived from the quantities (never stored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    /// Some pending items have not come back yet.
    Pending,
    /// Everything pending has been returned.
    Completed,
}

/// Aggregate root: LogEntry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    id: LogEntryId,
    date: Option<NaiveDate>,
    item_id: ItemId,
    quantities: Quantities,
    returned_quantity: u32,
    returned_image_url: Option<String>,
    returned_date: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl LogEntry {
    /// Create an empty, not-yet-created instance (target of `AddLogEntry`).
    pub fn empty(id: LogEntryId) -> Self {
        Self {
            id,
            date: None,
            item_id: ItemId::new(0),
            quantities: Quantities::default(),
            returned_quantity: 0,
            returned_image_url: None,
            returned_date: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> LogEntryId {
        self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Pick-up date as `YYYY-MM-DD` (empty for a not-yet-created entry).
    pub fn date_iso(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn item_name(&self) -> &'static str {
        linen_item_name(self.item_id)
    }

    pub fn quantities(&self) -> Quantities {
        self.quantities
    }

    pub fn out_quantity(&self) -> u32 {
        self.quantities.out_quantity
    }

    pub fn in_quantity(&self) -> u32 {
        self.quantities.in_quantity
    }

    pub fn pending_quantity(&self) -> u32 {
        self.quantities.pending_quantity
    }

    pub fn returned_quantity(&self) -> u32 {
        self.returned_quantity
    }

    pub fn returned_image_url(&self) -> Option<&str> {
        self.returned_image_url.as_deref()
    }

    pub fn returned_date(&self) -> Option<DateTime<Utc>> {
        self.returned_date
    }

    /// Pending items still out (`pending - returned`).
    pub fn remaining(&self) -> u32 {
        self.quantities
            .pending_quantity
            .saturating_sub(self.returned_quantity)
    }

    pub fn status(&self) -> ReturnStatus {
        if self.returned_quantity >= self.quantities.pending_quantity {
            ReturnStatus::Completed
        } else {
            ReturnStatus::Pending
        }
    }
}

impl AggregateRoot for LogEntry {
    type Id = LogEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddLogEntry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLogEntry {
    pub entry_id: LogEntryId,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub item_id: ItemId,
    pub quantities: Quantities,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditLogEntry. Return tracking fields are not editable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLogEntry {
    pub entry_id: LogEntryId,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub item_id: ItemId,
    pub quantities: Quantities,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordReturn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReturn {
    pub entry_id: LogEntryId,
    pub quantity: u32,
    /// Reference to an uploaded proof-of-return image.
    pub image_url: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteLogEntry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLogEntry {
    pub entry_id: LogEntryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntryCommand {
    AddLogEntry(AddLogEntry),
    EditLogEntry(EditLogEntry),
    RecordReturn(RecordReturn),
    DeleteLogEntry(DeleteLogEntry),
}

/// Event: LogEntryAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryAdded {
    pub entry_id: LogEntryId,
    pub date: NaiveDate,
    pub item_id: ItemId,
    pub quantities: Quantities,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LogEntryEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryEdited {
    pub entry_id: LogEntryId,
    pub date: NaiveDate,
    pub item_id: ItemId,
    pub quantities: Quantities,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReturnRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecorded {
    pub entry_id: LogEntryId,
    pub quantity: u32,
    pub new_returned_quantity: u32,
    pub image_url: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LogEntryDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryDeleted {
    pub entry_id: LogEntryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntryEvent {
    LogEntryAdded(LogEntryAdded),
    LogEntryEdited(LogEntryEdited),
    ReturnRecorded(ReturnRecorded),
    LogEntryDeleted(LogEntryDeleted),
}

impl Event for LogEntryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LogEntryEvent::LogEntryAdded(_) => "logbook.entry.added",
            LogEntryEvent::LogEntryEdited(_) => "logbook.entry.edited",
            LogEntryEvent::ReturnRecorded(_) => "logbook.entry.return_recorded",
            LogEntryEvent::LogEntryDeleted(_) => "logbook.entry.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LogEntryEvent::LogEntryAdded(e) => e.occurred_at,
            LogEntryEvent::LogEntryEdited(e) => e.occurred_at,
            LogEntryEvent::ReturnRecorded(e) => e.occurred_at,
            LogEntryEvent::LogEntryDeleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for LogEntry {
    type Command = LogEntryCommand;
    type Event = LogEntryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LogEntryEvent::LogEntryAdded(e) => {
                self.id = e.entry_id;
                self.date = Some(e.date);
                self.item_id = e.item_id;
                self.quantities = e.quantities;
                self.returned_quantity = 0;
                self.returned_image_url = None;
                self.returned_date = None;
                self.created = true;
            }
            LogEntryEvent::LogEntryEdited(e) => {
                self.date = Some(e.date);
                self.item_id = e.item_id;
                self.quantities = e.quantities;
            }
            LogEntryEvent::ReturnRecorded(e) => {
                self.returned_quantity = e.new_returned_quantity;
                if let Some(url) = &e.image_url {
                    self.returned_image_url = Some(url.clone());
                }
                self.returned_date = Some(e.occurred_at);
            }
            LogEntryEvent::LogEntryDeleted(_) => {
                self.deleted = true;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LogEntryCommand::AddLogEntry(cmd) => self.handle_add(cmd),
            LogEntryCommand::EditLogEntry(cmd) => self.handle_edit(cmd),
            LogEntryCommand::RecordReturn(cmd) => self.handle_record_return(cmd),
            LogEntryCommand::DeleteLogEntry(cmd) => self.handle_delete(cmd),
        }
    }

    fn exists(&self) -> bool {
        self.created && !self.deleted
    }
}

fn ensure_catalog_item(item_id: ItemId) -> Result<(), DomainError> {
    if !LINEN_CATALOG.iter().any(|(id, _)| *id == item_id.get()) {
        return Err(DomainError::validation(format!(
            "item {item_id} is not in the linen catalog"
        )));
    }
    Ok(())
}

impl LogEntry {
    fn ensure_entry_id(&self, entry_id: LogEntryId) -> Result<(), DomainError> {
        if self.id != entry_id {
            return Err(DomainError::invariant("entry_id mismatch"));
        }
        Ok(())
    }

    fn ensure_exists(&self) -> Result<(), DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddLogEntry) -> Result<Vec<LogEntryEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("log entry already exists"));
        }
        let date = parse_iso_date("date", &cmd.date)?;
        ensure_catalog_item(cmd.item_id)?;

        Ok(vec![LogEntryEvent::LogEntryAdded(LogEntryAdded {
            entry_id: cmd.entry_id,
            date,
            item_id: cmd.item_id,
            quantities: cmd.quantities,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditLogEntry) -> Result<Vec<LogEntryEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_entry_id(cmd.entry_id)?;
        let date = parse_iso_date("date", &cmd.date)?;
        ensure_catalog_item(cmd.item_id)?;

        if cmd.quantities.pending_quantity < self.returned_quantity {
            return Err(DomainError::validation(format!(
                "pending quantity cannot be lower than the {} item(s) already returned",
                self.returned_quantity
            )));
        }

        Ok(vec![LogEntryEvent::LogEntryEdited(LogEntryEdited {
            entry_id: cmd.entry_id,
            date,
            item_id: cmd.item_id,
            quantities: cmd.quantities,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_return(
        &self,
        cmd: &RecordReturn,
    ) -> Result<Vec<LogEntryEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_entry_id(cmd.entry_id)?;

        let remaining = self.remaining();
        if cmd.quantity == 0 || cmd.quantity > remaining {
            return Err(DomainError::validation(format!(
                "returned quantity must be between 1 and {remaining}"
            )));
        }

        let image_url = cmd
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let new_returned_quantity = self.returned_quantity + cmd.quantity;
        let closes_out = new_returned_quantity >= self.quantities.pending_quantity;
        if closes_out && image_url.is_none() {
            return Err(DomainError::validation(
                "an image is required to mark the items as fully returned",
            ));
        }

        Ok(vec![LogEntryEvent::ReturnRecorded(ReturnRecorded {
            entry_id: cmd.entry_id,
            quantity: cmd.quantity,
            new_returned_quantity,
            image_url,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteLogEntry) -> Result<Vec<LogEntryEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_entry_id(cmd.entry_id)?;

        Ok(vec![LogEntryEvent::LogEntryDeleted(LogEntryDeleted {
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(out: u32, inn: u32, pending: u32) -> Quantities {
        Quantities {
            out_quantity: out,
            in_quantity: inn,
            pending_quantity: pending,
        }
    }

    fn added(pending: u32) -> LogEntry {
        let mut entry = LogEntry::empty(LogEntryId::new(1));
        let events = entry
            .handle(&LogEntryCommand::AddLogEntry(AddLogEntry {
                entry_id: LogEntryId::new(1),
                date: "2024-01-15".to_string(),
                item_id: ItemId::new(4),
                quantities: quantities(10, 10 - pending, pending),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        entry.apply(&events[0]);
        entry
    }

    fn record(entry: &LogEntry, quantity: u32, image: Option<&str>) -> Result<Vec<LogEntryEvent>, DomainError> {
        entry.handle(&LogEntryCommand::RecordReturn(RecordReturn {
            entry_id: entry.id_typed(),
            quantity,
            image_url: image.map(str::to_string),
            occurred_at: Utc::now(),
        }))
    }

    #[test]
    fn new_entry_starts_with_nothing_returned() {
        let entry = added(3);
        assert_eq!(entry.returned_quantity(), 0);
        assert_eq!(entry.remaining(), 3);
        assert_eq!(entry.status(), ReturnStatus::Pending);
        assert_eq!(entry.date_iso(), "2024-01-15");
        assert_eq!(entry.item_name(), "Bed Sheet Single");
    }

    #[test]
    fn add_rejects_malformed_date_and_unknown_item() {
        let entry = LogEntry::empty(LogEntryId::new(1));
        let bad_date = entry.handle(&LogEntryCommand::AddLogEntry(AddLogEntry {
            entry_id: LogEntryId::new(1),
            date: "15-01-2024".to_string(),
            item_id: ItemId::new(1),
            quantities: quantities(1, 1, 0),
            occurred_at: Utc::now(),
        }));
        assert!(matches!(bad_date, Err(DomainError::Validation(_))));

        let bad_item = entry.handle(&LogEntryCommand::AddLogEntry(AddLogEntry {
            entry_id: LogEntryId::new(1),
            date: "2024-01-15".to_string(),
            item_id: ItemId::new(42),
            quantities: quantities(1, 1, 0),
            occurred_at: Utc::now(),
        }));
        assert!(matches!(bad_item, Err(DomainError::Validation(_))));
    }

    #[test]
    fn record_return_rejects_zero_and_more_than_remaining() {
        let entry = added(3);
        assert!(matches!(record(&entry, 0, Some("upload://a")), Err(DomainError::Validation(_))));
        let err = record(&entry, 4, Some("upload://a")).unwrap_err();
        assert_eq!(err, DomainError::validation("returned quantity must be between 1 and 3"));
    }

    #[test]
    fn closing_return_requires_image() {
        let entry = added(3);
        let err = record(&entry, 3, None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("image is required")));

        let blank = record(&entry, 3, Some("   ")).unwrap_err();
        assert!(matches!(blank, DomainError::Validation(_)));

        let mut entry = entry;
        let events = record(&entry, 3, Some("upload://proof")).unwrap();
        entry.apply(&events[0]);
        assert_eq!(entry.status(), ReturnStatus::Completed);
        assert_eq!(entry.returned_image_url(), Some("upload://proof"));
    }

    #[test]
    fn partial_return_without_image_stays_pending_and_stamps_date() {
        let mut entry = added(3);
        let events = record(&entry, 1, None).unwrap();
        entry.apply(&events[0]);

        assert_eq!(entry.returned_quantity(), 1);
        assert_eq!(entry.status(), ReturnStatus::Pending);
        assert!(entry.returned_date().is_some());
        assert_eq!(entry.returned_image_url(), None);
    }

    #[test]
    fn later_return_without_image_keeps_earlier_image() {
        let mut entry = added(4);
        let events = record(&entry, 1, Some("upload://first")).unwrap();
        entry.apply(&events[0]);
        let events = record(&entry, 1, None).unwrap();
        entry.apply(&events[0]);

        assert_eq!(entry.returned_quantity(), 2);
        assert_eq!(entry.returned_image_url(), Some("upload://first"));
    }

    #[test]
    fn completed_entry_accepts_no_more_returns() {
        let mut entry = added(1);
        let events = record(&entry, 1, Some("upload://proof")).unwrap();
        entry.apply(&events[0]);
        assert!(record(&entry, 1, Some("upload://again")).is_err());
    }

    #[test]
    fn raising_pending_quantity_reopens_completed_entry() {
        let mut entry = added(1);
        let events = record(&entry, 1, Some("upload://proof")).unwrap();
        entry.apply(&events[0]);

        let events = entry
            .handle(&LogEntryCommand::EditLogEntry(EditLogEntry {
                entry_id: entry.id_typed(),
                date: "2024-01-15".to_string(),
                item_id: ItemId::new(4),
                quantities: quantities(10, 7, 3),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        entry.apply(&events[0]);

        assert_eq!(entry.status(), ReturnStatus::Pending);
        assert_eq!(entry.returned_quantity(), 1);
        assert_eq!(entry.remaining(), 2);
    }

    #[test]
    fn edit_cannot_drop_pending_below_returned() {
        let mut entry = added(3);
        let events = record(&entry, 2, None).unwrap();
        entry.apply(&events[0]);

        let err = entry
            .handle(&LogEntryCommand::EditLogEntry(EditLogEntry {
                entry_id: entry.id_typed(),
                date: "2024-01-15".to_string(),
                item_id: ItemId::new(4),
                quantities: quantities(10, 9, 1),
                occurred_at: Utc::now(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn deleted_entry_is_gone() {
        let mut entry = added(0);
        let events = entry
            .handle(&LogEntryCommand::DeleteLogEntry(DeleteLogEntry {
                entry_id: entry.id_typed(),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        entry.apply(&events[0]);
        assert!(!entry.exists());
        assert!(matches!(record(&entry, 1, None), Err(DomainError::NotFound)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: whatever sequence of returns is attempted, the returned
            /// quantity never exceeds the pending quantity and never decreases.
            #[test]
            fn returned_quantity_is_bounded_and_monotonic(
                pending in 0u32..50,
                attempts in proptest::collection::vec((0u32..20, any::<bool>()), 0..30)
            ) {
                let mut entry = added(pending.min(10));
                for (quantity, with_image) in attempts {
                    let before = entry.returned_quantity();
                    let image = if with_image { Some("upload://img") } else { None };
                    if let Ok(events) = record(&entry, quantity, image) {
                        for e in &events {
                            entry.apply(e);
                        }
                    }
                    prop_assert!(entry.returned_quantity() >= before);
                    prop_assert!(entry.returned_quantity() <= entry.pending_quantity());
                }
            }
        }
    }
}
