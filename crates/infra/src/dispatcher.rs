//! Command execution pipeline.
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the current record (or an empty placeholder for creates)
//!   ↓
//! 2. Handle command on a copy (pure decision logic, produces events)
//!   ↓
//! 3. Apply events to the copy
//!   ↓
//! 4. Store the copy in place of the old record (or remove it once deleted)
//! ```
//!
//! Commands against one repository are serialized, so a decision always sees
//! the state the previous command left behind.

use std::marker::PhantomData;
use std::sync::Mutex;

use thiserror::Error;

use laundrydesk_core::{Aggregate, DomainError, Event, SequentialId, next_id};

use crate::repository::{Repository, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Input failed validation (deterministic).
    #[error("validation failed: {0}")]
    Validation(String),
    /// Domain invariant failure (deterministic).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// Duplicate or already-existing record.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// Storage failed; the command had no effect.
    #[error("storage failure: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            DomainError::InvariantViolation(msg) => DispatchError::InvariantViolation(msg),
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
            DomainError::Unauthorized => DispatchError::Unauthorized,
            DomainError::NotFound => DispatchError::NotFound,
            DomainError::InvalidId(msg) => DispatchError::Validation(msg),
        }
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone)]
pub struct Committed<A: Aggregate> {
    /// The record after the events were applied. A deleted record is
    /// returned here one last time but is no longer stored.
    pub aggregate: A,
    pub events: Vec<A::Event>,
}

/// Reusable command execution engine for one aggregate type.
///
/// The dispatcher owns the repository of its aggregate. Reads go through
/// [`CommandDispatcher::repository`]; writes only through `create` and
/// `dispatch`.
#[derive(Debug)]
pub struct CommandDispatcher<A, R> {
    aggregate_type: &'static str,
    repo: R,
    write_lock: Mutex<()>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A, R> CommandDispatcher<A, R> {
    pub fn new(aggregate_type: &'static str, repo: R) -> Self {
        Self {
            aggregate_type,
            repo,
            write_lock: Mutex::new(()),
            _aggregate: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn aggregate_type(&self) -> &'static str {
        self.aggregate_type
    }
}

impl<A, R> CommandDispatcher<A, R>
where
    A: Aggregate<Error = DomainError> + Clone,
    A::Id: SequentialId,
    A::Event: Event,
    R: Repository<A::Id, A>,
{
    /// Create a new record under the next sequential id.
    ///
    /// `decide` sees the new id and every stored record, so uniqueness checks
    /// and numbering run under the same lock as the write.
    pub fn create<F>(
        &self,
        make_aggregate: impl FnOnce(A::Id) -> A,
        decide: F,
    ) -> Result<Committed<A>, DispatchError>
    where
        F: FnOnce(A::Id, &[A]) -> Result<A::Command, DomainError>,
    {
        let _guard = self.write_lock.lock().map_err(|_| RepositoryError::Poisoned)?;

        let id = next_id(self.repo.keys());
        let existing = self.repo.list();
        let command = decide(id, &existing)?;

        self.execute(make_aggregate(id), &command)
    }

    /// Run a command against an existing record.
    pub fn dispatch(&self, id: A::Id, command: A::Command) -> Result<Committed<A>, DispatchError> {
        self.dispatch_with(id, |_current, _all| Ok(command))
    }

    /// Like [`Self::dispatch`], but the command is built from the current
    /// record and the full collection while the write lock is held.
    pub fn dispatch_with<F>(&self, id: A::Id, decide: F) -> Result<Committed<A>, DispatchError>
    where
        F: FnOnce(&A, &[A]) -> Result<A::Command, DomainError>,
    {
        let _guard = self.write_lock.lock().map_err(|_| RepositoryError::Poisoned)?;

        let current = self.repo.get(&id).ok_or(DispatchError::NotFound)?;
        let existing = self.repo.list();
        let command = decide(&current, &existing)?;

        self.execute(current, &command)
    }

    fn execute(&self, current: A, command: &A::Command) -> Result<Committed<A>, DispatchError> {
        let events = current.handle(command).map_err(|e| {
            tracing::debug!(aggregate_type = self.aggregate_type, error = %e, "command rejected");
            DispatchError::from(e)
        })?;

        let mut next = current;
        for event in &events {
            next.apply(event);
        }

        let id = next.id().clone();
        if next.exists() {
            self.repo.upsert(id, next.clone())?;
        } else {
            self.repo.remove(&id)?;
        }

        for event in &events {
            tracing::info!(
                aggregate_type = self.aggregate_type,
                aggregate_id = id.value(),
                event_type = event.event_type(),
                version = next.version(),
                "event committed"
            );
        }

        Ok(Committed {
            aggregate: next,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use laundrydesk_catalog::{
        Category, CategoryCommand, CreateCategory, DeleteCategory, UpdateCategory,
        ensure_unique_code,
    };
    use laundrydesk_core::CategoryId;

    use super::*;
    use crate::repository::InMemoryRepository;

    type Dispatcher = CommandDispatcher<Category, Arc<InMemoryRepository<CategoryId, Category>>>;

    fn dispatcher() -> Dispatcher {
        CommandDispatcher::new("catalog.category", Arc::new(InMemoryRepository::new()))
    }

    fn create(d: &Dispatcher, code: &str) -> Result<Committed<Category>, DispatchError> {
        d.create(Category::empty, |id, all| {
            ensure_unique_code(all, code, None)?;
            Ok(CategoryCommand::CreateCategory(CreateCategory {
                category_id: id,
                code: code.to_string(),
                name: format!("{code} name"),
                description: String::new(),
                occurred_at: Utc::now(),
            }))
        })
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let d = dispatcher();
        assert_eq!(create(&d, "A").unwrap().aggregate.id_typed(), CategoryId::new(1));
        assert_eq!(create(&d, "B").unwrap().aggregate.id_typed(), CategoryId::new(2));
        assert_eq!(d.repository().list().len(), 2);
    }

    #[test]
    fn rejected_command_leaves_state_unchanged() {
        let d = dispatcher();
        create(&d, "A").unwrap();

        let err = create(&d, "a").unwrap_err();
        assert!(matches!(err, DispatchError::Conflict(_)));

        let id = CategoryId::new(1);
        let err = d
            .dispatch(
                id,
                CategoryCommand::UpdateCategory(UpdateCategory {
                    category_id: id,
                    code: "A".to_string(),
                    name: " ".to_string(),
                    description: String::new(),
                    status: laundrydesk_catalog::CategoryStatus::Active,
                    occurred_at: Utc::now(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
        assert_eq!(d.repository().get(&id).unwrap().name(), "A name");
        assert_eq!(d.repository().list().len(), 1);
    }

    #[test]
    fn delete_removes_record() {
        let d = dispatcher();
        create(&d, "A").unwrap();
        let id = CategoryId::new(1);

        let committed = d
            .dispatch(
                id,
                CategoryCommand::DeleteCategory(DeleteCategory {
                    category_id: id,
                    referencing_items: 0,
                    occurred_at: Utc::now(),
                }),
            )
            .unwrap();
        assert_eq!(committed.events.len(), 1);
        assert!(d.repository().get(&id).is_none());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let d = dispatcher();
        let id = CategoryId::new(42);
        let err = d
            .dispatch(
                id,
                CategoryCommand::DeleteCategory(DeleteCategory {
                    category_id: id,
                    referencing_items: 0,
                    occurred_at: Utc::now(),
                }),
            )
            .unwrap_err();
        assert_eq!(err, DispatchError::NotFound);
    }
}
