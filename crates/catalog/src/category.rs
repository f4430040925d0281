use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use laundrydesk_core::{Aggregate, AggregateRoot, CategoryId, DomainError, Event};

/// Category status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Active,
    Inactive,
}

impl CategoryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryStatus::Active => "active",
            CategoryStatus::Inactive => "inactive",
        }
    }
}

/// Aggregate root: Category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    code: String,
    name: String,
    description: String,
    status: CategoryStatus,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl Category {
    /// Create an empty, not-yet-created instance (target of `CreateCategory`).
    pub fn empty(id: CategoryId) -> Self {
        Self {
            id,
            code: String::new(),
            name: String::new(),
            description: String::new(),
            status: CategoryStatus::Active,
            created_at: None,
            updated_at: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> CategoryStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Case-insensitive substring match on name or code.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term) || self.code.to_lowercase().contains(&term)
    }
}

impl AggregateRoot for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateCategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub category_id: CategoryId,
    pub code: String,
    pub name: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateCategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub category_id: CategoryId,
    pub code: String,
    pub name: String,
    pub description: String,
    pub status: CategoryStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteCategory.
///
/// `referencing_items` is the number of items whose category is this
/// category's name, counted by the caller at command time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCategory {
    pub category_id: CategoryId,
    pub referencing_items: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryCommand {
    CreateCategory(CreateCategory),
    UpdateCategory(UpdateCategory),
    DeleteCategory(DeleteCategory),
}

/// Event: CategoryCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCreated {
    pub category_id: CategoryId,
    pub code: String,
    pub name: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CategoryUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdated {
    pub category_id: CategoryId,
    pub code: String,
    pub name: String,
    pub description: String,
    pub status: CategoryStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CategoryDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDeleted {
    pub category_id: CategoryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryEvent {
    CategoryCreated(CategoryCreated),
    CategoryUpdated(CategoryUpdated),
    CategoryDeleted(CategoryDeleted),
}

impl Event for CategoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CategoryEvent::CategoryCreated(_) => "catalog.category.created",
            CategoryEvent::CategoryUpdated(_) => "catalog.category.updated",
            CategoryEvent::CategoryDeleted(_) => "catalog.category.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CategoryEvent::CategoryCreated(e) => e.occurred_at,
            CategoryEvent::CategoryUpdated(e) => e.occurred_at,
            CategoryEvent::CategoryDeleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Category {
    type Command = CategoryCommand;
    type Event = CategoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CategoryEvent::CategoryCreated(e) => {
                self.id = e.category_id;
                self.code = e.code.clone();
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.status = CategoryStatus::Active;
                self.created_at = Some(e.occurred_at);
                self.updated_at = Some(e.occurred_at);
                self.created = true;
            }
            CategoryEvent::CategoryUpdated(e) => {
                self.code = e.code.clone();
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.status = e.status;
                self.updated_at = Some(e.occurred_at);
            }
            CategoryEvent::CategoryDeleted(_) => {
                self.deleted = true;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CategoryCommand::CreateCategory(cmd) => self.handle_create(cmd),
            CategoryCommand::UpdateCategory(cmd) => self.handle_update(cmd),
            CategoryCommand::DeleteCategory(cmd) => self.handle_delete(cmd),
        }
    }

    fn exists(&self) -> bool {
        self.created && !self.deleted
    }
}

impl Category {
    fn ensure_category_id(&self, category_id: CategoryId) -> Result<(), DomainError> {
        if self.id != category_id {
            return Err(DomainError::invariant("category_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateCategory) -> Result<Vec<CategoryEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("category already exists"));
        }
        DomainError::require_non_empty("code", &cmd.code)?;
        DomainError::require_non_empty("name", &cmd.name)?;

        Ok(vec![CategoryEvent::CategoryCreated(CategoryCreated {
            category_id: cmd.category_id,
            code: cmd.code.trim().to_string(),
            name: cmd.name.trim().to_string(),
            description: cmd.description.trim().to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateCategory) -> Result<Vec<CategoryEvent>, DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        self.ensure_category_id(cmd.category_id)?;
        DomainError::require_non_empty("code", &cmd.code)?;
        DomainError::require_non_empty("name", &cmd.name)?;

        Ok(vec![CategoryEvent::CategoryUpdated(CategoryUpdated {
            category_id: cmd.category_id,
            code: cmd.code.trim().to_string(),
            name: cmd.name.trim().to_string(),
            description: cmd.description.trim().to_string(),
            status: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteCategory) -> Result<Vec<CategoryEvent>, DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        self.ensure_category_id(cmd.category_id)?;

        if cmd.referencing_items > 0 {
            return Err(DomainError::invariant(format!(
                "category '{}' is still used by {} item(s)",
                self.name, cmd.referencing_items
            )));
        }

        Ok(vec![CategoryEvent::CategoryDeleted(CategoryDeleted {
            category_id: cmd.category_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

/// Categories matching `term` (case-insensitive, name or code), in input order.
pub fn search_categories<'a>(categories: &'a [Category], term: &str) -> Vec<&'a Category> {
    categories.iter().filter(|c| c.matches_search(term)).collect()
}

/// Reject a code already used by another category (case-insensitive).
pub fn ensure_unique_code(
    categories: &[Category],
    code: &str,
    except: Option<CategoryId>,
) -> Result<(), DomainError> {
    let code = code.trim();
    let taken = categories
        .iter()
        .filter(|c| Some(c.id_typed()) != except)
        .any(|c| c.code().eq_ignore_ascii_case(code));
    if taken {
        return Err(DomainError::conflict(format!("category code '{code}' already exists")));
    }
    Ok(())
}
