//! Infrastructure layer: record storage, command dispatch, file import and
//! export, uploaded images and sample data.

pub mod dispatcher;
pub mod export;
pub mod images;
pub mod import;
pub mod repository;
pub mod seed;

pub use dispatcher::{CommandDispatcher, Committed, DispatchError};
pub use export::{ExportError, ExportFormat};
pub use images::{ImageError, ImageStore, StoredImage};
pub use import::{CategoryRow, ImportError, ImportFailure, ImportReport};
pub use repository::{InMemoryRepository, Repository, RepositoryError};
