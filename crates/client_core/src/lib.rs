//! Client-side state for the staff directory: paginated and filtered
//! Users/Employees lists kept consistent with local edits, validated
//! add/edit forms, and the User → Employee name handoff.

pub mod config;
pub mod confirm;
pub mod defaults;
pub mod directory;
pub mod employees;
pub mod entity;
pub mod error;
pub mod events;
pub mod form;
pub mod list;
pub mod store;
pub mod transport;
pub mod users;
pub mod validate;
pub mod workspace;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use config::{load_settings, Settings};
pub use directory::Directory;
pub use entity::{Entity, EntityKind, FieldKey, FilterSet, FormSchema, RecordPage};
pub use error::{ClientError, FilterError, RequestError, ValidationErrors};
pub use events::{ClientEvent, Notice, NoticeLevel};
pub use form::FormPhase;
pub use list::{Pager, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use transport::{HttpDirectoryApi, LastUserSource, RecordApi};
pub use workspace::{EntityWorkspace, FetchOutcome};
