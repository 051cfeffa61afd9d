//! Per-entity plumbing shared by the store, list, form and transport layers.

use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Display},
    hash::Hash,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{FilterError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Employee,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Employee => "employee",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Notice texts raised by a workspace.
#[derive(Debug, Clone, Copy)]
pub struct EntityMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub save_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
    pub fetch_failed: &'static str,
}

/// One page of records plus the server's total count.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage<E> {
    pub records: Vec<E>,
    pub total: u64,
}

pub trait Entity: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;
    type Draft: Serialize + Clone + Debug + Send + Sync + 'static;
    type Filters: FilterSet;
    type Listing: DeserializeOwned + Send + 'static;

    const KIND: EntityKind;
    /// Collection path segment, e.g. `users`.
    const RESOURCE: &'static str;
    const MESSAGES: EntityMessages;

    fn id(&self) -> Self::Id;

    fn into_page(listing: Self::Listing) -> RecordPage<Self>;
}

pub trait FilterSet: Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    type Update: Debug + Send;
    type Query: Serialize + Clone + Debug + Send + Sync;

    /// Merges one key. Returns whether the filters changed.
    fn apply(&mut self, update: Self::Update) -> bool;

    /// String-keyed entry point for UIs that bind filters by name. Empty
    /// values clear optional filters.
    fn parse_update(key: &str, value: &str) -> Result<Self::Update, FilterError>;

    fn to_query(&self, limit: u32, offset: u64) -> Self::Query;
}

pub trait FieldKey: Copy + Ord + Hash + Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    /// Wire/binding name, e.g. `address_line1`.
    fn name(self) -> &'static str;

    /// Label used in inline messages, e.g. `Address Line 1`.
    fn label(self) -> &'static str;

    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValues<F: FieldKey>(BTreeMap<F, String>);

impl<F: FieldKey> FieldValues<F> {
    pub fn blank() -> Self {
        Self(F::ALL.iter().map(|field| (*field, String::new())).collect())
    }

    pub fn get(&self, field: F) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: F, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

impl<F: FieldKey> Default for FieldValues<F> {
    fn default() -> Self {
        Self::blank()
    }
}

/// What a field check may look at besides the value itself.
#[derive(Debug)]
pub struct FieldContext<'a, E: Entity> {
    pub records: &'a [E],
    pub editing: Option<E::Id>,
}

impl<'a, E: Entity> FieldContext<'a, E> {
    /// Loaded records other than the one being edited.
    pub fn others(&self) -> impl Iterator<Item = &'a E> + '_ {
        self.records
            .iter()
            .filter(move |record| Some(record.id()) != self.editing)
    }
}

pub trait FormSchema: Entity {
    type Field: FieldKey;

    fn field_values(&self) -> FieldValues<Self::Field>;

    fn check_field(
        field: Self::Field,
        value: &str,
        ctx: &FieldContext<'_, Self>,
    ) -> Option<String>;

    fn build_draft(values: &FieldValues<Self::Field>) -> Result<Self::Draft, ValidationErrors>;
}

pub(crate) fn parse_choice<F, T>(
    values: &FieldValues<F>,
    field: F,
    errors: &mut ValidationErrors,
) -> Option<T>
where
    F: FieldKey,
    T: std::str::FromStr,
{
    match values.get(field).parse::<T>() {
        Ok(choice) => Some(choice),
        Err(_) => {
            errors.insert(
                field.name(),
                format!("{} must be one of the listed options!", field.label()),
            );
            None
        }
    }
}

pub(crate) fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

pub(crate) fn parse_optional<T: std::str::FromStr>(
    key: &str,
    value: &str,
) -> Result<Option<T>, FilterError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| FilterError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
