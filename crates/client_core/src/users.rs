use shared::{
    domain::{District, Gender, Region, UserId},
    protocol::{User, UserDraft, UserListQuery, UserListResponse},
};

use crate::{
    entity::{
        parse_choice, parse_optional, replace, Entity, EntityKind, EntityMessages, FieldContext,
        FieldKey, FieldValues, FilterSet, FormSchema, RecordPage,
    },
    error::{FilterError, ValidationErrors},
    validate::{check_choice, check_name, check_phone, check_pin, required},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Firstname,
    Lastname,
    Gender,
    Phone,
    AddressLine1,
    AddressLine2,
    Pin,
    District,
    State,
}

impl FieldKey for UserField {
    const ALL: &'static [Self] = &[
        Self::Firstname,
        Self::Lastname,
        Self::Gender,
        Self::Phone,
        Self::AddressLine1,
        Self::AddressLine2,
        Self::Pin,
        Self::District,
        Self::State,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Firstname => "firstname",
            Self::Lastname => "lastname",
            Self::Gender => "gender",
            Self::Phone => "phone",
            Self::AddressLine1 => "address_line1",
            Self::AddressLine2 => "address_line2",
            Self::Pin => "pin",
            Self::District => "district",
            Self::State => "state",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Firstname => "Firstname",
            Self::Lastname => "Lastname",
            Self::Gender => "Gender",
            Self::Phone => "Phone Number",
            Self::AddressLine1 => "Address Line 1",
            Self::AddressLine2 => "Address Line 2",
            Self::Pin => "Pin Code",
            Self::District => "District",
            Self::State => "State",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSearchField {
    #[default]
    Name,
    Phone,
    Pin,
}

impl UserSearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Pin => "pin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "phone" => Some(Self::Phone),
            "pin" => Some(Self::Pin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilters {
    pub search: String,
    pub search_field: UserSearchField,
    pub gender: Option<Gender>,
    pub district: Option<District>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Search(String),
    SearchField(UserSearchField),
    Gender(Option<Gender>),
    District(Option<District>),
}

impl FilterSet for UserFilters {
    type Update = UserFilter;
    type Query = UserListQuery;

    fn apply(&mut self, update: UserFilter) -> bool {
        match update {
            UserFilter::Search(search) => replace(&mut self.search, search),
            UserFilter::SearchField(field) => replace(&mut self.search_field, field),
            UserFilter::Gender(gender) => replace(&mut self.gender, gender),
            UserFilter::District(district) => replace(&mut self.district, district),
        }
    }

    fn parse_update(key: &str, value: &str) -> Result<UserFilter, FilterError> {
        match key {
            "search" => Ok(UserFilter::Search(value.to_string())),
            "searchField" => UserSearchField::parse(value)
                .map(UserFilter::SearchField)
                .ok_or_else(|| FilterError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
            "gender" => parse_optional(key, value).map(UserFilter::Gender),
            "district" => parse_optional(key, value).map(UserFilter::District),
            other => Err(FilterError::UnknownKey(other.to_string())),
        }
    }

    fn to_query(&self, limit: u32, offset: u64) -> UserListQuery {
        let search = self.search.trim();
        let (search, search_field) = if search.is_empty() {
            (None, None)
        } else {
            (
                Some(search.to_string()),
                Some(self.search_field.as_str().to_string()),
            )
        };
        UserListQuery {
            limit,
            offset,
            search,
            search_field,
            gender: self.gender,
            district: self.district,
        }
    }
}

impl Entity for User {
    type Id = UserId;
    type Draft = UserDraft;
    type Filters = UserFilters;
    type Listing = UserListResponse;

    const KIND: EntityKind = EntityKind::User;
    const RESOURCE: &'static str = "users";
    const MESSAGES: EntityMessages = EntityMessages {
        created: "User created successfully!",
        updated: "User updated successfully",
        save_failed: "Error while saving user",
        deleted: "User deleted successfully",
        delete_failed: "Error while deleting user",
        fetch_failed: "Error in fetching users",
    };

    fn id(&self) -> UserId {
        self.id
    }

    fn into_page(listing: UserListResponse) -> RecordPage<Self> {
        RecordPage {
            records: listing.users,
            total: listing.total,
        }
    }
}

impl FormSchema for User {
    type Field = UserField;

    fn field_values(&self) -> FieldValues<UserField> {
        let mut values = FieldValues::blank();
        values.set(UserField::Firstname, self.firstname.clone());
        values.set(UserField::Lastname, self.lastname.clone());
        values.set(UserField::Gender, self.gender.as_str());
        values.set(UserField::Phone, self.phone.clone());
        values.set(UserField::AddressLine1, self.address_line1.clone());
        values.set(
            UserField::AddressLine2,
            self.address_line2.clone().unwrap_or_default(),
        );
        values.set(UserField::Pin, self.pin.clone());
        values.set(UserField::District, self.district.as_str());
        values.set(UserField::State, self.state.as_str());
        values
    }

    fn check_field(field: UserField, value: &str, _ctx: &FieldContext<'_, Self>) -> Option<String> {
        let label = field.label();
        match field {
            UserField::Firstname | UserField::Lastname => check_name(label, value),
            UserField::Phone => check_phone(label, value),
            UserField::Pin => check_pin(label, value),
            UserField::AddressLine1 => required(label, value),
            UserField::AddressLine2 => None,
            UserField::Gender => check_choice::<Gender>(label, value),
            UserField::District => check_choice::<District>(label, value),
            UserField::State => check_choice::<Region>(label, value),
        }
    }

    fn build_draft(values: &FieldValues<UserField>) -> Result<UserDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let gender = parse_choice(values, UserField::Gender, &mut errors);
        let district = parse_choice(values, UserField::District, &mut errors);
        let state = parse_choice(values, UserField::State, &mut errors);

        match (gender, district, state) {
            (Some(gender), Some(district), Some(state)) => {
                let line2 = values.get(UserField::AddressLine2).trim();
                Ok(UserDraft {
                    firstname: values.get(UserField::Firstname).trim().to_string(),
                    lastname: values.get(UserField::Lastname).trim().to_string(),
                    gender,
                    phone: values.get(UserField::Phone).to_string(),
                    address_line1: values.get(UserField::AddressLine1).trim().to_string(),
                    address_line2: (!line2.is_empty()).then(|| line2.to_string()),
                    pin: values.get(UserField::Pin).to_string(),
                    district,
                    state,
                })
            }
            _ => Err(errors),
        }
    }
}
