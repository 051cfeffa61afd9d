use shared::{
    domain::{Department, EmployeeRecordId, Profile},
    protocol::{Employee, EmployeeDraft, EmployeeListQuery, EmployeeListResponse},
};

use crate::{
    entity::{
        parse_choice, parse_optional, replace, Entity, EntityKind, EntityMessages, FieldContext,
        FieldKey, FieldValues, FilterSet, FormSchema, RecordPage,
    },
    error::{FilterError, ValidationErrors},
    validate::{check_choice, check_employee_code, required},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeField {
    EmployeeName,
    EmployeeId,
    Department,
    Profile,
}

impl FieldKey for EmployeeField {
    const ALL: &'static [Self] = &[
        Self::EmployeeName,
        Self::EmployeeId,
        Self::Department,
        Self::Profile,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::EmployeeName => "employee_name",
            Self::EmployeeId => "employee_id",
            Self::Department => "department",
            Self::Profile => "profile",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::EmployeeName => "Employee Name",
            Self::EmployeeId => "Employee Id",
            Self::Department => "Department",
            Self::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeSearchField {
    #[default]
    Name,
    Id,
}

impl EmployeeSearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "id" => Some(Self::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeFilters {
    pub search: String,
    pub search_field: EmployeeSearchField,
    pub department: Option<Department>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeFilter {
    Search(String),
    SearchField(EmployeeSearchField),
    Department(Option<Department>),
    Profile(Option<Profile>),
}

impl FilterSet for EmployeeFilters {
    type Update = EmployeeFilter;
    type Query = EmployeeListQuery;

    fn apply(&mut self, update: EmployeeFilter) -> bool {
        match update {
            EmployeeFilter::Search(search) => replace(&mut self.search, search),
            EmployeeFilter::SearchField(field) => replace(&mut self.search_field, field),
            EmployeeFilter::Department(department) => replace(&mut self.department, department),
            EmployeeFilter::Profile(profile) => replace(&mut self.profile, profile),
        }
    }

    fn parse_update(key: &str, value: &str) -> Result<EmployeeFilter, FilterError> {
        match key {
            "search" => Ok(EmployeeFilter::Search(value.to_string())),
            "searchField" => EmployeeSearchField::parse(value)
                .map(EmployeeFilter::SearchField)
                .ok_or_else(|| FilterError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
            "department" => parse_optional(key, value).map(EmployeeFilter::Department),
            "profile" => parse_optional(key, value).map(EmployeeFilter::Profile),
            other => Err(FilterError::UnknownKey(other.to_string())),
        }
    }

    /// The id search goes out as `employee_id`; name search as `search`.
    fn to_query(&self, limit: u32, offset: u64) -> EmployeeListQuery {
        let search = self.search.trim();
        let (search, employee_id) = match (search.is_empty(), self.search_field) {
            (true, _) => (None, None),
            (false, EmployeeSearchField::Name) => (Some(search.to_string()), None),
            (false, EmployeeSearchField::Id) => (None, Some(search.to_string())),
        };
        EmployeeListQuery {
            limit,
            offset,
            search,
            employee_id,
            department: self.department,
            profile: self.profile,
        }
    }
}

impl Entity for Employee {
    type Id = EmployeeRecordId;
    type Draft = EmployeeDraft;
    type Filters = EmployeeFilters;
    type Listing = EmployeeListResponse;

    const KIND: EntityKind = EntityKind::Employee;
    const RESOURCE: &'static str = "employees";
    const MESSAGES: EntityMessages = EntityMessages {
        created: "Employee added successfully!",
        updated: "Employee updated successfully!",
        save_failed: "Failed to save employee.",
        deleted: "Employee Deleted Successfully",
        delete_failed: "Error in deleting employee",
        fetch_failed: "Error while fetching Employees",
    };

    fn id(&self) -> EmployeeRecordId {
        self.id
    }

    fn into_page(listing: EmployeeListResponse) -> RecordPage<Self> {
        RecordPage {
            records: listing.employees,
            total: listing.total,
        }
    }
}

impl FormSchema for Employee {
    type Field = EmployeeField;

    fn field_values(&self) -> FieldValues<EmployeeField> {
        let mut values = FieldValues::blank();
        values.set(EmployeeField::EmployeeName, self.employee_name.clone());
        values.set(EmployeeField::EmployeeId, self.employee_id.clone());
        values.set(EmployeeField::Department, self.department.as_str());
        values.set(EmployeeField::Profile, self.profile.as_str());
        values
    }

    fn check_field(
        field: EmployeeField,
        value: &str,
        ctx: &FieldContext<'_, Self>,
    ) -> Option<String> {
        let label = field.label();
        match field {
            EmployeeField::EmployeeName => required(label, value),
            // Uniqueness only covers the loaded page; the server is not
            // known to enforce it globally.
            EmployeeField::EmployeeId => check_employee_code(
                label,
                value,
                ctx.others().map(|employee| employee.employee_id.as_str()),
            ),
            EmployeeField::Department => check_choice::<Department>(label, value),
            EmployeeField::Profile => check_choice::<Profile>(label, value),
        }
    }

    fn build_draft(values: &FieldValues<EmployeeField>) -> Result<EmployeeDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let department = parse_choice(values, EmployeeField::Department, &mut errors);
        let profile = parse_choice(values, EmployeeField::Profile, &mut errors);

        match (department, profile) {
            (Some(department), Some(profile)) => Ok(EmployeeDraft {
                employee_name: values.get(EmployeeField::EmployeeName).trim().to_string(),
                employee_id: values.get(EmployeeField::EmployeeId).to_string(),
                department,
                profile,
            }),
            _ => Err(errors),
        }
    }
}
