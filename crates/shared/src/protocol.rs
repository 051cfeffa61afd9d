use serde::{Deserialize, Serialize};

use crate::domain::{Department, District, EmployeeRecordId, Gender, Profile, Region, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub gender: Gender,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub pin: String,
    pub district: District,
    pub state: Region,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Body of `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub firstname: String,
    pub lastname: String,
    pub gender: Gender,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub pin: String,
    pub district: District,
    pub state: Region,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeRecordId,
    pub employee_name: String,
    pub employee_id: String,
    pub department: Department,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub employee_name: String,
    pub employee_id: String,
    pub department: Department,
    pub profile: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<Employee>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListQuery {
    pub limit: u32,
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(
        rename = "searchField",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub search_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<District>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListQuery {
    pub limit: u32,
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_accepts_null_second_address_line() {
        let raw = r#"{
            "id": 4,
            "firstname": "Asha",
            "lastname": "Rao",
            "gender": "Female",
            "phone": "9876543210",
            "address_line1": "12 Hill Road",
            "address_line2": null,
            "pin": "411001",
            "district": "Pune",
            "state": "Maharashtra"
        }"#;
        let user: User = serde_json::from_str(raw).expect("user");
        assert_eq!(user.id, UserId(4));
        assert_eq!(user.address_line2, None);
        assert_eq!(user.full_name(), "Asha Rao");
    }

    #[test]
    fn list_query_omits_unset_filters() {
        let query = UserListQuery {
            limit: 5,
            offset: 10,
            search: Some("asha".into()),
            search_field: Some("name".into()),
            gender: None,
            district: Some(District::Thane),
        };
        let value = serde_json::to_value(&query).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "limit": 5,
                "offset": 10,
                "search": "asha",
                "searchField": "name",
                "district": "Thane"
            })
        );
    }
}
