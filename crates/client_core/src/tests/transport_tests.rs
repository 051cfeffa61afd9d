use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Department, District, EmployeeRecordId, Gender, Profile, Region, UserId},
    protocol::{Employee, EmployeeDraft, EmployeeListResponse, UserListQuery, UserListResponse},
};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;
use crate::{employees::EmployeeFilters, users::UserFilter, users::UserFilters};

#[derive(Clone, Default)]
struct ServerState {
    last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
    created: Arc<Mutex<Vec<EmployeeDraft>>>,
    has_last_user: bool,
}

fn sample_user() -> User {
    User {
        id: UserId(3),
        firstname: "Asha".to_string(),
        lastname: "Rao".to_string(),
        gender: Gender::Female,
        phone: "9876543210".to_string(),
        address_line1: "12 Hill Road".to_string(),
        address_line2: None,
        pin: "411001".to_string(),
        district: District::Pune,
        state: Region::Maharashtra,
    }
}

async fn list_users(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<UserListResponse> {
    *state.last_query.lock().await = Some(params);
    Json(UserListResponse {
        users: vec![sample_user()],
        total: 11,
    })
}

async fn last_user(State(state): State<ServerState>) -> Result<Json<User>, StatusCode> {
    if state.has_last_user {
        Ok(Json(sample_user()))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn get_user(Path(id): Path<i64>) -> (StatusCode, Json<serde_json::Value>) {
    match id {
        3 => (
            StatusCode::OK,
            Json(serde_json::to_value(sample_user()).unwrap_or_default()),
        ),
        500 => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": "database unavailable" })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "User not found!" })),
        ),
    }
}

async fn list_employees(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<EmployeeListResponse> {
    *state.last_query.lock().await = Some(params);
    Json(EmployeeListResponse {
        employees: Vec::new(),
        total: 0,
    })
}

async fn create_employee(
    State(state): State<ServerState>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Json<Employee>, (StatusCode, Json<serde_json::Value>)> {
    if draft.employee_id == "9999" {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "detail": [{ "msg": "employee_id taken" }] })),
        ));
    }
    state.created.lock().await.push(draft.clone());
    Ok(Json(Employee {
        id: EmployeeRecordId(41),
        employee_name: draft.employee_name,
        employee_id: draft.employee_id,
        department: draft.department,
        profile: draft.profile,
    }))
}

async fn delete_employee(Path(id): Path<i64>) -> (StatusCode, Json<serde_json::Value>) {
    if id == 41 {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Employee deleted successfully" })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Employee not found!" })),
        )
    }
}

async fn spawn_directory_server(has_last_user: bool) -> Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState {
        has_last_user,
        ..ServerState::default()
    };
    let app = Router::new()
        .route("/users", get(list_users))
        .route("/users/last", get(last_user))
        .route("/users/:id", get(get_user))
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", axum::routing::delete(delete_employee))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn api(url: &str) -> HttpDirectoryApi {
    HttpDirectoryApi::new(url, Duration::from_secs(5)).expect("valid base url")
}

fn draft(code: &str) -> EmployeeDraft {
    EmployeeDraft {
        employee_name: "Asha Rao".to_string(),
        employee_id: code.to_string(),
        department: Department::Sales,
        profile: Profile::SeniorDeveloper,
    }
}

#[tokio::test]
async fn user_list_sends_paging_search_and_filters() {
    let (url, state) = spawn_directory_server(true).await.expect("spawn server");
    let api = api(&url);

    let mut filters = UserFilters::default();
    filters.apply(UserFilter::Search("  Asha ".to_string()));
    filters.apply(UserFilter::Gender(Some(Gender::Female)));
    let query: UserListQuery = filters.to_query(5, 10);

    let page = RecordApi::<User>::list(&api, &query).await.expect("list");
    assert_eq!(page.total, 11);
    assert_eq!(page.records[0].full_name(), "Asha Rao");

    let params = state.last_query.lock().await.clone().expect("query recorded");
    assert_eq!(params.get("limit").map(String::as_str), Some("5"));
    assert_eq!(params.get("offset").map(String::as_str), Some("10"));
    assert_eq!(params.get("search").map(String::as_str), Some("Asha"));
    assert_eq!(params.get("searchField").map(String::as_str), Some("name"));
    assert_eq!(params.get("gender").map(String::as_str), Some("Female"));
    assert!(!params.contains_key("district"));
}

#[tokio::test]
async fn employee_list_omits_blank_search() {
    let (url, state) = spawn_directory_server(true).await.expect("spawn server");
    let api = api(&url);

    let query = EmployeeFilters::default().to_query(20, 0);
    let page = RecordApi::<Employee>::list(&api, &query).await.expect("list");
    assert!(page.records.is_empty());

    let params = state.last_query.lock().await.clone().expect("query recorded");
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("limit").map(String::as_str), Some("20"));
}

#[tokio::test]
async fn error_bodies_map_to_request_errors() {
    let (url, _state) = spawn_directory_server(true).await.expect("spawn server");
    let api = api(&url);

    let user = RecordApi::<User>::fetch(&api, UserId(3)).await.expect("fetch");
    assert_eq!(user.id, UserId(3));

    let missing = RecordApi::<User>::fetch(&api, UserId(8)).await;
    assert!(matches!(missing, Err(RequestError::NotFound(detail)) if detail == "User not found!"));

    let failed = RecordApi::<User>::fetch(&api, UserId(500)).await;
    match failed {
        Err(RequestError::Status(err)) => {
            assert_eq!(err.status, 500);
            assert_eq!(err.message, "database unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_posts_draft_and_returns_record() {
    let (url, state) = spawn_directory_server(true).await.expect("spawn server");
    let api = api(&url);

    let created = RecordApi::<Employee>::create(&api, &draft("1234"))
        .await
        .expect("create");
    assert_eq!(created.id, EmployeeRecordId(41));
    assert_eq!(state.created.lock().await.len(), 1);

    let rejected = RecordApi::<Employee>::create(&api, &draft("9999")).await;
    match rejected {
        Err(RequestError::Status(err)) => {
            assert_eq!(err.status, 422);
            assert!(err.message.contains("employee_id taken"));
        }
        other => panic!("expected validation status, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_reads_acknowledgement() {
    let (url, _state) = spawn_directory_server(true).await.expect("spawn server");
    let api = api(&url);

    RecordApi::<Employee>::delete(&api, EmployeeRecordId(41))
        .await
        .expect("delete");
    let missing = RecordApi::<Employee>::delete(&api, EmployeeRecordId(2)).await;
    assert!(matches!(missing, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn last_user_treats_not_found_as_absent() {
    let (url, _state) = spawn_directory_server(true).await.expect("spawn server");
    let last = api(&url).last_user().await.expect("last user");
    assert_eq!(last.map(|user| user.id), Some(UserId(3)));

    let (url, _state) = spawn_directory_server(false).await.expect("spawn server");
    assert_eq!(api(&url).last_user().await.expect("no last user"), None);
}

#[tokio::test]
async fn base_path_is_kept_when_joining() {
    let api = api("http://127.0.0.1:8000/api/");
    let url = api.endpoint(&["users", "7"]).expect("endpoint");
    assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/users/7");
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        HttpDirectoryApi::new("not a url", Duration::from_secs(1)),
        Err(RequestError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        HttpDirectoryApi::new("mailto:desk@example.com", Duration::from_secs(1)),
        Err(RequestError::InvalidBaseUrl { .. })
    ));
}
