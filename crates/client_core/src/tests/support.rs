use std::{
    collections::VecDeque,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{Department, District, EmployeeRecordId, Gender, Profile, Region, UserId},
    error::ApiError,
    protocol::{Employee, User},
};
use tokio::sync::{oneshot, Mutex};

use crate::{
    entity::{Entity, RecordPage},
    error::RequestError,
    transport::{LastUserSource, ListQuery, RecordApi},
};

pub(crate) type PageReply<E> = Result<RecordPage<E>, RequestError>;

/// In-memory API. List calls answer from `page` unless a gate was queued,
/// in which case the call waits for the test to release it.
pub(crate) struct FakeApi<E: Entity> {
    pub page: Mutex<RecordPage<E>>,
    pub gates: Mutex<VecDeque<oneshot::Receiver<PageReply<E>>>>,
    pub list_calls: Mutex<Vec<ListQuery<E>>>,
    pub saved: Mutex<Vec<(Option<E::Id>, E::Draft)>>,
    pub deleted: Mutex<Vec<E::Id>>,
    pub saved_record: E,
    pub fail_list: AtomicBool,
    pub fail_save: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl<E: Entity> FakeApi<E> {
    pub fn new(saved_record: E, records: Vec<E>, total: u64) -> Self {
        Self {
            page: Mutex::new(RecordPage { records, total }),
            gates: Mutex::new(VecDeque::new()),
            list_calls: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            saved_record,
            fail_list: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    /// Queues a gate for the next list call and returns its release handle.
    pub async fn gate_next_list(&self) -> oneshot::Sender<PageReply<E>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.push_back(rx);
        tx
    }

    pub async fn set_page(&self, records: Vec<E>, total: u64) {
        *self.page.lock().await = RecordPage { records, total };
    }

    pub async fn wait_for_list_calls(&self, count: usize) {
        for _ in 0..200 {
            if self.list_calls.lock().await.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {count} list calls");
    }
}

fn server_error(message: &str) -> RequestError {
    RequestError::Status(ApiError::new(500, message))
}

#[async_trait]
impl<E: Entity> RecordApi<E> for FakeApi<E> {
    async fn list(&self, query: &ListQuery<E>) -> Result<RecordPage<E>, RequestError> {
        let gate = {
            self.list_calls.lock().await.push(query.clone());
            self.gates.lock().await.pop_front()
        };
        if let Some(gate) = gate {
            return gate.await.unwrap_or_else(|_| Err(server_error("gate dropped")));
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error("list unavailable"));
        }
        Ok(self.page.lock().await.clone())
    }

    async fn fetch(&self, id: E::Id) -> Result<E, RequestError> {
        self.page
            .lock()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| RequestError::NotFound(format!("{id} not found")))
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, RequestError> {
        self.saved.lock().await.push((None, draft.clone()));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(server_error("save rejected"));
        }
        Ok(self.saved_record.clone())
    }

    async fn update(&self, id: E::Id, draft: &E::Draft) -> Result<E, RequestError> {
        self.saved.lock().await.push((Some(id), draft.clone()));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(server_error("save rejected"));
        }
        Ok(self.saved_record.clone())
    }

    async fn delete(&self, id: E::Id) -> Result<(), RequestError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(server_error("delete rejected"));
        }
        self.deleted.lock().await.push(id);
        Ok(())
    }
}

pub(crate) struct FixedLastUser(pub Option<User>);

#[async_trait]
impl LastUserSource for FixedLastUser {
    async fn last_user(&self) -> Result<Option<User>, RequestError> {
        Ok(self.0.clone())
    }
}

pub(crate) struct BrokenLastUser;

#[async_trait]
impl LastUserSource for BrokenLastUser {
    async fn last_user(&self) -> Result<Option<User>, RequestError> {
        Err(server_error("users backend down"))
    }
}

pub(crate) fn employee(id: i64, name: &str, code: &str) -> Employee {
    Employee {
        id: EmployeeRecordId(id),
        employee_name: name.to_string(),
        employee_id: code.to_string(),
        department: Department::Engineering,
        profile: Profile::SeniorDeveloper,
    }
}

pub(crate) fn user(id: i64, firstname: &str, lastname: &str) -> User {
    User {
        id: UserId(id),
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        gender: Gender::Male,
        phone: "9123456780".to_string(),
        address_line1: "4 Lake View".to_string(),
        address_line2: Some("Flat 2".to_string()),
        pin: "440001".to_string(),
        district: District::Nagpur,
        state: Region::Maharashtra,
    }
}
