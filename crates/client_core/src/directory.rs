use std::sync::Arc;

use shared::protocol::{Employee, User};
use tokio::sync::broadcast;
use tracing::warn;

use crate::{
    config::Settings,
    defaults::{EmployeeNameSeed, Handoff},
    error::ClientError,
    events::ClientEvent,
    store::RecordStore,
    transport::{HttpDirectoryApi, LastUserSource, RecordApi},
    users::UserField,
    workspace::{EntityWorkspace, FetchOutcome},
};

/// Both workspaces plus the navigation between them.
pub struct Directory {
    users: Arc<EntityWorkspace<User>>,
    employees: Arc<EntityWorkspace<Employee>>,
    last_user: Arc<dyn LastUserSource>,
    events: broadcast::Sender<ClientEvent>,
}

impl Directory {
    pub fn new(
        users_api: Arc<dyn RecordApi<User>>,
        employees_api: Arc<dyn RecordApi<Employee>>,
        last_user: Arc<dyn LastUserSource>,
        page_size: u32,
    ) -> Result<Self, ClientError> {
        let (events, _) = broadcast::channel(1024);
        let users = EntityWorkspace::new(users_api, RecordStore::new(), page_size, events.clone())?;
        let employees =
            EntityWorkspace::new(employees_api, RecordStore::new(), page_size, events.clone())?;
        Ok(Self {
            users: Arc::new(users),
            employees: Arc::new(employees),
            last_user,
            events,
        })
    }

    pub fn http(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let api = Arc::new(HttpDirectoryApi::with_base(
            settings.api_url()?,
            settings.request_timeout(),
        )?);
        Ok(Self::new(
            api.clone(),
            api.clone(),
            api,
            settings.page_size,
        )?)
    }

    pub fn users(&self) -> &Arc<EntityWorkspace<User>> {
        &self.users
    }

    pub fn employees(&self) -> &Arc<EntityWorkspace<Employee>> {
        &self.employees
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// The name currently typed into the User form, offered to the
    /// Employee form on navigation.
    pub async fn handoff(&self) -> Handoff {
        let values = self.users.form_values().await;
        Handoff::new(format!(
            "{} {}",
            values.get(UserField::Firstname).trim(),
            values.get(UserField::Lastname).trim()
        ))
    }

    pub async fn open_users(&self) -> Result<FetchOutcome, ClientError> {
        self.users.refresh().await
    }

    /// Seeds the Employee form from `handoff` and the most recent user, then
    /// loads the first Employee page.
    pub async fn open_employees(
        &self,
        handoff: Option<Handoff>,
    ) -> Result<FetchOutcome, ClientError> {
        let last_user = match self.last_user.last_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "could not load the most recent user");
                None
            }
        };
        let seed = EmployeeNameSeed::new(handoff, last_user);
        self.employees.install_seed(Box::new(seed)).await;

        match self.employees.set_page(1).await? {
            FetchOutcome::Unchanged => self.employees.refresh().await,
            outcome => Ok(outcome),
        }
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
