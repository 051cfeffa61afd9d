//! One entity's list, form and delete gate bound to its API and store.
//!
//! Controller state sits behind a mutex that is never held across a network
//! call. Each fetch carries the ticket it was issued for; when it lands the
//! ticket is checked against the list's current parameters and the store's
//! last applied sequence, so a slow response for old parameters is dropped
//! instead of overwriting a newer page.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    confirm::DeleteConfirmation,
    defaults::FieldSeed,
    entity::{FieldKey, FieldValues, FilterSet, FormSchema},
    error::{ClientError, RequestError, ValidationErrors},
    events::{ClientEvent, Notice},
    form::{FormController, FormPhase},
    list::{FetchTicket, ListController, Pager},
    store::RecordStore,
    transport::RecordApi,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the store contents.
    Applied,
    /// Parameters moved on, or a newer response already landed.
    Superseded,
    /// Nothing to fetch; parameters did not change.
    Unchanged,
}

struct Controls<E: FormSchema> {
    list: ListController<E::Filters>,
    form: FormController<E>,
    deletion: DeleteConfirmation<E::Id>,
    seed: Option<Box<dyn FieldSeed<E>>>,
}

pub struct EntityWorkspace<E: FormSchema> {
    api: Arc<dyn RecordApi<E>>,
    store: RecordStore<E>,
    controls: Mutex<Controls<E>>,
    events: broadcast::Sender<ClientEvent>,
}

impl<E: FormSchema> EntityWorkspace<E> {
    pub fn new(
        api: Arc<dyn RecordApi<E>>,
        store: RecordStore<E>,
        page_size: u32,
        events: broadcast::Sender<ClientEvent>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            api,
            store,
            controls: Mutex::new(Controls {
                list: ListController::new(page_size)?,
                form: FormController::new(),
                deletion: DeleteConfirmation::default(),
                seed: None,
            }),
            events,
        })
    }

    pub fn store(&self) -> &RecordStore<E> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    fn notify(&self, notice: Notice) {
        let _ = self.events.send(ClientEvent::Notice(notice));
    }

    // ---- list ----

    pub async fn page(&self) -> u32 {
        self.controls.lock().await.list.page()
    }

    pub async fn filters(&self) -> E::Filters {
        self.controls.lock().await.list.filters().clone()
    }

    pub async fn pager(&self) -> Pager {
        let total = self.store.total().await;
        self.controls.lock().await.list.pager(total)
    }

    /// Fetches the current parameters again.
    pub async fn refresh(&self) -> Result<FetchOutcome, ClientError> {
        let ticket = self.controls.lock().await.list.refresh();
        self.dispatch(ticket).await
    }

    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, ClientError> {
        let ticket = self.controls.lock().await.list.set_page(page);
        self.dispatch_if_changed(ticket).await
    }

    pub async fn next_page(&self) -> Result<FetchOutcome, ClientError> {
        let total = self.store.total().await;
        let ticket = {
            let mut controls = self.controls.lock().await;
            let pager = controls.list.pager(total);
            if pager.next_disabled {
                None
            } else {
                controls.list.set_page(pager.page + 1)
            }
        };
        self.dispatch_if_changed(ticket).await
    }

    pub async fn prev_page(&self) -> Result<FetchOutcome, ClientError> {
        let ticket = {
            let mut controls = self.controls.lock().await;
            let page = controls.list.page();
            if page <= 1 {
                None
            } else {
                controls.list.set_page(page - 1)
            }
        };
        self.dispatch_if_changed(ticket).await
    }

    pub async fn set_filter(
        &self,
        update: <E::Filters as FilterSet>::Update,
    ) -> Result<FetchOutcome, ClientError> {
        let ticket = self.controls.lock().await.list.set_filter(update);
        self.dispatch_if_changed(ticket).await
    }

    pub async fn set_filter_str(
        &self,
        key: &str,
        value: &str,
    ) -> Result<FetchOutcome, ClientError> {
        let ticket = self.controls.lock().await.list.set_filter_str(key, value)?;
        self.dispatch_if_changed(ticket).await
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<FetchOutcome, ClientError> {
        let ticket = self.controls.lock().await.list.set_page_size(page_size)?;
        self.dispatch_if_changed(ticket).await
    }

    /// Sets page size, filters and page in one step with at most one fetch.
    pub async fn set_view(
        &self,
        page_size: Option<u32>,
        filters: &[(&str, &str)],
        page: u32,
    ) -> Result<FetchOutcome, ClientError> {
        let ticket = self
            .controls
            .lock()
            .await
            .list
            .set_view(page_size, filters, page)?;
        self.dispatch_if_changed(ticket).await
    }

    async fn dispatch_if_changed(
        &self,
        ticket: Option<FetchTicket<E::Filters>>,
    ) -> Result<FetchOutcome, ClientError> {
        match ticket {
            Some(ticket) => self.dispatch(ticket).await,
            None => Ok(FetchOutcome::Unchanged),
        }
    }

    async fn dispatch(&self, ticket: FetchTicket<E::Filters>) -> Result<FetchOutcome, ClientError> {
        let query = ticket
            .params
            .filters
            .to_query(ticket.params.limit(), ticket.params.offset());
        let result = self.api.list(&query).await;

        let mut controls = self.controls.lock().await;
        if !controls.list.is_current(&ticket) {
            debug!(
                entity = %E::KIND,
                seq = ticket.seq,
                "dropping response for superseded parameters"
            );
            return Ok(FetchOutcome::Superseded);
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!(entity = %E::KIND, seq = ticket.seq, error = %err, "list request failed");
                self.notify(Notice::error(E::MESSAGES.fetch_failed));
                return Err(err.into());
            }
        };

        if !self.store.apply(ticket.seq, page).await {
            debug!(
                entity = %E::KIND,
                seq = ticket.seq,
                "dropping response older than the applied page"
            );
            return Ok(FetchOutcome::Superseded);
        }
        self.store_changed(&mut controls).await;
        Ok(FetchOutcome::Applied)
    }

    async fn store_changed(&self, controls: &mut Controls<E>) {
        let snapshot = self.store.snapshot().await;
        let _ = self.events.send(ClientEvent::RecordsUpdated {
            entity: E::KIND,
            total: snapshot.total,
            page: controls.list.page(),
        });
        self.apply_seed(controls, &snapshot.records);
    }

    fn apply_seed(&self, controls: &mut Controls<E>, records: &[E]) {
        let Some(seed) = controls.seed.as_ref() else {
            return;
        };
        let field = seed.field();
        let value = seed.resolve(records);
        if controls.form.default_value(field) == value {
            return;
        }
        controls.form.reseed(field, &value);
        debug!(entity = %E::KIND, field = field.name(), %value, "form default re-resolved");
        let _ = self.events.send(ClientEvent::FormDefaultChanged {
            entity: E::KIND,
            field: field.name(),
            value,
        });
    }

    /// Installs a self-correcting default and resolves it against the
    /// records loaded right now.
    pub async fn install_seed(&self, seed: Box<dyn FieldSeed<E>>) {
        let records = self.store.records().await;
        let mut controls = self.controls.lock().await;
        controls.seed = Some(seed);
        self.apply_seed(&mut controls, &records);
    }

    // ---- form ----

    pub async fn form_phase(&self) -> FormPhase<E::Id> {
        self.controls.lock().await.form.phase()
    }

    pub async fn form_value(&self, field: E::Field) -> String {
        self.controls.lock().await.form.value(field).to_string()
    }

    pub async fn form_values(&self) -> FieldValues<E::Field> {
        self.controls.lock().await.form.values().clone()
    }

    pub async fn form_errors(&self) -> ValidationErrors {
        self.controls.lock().await.form.errors()
    }

    /// Returns the field's inline error after the change, if any.
    pub async fn set_field(&self, field: E::Field, value: impl Into<String>) -> Option<String> {
        let records = self.store.records().await;
        let mut controls = self.controls.lock().await;
        controls
            .form
            .set_field(field, value, &records)
            .map(str::to_string)
    }

    pub async fn set_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, ClientError> {
        let records = self.store.records().await;
        let mut controls = self.controls.lock().await;
        Ok(controls
            .form
            .set_field_by_name(name, value, &records)?
            .map(str::to_string))
    }

    /// Loads a record from the current page into the form. An id that is not
    /// on the page leaves the form alone.
    pub async fn edit(&self, id: E::Id) -> bool {
        match self.store.find(id).await {
            Some(record) => self.edit_record(&record).await,
            None => {
                debug!(entity = %E::KIND, %id, "edit target not on the loaded page");
                false
            }
        }
    }

    /// Loads a record obtained elsewhere, e.g. from [`Self::fetch_record`].
    pub async fn edit_record(&self, record: &E) -> bool {
        self.controls.lock().await.form.load(record)
    }

    pub async fn cancel_edit(&self) {
        let mut controls = self.controls.lock().await;
        if let FormPhase::IdleEdit(_) = controls.form.phase() {
            controls.form.cancel_edit();
            let _ = self.events.send(ClientEvent::FormReset { entity: E::KIND });
        }
    }

    pub async fn fetch_record(&self, id: E::Id) -> Result<E, ClientError> {
        self.api.fetch(id).await.map_err(|err| match err {
            RequestError::NotFound(_) => ClientError::NotFound {
                entity: E::KIND.label(),
                id: id.to_string(),
            },
            other => other.into(),
        })
    }

    /// Validates, then creates or updates depending on the form phase. On
    /// success the form resets and the current parameters are fetched again.
    pub async fn submit(&self) -> Result<E, ClientError> {
        let records = self.store.records().await;
        let submission = self.controls.lock().await.form.begin_submit(&records)?;

        let result = match submission.editing {
            Some(id) => self.api.update(id, &submission.draft).await,
            None => self.api.create(&submission.draft).await,
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(err) => {
                self.controls.lock().await.form.finish_submit(false);
                warn!(entity = %E::KIND, error = %err, "save failed");
                self.notify(Notice::error(E::MESSAGES.save_failed));
                return Err(err.into());
            }
        };

        let ticket = {
            let mut controls = self.controls.lock().await;
            controls.form.finish_submit(true);
            controls.list.refresh()
        };
        let message = if submission.editing.is_some() {
            E::MESSAGES.updated
        } else {
            E::MESSAGES.created
        };
        info!(entity = %E::KIND, id = %saved.id(), "{message}");
        self.notify(Notice::success(message));
        let _ = self.events.send(ClientEvent::FormReset { entity: E::KIND });

        // A failed refresh has already raised its own notice.
        if let Err(err) = self.dispatch(ticket).await {
            debug!(entity = %E::KIND, error = %err, "refresh after save failed");
        }
        Ok(saved)
    }

    // ---- delete ----

    pub async fn request_delete(&self, id: E::Id) {
        self.controls.lock().await.deletion.request(id);
    }

    pub async fn cancel_delete(&self) {
        self.controls.lock().await.deletion.cancel();
    }

    /// Dismisses the prompt without answering it.
    pub async fn close_delete(&self) {
        self.controls.lock().await.deletion.close();
    }

    pub async fn pending_delete(&self) -> Option<E::Id> {
        self.controls.lock().await.deletion.pending()
    }

    /// Issues the delete for the pending target. Returns `None` when nothing
    /// was pending.
    pub async fn confirm_delete(&self) -> Result<Option<E::Id>, ClientError> {
        let Some(id) = self.controls.lock().await.deletion.confirm() else {
            return Ok(None);
        };

        if let Err(err) = self.api.delete(id).await {
            warn!(entity = %E::KIND, %id, error = %err, "delete failed");
            self.notify(Notice::error(E::MESSAGES.delete_failed));
            return Err(err.into());
        }

        info!(entity = %E::KIND, %id, "record deleted");
        let mut controls = self.controls.lock().await;
        if self.store.remove(id).await {
            self.store_changed(&mut controls).await;
        }
        drop(controls);
        self.notify(Notice::success(E::MESSAGES.deleted));
        Ok(Some(id))
    }
}

#[cfg(test)]
#[path = "tests/workspace_tests.rs"]
mod tests;
