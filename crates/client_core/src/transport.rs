//! HTTP access to the directory API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{DeleteAck, User},
};
use tracing::debug;
use url::Url;

use crate::{
    entity::{Entity, FilterSet, RecordPage},
    error::RequestError,
};

pub type ListQuery<E> = <<E as Entity>::Filters as FilterSet>::Query;

#[async_trait]
pub trait RecordApi<E: Entity>: Send + Sync {
    async fn list(&self, query: &ListQuery<E>) -> Result<RecordPage<E>, RequestError>;
    async fn fetch(&self, id: E::Id) -> Result<E, RequestError>;
    async fn create(&self, draft: &E::Draft) -> Result<E, RequestError>;
    async fn update(&self, id: E::Id, draft: &E::Draft) -> Result<E, RequestError>;
    async fn delete(&self, id: E::Id) -> Result<(), RequestError>;
}

/// Source of the most recently created user, used to seed the Employee form.
#[async_trait]
pub trait LastUserSource: Send + Sync {
    async fn last_user(&self) -> Result<Option<User>, RequestError>;
}

/// Stand-in used when no user backend is wired.
pub struct NoLastUser;

#[async_trait]
impl LastUserSource for NoLastUser {
    async fn last_user(&self) -> Result<Option<User>, RequestError> {
        Ok(None)
    }
}

#[derive(Clone)]
pub struct HttpDirectoryApi {
    http: Client,
    base: Url,
}

impl HttpDirectoryApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let base = Url::parse(base_url).map_err(|err| RequestError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        Self::with_base(base, timeout)
    }

    pub fn with_base(base: Url, timeout: Duration) -> Result<Self, RequestError> {
        if base.cannot_be_a_base() {
            return Err(RequestError::InvalidBaseUrl {
                url: base.to_string(),
                reason: "cannot be used as a base".to_string(),
            });
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RequestError::InvalidBaseUrl {
                url: self.base.to_string(),
                reason: "cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(RequestError::Decode);
    }

    let body = response.text().await?;
    let error = ApiError::from_body(status.as_u16(), &body);
    if status == StatusCode::NOT_FOUND {
        Err(RequestError::NotFound(error.message))
    } else {
        Err(RequestError::Status(error))
    }
}

#[async_trait]
impl<E: Entity> RecordApi<E> for HttpDirectoryApi {
    async fn list(&self, query: &ListQuery<E>) -> Result<RecordPage<E>, RequestError> {
        let url = self.endpoint(&[E::RESOURCE])?;
        debug!(%url, ?query, "listing {}", E::KIND);
        let response = self.http.get(url).query(query).send().await?;
        let listing: E::Listing = read_json(response).await?;
        Ok(E::into_page(listing))
    }

    async fn fetch(&self, id: E::Id) -> Result<E, RequestError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::RESOURCE, &id])?;
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, RequestError> {
        let url = self.endpoint(&[E::RESOURCE])?;
        let response = self.http.post(url).json(draft).send().await?;
        read_json(response).await
    }

    async fn update(&self, id: E::Id, draft: &E::Draft) -> Result<E, RequestError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::RESOURCE, &id])?;
        let response = self.http.put(url).json(draft).send().await?;
        read_json(response).await
    }

    async fn delete(&self, id: E::Id) -> Result<(), RequestError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::RESOURCE, &id])?;
        let response = self.http.delete(url).send().await?;
        let ack: DeleteAck = read_json(response).await?;
        if let Some(message) = ack.message {
            debug!(%message, "delete acknowledged");
        }
        Ok(())
    }
}

#[async_trait]
impl LastUserSource for HttpDirectoryApi {
    async fn last_user(&self) -> Result<Option<User>, RequestError> {
        let url = self.endpoint(&["users", "last"])?;
        let response = self.http.get(url).send().await?;
        match read_json(response).await {
            Ok(user) => Ok(Some(user)),
            Err(RequestError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
