//! Repository for the users resource.
//!
//! # Design
//! Every operation has the same shape: call the data source, branch on the
//! `ApiResponse`, map a successful DTO into the domain model. The result is
//! always a `DomainResult`; structured server errors keep their title and
//! icon, every other failure (transport, decode, mapping) becomes a plain
//! message. A panic inside the data source or a mapper is caught here and
//! reported the same way, so nothing unwinds past this boundary.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error};

use crate::datasource::UserRemoteDataSource;
use crate::dto::{UserPatchRequest, UserPostRequest, UserPutRequest};
use crate::error::{ApiError, MappingError};
use crate::mapper::map_all;
use crate::model::User;
use crate::result::{ApiResponse, DomainResult};

/// Users resource operations at the domain level.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_users(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        status: Option<&str>,
    ) -> DomainResult<Vec<User>>;

    async fn get_user_by_id(&self, user_id: &str) -> DomainResult<User>;

    async fn create_user(&self, request: &UserPostRequest) -> DomainResult<User>;

    async fn update_user_by_id(&self, user_id: &str, request: &UserPutRequest)
        -> DomainResult<User>;

    async fn update_user_status(
        &self,
        user_id: &str,
        request: &UserPatchRequest,
    ) -> DomainResult<User>;

    async fn search_users(
        &self,
        query: Option<&str>,
        field: Option<&str>,
    ) -> DomainResult<Vec<User>>;

    async fn validate_user_email(&self, request: &UserPostRequest) -> DomainResult<User>;
}

/// `UserRepository` over a remote data source.
#[derive(Debug, Clone)]
pub struct RemoteUserRepository<D> {
    data_source: D,
}

impl<D: UserRemoteDataSource> RemoteUserRepository<D> {
    pub fn new(data_source: D) -> Self {
        Self { data_source }
    }
}

/// Turn a data source outcome into a domain outcome.
fn resolve<T, M>(
    operation: &'static str,
    response: ApiResponse<T>,
    map: impl FnOnce(T) -> Result<M, MappingError>,
) -> DomainResult<M> {
    match response {
        ApiResponse::Success(dto) => match map(dto) {
            Ok(model) => DomainResult::Success(model),
            Err(err) => {
                debug!(operation, error = %err, "response could not be mapped");
                ApiError::from(err).into()
            }
        },
        ApiResponse::Failed(detail) => detail.into(),
        ApiResponse::Error(err) => err.into(),
    }
}

/// Await `fut`, converting a panic into `DomainResult::Error`.
async fn guarded<M, F>(operation: &'static str, fut: F) -> DomainResult<M>
where
    F: Future<Output = DomainResult<M>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(operation, panic = %message, "users repository call panicked");
            DomainResult::error(message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}

#[async_trait]
impl<D: UserRemoteDataSource> UserRepository for RemoteUserRepository<D> {
    async fn get_users(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        status: Option<&str>,
    ) -> DomainResult<Vec<User>> {
        guarded("get_users", async {
            let response = self.data_source.get_users(page, page_size, status).await;
            resolve("get_users", response, map_all)
        })
        .await
    }

    async fn get_user_by_id(&self, user_id: &str) -> DomainResult<User> {
        guarded("get_user_by_id", async {
            let response = self.data_source.get_user_by_id(user_id).await;
            resolve("get_user_by_id", response, User::try_from)
        })
        .await
    }

    async fn create_user(&self, request: &UserPostRequest) -> DomainResult<User> {
        guarded("create_user", async {
            let response = self.data_source.create_user(request).await;
            resolve("create_user", response, User::try_from)
        })
        .await
    }

    async fn update_user_by_id(
        &self,
        user_id: &str,
        request: &UserPutRequest,
    ) -> DomainResult<User> {
        guarded("update_user_by_id", async {
            let response = self.data_source.update_user_by_id(user_id, request).await;
            resolve("update_user_by_id", response, User::try_from)
        })
        .await
    }

    async fn update_user_status(
        &self,
        user_id: &str,
        request: &UserPatchRequest,
    ) -> DomainResult<User> {
        guarded("update_user_status", async {
            let response = self.data_source.update_user_status(user_id, request).await;
            resolve("update_user_status", response, User::try_from)
        })
        .await
    }

    async fn search_users(
        &self,
        query: Option<&str>,
        field: Option<&str>,
    ) -> DomainResult<Vec<User>> {
        guarded("search_users", async {
            let response = self.data_source.search_users(query, field).await;
            resolve("search_users", response, map_all)
        })
        .await
    }

    async fn validate_user_email(&self, request: &UserPostRequest) -> DomainResult<User> {
        guarded("validate_user_email", async {
            let response = self.data_source.validate_user_email(request).await;
            resolve("validate_user_email", response, User::try_from)
        })
        .await
    }
}
