//! Remote data source for the users resource.
//!
//! # Design
//! Each operation builds its request with `UsersApi`, hands it to the
//! `HttpService`, and decodes the body into the operation's DTO. Every
//! outcome is folded into an `ApiResponse`; nothing is returned as `Err`
//! and nothing panics on bad input.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::UsersApi;
use crate::dto::{
    UserGetItem, UserGetResponse, UserPatchRequest, UserPatchResponse, UserPostRequest,
    UserPostResponse, UserPutRequest, UserPutResponse,
};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpService};
use crate::result::ApiResponse;

/// Users resource operations at the wire level.
#[async_trait]
pub trait UserRemoteDataSource: Send + Sync {
    async fn get_users(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        status: Option<&str>,
    ) -> ApiResponse<Vec<UserGetItem>>;

    async fn get_user_by_id(&self, user_id: &str) -> ApiResponse<UserGetResponse>;

    async fn create_user(&self, request: &UserPostRequest) -> ApiResponse<UserPostResponse>;

    async fn update_user_by_id(
        &self,
        user_id: &str,
        request: &UserPutRequest,
    ) -> ApiResponse<UserPutResponse>;

    async fn update_user_status(
        &self,
        user_id: &str,
        request: &UserPatchRequest,
    ) -> ApiResponse<UserPatchResponse>;

    async fn search_users(
        &self,
        query: Option<&str>,
        field: Option<&str>,
    ) -> ApiResponse<Vec<UserGetItem>>;

    async fn validate_user_email(
        &self,
        request: &UserPostRequest,
    ) -> ApiResponse<UserPostResponse>;
}

/// `UserRemoteDataSource` backed by an `HttpService`.
#[derive(Debug, Clone)]
pub struct RemoteUserDataSource<S> {
    service: S,
    api: UsersApi,
}

type Parser<T> = fn(&UsersApi, &str) -> Result<T, ApiError>;

impl<S: HttpService> RemoteUserDataSource<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            api: UsersApi::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        request: Result<HttpRequest, ApiError>,
        parse: Parser<T>,
    ) -> ApiResponse<T> {
        match self.exchange(operation, request, parse).await {
            Ok(dto) => ApiResponse::Success(dto),
            Err(err) => {
                warn!(operation, error = %err, "users API call failed");
                err.into()
            }
        }
    }

    async fn exchange<T>(
        &self,
        operation: &'static str,
        request: Result<HttpRequest, ApiError>,
        parse: Parser<T>,
    ) -> Result<T, ApiError> {
        let request = request?;
        debug!(
            operation,
            method = request.method.as_str(),
            path = %request.path,
            "sending users API request"
        );
        let body = self.service.send(request).await?;
        parse(&self.api, &body)
    }
}

#[async_trait]
impl<S: HttpService> UserRemoteDataSource for RemoteUserDataSource<S> {
    async fn get_users(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        status: Option<&str>,
    ) -> ApiResponse<Vec<UserGetItem>> {
        let request = self.api.build_get_users(page, page_size, status);
        self.call("get_users", Ok(request), UsersApi::parse_get_users)
            .await
    }

    async fn get_user_by_id(&self, user_id: &str) -> ApiResponse<UserGetResponse> {
        let request = self.api.build_get_user_by_id(user_id);
        self.call("get_user_by_id", Ok(request), UsersApi::parse_get_user_by_id)
            .await
    }

    async fn create_user(&self, request: &UserPostRequest) -> ApiResponse<UserPostResponse> {
        let request = self.api.build_create_user(request);
        self.call("create_user", request, UsersApi::parse_create_user)
            .await
    }

    async fn update_user_by_id(
        &self,
        user_id: &str,
        request: &UserPutRequest,
    ) -> ApiResponse<UserPutResponse> {
        let request = self.api.build_update_user_by_id(user_id, request);
        self.call("update_user_by_id", request, UsersApi::parse_update_user_by_id)
            .await
    }

    async fn update_user_status(
        &self,
        user_id: &str,
        request: &UserPatchRequest,
    ) -> ApiResponse<UserPatchResponse> {
        let request = self.api.build_update_user_status(user_id, request);
        self.call("update_user_status", request, UsersApi::parse_update_user_status)
            .await
    }

    async fn search_users(
        &self,
        query: Option<&str>,
        field: Option<&str>,
    ) -> ApiResponse<Vec<UserGetItem>> {
        let request = self.api.build_search_users(query, field);
        self.call("search_users", Ok(request), UsersApi::parse_search_users)
            .await
    }

    async fn validate_user_email(
        &self,
        request: &UserPostRequest,
    ) -> ApiResponse<UserPostResponse> {
        let request = self.api.build_validate_user_email(request);
        self.call("validate_user_email", request, UsersApi::parse_validate_user_email)
            .await
    }
}
