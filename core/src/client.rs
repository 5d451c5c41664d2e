//! Stateless HTTP request builder and response parser for the users API.
//!
//! # Design
//! `UsersApi` carries no state. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that decodes
//! a raw response body into the operation's DTO. The remote data source sits
//! between the two and owns the actual round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dto::{
    UserGetItem, UserGetResponse, UserPatchRequest, UserPatchResponse, UserPostRequest,
    UserPostResponse, UserPutRequest, UserPutResponse,
};
use crate::endpoint::{self, resolve_path};
use crate::error::ApiError;
use crate::http::{query_params, HttpMethod, HttpRequest};

/// Request builder and response parser for the users resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsersApi;

impl UsersApi {
    pub fn new() -> Self {
        Self
    }

    pub fn build_get_users(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        status: Option<&str>,
    ) -> HttpRequest {
        get(
            endpoint::GET_USERS.to_string(),
            query_params(&[
                ("page", page.map(|v| v.to_string())),
                ("pageSize", page_size.map(|v| v.to_string())),
                ("status", status.map(str::to_string)),
            ]),
        )
    }

    pub fn build_get_user_by_id(&self, user_id: &str) -> HttpRequest {
        get(
            resolve_path(endpoint::GET_USERS_USERID, &[("userId", user_id)]),
            Vec::new(),
        )
    }

    pub fn build_create_user(&self, input: &UserPostRequest) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Post, endpoint::POST_USERS.to_string(), input)
    }

    pub fn build_update_user_by_id(
        &self,
        user_id: &str,
        input: &UserPutRequest,
    ) -> Result<HttpRequest, ApiError> {
        with_json_body(
            HttpMethod::Put,
            resolve_path(endpoint::PUT_USERS_USERID, &[("userId", user_id)]),
            input,
        )
    }

    pub fn build_update_user_status(
        &self,
        user_id: &str,
        input: &UserPatchRequest,
    ) -> Result<HttpRequest, ApiError> {
        with_json_body(
            HttpMethod::Patch,
            resolve_path(endpoint::PATCH_USERS_USERID_STATUS, &[("userId", user_id)]),
            input,
        )
    }

    pub fn build_search_users(&self, query: Option<&str>, field: Option<&str>) -> HttpRequest {
        get(
            endpoint::GET_USERS_SEARCH.to_string(),
            query_params(&[("query", query), ("field", field)]),
        )
    }

    pub fn build_validate_user_email(
        &self,
        input: &UserPostRequest,
    ) -> Result<HttpRequest, ApiError> {
        with_json_body(
            HttpMethod::Post,
            endpoint::POST_USERS_VALIDATE_EMAIL.to_string(),
            input,
        )
    }

    pub fn parse_get_users(&self, body: &str) -> Result<Vec<UserGetItem>, ApiError> {
        decode(body)
    }

    pub fn parse_get_user_by_id(&self, body: &str) -> Result<UserGetResponse, ApiError> {
        decode(body)
    }

    pub fn parse_create_user(&self, body: &str) -> Result<UserPostResponse, ApiError> {
        decode(body)
    }

    pub fn parse_update_user_by_id(&self, body: &str) -> Result<UserPutResponse, ApiError> {
        decode(body)
    }

    pub fn parse_update_user_status(&self, body: &str) -> Result<UserPatchResponse, ApiError> {
        decode(body)
    }

    pub fn parse_search_users(&self, body: &str) -> Result<Vec<UserGetItem>, ApiError> {
        decode(body)
    }

    pub fn parse_validate_user_email(&self, body: &str) -> Result<UserPostResponse, ApiError> {
        decode(body)
    }
}

fn get(path: String, query: Vec<(String, String)>) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path,
        query,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json_body<B: Serialize>(
    method: HttpMethod,
    path: String,
    input: &B,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        query: Vec::new(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
