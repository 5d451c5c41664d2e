//! Client pipeline for the users REST resource.
//!
//! # Overview
//! Three stages turn an HTTP exchange into a value callers can use:
//! - `RemoteUserDataSource` builds the request, runs it through an
//!   `HttpService`, and decodes the body into a response DTO, reporting every
//!   outcome as an `ApiResponse`.
//! - The mappers convert each response DTO into the `User` domain model.
//! - `RemoteUserRepository` combines the two and returns a `DomainResult`,
//!   flattening every failure into a single error shape.
//!
//! # Design
//! - The transport is a trait; the crate performs no network I/O of its own.
//! - `UsersApi` is stateless and split into `build_*` / `parse_*` so request
//!   shapes and body decoding are testable without a transport.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod datasource;
pub mod dto;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod mapper;
pub mod model;
pub mod repository;
pub mod result;

pub use client::UsersApi;
pub use config::ClientConfig;
pub use datasource::{RemoteUserDataSource, UserRemoteDataSource};
pub use dto::{
    ErrorDetail, UserGetItem, UserGetResponse, UserPatchRequest, UserPatchResponse,
    UserPostRequest, UserPostResponse, UserPutRequest, UserPutResponse,
};
pub use error::{ApiError, HttpError, MappingError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpService};
pub use model::{User, UserId, UserStatus};
pub use repository::{RemoteUserRepository, UserRepository};
pub use result::{ApiResponse, DomainResult};
