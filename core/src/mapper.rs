//! Response DTO to `User` conversions.
//!
//! Every response DTO maps onto the full `User`. Fields a DTO variant does
//! not carry take a fixed value:
//!
//! | missing field | value                 |
//! |---------------|-----------------------|
//! | phoneNumber   | `None`                |
//! | createdAt     | `None`                |
//! | status        | `UserStatus::Unknown` |
//! | preferences   | empty map             |
//!
//! A `null` or empty `phoneNumber` counts as missing, as does a `null`
//! `preferences`.
//!
//! Fields that are present but malformed fail the whole conversion with a
//! `MappingError`; no partially populated `User` is ever returned.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::dto::{UserGetItem, UserGetResponse, UserPatchResponse, UserPostResponse, UserPutResponse};
use crate::error::MappingError;
use crate::model::{User, UserId, UserStatus};

fn timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, MappingError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| MappingError::new(field, format!("`{raw}` is not an RFC 3339 timestamp: {e}")))
}

fn phone_number(raw: Option<String>) -> Option<String> {
    raw.filter(|phone| !phone.is_empty())
}

fn preferences(raw: Value) -> Result<Map<String, Value>, MappingError> {
    match raw {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(MappingError::new(
            "preferences",
            format!("expected an object, got `{other}`"),
        )),
    }
}

impl TryFrom<UserGetResponse> for User {
    type Error = MappingError;

    fn try_from(dto: UserGetResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(dto.id)?,
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: phone_number(dto.phone_number),
            created_at: Some(timestamp("createdAt", &dto.created_at)?),
            updated_at: timestamp("updatedAt", &dto.updated_at)?,
            status: dto.status.parse()?,
            preferences: preferences(dto.preferences)?,
        })
    }
}

impl TryFrom<UserGetItem> for User {
    type Error = MappingError;

    fn try_from(dto: UserGetItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(dto.id)?,
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: None,
            created_at: Some(timestamp("createdAt", &dto.created_at)?),
            updated_at: timestamp("updatedAt", &dto.updated_at)?,
            status: dto.status.parse()?,
            preferences: Map::new(),
        })
    }
}

impl TryFrom<UserPostResponse> for User {
    type Error = MappingError;

    fn try_from(dto: UserPostResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(dto.id)?,
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: phone_number(dto.phone_number),
            created_at: Some(timestamp("createdAt", &dto.created_at)?),
            updated_at: timestamp("updatedAt", &dto.updated_at)?,
            status: dto.status.parse()?,
            preferences: Map::new(),
        })
    }
}

impl TryFrom<UserPutResponse> for User {
    type Error = MappingError;

    fn try_from(dto: UserPutResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(dto.id)?,
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: phone_number(dto.phone_number),
            created_at: None,
            updated_at: timestamp("updatedAt", &dto.updated_at)?,
            status: UserStatus::Unknown,
            preferences: Map::new(),
        })
    }
}

impl TryFrom<UserPatchResponse> for User {
    type Error = MappingError;

    fn try_from(dto: UserPatchResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(dto.id)?,
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: phone_number(dto.phone_number),
            created_at: None,
            updated_at: timestamp("updatedAt", &dto.updated_at)?,
            status: dto.status.parse()?,
            preferences: Map::new(),
        })
    }
}

/// Map every element of a list response; the first failure aborts.
pub fn map_all<D>(dtos: Vec<D>) -> Result<Vec<User>, MappingError>
where
    User: TryFrom<D, Error = MappingError>,
{
    dtos.into_iter().map(User::try_from).collect()
}
