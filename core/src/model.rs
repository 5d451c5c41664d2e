//! Domain model for users.
//!
//! A `User` is only ever produced by the mappers in [`crate::mapper`]; callers
//! receive it as an immutable value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::MappingError;

/// Opaque, server-assigned user identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, MappingError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(MappingError::new("id", "user id must not be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
    Pending,
    /// The response this user was mapped from did not carry a status.
    Unknown,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
            UserStatus::Pending => "pending",
            UserStatus::Unknown => "unknown",
        }
    }
}

impl FromStr for UserStatus {
    type Err = MappingError;

    /// Parses the wire value. `"unknown"` is not a wire value and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            "pending" => Ok(UserStatus::Pending),
            _ => Err(MappingError::new(
                "status",
                format!("unrecognized status `{s}`"),
            )),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as seen by callers of the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `None` when the source response does not carry a phone number.
    pub phone_number: Option<String>,
    /// `None` when the source response does not carry a creation time.
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub status: UserStatus,
    /// Free-form preferences; empty when the source response has none.
    pub preferences: Map<String, Value>,
}
