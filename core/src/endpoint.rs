//! Path templates for the users resource.
//!
//! Templates are relative to the service base URL; `{name}` marks a path
//! parameter filled in by [`resolve_path`].

pub const GET_USERS: &str = "users";
pub const GET_USERS_USERID: &str = "users/{userId}";
pub const POST_USERS: &str = "users";
pub const PUT_USERS_USERID: &str = "users/{userId}";
pub const PATCH_USERS_USERID_STATUS: &str = "users/{userId}/status";
pub const GET_USERS_SEARCH: &str = "users/search";
pub const POST_USERS_VALIDATE_EMAIL: &str = "users/validate-email";

/// Substitute `{name}` placeholders in `template` with percent-encoded
/// values. Each value fills exactly one path segment. Placeholders without a
/// matching parameter are left as they are.
pub fn resolve_path(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_string(), |path, (name, value)| {
        path.replace(&format!("{{{name}}}"), &urlencoding::encode(value))
    })
}
