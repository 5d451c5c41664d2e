use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: usize = 20;
const STATUSES: [&str; 4] = ["active", "inactive", "suspended", "pending"];
const SEARCH_FIELDS: [&str; 4] = ["username", "email", "firstName", "lastName"];

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub status: String,
    pub preferences: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatus {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub field: Option<String>,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub message_title: String,
    pub icon_code: String,
}

pub struct ApiFailure {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiFailure {
    fn new(status: StatusCode, title: &str, icon: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                message_title: title.to_string(),
                icon_code: icon.to_string(),
            },
        }
    }

    fn not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found", "not_found", format!("user {id} not found"))
    }

    fn conflict(email: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "Conflict",
            "error",
            format!("email {email} is already registered"),
        )
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation", "warning", message)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub type Db = Arc<RwLock<Vec<User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/search", get(search_users))
        .route("/users/validate-email", post(validate_email))
        .route("/users/{user_id}", get(get_user).put(update_user))
        .route("/users/{user_id}/status", patch(update_status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn item_view(user: &User) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "createdAt": user.created_at,
        "updatedAt": user.updated_at,
        "status": user.status,
    })
}

fn post_view(user: &User) -> Value {
    let mut view = item_view(user);
    view["phoneNumber"] = json!(user.phone_number);
    view
}

fn put_view(user: &User) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "phoneNumber": user.phone_number,
        "updatedAt": user.updated_at,
    })
}

fn patch_view(user: &User) -> Value {
    let mut view = put_view(user);
    view["status"] = json!(user.status);
    view
}

fn validate_email_format(email: &str) -> Result<(), ApiFailure> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ApiFailure::invalid(format!("{email} is not a valid email address"))),
    }
}

fn validate_new_user(input: &CreateUser) -> Result<(), ApiFailure> {
    if input.username.trim().is_empty() {
        return Err(ApiFailure::invalid("username must not be empty"));
    }
    validate_email_format(&input.email)
}

fn email_taken(users: &[User], email: &str, except: Option<&str>) -> bool {
    users
        .iter()
        .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id.as_str()) != except)
}

async fn list_users(
    State(db): State<Db>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Value>>, ApiFailure> {
    if let Some(status) = params.status.as_deref() {
        if !STATUSES.contains(&status) {
            return Err(ApiFailure::invalid(format!("unknown status {status}")));
        }
    }
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let users = db.read().await;
    Ok(Json(
        users
            .iter()
            .filter(|u| params.status.as_deref().map_or(true, |s| u.status == s))
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .map(item_view)
            .collect(),
    ))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    validate_new_user(&input)?;
    let mut users = db.write().await;
    if email_taken(&users, &input.email, None) {
        return Err(ApiFailure::conflict(&input.email));
    }
    let timestamp = now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone_number: input.phone_number,
        created_at: timestamp.clone(),
        updated_at: timestamp,
        status: "active".to_string(),
        preferences: json!({}),
    };
    let view = post_view(&user);
    users.push(user);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_user(
    State(db): State<Db>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiFailure> {
    let users = db.read().await;
    users
        .iter()
        .find(|u| u.id == user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(&user_id))
}

async fn update_user(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<Value>, ApiFailure> {
    let mut users = db.write().await;
    if let Some(email) = input.email.as_deref() {
        validate_email_format(email)?;
        if email_taken(&users, email, Some(user_id.as_str())) {
            return Err(ApiFailure::conflict(email));
        }
    }
    let user = users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| ApiFailure::not_found(&user_id))?;
    if let Some(username) = input.username {
        user.username = username;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(first_name) = input.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = input.last_name {
        user.last_name = last_name;
    }
    if let Some(phone_number) = input.phone_number {
        user.phone_number = Some(phone_number);
    }
    user.updated_at = now();
    Ok(Json(put_view(user)))
}

async fn update_status(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateStatus>,
) -> Result<Json<Value>, ApiFailure> {
    if !STATUSES.contains(&input.status.as_str()) {
        return Err(ApiFailure::invalid(format!("unknown status {}", input.status)));
    }
    let mut users = db.write().await;
    let user = users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| ApiFailure::not_found(&user_id))?;
    user.status = input.status;
    user.updated_at = now();
    Ok(Json(patch_view(user)))
}

async fn search_users(
    State(db): State<Db>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Value>>, ApiFailure> {
    let fields: Vec<&str> = match params.field.as_deref() {
        Some(field) if SEARCH_FIELDS.contains(&field) => vec![field],
        Some(field) => return Err(ApiFailure::invalid(format!("cannot search by {field}"))),
        None => SEARCH_FIELDS.to_vec(),
    };
    let needle = params.query.unwrap_or_default().to_lowercase();
    let users = db.read().await;
    Ok(Json(
        users
            .iter()
            .filter(|u| {
                fields.iter().any(|field| {
                    let value = match *field {
                        "username" => &u.username,
                        "email" => &u.email,
                        "firstName" => &u.first_name,
                        _ => &u.last_name,
                    };
                    value.to_lowercase().contains(&needle)
                })
            })
            .map(item_view)
            .collect(),
    ))
}

/// Check an email against the store without creating a user. Echoes the
/// candidate in the create-response shape.
async fn validate_email(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<Json<Value>, ApiFailure> {
    validate_new_user(&input)?;
    let users = db.read().await;
    if email_taken(&users, &input.email, None) {
        return Err(ApiFailure::conflict(&input.email));
    }
    let timestamp = now();
    let candidate = User {
        id: Uuid::new_v4().to_string(),
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone_number: input.phone_number,
        created_at: timestamp.clone(),
        updated_at: timestamp,
        status: "pending".to_string(),
        preferences: json!({}),
    };
    Ok(Json(post_view(&candidate)))
}
