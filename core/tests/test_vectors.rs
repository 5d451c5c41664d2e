//! Run every repository operation against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file describes the operation inputs, the request the data
//! source must send, a simulated response, and the expected domain outcome.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::{json, Value};
use users_core::{
    ApiError, DomainResult, HttpRequest, HttpResponse, HttpService, RemoteUserDataSource,
    RemoteUserRepository, User, UserPatchRequest, UserPostRequest, UserPutRequest, UserRepository,
};

/// Answers every request with the vector's simulated response.
struct VectorService {
    response: HttpResponse,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

#[async_trait]
impl HttpService for VectorService {
    async fn send(&self, request: HttpRequest) -> Result<String, ApiError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone().into_body()?)
    }
}

struct Harness {
    repository: RemoteUserRepository<RemoteUserDataSource<VectorService>>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

fn harness(case: &Value) -> Harness {
    let sim = &case["simulated_response"];
    let seen = Arc::new(Mutex::new(Vec::new()));
    let service = VectorService {
        response: HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        },
        seen: Arc::clone(&seen),
    };
    Harness {
        repository: RemoteUserRepository::new(RemoteUserDataSource::new(service)),
        seen,
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn opt_str(value: &Value) -> Option<&str> {
    value.as_str()
}

fn opt_u32(value: &Value) -> Option<u32> {
    value.as_u64().map(|v| v as u32)
}

fn user_json(user: &User) -> Value {
    json!({
        "id": user.id.as_str(),
        "username": user.username,
        "email": user.email,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "phoneNumber": user.phone_number,
        "createdAt": user.created_at.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        "updatedAt": user.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        "status": user.status.as_str(),
        "preferences": Value::Object(user.preferences.clone()),
    })
}

fn users_json(users: &Vec<User>) -> Value {
    Value::Array(users.iter().map(user_json).collect())
}

fn check_request(name: &str, case: &Value, harness: &Harness) {
    let seen = harness.seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "{name}: exactly one request");
    let req = &seen[0];
    let expected = &case["expected_request"];

    assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
    assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");

    let expected_query: Vec<(String, String)> = expected["query"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.query, expected_query, "{name}: query");

    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
        body => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
    }
}

fn check_outcome<T>(name: &str, case: &Value, result: DomainResult<T>, to_json: fn(&T) -> Value) {
    if let Some(expected) = case.get("expected_result") {
        match result {
            DomainResult::Success(data) => assert_eq!(&to_json(&data), expected, "{name}: result"),
            DomainResult::Error { message, .. } => panic!("{name}: unexpected error {message}"),
        }
    } else if let Some(expected) = case.get("expected_error") {
        match result {
            DomainResult::Success(_) => panic!("{name}: expected an error"),
            DomainResult::Error {
                message,
                message_title,
                icon_code,
            } => {
                assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(
                    message_title.as_deref(),
                    opt_str(&expected["messageTitle"]),
                    "{name}: messageTitle"
                );
                assert_eq!(icon_code.as_deref(), opt_str(&expected["iconCode"]), "{name}: iconCode");
            }
        }
    } else {
        let needle = case["expected_error_contains"].as_str().unwrap();
        let message = result.message().unwrap_or_else(|| panic!("{name}: expected an error"));
        assert!(message.contains(needle), "{name}: `{message}` lacks `{needle}`");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_test_vectors() {
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let h = harness(&case);

        let result = h
            .repository
            .get_users(
                opt_u32(&input["page"]),
                opt_u32(&input["pageSize"]),
                opt_str(&input["status"]),
            )
            .await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, users_json);
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_test_vectors() {
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let h = harness(&case);

        let result = h
            .repository
            .get_user_by_id(case["input"]["userId"].as_str().unwrap())
            .await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, user_json);
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_test_vectors() {
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: UserPostRequest = serde_json::from_value(case["input"].clone()).unwrap();
        let h = harness(&case);

        let result = h.repository.create_user(&input).await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, user_json);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_test_vectors() {
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let input: UserPutRequest = serde_json::from_value(case["input"]["request"].clone()).unwrap();
        let h = harness(&case);

        let result = h
            .repository
            .update_user_by_id(case["input"]["userId"].as_str().unwrap(), &input)
            .await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, user_json);
    }
}

#[tokio::test]
async fn update_status_test_vectors() {
    for case in load(include_str!("../../test-vectors/update_status.json")) {
        let name = case["name"].as_str().unwrap();
        let input: UserPatchRequest =
            serde_json::from_value(case["input"]["request"].clone()).unwrap();
        let h = harness(&case);

        let result = h
            .repository
            .update_user_status(case["input"]["userId"].as_str().unwrap(), &input)
            .await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, user_json);
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_test_vectors() {
    for case in load(include_str!("../../test-vectors/search.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let h = harness(&case);

        let result = h
            .repository
            .search_users(opt_str(&input["query"]), opt_str(&input["field"]))
            .await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, users_json);
    }
}

// ---------------------------------------------------------------------------
// Validate email
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_email_test_vectors() {
    for case in load(include_str!("../../test-vectors/validate_email.json")) {
        let name = case["name"].as_str().unwrap();
        let input: UserPostRequest = serde_json::from_value(case["input"].clone()).unwrap();
        let h = harness(&case);

        let result = h.repository.validate_user_email(&input).await;

        check_request(name, &case, &h);
        check_outcome(name, &case, result, user_json);
    }
}
