//! Integration tests for the API client against a stub backend
//!
//! Each test starts an in-process axum server that answers scripted
//! responses per `METHOD path` and records every request it sees, then
//! drives the client, repositories and session manager against it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use api::models::EntityId;
use api::models::consignment::ConsignmentStatus;
use api::models::product::ProductPayload;
use api::models::transaction::TransactionType;
use api::models::user::UserPayload;
use api::{
    ApiClient, ApiError, Cart, ListFilters, RequestOptions, Services, SessionManager,
    UnauthorizedHook,
};
use auth::{FeatureArea, Permission};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use chrono::Utc;
use common::preferences::{ThemeStore, ThemeUpdate};
use common::storage::{KeyValueStore, MemoryStore, USER_KEY};
use common::token::TokenStore;
use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use serde_json::{Value, json};

const BASE_PATH: &str = "/api/management-service";

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Request as seen by the stub backend
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    uri: String,
    authorization: Option<String>,
    content_type: Option<String>,
    trace: Option<String>,
    body: String,
}

impl Seen {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Stub {
    responses: Mutex<HashMap<String, (u16, String)>>,
    seen: Mutex<Vec<Seen>>,
}

impl Stub {
    fn respond(&self, route: &str, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(route.to_string(), (status, body.into()));
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn last(&self) -> Seen {
        self.seen().pop().expect("no request reached the stub")
    }
}

async fn answer(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let path = uri.path().trim_start_matches(BASE_PATH).to_string();
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.clone(),
    };

    stub.seen.lock().unwrap().push(Seen {
        method: method.to_string(),
        uri: path_and_query,
        authorization: header("authorization"),
        content_type: header("content-type"),
        trace: header("x-trace"),
        body,
    });

    let route = format!("{} {}", method, path);
    let (status, body) = stub
        .responses
        .lock()
        .unwrap()
        .get(&route)
        .cloned()
        .unwrap_or((404, String::new()));

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

async fn start_stub() -> Result<(Arc<Stub>, SocketAddr), Box<dyn std::error::Error>> {
    let stub = Arc::new(Stub::default());
    let app = Router::new().fallback(answer).with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((stub, addr))
}

struct Harness {
    stub: Arc<Stub>,
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    hook_calls: Arc<AtomicUsize>,
}

async fn harness() -> Result<Harness, Box<dyn std::error::Error>> {
    let (stub, addr) = start_stub().await?;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let tokens = TokenStore::new(store.clone())?;

    let hook_calls = Arc::new(AtomicUsize::new(0));
    let hook: UnauthorizedHook = {
        let hook_calls = hook_calls.clone();
        Arc::new(move || {
            hook_calls.fetch_add(1, Ordering::SeqCst);
        })
    };

    let client = ApiClient::new(format!("http://{}{}/", addr, BASE_PATH), tokens, hook)?;

    Ok(Harness {
        stub,
        client,
        store,
        hook_calls,
    })
}

fn mint_token(claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .expect("token encodes")
}

#[tokio::test]
async fn test_bearer_header_only_with_token() -> TestResult {
    let h = harness().await?;
    h.stub.respond("GET /categories", 200, r#"[{"id": 1, "name": "Spices"}]"#);

    h.client.request("/categories", RequestOptions::get()).await?;
    let seen = h.stub.last();
    assert_eq!(seen.authorization, None);
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));

    h.client.tokens().set(Some("abc.def.ghi"))?;
    h.client.request("/categories", RequestOptions::get()).await?;
    assert_eq!(
        h.stub.last().authorization.as_deref(),
        Some("Bearer abc.def.ghi")
    );

    Ok(())
}

#[tokio::test]
async fn test_caller_headers_override_defaults() -> TestResult {
    let h = harness().await?;
    h.stub.respond("GET /products", 200, "[]");

    let options = RequestOptions::get()
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .with_header(
            HeaderName::from_static("x-trace"),
            HeaderValue::from_static("req-1"),
        );
    h.client.request("/products", options).await?;

    let seen = h.stub.last();
    assert_eq!(seen.content_type.as_deref(), Some("text/plain"));
    assert_eq!(seen.trace.as_deref(), Some("req-1"));

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_fires_hook() -> TestResult {
    let h = harness().await?;
    h.stub.respond("GET /users", 401, r#"{"message": "Token expired"}"#);
    h.client.tokens().set(Some("stale"))?;

    let services = Services::new(h.client.clone());
    let err = services
        .users
        .list(&ListFilters::new())
        .await
        .expect_err("401 must fail");

    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(401));
    assert!(!h.client.tokens().is_present());
    assert_eq!(h.store.get("token")?, None);
    assert_eq!(h.hook_calls.load(Ordering::SeqCst), 1);

    // the next call goes out unauthenticated
    h.stub.respond("GET /users", 200, "[]");
    services.users.list(&ListFilters::new()).await?;
    assert_eq!(h.stub.last().authorization, None);
    assert_eq!(h.hook_calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_write_clears_token_and_fires_hook() -> TestResult {
    let h = harness().await?;
    h.stub.respond("POST /products", 401, "");
    h.client.tokens().set(Some("stale"))?;

    let payload = ProductPayload {
        name: "Star anise".to_string(),
        sku: Some("SP-010".to_string()),
        category: None,
        description: None,
        price: 4.5,
        cost: None,
        stock: Some(12),
        active: true,
    };
    let err = Services::new(h.client.clone())
        .products
        .create(&payload)
        .await
        .expect_err("401 must fail");

    assert!(err.is_unauthorized());
    assert_eq!(h.stub.last().authorization.as_deref(), Some("Bearer stale"));
    assert!(!h.client.tokens().is_present());
    assert_eq!(h.store.get("token")?, None);
    assert_eq!(h.hook_calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_success_body_is_no_payload() -> TestResult {
    let h = harness().await?;
    h.stub.respond("DELETE /products/7", 204, "");
    h.stub.respond("POST /categories", 200, "");

    let payload = h
        .client
        .request("/products/7", RequestOptions::delete())
        .await?;
    assert!(payload.is_none());

    let services = Services::new(h.client.clone());
    services.products.delete(&EntityId::Number(7)).await?;

    let created = services
        .categories
        .create(&api::models::category::CategoryPayload {
            name: "Teas".to_string(),
            description: None,
        })
        .await?;
    assert!(created.is_none());

    Ok(())
}

#[tokio::test]
async fn test_failure_messages() -> TestResult {
    let h = harness().await?;
    h.stub.respond(
        "POST /products",
        409,
        r#"{"message": "SKU already exists", "status": 409}"#,
    );
    h.stub.respond("GET /sales", 502, "Bad Gateway from upstream");
    h.stub.respond("GET /accounting/transactions", 500, r#"{"error": "boom"}"#);

    let services = Services::new(h.client.clone());

    let err = services
        .products
        .create(&api::models::product::ProductPayload {
            name: "Pepper".to_string(),
            sku: Some("PEP-1".to_string()),
            category: None,
            description: None,
            price: 10.0,
            cost: None,
            stock: Some(5),
            active: true,
        })
        .await
        .expect_err("409 must fail");
    assert!(matches!(&err, ApiError::Request { status: 409, .. }));
    assert_eq!(err.to_string(), "SKU already exists");

    let err = services
        .sales
        .list(&ListFilters::new())
        .await
        .expect_err("502 must fail");
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Bad Gateway from upstream");

    let err = services
        .transactions
        .list(&ListFilters::new())
        .await
        .expect_err("500 must fail");
    assert_eq!(err.to_string(), "Request failed");

    assert_eq!(h.hook_calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_list_filters_reach_the_backend() -> TestResult {
    let h = harness().await?;
    h.stub.respond(
        "GET /consignments",
        200,
        json!({
            "content": [
                { "id": 3, "status": "RECEIVED", "value": 120.0 },
                { "id": 4, "status": "LOST_AT_SEA" }
            ],
            "totalElements": 57
        })
        .to_string(),
    );

    let services = Services::new(h.client.clone());
    let filters = ListFilters::recent_first(10)
        .filter("status", Some("RECEIVED"))
        .filter("supplier", None::<&str>)
        .filter("search", Some(""));
    let page = services.consignments.list(&filters).await?;

    assert_eq!(
        h.stub.last().uri,
        "/consignments?page=1&size=10&sortBy=createdAt&sortOrder=DESC&status=RECEIVED"
    );
    assert_eq!(page.total, 57);
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[1].status, ConsignmentStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn test_bare_array_page_counts_items() -> TestResult {
    let h = harness().await?;
    h.stub.respond(
        "GET /configurations/countries",
        200,
        r#"[{"id": 1, "name": "Cameroon", "code": "CM"}, {"name": "Ghana", "code": "GH"}]"#,
    );

    let page = Services::new(h.client.clone())
        .countries
        .list(&ListFilters::new())
        .await?;
    assert_eq!(page.total, 2);
    assert_eq!(h.stub.last().uri, "/configurations/countries");

    Ok(())
}

#[tokio::test]
async fn test_consignment_status_update() -> TestResult {
    let h = harness().await?;
    h.stub.respond(
        "PUT /consignments/9/status",
        200,
        r#"{"id": 9, "status": "EXPORTED"}"#,
    );

    let updated = Services::new(h.client.clone())
        .consignments
        .update_status(&EntityId::Number(9), ConsignmentStatus::Exported)
        .await?
        .expect("backend returned the consignment");

    let seen = h.stub.last();
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.json(), json!({ "status": "EXPORTED" }));
    assert_eq!(updated.status, ConsignmentStatus::Exported);

    Ok(())
}

#[tokio::test]
async fn test_consignment_status_acknowledged_without_body_model() -> TestResult {
    let h = harness().await?;
    h.stub.respond(
        "PUT /consignments/7/status",
        200,
        r#"{"message": "Status updated"}"#,
    );

    let updated = Services::new(h.client.clone())
        .consignments
        .update_status(&EntityId::Number(7), ConsignmentStatus::Processing)
        .await?;

    assert!(updated.is_none());
    assert_eq!(h.stub.last().json(), json!({ "status": "PROCESSING" }));

    Ok(())
}

fn user_payload(username: &str, email: &str, password: Option<&str>) -> UserPayload {
    UserPayload {
        name: Some("Store Clerk".to_string()),
        username: username.to_string(),
        email: email.to_string(),
        password: password.map(str::to_string),
        role: "USER".to_string(),
        permissions: vec![Permission::SalesView],
        active: true,
    }
}

#[tokio::test]
async fn test_invalid_user_payload_is_not_sent() -> TestResult {
    let h = harness().await?;
    let users = Services::new(h.client.clone()).users;

    let err = users
        .create(&user_payload("clerk", "not-an-email", Some("pw")))
        .await
        .expect_err("malformed email is rejected");
    assert!(matches!(err, ApiError::Auth(_)));

    let err = users
        .create(&user_payload("clerk", "clerk@example.com", None))
        .await
        .expect_err("new accounts need a password");
    assert_eq!(err.to_string(), "Password is required");

    assert!(h.stub.seen().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_user_update_accepts_backend_usernames() -> TestResult {
    let h = harness().await?;
    h.stub.respond("PUT /users/3", 200, r#"{"message": "User updated"}"#);
    h.stub.respond("PUT /users/4", 200, r#"{"message": "User updated"}"#);
    let users = Services::new(h.client.clone()).users;

    users
        .update(&EntityId::Number(3), &user_payload("john.doe", "john@example.com", None))
        .await?;
    users
        .update(&EntityId::Number(4), &user_payload("al", "al@example.com", None))
        .await?;

    let seen = h.stub.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].json()["username"], json!("john.doe"));
    assert!(seen[0].json().get("password").is_none());
    assert_eq!(seen[1].json()["username"], json!("al"));

    Ok(())
}

#[tokio::test]
async fn test_login_restore_logout() -> TestResult {
    let h = harness().await?;
    let token = mint_token(&json!({
        "sub": "alice",
        "type": "MANAGER",
        "permissions": ["SALES_VIEW", "VIEW_PRODUCT"],
        "identifier": 42,
        "iat": 1_700_000_000u64,
        "exp": 1_700_003_600u64
    }));
    h.stub.respond(
        "POST /auth/login",
        200,
        json!({ "token": token, "expiresIn": 3600 }).to_string(),
    );

    let sessions = SessionManager::new(h.client.clone(), h.store.clone());
    let outcome = sessions.login("alice", "correct horse").await?;

    let seen = h.stub.last();
    assert_eq!(seen.uri, "/auth/login");
    assert_eq!(
        seen.json(),
        json!({ "username": "alice", "password": "correct horse" })
    );
    assert_eq!(seen.authorization, None);

    assert_eq!(outcome.expires_in, Some(3600));
    assert_eq!(outcome.session.username, "alice");
    assert_eq!(outcome.session.role, "MANAGER");
    assert_eq!(outcome.session.subject_id.as_deref(), Some("42"));
    assert_eq!(h.client.tokens().get(), Some(token.clone()));
    assert!(h.store.get(USER_KEY)?.is_some());

    assert!(sessions.has_permission(&Permission::SalesView));
    assert!(!sessions.has_permission(&Permission::UsersView));
    assert_eq!(
        sessions.visible_areas(),
        vec![FeatureArea::Sales, FeatureArea::Products]
    );

    // a fresh manager over the same state picks the session up again
    let restored = SessionManager::new(h.client.clone(), h.store.clone());
    assert_eq!(restored.restore()?, Some(outcome.session.clone()));

    ThemeStore::new(h.store.clone()).update(ThemeUpdate {
        company_name: Some("Spice Route".to_string()),
        ..Default::default()
    })?;

    restored.logout()?;
    assert!(restored.current().is_none());
    assert!(!h.client.tokens().is_present());
    assert_eq!(h.store.get(USER_KEY)?, None);
    assert_eq!(
        ThemeStore::new(h.store.clone()).load()?.company_name,
        "Spice Route"
    );

    Ok(())
}

#[tokio::test]
async fn test_login_with_undecodable_token_forces_relogin() -> TestResult {
    let h = harness().await?;
    h.stub.respond("POST /auth/login", 200, r#"{"token": "not-a-jwt"}"#);

    let sessions = SessionManager::new(h.client.clone(), h.store.clone());
    let err = sessions
        .login("alice", "correct horse")
        .await
        .expect_err("token does not decode");

    assert!(matches!(err, ApiError::Auth(_)));
    assert!(sessions.current().is_none());
    assert!(!h.client.tokens().is_present());
    assert_eq!(h.store.get(USER_KEY)?, None);

    Ok(())
}

#[tokio::test]
async fn test_login_requires_both_fields() -> TestResult {
    let h = harness().await?;
    let sessions = SessionManager::new(h.client.clone(), h.store.clone());

    let err = sessions.login("alice", "").await.expect_err("no password");
    assert_eq!(err.to_string(), "Please enter your password");
    assert!(h.stub.seen().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_ends_live_session() -> TestResult {
    let h = harness().await?;
    let token = mint_token(&json!({ "sub": "bob", "permissions": ["ADMIN"] }));
    h.stub.respond(
        "POST /auth/login",
        200,
        json!({ "token": token }).to_string(),
    );
    h.stub.respond("GET /sales", 401, "");

    let sessions = SessionManager::new(h.client.clone(), h.store.clone());
    sessions.login("bob", "hunter22").await?;
    assert_eq!(sessions.visible_areas().len(), FeatureArea::ALL.len());

    let err = Services::new(h.client.clone())
        .sales
        .list(&ListFilters::new())
        .await
        .expect_err("401 must fail");
    assert!(err.is_unauthorized());

    assert!(sessions.current().is_none());
    assert!(sessions.visible_areas().is_empty());
    assert_eq!(h.store.get(USER_KEY)?, None);

    Ok(())
}

#[tokio::test]
async fn test_checkout_records_sale_and_empties_cart() -> TestResult {
    let h = harness().await?;
    h.stub.respond("POST /sales", 201, r#"{"id": 501, "total": 25.5}"#);

    let services = Services::new(h.client.clone());
    let mut cart = Cart::new();
    cart.add_item(EntityId::Number(1), "Pepper", 10.0);
    cart.add_item(EntityId::Number(1), "Pepper", 10.0);
    cart.add_item(EntityId::Number(2), "Cloves", 5.5);

    let invoice = cart.checkout(&services.sales, Utc::now()).await?;

    assert_eq!(invoice.invoice_number, Some(EntityId::Number(501)));
    assert_eq!(invoice.lines.len(), 2);
    assert!(cart.is_empty());

    let body = h.stub.last().json();
    assert_eq!(body["total"], json!(25.5));
    assert_eq!(
        body["items"],
        json!([
            { "productId": 1, "quantity": 2, "price": 10.0 },
            { "productId": 2, "quantity": 1, "price": 5.5 }
        ])
    );
    assert!(body["date"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_acknowledged_checkout_empties_cart() -> TestResult {
    let h = harness().await?;
    h.stub.respond("POST /sales", 201, r#"{"message": "Sale recorded"}"#);

    let services = Services::new(h.client.clone());
    let mut cart = Cart::new();
    cart.add_item(EntityId::Number(1), "Pepper", 10.0);

    let invoice = cart.checkout(&services.sales, Utc::now()).await?;

    assert_eq!(invoice.invoice_number, None);
    assert_eq!(invoice.lines.len(), 1);
    assert!(cart.is_empty());
    assert_eq!(h.stub.seen().len(), 1);

    // a plain-text acknowledgement also counts as recorded
    h.stub.respond("POST /sales", 201, "Created");
    cart.add_item(EntityId::Number(2), "Cloves", 5.5);
    let invoice = cart.checkout(&services.sales, Utc::now()).await?;
    assert_eq!(invoice.invoice_number, None);
    assert!(cart.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_ledger_entries_without_type_or_amount() -> TestResult {
    let h = harness().await?;
    h.stub.respond(
        "GET /accounting/transactions",
        200,
        r#"[{"id": 1, "type": "INCOME", "amount": 10.0}, {"id": 2, "amount": 5.0}, {"id": 3, "type": "EXPENSE"}]"#,
    );

    let page = Services::new(h.client.clone())
        .transactions
        .list(&ListFilters::new())
        .await?;

    assert_eq!(page.total, 3);
    assert_eq!(page.content[0].kind, TransactionType::Income);
    assert_eq!(page.content[1].kind, TransactionType::Other);
    assert_eq!(page.content[1].amount, 5.0);
    assert_eq!(page.content[2].amount, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_failed_checkout_keeps_cart() -> TestResult {
    let h = harness().await?;
    h.stub.respond("POST /sales", 422, r#"{"message": "Insufficient stock"}"#);

    let services = Services::new(h.client.clone());
    let mut cart = Cart::new();
    cart.add_item(EntityId::Number(1), "Pepper", 10.0);

    let err = cart
        .checkout(&services.sales, Utc::now())
        .await
        .expect_err("422 must fail");

    assert_eq!(err.to_string(), "Insufficient stock");
    assert_eq!(cart.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() -> TestResult {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let tokens = TokenStore::new(Arc::new(MemoryStore::new()))?;
    let client = ApiClient::new(format!("http://{}", addr), tokens, Arc::new(|| {}))?;

    let err = client
        .request("/products", RequestOptions::get())
        .await
        .expect_err("nothing listens there");
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);

    Ok(())
}
