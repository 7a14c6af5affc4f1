use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use intfeed_core::{DbLocation, LazyRecordStore, RecordStore};
use intfeed_server::{router, AppState};
use tower::ServiceExt;

fn memory_router() -> Router {
    let store = RecordStore::open(&DbLocation::Memory).unwrap();
    router(AppState::new(LazyRecordStore::ready(store)), false)
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/save")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_renders_form_without_notices() {
    let router = memory_router();

    let response = send(&router, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("action=\"/save\""));
    assert!(!page.contains("class=\"message\""));
    assert!(!page.contains("class=\"error\""));
}

#[tokio::test]
async fn save_rerenders_with_success_then_duplicate() {
    let router = memory_router();

    let saved = send(&router, post_form("name=Ann&age=30")).await;
    assert_eq!(saved.status(), StatusCode::OK);
    assert!(body_text(saved)
        .await
        .contains("Success: Record saved successfully!"));

    let duplicate = send(&router, post_form("name=Ann&age=30")).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert!(body_text(duplicate)
        .await
        .contains("Error: Duplicate record already exists."));
}

#[tokio::test]
async fn save_with_blank_age_shows_validation_error() {
    let router = memory_router();

    let response = send(&router, post_form("name=Ann&age=")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Error: age is required."));

    let list = body_text(send(&router, get("/list")).await).await;
    assert!(list.contains("No records found."));
}

#[tokio::test]
async fn list_shows_records_in_creation_order_escaped() {
    let router = memory_router();
    send(&router, post_form("name=%3Cscript%3E&age=9")).await;
    send(&router, post_form("name=Ann&age=30")).await;

    let response = send(&router, get("/list")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    assert!(!page.contains("<script>"));
    let script = page.find("&lt;script&gt;").unwrap();
    let ann = page.find("<td>Ann</td>").unwrap();
    assert!(script < ann);
}

#[tokio::test]
async fn list_failure_renders_empty_table_with_error() {
    let router = router(AppState::new(LazyRecordStore::new(None)), false);

    let response = send(&router, get("/list")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let page = body_text(response).await;
    assert!(page.contains("Could not retrieve list of users."));
    assert!(page.contains("No records found."));
}

#[tokio::test]
async fn save_failure_hides_store_details() {
    let router = router(AppState::new(LazyRecordStore::new(None)), false);

    let response = send(&router, post_form("name=Ann&age=30")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let page = body_text(response).await;
    assert!(page.contains("Error: Something went wrong."));
    assert!(!page.contains("not configured"));
}
