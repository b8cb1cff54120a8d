//! End-to-end tests driving the axum router in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::util::ServiceExt;

use sheetserve::Storage;

/// Router plus the tempdirs backing its storage (kept alive for the test).
struct TestServer {
    router: Router,
    uploads: TempDir,
    _artifacts: TempDir,
}

fn test_server() -> TestServer {
    let uploads = TempDir::new().unwrap();
    let artifacts = TempDir::new().unwrap();
    let storage = Storage::new(
        uploads.path().to_path_buf(),
        artifacts.path().to_path_buf(),
    );
    storage.ensure_directories().unwrap();
    TestServer {
        router: sheetserve::http::router(storage),
        uploads,
        _artifacts: artifacts,
    }
}

/// Workbook bytes with sheet "Sales", column "Revenue" = [10, 20, 30].
fn sales_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales").unwrap();
    sheet.write_string(0, 0, "Revenue").unwrap();
    sheet.write_number(1, 0, 10.0).unwrap();
    sheet.write_number(2, 0, 20.0).unwrap();
    sheet.write_number(3, 0, 30.0).unwrap();
    workbook.save_to_buffer().unwrap()
}

/// Write the sales workbook into the server's upload dir and return its path.
fn stored_workbook(server: &TestServer) -> String {
    let path = server.uploads.path().join("sales.xlsx");
    std::fs::write(&path, sales_workbook()).unwrap();
    path.display().to_string()
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn multipart_upload(file_name: &str, data: &[u8]) -> Request<Body> {
    let boundary = "testboundary7b55";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_returns_sheet_names() {
    let server = test_server();
    let response = server
        .router
        .clone()
        .oneshot(multipart_upload("sales.xlsx", &sales_workbook()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["sheet_names"], json!(["Sales"]));
    assert_eq!(value["number_of_sheets"], json!(1));
    let stored = value["file_path"].as_str().unwrap();
    assert!(std::path::Path::new(stored).exists());
}

#[tokio::test]
async fn upload_rejects_wrong_extension() {
    let server = test_server();
    let response = server
        .router
        .clone()
        .oneshot(multipart_upload("sales.csv", b"a,b\n1,2\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["error"], json!("Invalid file type"));
}

#[tokio::test]
async fn upload_without_file_part_is_rejected() {
    let server = test_server();
    let boundary = "testboundary7b55";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nhello\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = server.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn process_sum_and_average() {
    let server = test_server();
    let file_path = stored_workbook(&server);

    let (status, value) = post_json(
        &server.router,
        "/process",
        json!({
            "file_path": file_path,
            "operations": [
                {"sheet_name": "Sales", "operation": "sum", "columns": ["Revenue"]}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"Sales": {"Revenue": 60.0}}));

    let (status, value) = post_json(
        &server.router,
        "/process",
        json!({
            "file_path": file_path,
            "operations": [
                {"sheet_name": "Sales", "operation": "average", "columns": ["Revenue"]}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"Sales": {"Revenue": 20.0}}));
}

#[tokio::test]
async fn process_unknown_column_names_missing_columns() {
    let server = test_server();
    let file_path = stored_workbook(&server);

    let (status, value) = post_json(
        &server.router,
        "/process",
        json!({
            "file_path": file_path,
            "operations": [
                {"sheet_name": "Sales", "operation": "sum", "columns": ["Profit"]}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = value["error"].as_str().unwrap();
    assert!(message.contains("Profit"), "unexpected message: {message}");
    assert!(message.contains("Sales"), "unexpected message: {message}");
}

#[tokio::test]
async fn process_invalid_operation_rejected() {
    let server = test_server();
    let file_path = stored_workbook(&server);

    let (status, value) = post_json(
        &server.router,
        "/process",
        json!({
            "file_path": file_path,
            "operations": [
                {"sheet_name": "Sales", "operation": "median", "columns": ["Revenue"]}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = value["error"].as_str().unwrap();
    assert!(
        message.contains("Invalid operation"),
        "unexpected message: {message}"
    );
}

#[tokio::test]
async fn process_unknown_sheet_rejected() {
    let server = test_server();
    let file_path = stored_workbook(&server);

    let (status, value) = post_json(
        &server.router,
        "/process",
        json!({
            "file_path": file_path,
            "operations": [
                {"sheet_name": "Forecast", "operation": "sum", "columns": ["Revenue"]}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("Sheet Forecast not found"));
}

#[tokio::test]
async fn process_missing_keys_rejected_with_error_shape() {
    let server = test_server();

    let (status, value) = post_json(&server.router, "/process", json!({"operations": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn report_endpoint_uses_sheets_key() {
    let server = test_server();
    let file_path = stored_workbook(&server);

    let (status, value) = post_json(
        &server.router,
        "/report",
        json!({
            "file_path": file_path,
            "sheets": [
                {"sheet_name": "Sales", "operation": "sum", "columns": ["Revenue"]}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"Sales": {"Revenue": 60.0}}));
}

#[tokio::test]
async fn generate_pdf_writes_artifact() {
    let server = test_server();

    let (status, value) = post_json(
        &server.router,
        "/generate_pdf",
        json!({"Sales": {"Revenue": 60.0}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let path = value["pdf_path"].as_str().unwrap();
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn plot_writes_chart_artifact() {
    let server = test_server();

    let (status, value) = post_json(
        &server.router,
        "/plot",
        json!({"Sales": {"Revenue": 60.0}, "Costs": {"Total": 5.0}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let path = value["graph_path"].as_str().unwrap();
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[tokio::test]
async fn generate_detailed_pdf_writes_artifact() {
    let server = test_server();

    let (status, value) = post_json(
        &server.router,
        "/generate_detailed_pdf",
        json!({"Sales": {"Revenue": 60.0}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let path = value["pdf_path"].as_str().unwrap();
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
