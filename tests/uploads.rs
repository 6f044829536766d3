mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::Value;
use storefront::{
    entity::products::Entity as Products,
    models::Permissions,
    routes::create_router,
    services::{auth_service, upload_service::MAX_IMAGE_BYTES},
    state::AppState,
};
use tower::ServiceExt;

const BOUNDARY: &str = "storefront-upload-boundary";

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_post(uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json_body(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn product_manager(state: &AppState) -> anyhow::Result<String> {
    let perms = Permissions {
        can_manage_products: true,
        ..Permissions::default()
    };
    let admin = common::create_admin(state, "stocker", "password1", perms).await?;
    Ok(auth_service::issue_token(&state.config, &admin)?)
}

fn stored_path(state: &AppState, image_url: &str) -> std::path::PathBuf {
    let file_name = image_url
        .strip_prefix("/static/uploads/")
        .expect("upload url");
    state.config.upload_dir().join(file_name)
}

#[tokio::test]
async fn product_image_is_stored_served_replaced_and_removed() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let token = product_manager(&state).await?;
    let app = create_router(state.clone());

    // larger than axum's default 2MB body limit
    let photo = vec![7_u8; 3 * 1024 * 1024];
    let body = multipart_body(
        &[("name", "Desk Lamp"), ("price", "12.50"), ("stock", "3")],
        Some(("lamp.PNG", &photo)),
    );
    let response = send(&app, multipart_post("/add_product", &token, body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let product_id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["price"], 1_250);
    assert_eq!(created["data"]["stock"], 3);

    let first_url = created["data"]["image_url"].as_str().unwrap().to_string();
    assert!(first_url.starts_with("/static/uploads/"));
    assert!(first_url.ends_with(".png"));
    let first_path = stored_path(&state, &first_url);
    assert_eq!(std::fs::read(&first_path)?.len(), photo.len());

    let response = send(
        &app,
        Request::builder().uri(&first_url).body(Body::empty())?,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.len(), photo.len());

    let body = multipart_body(&[], Some(("lamp-v2.webp", b"webp-bytes")));
    let response = send(
        &app,
        multipart_post(&format!("/edit_product/{product_id}"), &token, body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = json_body(response).await;
    assert_eq!(edited["data"]["name"], "Desk Lamp");
    let second_url = edited["data"]["image_url"].as_str().unwrap().to_string();
    assert_ne!(second_url, first_url);
    assert!(!first_path.exists());
    let second_path = stored_path(&state, &second_url);
    assert!(second_path.exists());

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/delete_product/{product_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())?,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!second_path.exists());

    let _ = std::fs::remove_dir_all(&state.config.static_dir);
    Ok(())
}

#[tokio::test]
async fn oversized_image_is_rejected() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let token = product_manager(&state).await?;
    let app = create_router(state.clone());

    let huge = vec![1_u8; MAX_IMAGE_BYTES + 1];
    let body = multipart_body(
        &[("name", "Poster"), ("price", "5")],
        Some(("poster.jpg", &huge)),
    );
    let response = send(&app, multipart_post("/add_product", &token, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(Products::find().count(&state.orm).await?, 0);
    let stored = std::fs::read_dir(state.config.upload_dir())
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(stored, 0);
    Ok(())
}

#[tokio::test]
async fn non_image_files_and_bad_numbers_are_rejected() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let token = product_manager(&state).await?;
    let app = create_router(state.clone());

    let body = multipart_body(
        &[("name", "Notes"), ("price", "5")],
        Some(("notes.txt", b"hello")),
    );
    let response = send(&app, multipart_post("/add_product", &token, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = multipart_body(&[("name", "Notes"), ("price", "five")], None);
    let response = send(&app, multipart_post("/add_product", &token, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = multipart_body(&[("name", "Notes"), ("price", "5"), ("stock", "2.5")], None);
    let response = send(&app, multipart_post("/add_product", &token, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(Products::find().count(&state.orm).await?, 0);
    Ok(())
}
