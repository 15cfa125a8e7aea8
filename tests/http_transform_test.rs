use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures::stream;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tower::ServiceExt;
use utm_latlong::adapters::http::TRANSFORM_FAILURE_BODY;
use utm_latlong::{create_router, AppState, FieldConfig, UtmTransformer};

fn app(config: FieldConfig) -> Router {
    create_router(AppState::new(UtmTransformer::new(Arc::new(config))))
}

fn post_transform(body: Body) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/transform")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)?)
}

async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Option<String>, String)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, content_type, String::from_utf8(bytes.to_vec())?))
}

/// Three records, the second without a northing: order is kept and the
/// second record comes back unchanged.
#[tokio::test]
async fn test_transform_preserves_order_and_passes_skipped_records() -> Result<()> {
    let input = json!([
        {"id": "oslo", "easting": 597000, "northing": 6643000},
        {"id": "no-northing", "easting": 597000, "note": "kept"},
        {"id": "paris", "easting": "448252", "northing": "5411935", "zone": "31"}
    ]);

    let (status, content_type, body) = send(
        app(FieldConfig::default()),
        post_transform(Body::from(input.to_string()))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let output: Vec<Value> = serde_json::from_str(&body)?;
    assert_eq!(output.len(), 3);
    assert_eq!(output[1], input[1]);

    assert_eq!(output[0]["id"], "oslo");
    assert!((output[0]["lat"].as_f64().unwrap() - 59.91305756283662).abs() < 1e-6);
    assert!((output[0]["long"].as_f64().unwrap() - 10.734629822958414).abs() < 1e-6);

    assert_eq!(output[2]["id"], "paris");
    assert!((output[2]["lat"].as_f64().unwrap() - 48.85822069649677).abs() < 1e-6);
    assert!((output[2]["long"].as_f64().unwrap() - 2.2945024982277387).abs() < 1e-6);
    // input fields untouched
    assert_eq!(output[2]["easting"], "448252");

    Ok(())
}

#[tokio::test]
async fn test_transform_streamed_request_body() -> Result<()> {
    let body = r#"[{"easting": 500000, "northing": 0, "zone": 32},{"easting": [500000], "northing": [0], "zone": [33]}]"#;
    let chunks: Vec<std::result::Result<Vec<u8>, Infallible>> =
        body.as_bytes().chunks(5).map(|c| Ok(c.to_vec())).collect();

    let (status, _, body) = send(
        app(FieldConfig::default()),
        post_transform(Body::from_stream(stream::iter(chunks)))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let output: Vec<Value> = serde_json::from_str(&body)?;
    assert_eq!(output[0]["lat"], json!(0.0));
    assert_eq!(output[0]["long"], json!(9.0));
    assert_eq!(output[1]["long"], json!(15.0));
    assert_eq!(output[1]["easting"], json!([500000]));

    Ok(())
}

#[tokio::test]
async fn test_combined_lat_long_field() -> Result<()> {
    let config = FieldConfig {
        include_lat_long: true,
        ..FieldConfig::default()
    };
    let input = json!([{"easting": 500000, "northing": 0}]);

    let (status, _, body) = send(app(config), post_transform(Body::from(input.to_string()))?).await?;

    assert_eq!(status, StatusCode::OK);
    let output: Vec<Value> = serde_json::from_str(&body)?;
    assert_eq!(output[0]["lat_long"], "0.0, 9.0");
    Ok(())
}

#[tokio::test]
async fn test_southern_hemisphere_records() -> Result<()> {
    let config = FieldConfig {
        northern_value: "N".to_string(),
        hemisphere_default: "N".to_string(),
        ..FieldConfig::default()
    };
    let input = json!([
        {"easting": 300000, "northing": 6000000, "zone": 33, "hemi": "S"},
        {"easting": 300000, "northing": 4000000, "zone": 33, "hemi": "N"}
    ]);

    let (_, _, body) = send(app(config), post_transform(Body::from(input.to_string()))?).await?;
    let output: Vec<Value> = serde_json::from_str(&body)?;

    let south = output[0]["lat"].as_f64().unwrap();
    let north = output[1]["lat"].as_f64().unwrap();
    assert!((south + 36.124073604301714).abs() < 1e-6);
    assert_eq!(south, -north);
    assert_eq!(output[0]["long"], output[1]["long"]);
    Ok(())
}

#[tokio::test]
async fn test_numeric_hemisphere_is_southern() -> Result<()> {
    let input = json!([
        {"easting": 300000, "northing": 6000000, "zone": 33, "hemi": 0},
        {"easting": 300000, "northing": 6000000, "zone": 33, "hemi": "0"}
    ]);

    let (status, _, body) = send(
        app(FieldConfig::default()),
        post_transform(Body::from(input.to_string()))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let output: Vec<Value> = serde_json::from_str(&body)?;
    assert!((output[0]["lat"].as_f64().unwrap() + 36.124073604301714).abs() < 1e-6);
    assert!(output[1]["lat"].as_f64().unwrap() > 0.0);
    Ok(())
}

#[tokio::test]
async fn test_empty_array() -> Result<()> {
    let (status, _, body) =
        send(app(FieldConfig::default()), post_transform(Body::from("[]"))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
    Ok(())
}

#[tokio::test]
async fn test_format_error_in_first_record_returns_500() -> Result<()> {
    let input = json!([
        {"easting": "abc", "northing": 0},
        {"easting": 500000, "northing": 0}
    ]);

    let (status, content_type, body) = send(
        app(FieldConfig::default()),
        post_transform(Body::from(input.to_string()))?,
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type.unwrap_or_default().starts_with("text/plain"));
    assert_eq!(body, TRANSFORM_FAILURE_BODY);
    Ok(())
}

#[tokio::test]
async fn test_malformed_request_body_returns_500() -> Result<()> {
    for input in ["not json", "{\"easting\": 1}", "[1, 2, 3]", "[{\"easting\": 1"] {
        let (status, _, body) =
            send(app(FieldConfig::default()), post_transform(Body::from(input))?).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "input {}", input);
        assert_eq!(body, TRANSFORM_FAILURE_BODY);
    }
    Ok(())
}

/// Failure after the first record: the status is already sent, so the
/// body is cut short.
#[tokio::test]
async fn test_format_error_after_first_record_truncates_body() -> Result<()> {
    let input = json!([
        {"easting": 500000, "northing": 0},
        {"easting": 500000, "northing": "twelve"}
    ]);

    let response = app(FieldConfig::default())
        .oneshot(post_transform(Body::from(input.to_string()))?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await;
    assert!(body.is_err());
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let request = Request::builder().uri("/health").body(Body::empty())?;
    let (status, _, body) = send(app(FieldConfig::default()), request).await?;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body)?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "utm-latlong");
    assert!(body["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_transform_requires_post() -> Result<()> {
    let request = Request::builder().uri("/transform").body(Body::empty())?;
    let response = app(FieldConfig::default()).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
