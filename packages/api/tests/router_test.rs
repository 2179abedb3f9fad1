use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use whisker_api::{ApiState, construct_router};
use whisker_core::memory::{InMemoryObjectStore, StaticDetector};
use whisker_core::{
    BoundingBox, CatImageJudge, ClassifierConfig, FaceDetail, IdGenerator, Label,
    RecognitionService,
};

const BUCKET: &str = "cat-uploads";

struct FixedId;

impl IdGenerator for FixedId {
    fn generate(&self) -> String {
        "fixed-id".to_string()
    }
}

fn app(detector: StaticDetector, store: InMemoryObjectStore) -> axum::Router {
    let recognition = RecognitionService::new(
        Arc::new(detector.clone()),
        Arc::new(detector.clone()),
        Arc::new(store),
        Arc::new(FixedId),
        ClassifierConfig::default(),
        BUCKET,
    );
    let judge = CatImageJudge::new(Arc::new(detector), ClassifierConfig::default());
    construct_router(Arc::new(ApiState::new(recognition, judge)))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn cat_detector() -> StaticDetector {
    StaticDetector::new(vec![
        Label::new("Cat", 96.0),
        Label::new("Manx", 89.0).with_parent("Cat"),
    ])
}

#[tokio::test]
async fn health_reports_service() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(cat_detector(), InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "whisker-api");
}

#[tokio::test]
async fn recognition_stages_and_returns_labels() {
    let store = InMemoryObjectStore::new();
    let request = post(
        "/api/v1/images/recognition",
        json!({ "image": STANDARD.encode(b"jpeg"), "imageExtension": ".jpg" }),
    );

    let (status, body) = send(app(cat_detector(), store.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objectKey"], "tmp/fixed-id.jpg");
    assert_eq!(body["labels"][0]["name"], "Cat");
    assert_eq!(body["labels"][1]["parents"][0]["name"], "Cat");
    assert_eq!(store.keys(BUCKET), vec!["tmp/fixed-id.jpg"]);
}

#[tokio::test]
async fn recognition_rejects_bad_base64() {
    let request = post(
        "/api/v1/images/recognition",
        json!({ "image": "%%%", "imageExtension": ".png" }),
    );

    let (status, body) = send(app(cat_detector(), InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/images/judge")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app(cat_detector(), InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn judge_returns_classification() {
    let request = post(
        "/api/v1/images/judge",
        json!({ "bucket": BUCKET, "key": "tmp/manx.jpg", "versionId": "v2" }),
    );

    let (status, body) = send(app(cat_detector(), InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "classified", "isAcceptableCatImage": true, "typesOfCats": ["Manx"] })
    );
}

#[tokio::test]
async fn judge_returns_unacceptable_image_as_success() {
    // at the threshold is not above it
    let detector = StaticDetector::new(vec![Label::new("Cat", 90.0)]);
    let request = post(
        "/api/v1/images/judge",
        json!({ "bucket": BUCKET, "key": "tmp/borderline.png" }),
    );

    let (status, body) = send(app(detector, InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "classified", "isAcceptableCatImage": false, "typesOfCats": [] })
    );
}

#[tokio::test]
async fn judge_reports_rejected_extension_as_success() {
    let detector = cat_detector();
    let request = post(
        "/api/v1/images/judge",
        json!({ "bucket": BUCKET, "key": "tmp/sample-cat-image.gif" }),
    );

    let (status, body) = send(app(detector.clone(), InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "rejectedExtension" }));
    assert!(detector.calls().is_empty());
}

#[tokio::test]
async fn judge_detector_failure_is_bad_gateway() {
    let request = post(
        "/api/v1/images/judge",
        json!({ "bucket": BUCKET, "key": "tmp/a.png" }),
    );

    let app = app(StaticDetector::failing("boom"), InMemoryObjectStore::new());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.headers().contains_key("x-error-id"));
}

#[tokio::test]
async fn faces_are_returned() {
    let detector = StaticDetector::new(vec![]).with_faces(vec![FaceDetail {
        confidence: 99.5,
        bounding_box: Some(BoundingBox {
            width: 0.25,
            height: 0.5,
            left: 0.25,
            top: 0.125,
        }),
    }]);
    let request = post(
        "/api/v1/images/faces",
        json!({ "image": STANDARD.encode(b"face") }),
    );

    let (status, body) = send(app(detector, InMemoryObjectStore::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["faceDetails"][0]["confidence"], 99.5);
    assert_eq!(body["faceDetails"][0]["boundingBox"]["top"], 0.125);
}
