use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use priceoptima_api::{app, AppState};
use priceoptima_pricing::{
    DemandModel, FeatureSchema, FeatureVector, LinearDemandModel, ModelError, PricingPolicy,
    PricingService,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const FEATURES: &[&str] = &[
    "Cost Price",
    "Stock Level",
    "Competitor Price",
    "rule_price",
    "is_weekend",
    "month",
    "is_month_end",
    "units_sold_lag_1",
];

struct FixedDemand(f64);

impl DemandModel for FixedDemand {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
        Ok(self.0)
    }

    fn kind(&self) -> &str {
        "fixed"
    }
}

struct SlowModel(Duration);

impl DemandModel for SlowModel {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
        std::thread::sleep(self.0);
        Ok(75.0)
    }

    fn kind(&self) -> &str {
        "slow"
    }
}

struct BrokenModel;

impl DemandModel for BrokenModel {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
        Err(ModelError::Inference("corrupt tree ensemble".to_string()))
    }

    fn kind(&self) -> &str {
        "broken"
    }
}

fn schema() -> FeatureSchema {
    FeatureSchema::new(FEATURES.iter().map(|n| n.to_string()).collect()).unwrap()
}

fn origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn test_app(model: Arc<dyn DemandModel>, timeout: Duration) -> Router {
    let pricing = PricingService::new(schema(), model, PricingPolicy::default()).unwrap();
    app(AppState::new(Arc::new(pricing), timeout), &origins())
}

fn fixed_app(demand: f64) -> Router {
    test_app(Arc::new(FixedDemand(demand)), Duration::from_secs(5))
}

fn sample_body() -> Value {
    json!({
        "cost": 200.0,
        "demand": 120.0,
        "inventory": 50,
        "competitor_price": 280.0,
        "seasonality": 1
    })
}

async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_home() {
    let (status, body) = get_json(fixed_app(30.0), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "PriceOptima API is running successfully");
}

#[tokio::test]
async fn test_premium_quote() {
    let (status, body) = post_json(fixed_app(75.0), "/predict-price", &sample_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "predicted_demand": 75.0,
            "recommended_price": 308.0,
            "pricing_strategy": "premium"
        })
    );
}

#[tokio::test]
async fn test_discount_and_standard_quotes() {
    let (_, body) = post_json(fixed_app(10.0), "/predict-price", &sample_body()).await;
    assert_eq!(body["pricing_strategy"], "discount");
    assert_eq!(body["recommended_price"], 266.0);

    let (_, body) = post_json(fixed_app(20.0), "/predict-price", &sample_body()).await;
    assert_eq!(body["pricing_strategy"], "standard");
    assert_eq!(body["recommended_price"], 294.0);

    let (_, body) = post_json(fixed_app(50.0), "/predict-price", &sample_body()).await;
    assert_eq!(body["pricing_strategy"], "standard");
}

#[tokio::test]
async fn test_predicted_demand_rounded() {
    let (_, body) = post_json(fixed_app(42.12789), "/predict-price", &sample_body()).await;
    assert_eq!(body["predicted_demand"], 42.13);
}

#[tokio::test]
async fn test_linear_model_quote() {
    // demand = 0.5 * units_sold_lag_1 - 0.1 * Stock Level
    let mut coefficients = vec![0.0; FEATURES.len()];
    coefficients[1] = -0.1;
    coefficients[7] = 0.5;
    let model = LinearDemandModel::new(
        FEATURES.iter().map(|n| n.to_string()).collect(),
        0.0,
        coefficients,
    )
    .unwrap();

    let app = test_app(Arc::new(model), Duration::from_secs(5));
    let (status, body) = post_json(app, "/predict-price", &sample_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_demand"], 55.0);
    assert_eq!(body["pricing_strategy"], "premium");
}

#[tokio::test]
async fn test_validation_errors() {
    let invalid = [
        ("seasonality", json!(2)),
        ("cost", json!(0.0)),
        ("cost", json!(-3.5)),
        ("competitor_price", json!(0)),
        ("demand", json!(-1.0)),
        ("inventory", json!(-4)),
    ];

    for (field, value) in invalid {
        let mut body = sample_body();
        body[field] = value.clone();
        let (status, response) = post_json(fixed_app(75.0), "/predict-price", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}={}", field, value);
        assert!(response["error"].as_str().unwrap().contains(field));
    }
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let mut body = sample_body();
    body.as_object_mut().unwrap().remove("competitor_price");
    let (status, _) = post_json(fixed_app(75.0), "/predict-price", &body).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_model_failure_is_500() {
    let app = test_app(Arc::new(BrokenModel), Duration::from_secs(5));
    let (status, body) = post_json(app, "/predict-price", &sample_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Prediction error"));
    assert!(body.get("recommended_price").is_none());
}

#[tokio::test]
async fn test_inference_timeout_is_500() {
    let app = test_app(
        Arc::new(SlowModel(Duration::from_millis(500))),
        Duration::from_millis(20),
    );
    let (status, body) = post_json(app, "/predict-price", &sample_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("did not respond"));
}

#[tokio::test]
async fn test_model_info() {
    let (status, body) = get_json(fixed_app(30.0), "/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "fixed");
    assert_eq!(body["feature_count"], FEATURES.len());
    assert_eq!(body["derived_features"].as_array().unwrap().len(), FEATURES.len());
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict-price")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_preflight() {
    let response = fixed_app(30.0)
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    let response = fixed_app(30.0)
        .oneshot(preflight("http://evil.example.com"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard_origin_ignored() {
    let pricing =
        PricingService::new(schema(), Arc::new(FixedDemand(30.0)), PricingPolicy::default())
            .unwrap();
    let router = app(
        AppState::new(Arc::new(pricing), Duration::from_secs(5)),
        &["*".to_string(), "http://localhost:3000".to_string()],
    );

    let response = router
        .clone()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );

    let response = router
        .oneshot(preflight("http://evil.example.com"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
