//! Integration tests against a mock prediction backend

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use workbench_lib::{
    api::PredictionPayload,
    catalog::builtin_models,
    metrics::BestOrigin,
    presenter::{present, ProbabilityBand, PresentedOutcome},
    AlgorithmVariant, Catalog, CatalogSource, Event, HttpModelApi, InputValues, MetricsSource,
    PredictError, PredictionClient, StructuredLogger, TrainingMetricsCache, Workbench,
    WorkbenchConfig, WorkbenchMetrics,
};

const CAREER: &str = "career-path-prediction";
const EMPLOYMENT: &str = "employment-probability-post-graduation";

fn config_for(server: &Server) -> WorkbenchConfig {
    WorkbenchConfig::default()
        .with_api_url(server.url())
        .with_request_timeout(Duration::from_secs(5))
}

fn api_for(config: &WorkbenchConfig) -> Arc<HttpModelApi> {
    Arc::new(HttpModelApi::new(config).expect("valid config"))
}

fn prediction_client(config: &WorkbenchConfig) -> PredictionClient {
    PredictionClient::new(
        api_for(config),
        config.request_timeout(),
        StructuredLogger::new("test"),
        WorkbenchMetrics::new(),
    )
}

fn metrics_cache(config: &WorkbenchConfig) -> TrainingMetricsCache {
    TrainingMetricsCache::new(
        api_for(config),
        config.request_timeout(),
        StructuredLogger::new("test"),
        WorkbenchMetrics::new(),
    )
}

fn inputs() -> InputValues {
    [
        ("degree_program".to_string(), json!("Computer Science")),
        ("gpa".to_string(), json!(3.6)),
    ]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn test_catalog_loaded_from_backend() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/prediction/models")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"name": "Career Path Prediction", "description": "remote", "accuracy": 90.1},
                {"name": "Salary   Forecast", "description": "new", "accuracy": 70.0}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let config = config_for(&server);
    let catalog = Catalog::load(
        api_for(&config).as_ref(),
        config.request_timeout(),
        &StructuredLogger::new("test"),
        &WorkbenchMetrics::new(),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(catalog.source(), CatalogSource::Remote);
    assert_eq!(catalog.find(CAREER).unwrap().accuracy, 90.1);
    assert!(catalog.find("salary-forecast").unwrap().inputs.is_empty());
}

#[tokio::test]
async fn test_catalog_falls_back_on_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/models")
        .with_status(500)
        .with_body(r#"{"message":"boom"}"#)
        .create_async()
        .await;

    let config = config_for(&server);
    let catalog = Catalog::load(
        api_for(&config).as_ref(),
        config.request_timeout(),
        &StructuredLogger::new("test"),
        &WorkbenchMetrics::new(),
    )
    .await;

    assert_eq!(catalog.source(), CatalogSource::BuiltIn);
    assert_eq!(catalog.models(), builtin_models().as_slice());
}

#[tokio::test]
async fn test_base_path_is_preserved() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/prediction/training-results")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let config = WorkbenchConfig::default().with_api_url(format!("{}/api", server.url()));
    let set = metrics_cache(&config).load(CAREER).await;

    mock.assert_async().await;
    assert_eq!(set.synthesized_count(), 5);
}

#[tokio::test]
async fn test_partial_training_records_are_completed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/training-results")
        .with_status(200)
        .with_body(
            json!([
                {
                    "model_name": "career_path_xgboost",
                    "model_type": "XGBoost Classifier",
                    "accuracy": 0.96,
                    "precision": 0.95,
                    "recall": 0.94,
                    "f1": 0.945,
                    "feature_importance": {"Skills": 50.0, "GPA": 50.0},
                    "num_samples": 8123,
                    "updated_at": "2025-06-02T08:00:00"
                },
                {"model_name": "employment_probability_random_forest", "accuracy": 0.99},
                {"model_name": "career_path_svm", "accuracy": 0.99}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let set = metrics_cache(&config_for(&server)).load(CAREER).await;

    assert_eq!(set.xgboost.source, MetricsSource::Remote);
    assert_eq!(set.xgboost.algorithm_type, "XGBoost Classifier");
    assert_eq!(set.random_forest.source, MetricsSource::Fallback);
    assert_eq!(set.random_forest.accuracy, 0.89);
    assert_eq!(set.best_origin, BestOrigin::Computed(AlgorithmVariant::XGBoost));
    assert_eq!(set.best.accuracy, 0.96);
    for (_, result) in set.iter() {
        assert!(result.accuracy > 0.0);
    }
}

#[tokio::test]
async fn test_null_fields_do_not_discard_other_records() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/training-results")
        .with_status(200)
        .with_body(
            json!([
                {
                    "model_name": "career_path_random_forest",
                    "accuracy": 0.81,
                    "precision": 0.8,
                    "recall": 0.79,
                    "f1": 0.795,
                    "feature_importance": {"GPA": 60.0, "Skills": 40.0}
                },
                {
                    "model_name": "career_path_neural_network",
                    "accuracy": 0.77,
                    "precision": null,
                    "feature_importance": null,
                    "num_samples": null
                },
                {"model_name": "career_path_xgboost", "accuracy": "unknown"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let set = metrics_cache(&config_for(&server)).load(CAREER).await;

    assert_eq!(set.random_forest.source, MetricsSource::Remote);
    assert_eq!(set.random_forest.accuracy, 0.81);
    assert_eq!(set.neural_network.source, MetricsSource::Remote);
    assert_eq!(set.neural_network.precision, 0.0);
    assert!(set.neural_network.feature_importance.is_empty());
    assert_eq!(set.xgboost.source, MetricsSource::Fallback);
    assert_eq!(
        set.best_origin,
        BestOrigin::Computed(AlgorithmVariant::XGBoost)
    );
}

#[tokio::test]
async fn test_catalog_keeps_descriptors_with_null_fields() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/models")
        .with_status(200)
        .with_body(
            json!([
                {"name": "Career Path Prediction", "description": null, "accuracy": 88.0},
                {"name": "Employment Probability Post-Graduation", "description": "jobs", "accuracy": null},
                {"description": "nameless"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let config = config_for(&server);
    let catalog = Catalog::load(
        api_for(&config).as_ref(),
        config.request_timeout(),
        &StructuredLogger::new("test"),
        &WorkbenchMetrics::new(),
    )
    .await;

    assert_eq!(catalog.source(), CatalogSource::Remote);
    assert_eq!(catalog.len(), 2);
    let career = catalog.find(CAREER).unwrap();
    assert_eq!(career.description, "");
    assert_eq!(career.accuracy, 88.0);
    assert_eq!(catalog.find(EMPLOYMENT).unwrap().accuracy, 0.0);
}

#[tokio::test]
async fn test_training_fetch_failure_uses_fallback_table() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/training-results")
        .with_status(502)
        .create_async()
        .await;

    let set = metrics_cache(&config_for(&server)).load(EMPLOYMENT).await;

    assert_eq!(set.best_origin, BestOrigin::Fallback);
    assert_eq!(set.best.accuracy, 0.952);
    assert_eq!(set.random_forest.accuracy, 0.92);
    assert_eq!(set.xgboost.accuracy, 0.952);
    assert_eq!(set.neural_network.accuracy, 0.94);
    assert_eq!(set.synthesized_count(), 5);
}

#[tokio::test]
async fn test_undecodable_training_body_uses_fallback_table() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/training-results")
        .with_status(200)
        .with_body("<html>waking up</html>")
        .create_async()
        .await;

    let set = metrics_cache(&config_for(&server)).load(CAREER).await;
    assert_eq!(set.best.algorithm_type, "XGBoost");
    assert_eq!(set.best_origin, BestOrigin::Fallback);
}

#[tokio::test]
async fn test_rejection_carries_status_and_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/prediction/employment-probability")
        .with_status(500)
        .with_body(r#"{"message":"overloaded"}"#)
        .create_async()
        .await;

    let models = builtin_models();
    let client = prediction_client(&config_for(&server));
    let err = assert_err!(client.predict(&models[1], &inputs()).await);

    assert_eq!(
        err,
        PredictError::RemoteRejected {
            status_code: 500,
            message: "overloaded".to_string()
        }
    );
    assert_eq!(err.to_string(), "Server error: 500 - overloaded");
}

#[tokio::test]
async fn test_rejection_without_message_is_unknown_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/prediction/career-path-prediction")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let models = builtin_models();
    let client = prediction_client(&config_for(&server));
    let err = assert_err!(client.predict(&models[0], &inputs()).await);
    assert_eq!(err.to_string(), "Server error: 503 - Unknown error");
}

#[tokio::test]
async fn test_unexpected_success_body_is_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/prediction/employment-probability")
        .with_status(200)
        .with_body(r#"{"status":"queued"}"#)
        .create_async()
        .await;

    let models = builtin_models();
    let client = prediction_client(&config_for(&server));
    let err = assert_err!(client.predict(&models[1], &inputs()).await);
    assert!(matches!(
        err,
        PredictError::RemoteRejected {
            status_code: 200,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_no_response() {
    let config = WorkbenchConfig::default()
        .with_api_url("http://127.0.0.1:1")
        .with_request_timeout(Duration::from_secs(2));
    let models = builtin_models();
    let client = prediction_client(&config);

    let err = assert_err!(client.predict(&models[1], &inputs()).await);
    assert_eq!(err, PredictError::NoResponse);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn test_probability_prediction_presented() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/prediction/employment-probability")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({"gpa": 3.6})))
        .with_status(200)
        .with_body(
            json!({
                "probability": 0.85,
                "factors": [
                    {"name": "Internships", "impact": "High", "weight": 35},
                    {"name": "GPA", "impact": "Medium"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let models = builtin_models();
    let client = prediction_client(&config_for(&server));
    let result = assert_ok!(client.predict(&models[1], &inputs()).await);
    mock.assert_async().await;

    assert!(result.from_remote);
    assert!(matches!(result.payload, PredictionPayload::Probability(_)));

    let presented = present(Some(&result), &models[1]).unwrap();
    assert_eq!(presented.model_accuracy, 94.8);
    let PresentedOutcome::Probability { band, factors, .. } = presented.outcome else {
        panic!("expected probability outcome");
    };
    assert_eq!(band, ProbabilityBand::VeryHigh);
    assert_eq!(band.label(), "very high");
    assert_eq!(factors.len(), 2);
}

#[tokio::test]
async fn test_bearer_token_sent_when_configured() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/prediction/models")
        .match_header("authorization", "Bearer s3cret")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let config = config_for(&server).with_api_token(Some("s3cret".to_string()));
    let api = api_for(&config);
    assert_ok!(workbench_lib::ModelApi::list_models(api.as_ref()).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/prediction/models")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let api = api_for(&config_for(&server));
    assert_ok!(workbench_lib::ModelApi::list_models(api.as_ref()).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_workbench_end_to_end() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/prediction/models")
        .with_status(200)
        .with_body(
            json!([{"name": "Career Path Prediction", "description": "", "accuracy": 88.0}])
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/prediction/training-results")
        .with_status(200)
        .with_body(json!([{"model_name": "career_path_best_model", "accuracy": 0.93}]).to_string())
        .create_async()
        .await;
    let predict = server
        .mock("POST", "/prediction/career-path-prediction")
        .with_status(200)
        .with_body(
            json!({
                "predictions": [
                    {"career": "Software Engineer", "probability": 0.81},
                    {"career": "Data Analyst", "probability": 0.55}
                ],
                "model_accuracy": 91.0
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let mut workbench = Workbench::connect(config_for(&server)).unwrap().with_seed(11);
    assert_eq!(workbench.load_catalog().await.source(), CatalogSource::Remote);

    assert_ok!(workbench.dispatch(Event::ModelSelected(CAREER.to_string())).await);
    let view = workbench.state().training_view().unwrap();
    assert_eq!(view.accuracy, "93.0%");

    assert_ok!(workbench.dispatch(Event::SampleRequested).await);
    assert_ok!(workbench.dispatch(Event::PredictRequested).await);
    predict.assert_async().await;

    let presented = workbench.state().presented().unwrap();
    assert_eq!(presented.model_accuracy, 91.0);
    assert_eq!(presented.model_confidence, 87.5);
    let PresentedOutcome::Classification { predictions } = presented.outcome else {
        panic!("expected classification outcome");
    };
    assert_eq!(predictions[0].label, "Software Engineer");
    assert_eq!(predictions[1].note, "Good alternative career path");
}
