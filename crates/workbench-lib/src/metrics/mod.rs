//! Training metrics per algorithm variant
//!
//! This module provides:
//! - Classification of backend training records into algorithm variants
//! - Reconciliation into a [`TrainingResultSet`] where every variant is bound
//! - Deterministic fallback synthesis for missing variants or failed fetches

mod fallback;
mod variant;

pub use fallback::{failure_best, fallback_result, fallback_updated_at, ModelFamily};
pub use variant::{AlgorithmVariant, UnrecognizedVariant};

use crate::api::{ModelApi, TrainingRecord, TRAINING_RESULTS_PATH};
use crate::models::{parse_timestamp, MetricsSource, TrainingResult};
use crate::observability::{StructuredLogger, WorkbenchMetrics};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How the `Best` entry of a set was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BestOrigin {
    /// A `best_model` record came back from the backend
    Fetched,
    /// Picked as the most accurate populated variant
    Computed(AlgorithmVariant),
    /// Nothing was available; the XGBoost fallback stands in
    Fallback,
}

/// Training results for every algorithm variant of one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingResultSet {
    pub model_id: String,
    pub best: TrainingResult,
    pub random_forest: TrainingResult,
    pub xgboost: TrainingResult,
    pub neural_network: TrainingResult,
    pub logistic_regression: TrainingResult,
    pub best_origin: BestOrigin,
}

impl TrainingResultSet {
    /// Set made entirely of fallback entries, used when the fetch failed
    pub fn fallback(model_id: &str) -> Self {
        let family = ModelFamily::for_fallback(model_id);
        Self {
            model_id: model_id.to_string(),
            best: failure_best(family),
            random_forest: fallback_result(family, AlgorithmVariant::RandomForest),
            xgboost: failure_best(family),
            neural_network: fallback_result(family, AlgorithmVariant::NeuralNetwork),
            logistic_regression: fallback_result(family, AlgorithmVariant::LogisticRegression),
            best_origin: BestOrigin::Fallback,
        }
    }

    pub fn get(&self, variant: AlgorithmVariant) -> &TrainingResult {
        match variant {
            AlgorithmVariant::Best => &self.best,
            AlgorithmVariant::RandomForest => &self.random_forest,
            AlgorithmVariant::XGBoost => &self.xgboost,
            AlgorithmVariant::NeuralNetwork => &self.neural_network,
            AlgorithmVariant::LogisticRegression => &self.logistic_regression,
        }
    }

    /// All entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (AlgorithmVariant, &TrainingResult)> {
        AlgorithmVariant::ALL.into_iter().map(move |v| (v, self.get(v)))
    }

    /// Number of entries synthesized from the fallback table
    pub fn synthesized_count(&self) -> usize {
        self.iter()
            .filter(|(_, r)| r.source == MetricsSource::Fallback)
            .count()
    }
}

/// Outcome of reconciling backend records for one model
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub set: TrainingResultSet,
    /// Records kept for the model's family
    pub matched: usize,
    /// Family records whose name matched no variant
    pub unrecognized: Vec<String>,
}

fn from_record(record: &TrainingRecord, variant: AlgorithmVariant) -> TrainingResult {
    TrainingResult {
        algorithm_type: record
            .model_type
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| variant.display_name().to_string()),
        accuracy: record.accuracy,
        precision: record.precision,
        recall: record.recall,
        f1: record.f1,
        feature_importance: record.feature_importance.clone(),
        num_samples: record.num_samples,
        updated_at: record.updated_at.as_deref().and_then(parse_timestamp),
        source: MetricsSource::Remote,
    }
}

/// Reconcile backend records into a fully populated set for `model_id`
pub fn reconcile(model_id: &str, records: &[TrainingRecord]) -> Reconciliation {
    let token = ModelFamily::for_model(model_id).map(|f| f.record_token());
    let mut slots: BTreeMap<AlgorithmVariant, TrainingResult> = BTreeMap::new();
    let mut matched = 0;
    let mut unrecognized = Vec::new();

    for record in records {
        let (Some(token), Some(name)) = (token, record.model_name.as_deref()) else {
            continue;
        };
        if !name.contains(token) {
            continue;
        }
        matched += 1;
        match AlgorithmVariant::from_record_name(name) {
            // a later record for the same variant replaces the earlier one
            Ok(variant) => {
                slots.insert(variant, from_record(record, variant));
            }
            Err(UnrecognizedVariant(name)) => unrecognized.push(name),
        }
    }

    let family = ModelFamily::for_fallback(model_id);
    for variant in AlgorithmVariant::CANDIDATES {
        slots
            .entry(variant)
            .or_insert_with(|| fallback_result(family, variant));
    }

    let (best, best_origin) = match slots.remove(&AlgorithmVariant::Best) {
        Some(best) => (best, BestOrigin::Fetched),
        None => {
            let mut winner: Option<(AlgorithmVariant, &TrainingResult)> = None;
            for variant in AlgorithmVariant::CANDIDATES {
                if let Some(candidate) = slots.get(&variant) {
                    match winner {
                        Some((_, current)) if current.accuracy > candidate.accuracy => {}
                        _ => winner = Some((variant, candidate)),
                    }
                }
            }
            match winner {
                Some((variant, result)) => (result.clone(), BestOrigin::Computed(variant)),
                None => (
                    fallback_result(family, AlgorithmVariant::XGBoost),
                    BestOrigin::Fallback,
                ),
            }
        }
    };

    let mut take = |variant: AlgorithmVariant| {
        slots
            .remove(&variant)
            .unwrap_or_else(|| fallback_result(family, variant))
    };

    let set = TrainingResultSet {
        model_id: model_id.to_string(),
        best,
        random_forest: take(AlgorithmVariant::RandomForest),
        xgboost: take(AlgorithmVariant::XGBoost),
        neural_network: take(AlgorithmVariant::NeuralNetwork),
        logistic_regression: take(AlgorithmVariant::LogisticRegression),
        best_origin,
    };

    Reconciliation {
        set,
        matched,
        unrecognized,
    }
}

/// Fetches and reconciles training metrics for the selected model
pub struct TrainingMetricsCache {
    api: Arc<dyn ModelApi>,
    timeout: Duration,
    logger: StructuredLogger,
    metrics: WorkbenchMetrics,
}

impl TrainingMetricsCache {
    pub fn new(
        api: Arc<dyn ModelApi>,
        timeout: Duration,
        logger: StructuredLogger,
        metrics: WorkbenchMetrics,
    ) -> Self {
        Self {
            api,
            timeout,
            logger,
            metrics,
        }
    }

    /// Load a fully populated result set; never fails
    pub async fn load(&self, model_id: &str) -> TrainingResultSet {
        let started = Instant::now();
        let fetched = tokio::time::timeout(self.timeout, self.api.training_results()).await;
        self.metrics
            .observe_request_latency(TRAINING_RESULTS_PATH, started.elapsed().as_secs_f64());

        let records = match fetched {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => return self.fallback(model_id, &e.to_string()),
            Err(_) => return self.fallback(model_id, "timed out"),
        };

        let reconciliation = reconcile(model_id, &records);
        for name in &reconciliation.unrecognized {
            self.logger.log_record_dropped(name);
        }

        let set = reconciliation.set;
        for (variant, result) in set.iter() {
            if variant != AlgorithmVariant::Best && result.source == MetricsSource::Fallback {
                self.metrics.inc_fallback_training_entry(variant.as_key());
            }
        }
        self.logger.log_metrics_reconciled(
            model_id,
            reconciliation.matched - reconciliation.unrecognized.len(),
            set.synthesized_count(),
        );
        set
    }

    fn fallback(&self, model_id: &str, reason: &str) -> TrainingResultSet {
        self.logger.log_metrics_fallback(model_id, reason);
        for variant in AlgorithmVariant::ALL {
            self.metrics.inc_fallback_training_entry(variant.as_key());
        }
        TrainingResultSet::fallback(model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, accuracy: f64) -> TrainingRecord {
        TrainingRecord {
            model_name: Some(name.to_string()),
            accuracy,
            precision: accuracy - 0.01,
            recall: accuracy - 0.02,
            f1: accuracy - 0.015,
            num_samples: Some(1234),
            updated_at: Some("2025-06-01T12:00:00Z".to_string()),
            ..Default::default()
        }
    }

    const CAREER: &str = "career-path-prediction";
    const EMPLOYMENT: &str = "employment-probability-post-graduation";

    #[test]
    fn test_no_records_fills_every_variant() {
        let outcome = reconcile(CAREER, &[]);
        let set = outcome.set;

        assert_eq!(outcome.matched, 0);
        assert_eq!(set.synthesized_count(), 5);
        // XGBoost has the highest fallback accuracy for the career family
        assert_eq!(set.best_origin, BestOrigin::Computed(AlgorithmVariant::XGBoost));
        assert_eq!(set.best.accuracy, 0.927);
    }

    #[test]
    fn test_records_filtered_by_family() {
        let records = vec![
            record("employment_probability_random_forest", 0.99),
            record("career_path_random_forest", 0.81),
        ];
        let set = reconcile(CAREER, &records).set;

        assert_eq!(set.random_forest.accuracy, 0.81);
        assert_eq!(set.random_forest.source, MetricsSource::Remote);
        assert_eq!(set.random_forest.num_samples, Some(1234));
        assert!(set.random_forest.updated_at.is_some());
    }

    #[test]
    fn test_fetched_best_is_kept_even_if_not_most_accurate() {
        let records = vec![
            record("career_path_best_model", 0.80),
            record("career_path_neural_network", 0.97),
        ];
        let set = reconcile(CAREER, &records).set;

        assert_eq!(set.best_origin, BestOrigin::Fetched);
        assert_eq!(set.best.accuracy, 0.80);
        assert_eq!(set.best.algorithm_type, "Best Model");
    }

    #[test]
    fn test_computed_best_is_most_accurate() {
        let records = vec![record("employment_probability_neural_network", 0.991)];
        let set = reconcile(EMPLOYMENT, &records).set;

        assert_eq!(
            set.best_origin,
            BestOrigin::Computed(AlgorithmVariant::NeuralNetwork)
        );
        for (variant, result) in set.iter() {
            if variant != AlgorithmVariant::Best {
                assert!(set.best.accuracy >= result.accuracy);
            }
        }
    }

    #[test]
    fn test_accuracy_tie_goes_to_later_variant() {
        let records = vec![
            record("career_path_random_forest", 0.95),
            record("career_path_xgboost", 0.95),
        ];
        let set = reconcile(CAREER, &records).set;
        assert_eq!(set.best_origin, BestOrigin::Computed(AlgorithmVariant::XGBoost));
    }

    #[test]
    fn test_unrecognized_records_dropped() {
        let records = vec![record("career_path_svm", 0.99)];
        let outcome = reconcile(CAREER, &records);

        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.unrecognized, vec!["career_path_svm".to_string()]);
        assert_eq!(outcome.set.best.accuracy, 0.927);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let records = vec![
            record("career_path_xgboost_v1", 0.90),
            record("career_path_xgboost_v2", 0.93),
        ];
        let set = reconcile(CAREER, &records).set;
        assert_eq!(set.xgboost.accuracy, 0.93);
    }

    #[test]
    fn test_unknown_model_keeps_nothing() {
        let records = vec![record("career_path_xgboost", 0.99)];
        let outcome = reconcile("salary-forecast", &records);
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.set.synthesized_count(), 5);
    }

    #[test]
    fn test_missing_model_name_skipped() {
        let records = vec![TrainingRecord {
            accuracy: 0.99,
            ..Default::default()
        }];
        assert_eq!(reconcile(CAREER, &records).matched, 0);
    }

    #[test]
    fn test_fallback_set_for_failed_fetch() {
        let set = TrainingResultSet::fallback(EMPLOYMENT);

        assert_eq!(set.best_origin, BestOrigin::Fallback);
        assert_eq!(set.best.accuracy, 0.952);
        assert_eq!(set.best.algorithm_type, "XGBoost Regressor");
        assert_eq!(set.random_forest.accuracy, 0.92);
        assert_eq!(set.neural_network.accuracy, 0.94);
        assert_eq!(set.xgboost, set.best);
        assert_eq!(set.synthesized_count(), 5);
    }
}
