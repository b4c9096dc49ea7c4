//! Fallback training metrics
//!
//! Plausible but non-authoritative figures used whenever the backend has no
//! training record for a variant. Every family carries its own table.

use super::variant::AlgorithmVariant;
use crate::models::{MetricsSource, TrainingResult};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Model family a training record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    CareerPath,
    EmploymentProbability,
}

impl ModelFamily {
    /// Family of a catalog model id, if it has one
    pub fn for_model(model_id: &str) -> Option<Self> {
        match model_id {
            "career-path-prediction" => Some(Self::CareerPath),
            "employment-probability-post-graduation" => Some(Self::EmploymentProbability),
            _ => None,
        }
    }

    /// Family used for fallback figures; models without a family borrow the
    /// employment table
    pub fn for_fallback(model_id: &str) -> Self {
        Self::for_model(model_id).unwrap_or(Self::EmploymentProbability)
    }

    /// Substring identifying this family's records
    pub fn record_token(&self) -> &'static str {
        match self {
            Self::CareerPath => "career_path",
            Self::EmploymentProbability => "employment_probability",
        }
    }

    /// Sample count shown when a record does not carry one
    pub fn default_num_samples(&self) -> u64 {
        match self {
            Self::CareerPath => 7_000,
            Self::EmploymentProbability => 5_500,
        }
    }
}

struct FallbackRow {
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1: f64,
    importance: [(&'static str, f64); 4],
}

const CAREER_RANDOM_FOREST: FallbackRow = FallbackRow {
    accuracy: 0.89,
    precision: 0.88,
    recall: 0.87,
    f1: 0.875,
    importance: [
        ("Skills", 38.0),
        ("Degree", 28.0),
        ("GPA", 22.0),
        ("Internship Experience", 12.0),
    ],
};

const CAREER_XGBOOST: FallbackRow = FallbackRow {
    accuracy: 0.927,
    precision: 0.912,
    recall: 0.887,
    f1: 0.899,
    importance: [
        ("Skills", 35.0),
        ("Degree", 30.0),
        ("GPA", 20.0),
        ("Internship Experience", 15.0),
    ],
};

const CAREER_NEURAL_NETWORK: FallbackRow = FallbackRow {
    accuracy: 0.91,
    precision: 0.90,
    recall: 0.89,
    f1: 0.895,
    importance: [
        ("Skills", 32.0),
        ("Degree", 32.0),
        ("GPA", 18.0),
        ("Internship Experience", 18.0),
    ],
};

const CAREER_LOGISTIC_REGRESSION: FallbackRow = FallbackRow {
    accuracy: 0.85,
    precision: 0.84,
    recall: 0.83,
    f1: 0.835,
    importance: [
        ("Skills", 30.0),
        ("Degree", 30.0),
        ("GPA", 25.0),
        ("Internship Experience", 15.0),
    ],
};

const EMPLOYMENT_RANDOM_FOREST: FallbackRow = FallbackRow {
    accuracy: 0.92,
    precision: 0.91,
    recall: 0.90,
    f1: 0.905,
    importance: [
        ("Internship Experience", 42.0),
        ("GPA", 23.0),
        ("Degree", 20.0),
        ("Skills", 15.0),
    ],
};

const EMPLOYMENT_XGBOOST: FallbackRow = FallbackRow {
    accuracy: 0.952,
    precision: 0.935,
    recall: 0.901,
    f1: 0.918,
    importance: [
        ("Internship Experience", 40.0),
        ("GPA", 25.0),
        ("Degree", 20.0),
        ("Skills", 15.0),
    ],
};

const EMPLOYMENT_NEURAL_NETWORK: FallbackRow = FallbackRow {
    accuracy: 0.94,
    precision: 0.93,
    recall: 0.92,
    f1: 0.925,
    importance: [
        ("Internship Experience", 38.0),
        ("GPA", 28.0),
        ("Degree", 18.0),
        ("Skills", 16.0),
    ],
};

const EMPLOYMENT_LOGISTIC_REGRESSION: FallbackRow = FallbackRow {
    accuracy: 0.88,
    precision: 0.87,
    recall: 0.86,
    f1: 0.865,
    importance: [
        ("Internship Experience", 36.0),
        ("GPA", 27.0),
        ("Degree", 22.0),
        ("Skills", 15.0),
    ],
};

/// Date stamped on synthesized entries
pub fn fallback_updated_at() -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(2025, 5, 21)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn row(family: ModelFamily, variant: AlgorithmVariant) -> &'static FallbackRow {
    use AlgorithmVariant::*;
    match (family, variant) {
        (ModelFamily::CareerPath, RandomForest) => &CAREER_RANDOM_FOREST,
        (ModelFamily::CareerPath, Best | XGBoost) => &CAREER_XGBOOST,
        (ModelFamily::CareerPath, NeuralNetwork) => &CAREER_NEURAL_NETWORK,
        (ModelFamily::CareerPath, LogisticRegression) => &CAREER_LOGISTIC_REGRESSION,
        (ModelFamily::EmploymentProbability, RandomForest) => &EMPLOYMENT_RANDOM_FOREST,
        (ModelFamily::EmploymentProbability, Best | XGBoost) => &EMPLOYMENT_XGBOOST,
        (ModelFamily::EmploymentProbability, NeuralNetwork) => &EMPLOYMENT_NEURAL_NETWORK,
        (ModelFamily::EmploymentProbability, LogisticRegression) => {
            &EMPLOYMENT_LOGISTIC_REGRESSION
        }
    }
}

/// Fallback entry for one variant. `Best` maps to the XGBoost row.
pub fn fallback_result(family: ModelFamily, variant: AlgorithmVariant) -> TrainingResult {
    let algorithm = match variant {
        AlgorithmVariant::Best => AlgorithmVariant::XGBoost,
        other => other,
    };
    build(family, algorithm, algorithm.display_name())
}

/// `Best` entry used when the whole fetch failed
pub fn failure_best(family: ModelFamily) -> TrainingResult {
    let label = match family {
        ModelFamily::CareerPath => "XGBoost",
        ModelFamily::EmploymentProbability => "XGBoost Regressor",
    };
    build(family, AlgorithmVariant::XGBoost, label)
}

fn build(family: ModelFamily, variant: AlgorithmVariant, label: &str) -> TrainingResult {
    let row = row(family, variant);
    TrainingResult {
        algorithm_type: label.to_string(),
        accuracy: row.accuracy,
        precision: row.precision,
        recall: row.recall,
        f1: row.f1,
        feature_importance: row
            .importance
            .iter()
            .map(|(name, weight)| (name.to_string(), *weight))
            .collect::<BTreeMap<_, _>>(),
        num_samples: Some(family.default_num_samples()),
        updated_at: fallback_updated_at(),
        source: MetricsSource::Fallback,
    }
}
