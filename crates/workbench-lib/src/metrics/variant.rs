//! Algorithm variants and record-name classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Candidate training approach for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmVariant {
    Best,
    RandomForest,
    #[serde(rename = "xgboost")]
    XGBoost,
    NeuralNetwork,
    LogisticRegression,
}

/// Record name matched no known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized algorithm variant in record name {0:?}")]
pub struct UnrecognizedVariant(pub String);

/// Record-name fragments in match order; the first contained fragment wins
const RECORD_VOCABULARY: &[(&str, AlgorithmVariant)] = &[
    ("best_model", AlgorithmVariant::Best),
    ("random_forest", AlgorithmVariant::RandomForest),
    ("xgboost", AlgorithmVariant::XGBoost),
    ("neural_network", AlgorithmVariant::NeuralNetwork),
    ("logistic_regression", AlgorithmVariant::LogisticRegression),
];

impl AlgorithmVariant {
    pub const ALL: [AlgorithmVariant; 5] = [
        AlgorithmVariant::Best,
        AlgorithmVariant::RandomForest,
        AlgorithmVariant::XGBoost,
        AlgorithmVariant::NeuralNetwork,
        AlgorithmVariant::LogisticRegression,
    ];

    /// Every variant that is a concrete algorithm, in tie-break order
    pub const CANDIDATES: [AlgorithmVariant; 4] = [
        AlgorithmVariant::RandomForest,
        AlgorithmVariant::XGBoost,
        AlgorithmVariant::NeuralNetwork,
        AlgorithmVariant::LogisticRegression,
    ];

    /// Classify a backend training record by its name
    pub fn from_record_name(name: &str) -> Result<Self, UnrecognizedVariant> {
        RECORD_VOCABULARY
            .iter()
            .find(|(fragment, _)| name.contains(fragment))
            .map(|(_, variant)| *variant)
            .ok_or_else(|| UnrecognizedVariant(name.to_string()))
    }

    /// Stable snake_case key
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::RandomForest => "random_forest",
            Self::XGBoost => "xgboost",
            Self::NeuralNetwork => "neural_network",
            Self::LogisticRegression => "logistic_regression",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Best => "Best Model",
            Self::RandomForest => "Random Forest",
            Self::XGBoost => "XGBoost",
            Self::NeuralNetwork => "Neural Network",
            Self::LogisticRegression => "Logistic Regression",
        }
    }
}

impl fmt::Display for AlgorithmVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AlgorithmVariant {
    type Err = UnrecognizedVariant;

    /// Accepts keys with either `_` or `-` separators, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "best" | "best_model" => Ok(Self::Best),
            "random_forest" | "rf" => Ok(Self::RandomForest),
            "xgboost" | "xgb" => Ok(Self::XGBoost),
            "neural_network" | "nn" => Ok(Self::NeuralNetwork),
            "logistic_regression" | "lr" => Ok(Self::LogisticRegression),
            _ => Err(UnrecognizedVariant(s.to_string())),
        }
    }
}
