//! Display-ready views of predictions and training metrics
//!
//! Everything here is a pure function of its inputs. Absent figures are
//! filled from per-model defaults so the rendering layer never has to guess.

use crate::api::{Factor, Impact, PredictionPayload};
use crate::metrics::{fallback_updated_at, AlgorithmVariant, ModelFamily, TrainingResultSet};
use crate::models::{MetricsSource, Model};
use crate::prediction::PredictionResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Coarse classification of a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityBand {
    VeryHigh,
    Good,
    Moderate,
}

impl ProbabilityBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::VeryHigh
        } else if probability >= 0.6 {
            Self::Good
        } else {
            Self::Moderate
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very high",
            Self::Good => "good",
            Self::Moderate => "moderate",
        }
    }

    fn employment_summary(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very high probability of employment after graduation",
            Self::Good => "Good probability of employment after graduation",
            Self::Moderate => "Moderate probability of employment after graduation",
        }
    }
}

/// Accuracy and confidence shown when the response omits them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayDefaults {
    pub accuracy: f64,
    pub confidence: f64,
}

const CLASSIFICATION_DEFAULTS: DisplayDefaults = DisplayDefaults {
    accuracy: 95.2,
    confidence: 87.5,
};

const PROBABILITY_DEFAULTS: DisplayDefaults = DisplayDefaults {
    accuracy: 94.8,
    confidence: 89.2,
};

/// Defaults for a model; models without a family use the entry matching
/// the kind of result they produced
pub fn display_defaults(model_id: &str, payload: &PredictionPayload) -> DisplayDefaults {
    match ModelFamily::for_model(model_id) {
        Some(ModelFamily::CareerPath) => CLASSIFICATION_DEFAULTS,
        Some(ModelFamily::EmploymentProbability) => PROBABILITY_DEFAULTS,
        None => match payload {
            PredictionPayload::Classification(_) => CLASSIFICATION_DEFAULTS,
            PredictionPayload::Probability(_) => PROBABILITY_DEFAULTS,
        },
    }
}

fn rank_note(rank: usize) -> &'static str {
    match rank {
        1 => "Highest match based on your profile and skills",
        2 => "Good alternative career path",
        _ => "Consider this as another option",
    }
}

/// Format a 0..1 ratio as a percentage with one decimal
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub rank: usize,
    pub label: String,
    pub probability: f64,
    pub percent: String,
    pub band: ProbabilityBand,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedFactor {
    pub name: String,
    pub impact: Impact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&Factor> for PresentedFactor {
    fn from(factor: &Factor) -> Self {
        Self {
            name: factor.name.clone(),
            impact: factor.impact,
            weight: factor.weight,
            note: factor
                .weight
                .map(|w| format!("Contributes {}% to the prediction", w)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentedOutcome {
    Classification {
        predictions: Vec<RankedPrediction>,
    },
    Probability {
        probability: f64,
        percent: String,
        band: ProbabilityBand,
        summary: &'static str,
        factors: Vec<PresentedFactor>,
    },
}

/// A prediction ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedPrediction {
    pub model_id: String,
    pub model_name: String,
    pub model_accuracy: f64,
    pub model_confidence: f64,
    pub from_remote: bool,
    pub outcome: PresentedOutcome,
}

/// Merge a prediction with display defaults. `None` in, `None` out.
pub fn present(result: Option<&PredictionResult>, model: &Model) -> Option<PresentedPrediction> {
    let result = result?;
    let payload = &result.payload;
    let defaults = display_defaults(&model.id, payload);

    let outcome = match payload {
        PredictionPayload::Classification(c) => PresentedOutcome::Classification {
            predictions: c
                .predictions
                .iter()
                .enumerate()
                .map(|(i, p)| RankedPrediction {
                    rank: i + 1,
                    label: p.label.clone(),
                    probability: p.probability,
                    percent: percent(p.probability),
                    band: ProbabilityBand::from_probability(p.probability),
                    note: rank_note(i + 1),
                })
                .collect(),
        },
        PredictionPayload::Probability(p) => {
            let band = ProbabilityBand::from_probability(p.probability);
            PresentedOutcome::Probability {
                probability: p.probability,
                percent: percent(p.probability),
                band,
                summary: band.employment_summary(),
                factors: p.factors.iter().map(PresentedFactor::from).collect(),
            }
        }
    };

    Some(PresentedPrediction {
        model_id: model.id.clone(),
        model_name: model.name.clone(),
        model_accuracy: payload.model_accuracy().unwrap_or(defaults.accuracy),
        model_confidence: payload.model_confidence().unwrap_or(defaults.confidence),
        from_remote: result.from_remote,
        outcome,
    })
}

/// Date shown for entries without a usable timestamp
pub const DEFAULT_UPDATED_LABEL: &str = "May 21, 2025";

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.or_else(fallback_updated_at)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| DEFAULT_UPDATED_LABEL.to_string())
}

/// Group digits in thousands: 7000 -> "7,000"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Training metrics of one variant, formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingView {
    pub variant: AlgorithmVariant,
    pub algorithm: String,
    pub accuracy: String,
    pub precision: String,
    pub recall: String,
    pub f1: String,
    /// Highest weight first
    pub feature_importance: Vec<(String, f64)>,
    pub num_samples: String,
    pub updated: String,
    pub source: MetricsSource,
}

pub fn present_training(
    set: &TrainingResultSet,
    variant: AlgorithmVariant,
    model: &Model,
) -> TrainingView {
    let result = set.get(variant);
    let family = ModelFamily::for_fallback(&model.id);

    let accuracy = if result.accuracy > 0.0 {
        percent(result.accuracy)
    } else {
        format!("{}%", model.accuracy)
    };

    let mut importance: Vec<(String, f64)> = result
        .feature_importance
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    importance.sort_by(|a, b| b.1.total_cmp(&a.1));

    TrainingView {
        variant,
        algorithm: result.algorithm_type.clone(),
        accuracy,
        precision: percent(result.precision),
        recall: percent(result.recall),
        f1: percent(result.f1),
        feature_importance: importance,
        num_samples: group_thousands(
            result
                .num_samples
                .filter(|n| *n > 0)
                .unwrap_or_else(|| family.default_num_samples()),
        ),
        updated: format_date(result.updated_at),
        source: result.source,
    }
}
