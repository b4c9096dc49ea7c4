//! Core data models for the workbench

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name → submitted value for a prediction request
pub type InputValues = BTreeMap<String, Value>;

/// A predictive model with its typed input schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub description: String,
    pub accuracy: f64,
    pub inputs: Vec<InputField>,
}

impl Model {
    /// Build a model whose id is the slug of its name
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        accuracy: f64,
        inputs: Vec<InputField>,
    ) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            description: description.into(),
            accuracy,
            inputs,
        }
    }

    /// Look up an input field by name
    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name() == name)
    }
}

/// Lower-case the name and replace every whitespace run with a single `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

/// Semantic hint attached to free-text fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTag {
    /// Comma separated technical skills, drawn per degree
    TechnicalSkills,
    /// Comma separated soft skills
    SoftSkills,
    #[default]
    Free,
}

/// One declared input of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputField {
    Select {
        name: String,
        label: String,
        options: Vec<String>,
    },
    Number {
        name: String,
        label: String,
        min: f64,
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    Text {
        name: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default)]
        tag: TextTag,
    },
}

/// Tolerance used when checking step multiples
const STEP_TOLERANCE: f64 = 1e-6;

impl InputField {
    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self::Select {
            name: name.to_string(),
            label: label.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn number(name: &str, label: &str, min: f64, max: f64, step: Option<f64>) -> Self {
        Self::Number {
            name: name.to_string(),
            label: label.to_string(),
            min,
            max,
            step,
        }
    }

    pub fn text(name: &str, label: &str, placeholder: Option<&str>, tag: TextTag) -> Self {
        Self::Text {
            name: name.to_string(),
            label: label.to_string(),
            placeholder: placeholder.map(str::to_string),
            tag,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Select { name, .. } | Self::Number { name, .. } | Self::Text { name, .. } => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Select { label, .. } | Self::Number { label, .. } | Self::Text { label, .. } => {
                label
            }
        }
    }

    /// Short kind name for display
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Number { .. } => "number",
            Self::Text { .. } => "text",
        }
    }

    /// Check a value against the declared type, range and options
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Self::Select { options, .. } => value
                .as_str()
                .map(|s| options.iter().any(|o| o == s))
                .unwrap_or(false),
            Self::Number { min, max, step, .. } => {
                let Some(v) = value.as_f64() else {
                    return false;
                };
                let (lo, hi) = if min <= max { (*min, *max) } else { (*max, *min) };
                if v < lo - STEP_TOLERANCE || v > hi + STEP_TOLERANCE {
                    return false;
                }
                let step = step.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(1.0);
                let ratio = v / step;
                (ratio - ratio.round()).abs() < STEP_TOLERANCE
            }
            Self::Text { .. } => value.is_string(),
        }
    }

    /// Parse operator-supplied text into the value shape this field expects
    pub fn parse_value(&self, raw: &str) -> Value {
        match self {
            Self::Number { .. } => {
                let trimmed = raw.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Value::from(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    Value::from(f)
                } else {
                    Value::String(raw.to_string())
                }
            }
            Self::Select { .. } | Self::Text { .. } => Value::String(raw.to_string()),
        }
    }
}

/// Where a training result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    Remote,
    Fallback,
}

/// Training metrics of one algorithm variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub algorithm_type: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Feature name → weight in percent. Not guaranteed to sum to 100.
    pub feature_importance: BTreeMap<String, f64>,
    pub num_samples: Option<u64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub source: MetricsSource,
}

/// Parse the timestamp formats seen in training records
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
