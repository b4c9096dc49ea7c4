//! Schema-valid sample inputs
//!
//! Draws a plausible value for every field of a model. Degree fields are
//! drawn first so that specialization and skill fields can follow them.

mod tables;

pub use tables::{
    implausible_options, plausible_range, specializations_for, technical_skills_for,
    GENERIC_TECHNICAL_SKILLS, SOFT_SKILLS, TECHNICAL_SKILLS_BY_FIELD,
};

use crate::models::{InputField, InputValues, Model, TextTag};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::Value;

/// Placeholder for free-text fields
pub const FREE_TEXT_SAMPLE: &str = "Sample data";

const DEGREE_FIELDS: &[&str] = &["degree_program", "degree"];
const TECHNICAL_SKILL_COUNT: (usize, usize) = (3, 7);
const SOFT_SKILL_COUNT: (usize, usize) = (3, 5);
const EPSILON: f64 = 1e-9;

/// Generate a sample input for `model`. Select fields with no options are
/// left out; every other field gets a value its declaration admits.
pub fn generate_sample<R: Rng + ?Sized>(model: &Model, rng: &mut R) -> InputValues {
    let mut values = InputValues::new();

    for field in &model.inputs {
        if let InputField::Select { name, options, .. } = field {
            if DEGREE_FIELDS.contains(&name.as_str()) {
                if let Some(choice) = draw_option(name, options, None, rng) {
                    values.insert(name.clone(), Value::String(choice));
                }
            }
        }
    }

    let degree = DEGREE_FIELDS
        .iter()
        .find_map(|f| values.get(*f).and_then(Value::as_str))
        .map(str::to_string);
    let degree = degree.as_deref();

    for field in &model.inputs {
        if values.contains_key(field.name()) {
            continue;
        }
        let value = match field {
            InputField::Select { name, options, .. } => {
                draw_option(name, options, degree, rng).map(Value::String)
            }
            InputField::Number {
                name,
                min,
                max,
                step,
                ..
            } => Some(draw_number(name, *min, *max, *step, rng)),
            InputField::Text { tag, .. } => Some(Value::String(draw_text(*tag, degree, rng))),
        };
        if let Some(value) = value {
            values.insert(field.name().to_string(), value);
        }
    }

    values
}

/// Pick one option, narrowing the pool by the drawn degree and dropping
/// implausible choices while anything else is left
fn draw_option<R: Rng + ?Sized>(
    name: &str,
    options: &[String],
    degree: Option<&str>,
    rng: &mut R,
) -> Option<String> {
    let mut pool: Vec<&str> = options.iter().map(String::as_str).collect();

    if name == "specialization" {
        let allowed = specializations_for(degree);
        let narrowed: Vec<&str> = pool.iter().copied().filter(|o| allowed.contains(o)).collect();
        if !narrowed.is_empty() {
            pool = narrowed;
        }
    }

    let excluded = implausible_options(name);
    let plausible: Vec<&str> = pool.iter().copied().filter(|o| !excluded.contains(o)).collect();
    if !plausible.is_empty() {
        pool = plausible;
    }

    pool.choose(rng).map(|o| o.to_string())
}

fn draw_number<R: Rng + ?Sized>(
    name: &str,
    min: f64,
    max: f64,
    step: Option<f64>,
    rng: &mut R,
) -> Value {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let (lo, hi) = match plausible_range(name) {
        Some((hint_lo, hint_hi)) if hint_lo.max(lo) <= hint_hi.min(hi) => {
            (hint_lo.max(lo), hint_hi.min(hi))
        }
        _ => (lo, hi),
    };
    let step = step.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(1.0);

    if (step - 1.0).abs() < EPSILON {
        let first = lo.ceil() as i64;
        let last = hi.floor() as i64;
        if first > last {
            return Value::from(lo);
        }
        return Value::from(rng.random_range(first..=last));
    }

    let k_min = (lo / step - EPSILON).ceil() as i64;
    let k_max = (hi / step + EPSILON).floor() as i64;
    if k_min > k_max {
        return Value::from(lo);
    }
    let drawn = rng.random_range(lo..=hi);
    let k = ((drawn / step).round() as i64).clamp(k_min, k_max);
    Value::from(round_to(k as f64 * step, decimals(step)))
}

fn draw_text<R: Rng + ?Sized>(tag: TextTag, degree: Option<&str>, rng: &mut R) -> String {
    match tag {
        TextTag::TechnicalSkills => {
            pick_skills(technical_skills_for(degree), TECHNICAL_SKILL_COUNT, rng)
        }
        TextTag::SoftSkills => pick_skills(SOFT_SKILLS, SOFT_SKILL_COUNT, rng),
        TextTag::Free => FREE_TEXT_SAMPLE.to_string(),
    }
}

fn pick_skills<R: Rng + ?Sized>(pool: &[&str], (lo, hi): (usize, usize), rng: &mut R) -> String {
    let count = rng.random_range(lo..=hi).min(pool.len());
    pool.choose_multiple(rng, count)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decimal places needed to print `step` exactly
fn decimals(step: f64) -> i32 {
    let rendered = step.to_string();
    rendered
        .split_once('.')
        .map(|(_, frac)| frac.len().min(10) as i32)
        .unwrap_or(0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
