//! Sample generation and prediction commands

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tabled::Tabled;
use workbench_lib::presenter::{PresentedOutcome, PresentedPrediction};
use workbench_lib::{generate_sample, Catalog, Event, InputValues, Workbench};

use crate::output::{
    color_band, color_impact, print_error, print_json, print_success, render_table, OutputFormat,
};
use crate::session::find_model;

/// Parse a `key=value` pair from the command line
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Tabled)]
struct InputRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct RankedRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Career Path")]
    label: String,
    #[tabled(rename = "Probability")]
    probability: String,
    #[tabled(rename = "Note")]
    note: String,
}

#[derive(Tabled)]
struct FactorRow {
    #[tabled(rename = "Factor")]
    name: String,
    #[tabled(rename = "Impact")]
    impact: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Print a generated sample for one model
pub fn show_sample(
    catalog: &Catalog,
    query: &str,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let model = find_model(catalog, query)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let sample = generate_sample(model, &mut rng);

    match format {
        OutputFormat::Json => print_json(&sample)?,
        OutputFormat::Table => print_inputs(&sample),
    }
    Ok(())
}

/// Fill inputs, submit, and print the presented result
pub async fn run_prediction(
    workbench: &mut Workbench,
    query: &str,
    inputs: Vec<(String, String)>,
    use_sample: bool,
    format: OutputFormat,
) -> Result<()> {
    let model = find_model(workbench.state().catalog(), query)?.clone();
    workbench
        .dispatch(Event::ModelSelectedWithoutMetrics(model.id.clone()))
        .await?;

    if use_sample {
        workbench.dispatch(Event::SampleRequested).await?;
    }
    for (name, raw) in inputs {
        let field = model
            .field(&name)
            .ok_or_else(|| anyhow!("Model '{}' has no input named '{}'", model.id, name))?;
        let value = field.parse_value(&raw);
        workbench
            .dispatch(Event::InputChanged { field: name, value })
            .await?;
    }

    if format == OutputFormat::Table {
        if let Some(selection) = workbench.state().selection() {
            println!("{}", "Inputs".bold());
            print_inputs(&selection.inputs);
        }
    }

    workbench.dispatch(Event::PredictRequested).await?;

    if let Some(err) = workbench.state().last_error() {
        if format == OutputFormat::Json {
            print_json(&serde_json::json!({ "error": err.kind(), "message": err.to_string() }))?;
        }
        bail!("{}", err);
    }

    let presented = workbench
        .state()
        .presented()
        .ok_or_else(|| anyhow!("No prediction result"))?;

    match format {
        OutputFormat::Json => print_json(&presented)?,
        OutputFormat::Table => print_presented(&presented),
    }
    Ok(())
}

fn print_inputs(inputs: &InputValues) {
    let rows: Vec<InputRow> = inputs
        .iter()
        .map(|(field, value)| InputRow {
            field: field.clone(),
            value: match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
        .collect();
    println!("{}", render_table(rows));
}

fn print_presented(presented: &PresentedPrediction) {
    println!();
    print_success(&format!("Prediction from {}", presented.model_name));
    println!(
        "Model Accuracy: {}%  Confidence: {}%",
        presented.model_accuracy, presented.model_confidence
    );
    println!();

    match &presented.outcome {
        PresentedOutcome::Classification { predictions } => {
            if predictions.is_empty() {
                print_error("The model returned no career paths");
                return;
            }
            println!("{}", "Top career paths based on your profile".bold());
            let rows: Vec<RankedRow> = predictions
                .iter()
                .map(|p| RankedRow {
                    rank: p.rank,
                    label: p.label.clone(),
                    probability: color_band(p.band, &p.percent),
                    note: p.note.to_string(),
                })
                .collect();
            println!("{}", render_table(rows));
        }
        PresentedOutcome::Probability {
            percent,
            band,
            summary,
            factors,
            ..
        } => {
            println!("Employment Probability: {}", color_band(*band, percent));
            println!("{}", summary);
            if factors.is_empty() {
                return;
            }
            println!("\n{}", "Key factors affecting this prediction".bold());
            let rows: Vec<FactorRow> = factors
                .iter()
                .map(|f| FactorRow {
                    name: f.name.clone(),
                    impact: color_impact(f.impact),
                    weight: f.weight.map(|w| format!("{}%", w)).unwrap_or_default(),
                })
                .collect();
            println!("{}", render_table(rows));
        }
    }
}
