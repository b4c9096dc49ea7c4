//! Training metrics commands

use anyhow::{anyhow, Result};
use colored::Colorize;
use tabled::Tabled;
use workbench_lib::metrics::BestOrigin;
use workbench_lib::presenter::TrainingView;
use workbench_lib::workbench::MetricsView;
use workbench_lib::{AlgorithmVariant, Event, MetricsSource, Workbench};

use crate::output::{print_info, print_json, print_warning, render_table, OutputFormat};
use crate::session::find_model;

/// Which variants to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmChoice {
    All,
    One(AlgorithmVariant),
}

/// Parse `all` or any variant spelling accepted by [`AlgorithmVariant`]
pub fn parse_algorithm(raw: &str) -> Result<AlgorithmChoice, String> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(AlgorithmChoice::All);
    }
    raw.parse::<AlgorithmVariant>()
        .map(AlgorithmChoice::One)
        .map_err(|_| {
            format!(
                "unknown algorithm '{}' (expected all, best, random-forest, xgboost, neural-network, logistic-regression)",
                raw
            )
        })
}

/// Row for the all-variants table
#[derive(Tabled)]
struct VariantRow {
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Algorithm")]
    algorithm: String,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "Precision")]
    precision: String,
    #[tabled(rename = "Recall")]
    recall: String,
    #[tabled(rename = "F1")]
    f1: String,
    #[tabled(rename = "Samples")]
    samples: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Tabled)]
struct ImportanceRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Show training metrics for one model
pub async fn show_metrics(
    workbench: &mut Workbench,
    query: &str,
    choice: AlgorithmChoice,
    format: OutputFormat,
) -> Result<()> {
    let model_id = find_model(workbench.state().catalog(), query)?.id.clone();
    workbench.dispatch(Event::ModelSelected(model_id)).await?;

    let variants: Vec<AlgorithmVariant> = match choice {
        AlgorithmChoice::All => AlgorithmVariant::ALL.to_vec(),
        AlgorithmChoice::One(variant) => vec![variant],
    };

    let mut views = Vec::with_capacity(variants.len());
    for variant in variants {
        workbench.dispatch(Event::VariantChosen(variant)).await?;
        let view = workbench
            .state()
            .training_view()
            .ok_or_else(|| anyhow!("Training metrics are still loading"))?;
        views.push(view);
    }

    match format {
        OutputFormat::Json => print_json(&views)?,
        OutputFormat::Table => {
            report_origin(workbench);
            match views.as_slice() {
                [single] => print_single(single),
                all => println!("{}", render_table(all.iter().map(variant_row).collect())),
            }
        }
    }

    Ok(())
}

fn report_origin(workbench: &Workbench) {
    let Some(selection) = workbench.state().selection() else {
        return;
    };
    let MetricsView::Ready(set) = &selection.metrics else {
        return;
    };
    println!("{}", selection.model.name.bold());
    match set.best_origin {
        BestOrigin::Fetched => {}
        BestOrigin::Computed(variant) => {
            print_info(&format!("Best model picked by accuracy: {}", variant))
        }
        BestOrigin::Fallback => {
            print_warning("Training results unavailable, showing reference figures")
        }
    }
}

fn variant_row(view: &TrainingView) -> VariantRow {
    VariantRow {
        variant: view.variant.to_string(),
        algorithm: view.algorithm.clone(),
        accuracy: view.accuracy.clone(),
        precision: view.precision.clone(),
        recall: view.recall.clone(),
        f1: view.f1.clone(),
        samples: view.num_samples.clone(),
        updated: view.updated.clone(),
        source: source_label(view.source),
    }
}

fn source_label(source: MetricsSource) -> String {
    match source {
        MetricsSource::Remote => "remote".green().to_string(),
        MetricsSource::Fallback => "fallback".yellow().to_string(),
    }
}

fn print_single(view: &TrainingView) {
    println!("{}", "=".repeat(50));
    println!("Variant:       {}", view.variant.to_string().cyan());
    println!("Algorithm:     {}", view.algorithm);
    println!("Training Data: {} records", view.num_samples);
    println!("Last Updated:  {}", view.updated);
    println!("Source:        {}", source_label(view.source));
    println!();
    println!(
        "Accuracy {}  Precision {}  Recall {}  F1 {}",
        view.accuracy.bold(),
        view.precision.bold(),
        view.recall.bold(),
        view.f1.bold()
    );

    if view.feature_importance.is_empty() {
        return;
    }
    println!("\n{}", "Feature Importance".bold());
    let rows: Vec<ImportanceRow> = view
        .feature_importance
        .iter()
        .map(|(feature, weight)| ImportanceRow {
            feature: feature.clone(),
            weight: format!("{}%", weight),
        })
        .collect();
    println!("{}", render_table(rows));
}
