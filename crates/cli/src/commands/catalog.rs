//! Catalog and schema commands

use anyhow::Result;
use tabled::Tabled;
use workbench_lib::{Catalog, CatalogSource, InputField, Model, TextTag};

use crate::output::{print_info, print_json, print_warning, render_table, OutputFormat};
use crate::session::find_model;

/// Row for models table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "Inputs")]
    inputs: usize,
}

/// Row for schema table
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Constraints")]
    constraints: String,
}

/// List catalog models
pub fn list_models(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(catalog)?,
        OutputFormat::Table => {
            if catalog.source() == CatalogSource::BuiltIn {
                print_warning("Backend unavailable or empty, showing built-in models");
            }

            let rows: Vec<ModelRow> = catalog
                .models()
                .iter()
                .map(|m| ModelRow {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    accuracy: format!("{}%", m.accuracy),
                    inputs: m.inputs.len(),
                })
                .collect();

            println!("{}", render_table(rows));
            println!("\nTotal: {} models", catalog.len());
        }
    }

    Ok(())
}

/// Show the input schema of one model
pub fn show_schema(catalog: &Catalog, query: &str, format: OutputFormat) -> Result<()> {
    let model = find_model(catalog, query)?;

    match format {
        OutputFormat::Json => print_json(&model.inputs)?,
        OutputFormat::Table => {
            println!("{} ({})", model.name, model.id);
            if !model.description.is_empty() {
                println!("{}\n", model.description);
            }
            if model.inputs.is_empty() {
                print_info("This model declares no inputs");
                return Ok(());
            }
            println!("{}", render_table(field_rows(model)));
        }
    }

    Ok(())
}

fn field_rows(model: &Model) -> Vec<FieldRow> {
    model
        .inputs
        .iter()
        .map(|field| FieldRow {
            name: field.name().to_string(),
            label: field.label().to_string(),
            kind: field.kind().to_string(),
            constraints: describe_constraints(field),
        })
        .collect()
}

fn describe_constraints(field: &InputField) -> String {
    match field {
        InputField::Select { options, .. } => {
            if options.len() > 4 {
                format!("{}, ... ({} options)", options[..4].join(", "), options.len())
            } else {
                options.join(", ")
            }
        }
        InputField::Number { min, max, step, .. } => match step {
            Some(step) => format!("{} to {}, step {}", min, max, step),
            None => format!("{} to {}", min, max),
        },
        InputField::Text {
            tag, placeholder, ..
        } => match tag {
            TextTag::TechnicalSkills => "comma separated technical skills".to_string(),
            TextTag::SoftSkills => "comma separated soft skills".to_string(),
            TextTag::Free => placeholder.clone().unwrap_or_else(|| "free text".to_string()),
        },
    }
}
