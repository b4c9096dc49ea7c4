//! Persisted CLI settings

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::output::{print_json, print_success, OutputFormat};

#[derive(Serialize)]
struct ShownConfig<'a> {
    path: String,
    api_url: Option<&'a str>,
    api_token: Option<&'static str>,
    default_format: Option<&'a str>,
}

/// Print the config file contents with the token masked
pub fn show(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load_from(&path)?;
    let shown = ShownConfig {
        path: path.display().to_string(),
        api_url: config.api_url.as_deref(),
        api_token: config.api_token.as_ref().map(|_| "********"),
        default_format: config.default_format.as_deref(),
    };

    match format {
        OutputFormat::Json => print_json(&shown)?,
        OutputFormat::Table => {
            println!("Config file:    {}", shown.path);
            println!("API URL:        {}", shown.api_url.unwrap_or("(default)"));
            println!("API token:      {}", shown.api_token.unwrap_or("(none)"));
            println!("Default format: {}", shown.default_format.unwrap_or("table"));
        }
    }
    Ok(())
}

/// Store the backend base URL
pub fn set_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL '{}'", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme '{}'", parsed.scheme());
    }

    let mut config = Config::load()?;
    config.api_url = Some(url.trim_end_matches('/').to_string());
    let path = config.save()?;
    print_success(&format!("API URL saved to {}", path.display()));
    Ok(())
}

/// Store or clear the bearer token
pub fn set_token(token: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    config.api_token = token.filter(|t| !t.trim().is_empty());
    let cleared = config.api_token.is_none();
    let path = config.save()?;
    if cleared {
        print_success(&format!("API token cleared in {}", path.display()));
    } else {
        print_success(&format!("API token saved to {}", path.display()));
    }
    Ok(())
}

/// Store the default output format
pub fn set_format(format: OutputFormat) -> Result<()> {
    let mut config = Config::load()?;
    config.default_format = Some(
        match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
        .to_string(),
    );
    let path = config.save()?;
    print_success(&format!("Default format saved to {}", path.display()));
    Ok(())
}
