//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use catalog_widget::WidgetConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let widget = &ctx.config.widget;
    ctx.output.info("");
    ctx.output.info("[widget]");
    ctx.output.kv("debounce_ms", &widget.debounce_ms.to_string());
    ctx.output.kv("page_size", &widget.page_size.to_string());
    ctx.output.kv("placeholder_image", &widget.placeholder_image);
    ctx.output.kv(
        "refresh_images_on_connect",
        &widget.refresh_images_on_connect.to_string(),
    );

    ctx.output.info("");
    ctx.output.info("[fixtures]");
    ctx.output.kv(
        "catalog",
        ctx.config.fixtures.catalog.as_deref().unwrap_or("(sample)"),
    );
    if let Some(ref account) = ctx.config.fixtures.account {
        ctx.output.kv("account", account);
    }

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = ctx.config_path.as_ref() else {
        bail!("No config file found. Run `catalog config init` to create one.");
    };
    let config_path = config_path.to_string_lossy().to_string();

    let mut config = CliConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.widget.validate()?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut warnings: Vec<String> = Vec::new();

    ctx.config.widget.validate()?;

    if ctx.config.widget.debounce_ms == 0 {
        warnings.push("widget.debounce_ms is 0; every keystroke will search".to_string());
    }

    if let Some(ref catalog) = ctx.config.fixtures.catalog {
        if !ctx.resolve_path(catalog).exists() {
            bail!("fixtures.catalog '{}' does not exist", catalog);
        }
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let widget: &WidgetConfig = &config.widget;

    match parts.as_slice() {
        ["widget", "debounce_ms"] => Ok(widget.debounce_ms.to_string()),
        ["widget", "page_size"] => Ok(widget.page_size.to_string()),
        ["widget", "placeholder_image"] => Ok(widget.placeholder_image.clone()),
        ["widget", "refresh_images_on_connect"] => Ok(widget.refresh_images_on_connect.to_string()),
        ["fixtures", "catalog"] => Ok(config.fixtures.catalog.clone().unwrap_or_default()),
        ["fixtures", "account"] => Ok(config.fixtures.account.clone().unwrap_or_default()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["widget", "debounce_ms"] => config.widget.debounce_ms = value.parse()?,
        ["widget", "page_size"] => config.widget.page_size = value.parse()?,
        ["widget", "placeholder_image"] => config.widget.placeholder_image = value.to_string(),
        ["widget", "refresh_images_on_connect"] => {
            config.widget.refresh_images_on_connect = value.parse()?
        }
        ["fixtures", "catalog"] => config.fixtures.catalog = Some(value.to_string()),
        ["fixtures", "account"] => config.fixtures.account = Some(value.to_string()),
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}
