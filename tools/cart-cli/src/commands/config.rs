//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use market_cart::config::generate_default_config;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("key", &ctx.config.storage.key);
    ctx.output.kv("backend", &ctx.config.storage.backend.to_string());
    ctx.output
        .kv("path", &ctx.config.storage.path.display().to_string());

    ctx.output.info("");
    ctx.output.info("[persist]");
    ctx.output
        .kv("max_retries", &ctx.config.persist.max_retries.to_string());
    ctx.output.kv(
        "backoff_base_ms",
        &ctx.config.persist.backoff_base_ms.to_string(),
    );
    ctx.output.kv(
        "backoff_max_ms",
        &ctx.config.persist.backoff_max_ms.to_string(),
    );

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
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
