//! Config command - inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use bilifeed_core::mask;
use bilifeed_store::{Settings, default_cache_dir, default_config_dir, default_lang_dir};

use crate::context::AppContext;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration (secrets masked).
    Show,

    /// Show configuration paths.
    Path,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await;
    let settings = masked(ctx.store.get().await);

    match cli.format {
        OutputFormat::Text => {
            let d = &settings.defaults;
            let f = &settings.fetch;
            let s = &settings.summary;
            println!("Bilifeed Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Cookie:          {}", or_dash(&settings.cookie));
            println!("SESSDATA:        {}", or_dash(&settings.sessdata));
            println!("Language:        {}", ctx.lang.lang());
            println!("Cache:           {} ({} min)", settings.cache, settings.cache_ttl_minutes);
            println!("Auto-save auth:  {}", settings.auto_save_auth);
            println!();
            println!("Feed type:       {}", d.feed_type);
            println!("Query mode:      {}", d.query_mode);
            println!("Target authors:  {}", or_dash(&d.target_up_mids));
            println!("Pages:           {}", d.pages);
            println!("Interactive:     {}", d.interactive);
            println!("Endpoint:        {}", d.endpoint);
            println!("Timeout:         {}s", d.timeout_seconds);
            println!("Sort / view:     {} / {}", d.sort, d.view);
            println!("Page size:       {}", d.page_size);
            println!("Keyword:         {}", or_dash(&d.keyword));
            println!("Time window:     {} .. {}", or_dash(&d.time_from), or_dash(&d.time_to));
            println!();
            println!("Request interval: {}s", f.request_interval_seconds);
            println!(
                "Retries:          {} (backoff {}s x{})",
                f.max_retries, f.retry_backoff_seconds, f.retry_backoff_factor
            );
            println!();
            println!("Summary provider: {} ({})", s.provider, s.api_mode);
            println!("Summary model:    {}", or_dash(&s.model));
            println!("Summary API key:  {}", or_dash(&s.api_key));
            println!("Summary base URL: {}", or_dash(&s.base_url));
            println!("Summary limits:   {} items, {}s", s.max_items, s.timeout_seconds);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await;
    let config_dir = default_config_dir();
    let settings_path = ctx.store.path().to_path_buf();
    let cache_dir = default_cache_dir();
    let lang_dir = default_lang_dir();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
            println!("Cache dir:     {}", cache_dir.display());
            println!("Language dir:  {}", lang_dir.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "cache_dir": cache_dir.display().to_string(),
                "lang_dir": lang_dir.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

/// Copy of `settings` with every secret masked.
fn masked(mut settings: Settings) -> Settings {
    for secret in [
        &mut settings.cookie,
        &mut settings.sessdata,
        &mut settings.summary.api_key,
    ] {
        if !secret.is_empty() {
            *secret = mask(secret);
        }
    }
    settings
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
