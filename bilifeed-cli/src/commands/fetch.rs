//! Fetch command - page through the feed and list posts per author.

use anyhow::{Result, bail};
use tracing::{info, instrument};

use bilifeed_core::{PostRecord, group_by_author};
use bilifeed_fetch::{FetchError, fetch_dynamics};
use bilifeed_store::{CacheStore, Settings, default_cache_dir};

use crate::args::FetchArgs;
use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::progress::ConsoleObserver;
use crate::{Cli, OutputFormat};

/// Posts of one run and the settings they were fetched with.
pub struct Collected {
    /// Filtered posts.
    pub posts: Vec<PostRecord>,
    /// Settings after flag overrides.
    pub settings: Settings,
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await;
    let Collected { posts, settings } = collect(args, &ctx, cli).await?;
    let entries = group_by_author(&posts, settings.defaults.sort);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::for_stdout(settings.ui_wrap_width.into());
            println!("{}", formatter.format_authors(&entries, &ctx.lang));
            for entry in &entries {
                println!();
                println!(
                    "{}",
                    formatter.format_records(
                        entry,
                        settings.defaults.view,
                        settings.defaults.page_size,
                        &ctx.lang
                    )
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_feed(&entries)?);
        }
    }

    Ok(())
}

/// Merges flags over the settings, fetches, and saves auth material when
/// asked to.
///
/// # Errors
///
/// Fails when no cookie is available, a time bound is malformed, or the
/// HTTP client cannot be built.
#[instrument(skip_all)]
pub async fn collect(args: &FetchArgs, ctx: &AppContext, cli: &Cli) -> Result<Collected> {
    let mut settings = ctx.store.get().await;
    args.apply(&mut settings);

    let credentials = args.credentials(&settings);
    if credentials.is_empty() {
        bail!("{}", ctx.lang.t("no_cookies", &[]));
    }
    let options = FetchArgs::fetch_options(&settings, &ctx.lang)?;
    let cache = settings.cache.then(|| CacheStore::new(default_cache_dir()));
    let observer = ConsoleObserver::new(&ctx.lang, cli.quiet);

    let posts = match fetch_dynamics(&credentials, &options, cache, &observer).await {
        Ok(posts) => posts,
        Err(FetchError::NoCredentials) => bail!("{}", ctx.lang.t("no_cookies", &[])),
        Err(e) => return Err(e.into()),
    };
    info!(posts = posts.len(), "Fetch complete");

    if settings.auto_save_auth
        && ctx
            .store
            .persist_auth(&credentials.cookie, &credentials.sessdata)
            .await?
        && !cli.quiet
    {
        let path = ctx.store.path().display().to_string();
        eprintln!("{}", ctx.lang.t("auth_saved", &[("path", &path)]));
    }

    Ok(Collected { posts, settings })
}
