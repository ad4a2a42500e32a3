//! Authors command - fetched authors with post counts.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use bilifeed_core::{group_by_author, match_author_keyword};

use crate::args::FetchArgs;
use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::fetch::{Collected, collect};

/// Arguments for the authors command.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthorsArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Keep authors whose name or id contains every term. Remembered for
    /// the next run; pass an empty string to clear it.
    #[arg(long)]
    pub filter: Option<String>,
}

/// Runs the authors command.
pub async fn run(args: &AuthorsArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await;
    let Collected { posts, settings } = collect(&args.fetch, &ctx, cli).await?;

    let keyword = match &args.filter {
        Some(filter) => {
            let filter = filter.trim();
            if ctx.store.persist_up_filter_keyword(filter).await? {
                debug!(keyword = filter, "Author filter saved");
            }
            filter.to_string()
        }
        None => settings.defaults.up_filter_keyword.clone(),
    };

    let entries = match_author_keyword(group_by_author(&posts, settings.defaults.sort), &keyword);

    match cli.format {
        OutputFormat::Text => {
            if entries.is_empty() && !keyword.is_empty() {
                println!("{}", ctx.lang.t("no_author_match", &[("keyword", &keyword)]));
            } else {
                let formatter = TextFormatter::for_stdout(settings.ui_wrap_width.into());
                println!("{}", formatter.format_authors(&entries, &ctx.lang));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_authors(&entries)?);
        }
    }

    Ok(())
}
