//! Summary command - attributed summary of one author's dynamics.

use anyhow::Result;
use clap::Args;

use bilifeed_core::PostRecord;
use bilifeed_summary::summarize_user_dynamics;

use crate::args::{FetchArgs, SummaryFlags, summary_options};
use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::fetch::{Collected, collect};

/// Arguments for the summary command.
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Author id (mid) to summarize.
    #[arg(long)]
    pub author: String,

    #[command(flatten)]
    pub fetch: FetchArgs,

    #[command(flatten)]
    pub summary: SummaryFlags,
}

/// Runs the summary command.
pub async fn run(args: &SummaryArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load(cli).await;
    let Collected { posts, mut settings } = collect(&args.fetch, &ctx, cli).await?;

    let mid = args.author.trim();
    let author_posts = posts_of(posts, mid);
    if author_posts.is_empty() {
        println!("{}", ctx.lang.t("author_not_found", &[("mid", mid)]));
        return Ok(());
    }
    let name = author_posts
        .iter()
        .map(|p| p.author_name.as_str())
        .find(|n| !n.is_empty())
        .unwrap_or(mid)
        .to_string();

    args.summary.apply(&mut settings.summary);
    let options = summary_options(&settings.summary);
    let report = summarize_user_dynamics(&author_posts, &options, &ctx.lang).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::for_stdout(settings.ui_wrap_width.into());
            println!("{}", formatter.format_summary(&report, &name, &ctx.lang));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_summary(&report, mid, &name)?);
        }
    }

    Ok(())
}

fn posts_of(posts: Vec<PostRecord>, mid: &str) -> Vec<PostRecord> {
    posts.into_iter().filter(|p| p.author_id == mid).collect()
}
