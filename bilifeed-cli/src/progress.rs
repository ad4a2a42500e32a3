//! Page progress on stderr and the interactive page prompt.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::Mutex;
use tracing::debug;

use bilifeed_core::Localizer;
use bilifeed_fetch::{PageObserver, PageProgress};

type Input = BufReader<Box<dyn AsyncRead + Send + Unpin>>;

/// Reports pagination progress on stderr and reads the continue prompt
/// answer from stdin.
pub struct ConsoleObserver<'a> {
    lang: &'a Localizer,
    quiet: bool,
    // One reader for the whole run so lines buffered past an answer are
    // still there for the next prompt.
    input: Mutex<Input>,
}

impl<'a> ConsoleObserver<'a> {
    /// Creates an observer; `quiet` hides everything except the prompt.
    pub fn new(lang: &'a Localizer, quiet: bool) -> Self {
        Self::with_input(lang, quiet, tokio::io::stdin())
    }

    /// Creates an observer that reads prompt answers from `input`.
    pub fn with_input<R>(lang: &'a Localizer, quiet: bool, input: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let input: Box<dyn AsyncRead + Send + Unpin> = Box::new(input);
        Self {
            lang,
            quiet,
            input: Mutex::new(BufReader::new(input)),
        }
    }

    fn say(&self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

#[async_trait]
impl<'a> PageObserver for ConsoleObserver<'a> {
    fn on_cache_hit(&self, count: usize) {
        self.say(&self.lang.t("cache_hit", &[("count", &count.to_string())]));
    }

    fn on_page(&self, progress: &PageProgress) {
        self.say(&self.lang.t(
            "page_header",
            &[
                ("page", &progress.page.to_string()),
                ("items", &progress.items.to_string()),
                ("has_more", &progress.has_more.to_string()),
            ],
        ));
        if progress.eta_secs > 0 && progress.has_more && progress.page < progress.pages {
            self.say(&self.lang.t(
                "eta_hint",
                &[("seconds", &progress.eta_secs.to_string())],
            ));
        }
    }

    fn on_failure(&self, code: i64, message: &str) {
        self.say(&self.lang.t(
            "request_failed",
            &[("code", &code.to_string()), ("msg", message)],
        ));
    }

    fn on_empty(&self) {
        self.say(&self.lang.t("no_data_in_range", &[]));
    }

    async fn confirm_continue(&self, next_page: u32) -> bool {
        eprint!("{}", self.lang.t("page_continue", &[]));
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut answer).await {
            Ok(0) | Err(_) => false,
            Ok(_) => {
                let go_on = is_continue(&answer);
                debug!(next_page, go_on, "Page prompt answered");
                go_on
            }
        }
    }
}

/// Anything except `q` continues.
fn is_continue(answer: &str) -> bool {
    !answer.trim().eq_ignore_ascii_case("q")
}
