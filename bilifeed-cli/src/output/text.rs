//! Text output formatting with colors.

use std::io::IsTerminal;

use bilifeed_core::{
    AuthorEntry, Localizer, PostRecord, SummaryReport, format_ts, kind_label, summarize_text,
};
use bilifeed_store::ViewMode;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Characters of post text shown in a one-line listing.
const LINE_TEXT_LIMIT: usize = 80;
/// Characters of a whole one-line listing entry.
const LINE_LIMIT: usize = 120;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    wrap_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool, wrap_width: usize) -> Self {
        Self {
            use_colors,
            wrap_width: wrap_width.max(20),
        }
    }

    /// Formatter for stdout, colored only on a terminal.
    pub fn for_stdout(wrap_width: usize) -> Self {
        Self::new(std::io::stdout().is_terminal(), wrap_width)
    }

    /// Formats the author list with post counts.
    pub fn format_authors(&self, entries: &[AuthorEntry], lang: &Localizer) -> String {
        let mut lines = vec![self.bold(&lang.t(
            "authors_header",
            &[("count", &entries.len().to_string())],
        ))];
        lines.push("─".repeat(40));
        for entry in entries {
            lines.push(format!("  {}", author_label(entry, lang)));
        }
        lines.join("\n")
    }

    /// Formats one author's posts, split into listing pages of `page_size`.
    pub fn format_records(
        &self,
        entry: &AuthorEntry,
        view: ViewMode,
        page_size: usize,
        lang: &Localizer,
    ) -> String {
        let mut lines = vec![self.bold(&author_label(entry, lang))];
        let page_size = page_size.max(1);
        let total = entry.posts.len().div_ceil(page_size).max(1);

        for (page, chunk) in entry.posts.chunks(page_size).enumerate() {
            if total > 1 {
                lines.push(self.dim(&lang.t(
                    "page_of",
                    &[("page", &(page + 1).to_string()), ("total", &total.to_string())],
                )));
            }
            for (offset, post) in chunk.iter().enumerate() {
                let index = page * page_size + offset + 1;
                match view {
                    ViewMode::Summary => lines.push(format!("  {}", summary_line(index, post))),
                    ViewMode::Detail => {
                        lines.push(format!("  [{index}]"));
                        lines.push(self.format_detail(post, lang, "    "));
                    }
                }
            }
        }
        lines.join("\n")
    }

    /// Formats every field of one post.
    pub fn format_detail(&self, post: &PostRecord, lang: &Localizer, indent: &str) -> String {
        let mut lines = Vec::new();
        let mut field = |label: &str, value: &str| {
            lines.push(format!("{indent}{}: {value}", self.dim(label)));
        };

        field(
            &lang.t("label_kind", &[]),
            &format!("{} ({})", kind_label(&post.kind, lang), post.id),
        );
        field(&lang.t("label_time", &[]), &format_ts(post.published_at));
        if !post.title.is_empty() {
            field(&lang.t("label_title", &[]), &post.title);
        }
        if !post.url.is_empty() {
            field(&lang.t("label_url", &[]), &post.url);
        }
        if !post.media.is_empty() {
            field(&lang.t("label_media", &[]), &post.media.len().to_string());
        }
        if !post.text.is_empty() {
            lines.push(format!("{indent}{}:", self.dim(&lang.t("label_text", &[]))));
            for line in wrap(&post.text, self.wrap_width) {
                lines.push(format!("{indent}  {line}"));
            }
        }
        if let Some(origin) = &post.reshared_from {
            let name = if origin.author_name.is_empty() {
                "-"
            } else {
                origin.author_name.as_str()
            };
            lines.push(format!(
                "{indent}{}",
                self.cyan(&lang.t("label_reshared", &[("name", name)]))
            ));
            lines.push(self.format_detail(origin, lang, &format!("{indent}  ")));
        }
        lines.join("\n")
    }

    /// Formats a summary report: sentences with their refs, then sources.
    pub fn format_summary(&self, report: &SummaryReport, name: &str, lang: &Localizer) -> String {
        let mut lines = vec![self.bold(&lang.t("summary_title", &[("name", name)]))];
        lines.push("─".repeat(40));
        lines.push(self.dim(&lang.t(
            "summary_provider_used",
            &[("provider", &report.provider)],
        )));
        if !report.error.is_empty() {
            let detail = if report.error_detail.trim().is_empty() {
                "-"
            } else {
                report.error_detail.trim()
            };
            lines.push(self.yellow(&lang.t(
                "summary_notice",
                &[("error", &report.error), ("detail", detail)],
            )));
        }
        lines.push(String::new());

        for (i, sentence) in report.sentences.iter().enumerate() {
            let refs: String = sentence.refs.iter().map(|r| format!("[{r}]")).collect();
            let text = format!("{}. {} {}", i + 1, sentence.sentence, self.cyan(&refs));
            for (n, line) in wrap(&text, self.wrap_width).into_iter().enumerate() {
                lines.push(if n == 0 { line } else { format!("   {line}") });
            }
        }

        if !report.sources.is_empty() {
            lines.push(String::new());
            lines.push(self.bold(&lang.t("summary_sources", &[])));
            for source in &report.sources {
                let label = if source.post.title.is_empty() {
                    source.snippet.as_str()
                } else {
                    source.post.title.as_str()
                };
                lines.push(format!(
                    "  [{}] {} | {} | {}",
                    source.index,
                    source.time,
                    kind_label(&source.post.kind, lang),
                    summarize_text(label, LINE_TEXT_LIMIT)
                ));
                if !source.post.url.is_empty() {
                    lines.push(format!("      {}", self.dim(&source.post.url)));
                }
            }
        }
        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn author_label(entry: &AuthorEntry, lang: &Localizer) -> String {
    lang.t(
        "up_item_label",
        &[
            ("name", &entry.author_name),
            ("mid", &entry.author_id),
            ("count", &entry.count().to_string()),
        ],
    )
}

/// `[n] title | text | time`, truncated to one line.
pub(crate) fn summary_line(index: usize, post: &PostRecord) -> String {
    let line = format!(
        "[{index}] {} | {} | {}",
        post.title,
        summarize_text(&post.text, LINE_TEXT_LIMIT),
        format_ts(post.published_at)
    );
    summarize_text(&line, LINE_LIMIT)
}

/// Greedy word wrap by character count. Words longer than `width` are
/// split, which also covers text without spaces.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(width) {
                let piece_len = piece.len();
                if len > 0 && len + 1 + piece_len > width {
                    lines.push(std::mem::take(&mut current));
                    len = 0;
                }
                if len > 0 {
                    current.push(' ');
                    len += 1;
                }
                current.extend(piece);
                len += piece_len;
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
