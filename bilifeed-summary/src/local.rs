//! Local extractive summary.
//!
//! Needs no network and always cites real sources, so it doubles as the
//! fallback for every provider failure.

use bilifeed_core::{Localizer, SummarySentence, SummarySource, summarize_text};

use crate::redact::safe_text;

/// Sources cited by the content-types sentence.
const TYPES_REFS: usize = 5;
/// Sources whose titles form the recent-focus sentence.
const RECENT_REFS: usize = 4;
/// Title length in the recent-focus sentence.
const RECENT_TITLE_LIMIT: usize = 50;
/// Kinds listed in the content-types sentence.
const TOP_KINDS: usize = 3;

/// Builds up to three grounded sentences from `sources`.
pub fn local_summary(sources: &[SummarySource], lang: &Localizer) -> Vec<SummarySentence> {
    if sources.is_empty() {
        return Vec::new();
    }

    let mut sentences = vec![SummarySentence::new(
        lang.t_or(
            "local_summary_collected",
            "Collected {count} dynamics in the selected range.",
            &[("count", &sources.len().to_string())],
        ),
        vec![1],
    )];

    let kinds = kind_counts(sources);
    if kinds.len() > 1 {
        let value = kinds
            .iter()
            .take(TOP_KINDS)
            .map(|(kind, count)| format!("{kind}:{count}"))
            .collect::<Vec<_>>()
            .join(", ");
        sentences.push(SummarySentence::new(
            lang.t_or(
                "local_summary_types",
                "Main content types are {value}.",
                &[("value", &value)],
            ),
            (1..=sources.len().min(TYPES_REFS)).collect(),
        ));
    }

    let recent: Vec<usize> = (1..=sources.len().min(RECENT_REFS)).collect();
    let titles: Vec<String> = sources
        .iter()
        .take(RECENT_REFS)
        .map(|s| safe_text(&s.post.title))
        .filter(|title| !title.is_empty())
        .map(|title| summarize_text(&title, RECENT_TITLE_LIMIT))
        .collect();
    if !titles.is_empty() {
        sentences.push(SummarySentence::new(
            lang.t_or(
                "local_summary_recent",
                "Recent focus includes: {value}.",
                &[("value", &titles.join("; "))],
            ),
            recent,
        ));
    }

    sentences
}

/// Kind frequencies, most common first; ties keep first-seen order.
fn kind_counts(sources: &[SummarySource]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for source in sources {
        let kind = safe_text(&source.post.kind);
        let kind = if kind.is_empty() {
            "UNKNOWN".to_string()
        } else {
            kind
        };
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
