//! Source selection.

use bilifeed_core::{PostRecord, SummarySource, format_ts, summarize_text};

use crate::redact::safe_text;

/// Body length kept in a snippet, in characters.
const SNIPPET_TEXT_LIMIT: usize = 120;

/// Picks the newest `max_items` posts (at least one) and numbers them from 1.
///
/// Posts with the same timestamp keep their input order.
pub fn select_sources(posts: &[PostRecord], max_items: usize) -> Vec<SummarySource> {
    let mut selected: Vec<&PostRecord> = posts.iter().collect();
    selected.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    selected.truncate(max_items.max(1));

    selected
        .into_iter()
        .enumerate()
        .map(|(i, post)| SummarySource {
            index: i + 1,
            snippet: snippet(post),
            time: format_ts(post.published_at),
            post: post.clone(),
        })
        .collect()
}

/// `title | body`, or whichever of the two exists, or `-`.
fn snippet(post: &PostRecord) -> String {
    let title = safe_text(&post.title);
    let text = safe_text(&post.text);
    match (title.is_empty(), text.is_empty()) {
        (false, false) => format!("{title} | {}", summarize_text(&text, SNIPPET_TEXT_LIMIT)),
        (false, true) => title,
        (true, false) => summarize_text(&text, SNIPPET_TEXT_LIMIT),
        (true, true) => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, ts: i64, title: &str, text: &str) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            published_at: ts,
            title: title.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_newest_first_and_capped() {
        let posts = vec![post("a", 10, "", ""), post("b", 30, "", ""), post("c", 20, "", "")];
        let sources = select_sources(&posts, 2);

        let ids: Vec<&str> = sources.iter().map(|s| s.post.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
        assert_eq!(sources[0].index, 1);
        assert_eq!(sources[1].index, 2);
    }

    #[test]
    fn test_zero_cap_keeps_one() {
        let posts = vec![post("a", 10, "", ""), post("b", 30, "", "")];
        assert_eq!(select_sources(&posts, 0).len(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let posts = vec![post("a", 5, "", ""), post("b", 5, "", "")];
        let sources = select_sources(&posts, 10);
        assert_eq!(sources[0].post.id, "a");
        assert_eq!(sources[1].post.id, "b");
    }

    #[test]
    fn test_snippets() {
        assert_eq!(snippet(&post("", 0, "Title", "line\nbody")), "Title | line body");
        assert_eq!(snippet(&post("", 0, "Title", "")), "Title");
        assert_eq!(snippet(&post("", 0, "", "only body")), "only body");
        assert_eq!(snippet(&post("", 0, " ", "\n")), "-");

        let long = "z".repeat(200);
        let s = snippet(&post("", 0, "", &long));
        assert_eq!(s.chars().count(), SNIPPET_TEXT_LIMIT);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn test_unknown_time() {
        let sources = select_sources(&[post("a", 0, "t", "")], 5);
        assert_eq!(sources[0].time, "-");
    }
}
