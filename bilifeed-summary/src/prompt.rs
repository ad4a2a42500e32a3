//! Prompt construction.

use bilifeed_core::SummarySource;

const INSTRUCTIONS: &str = "You are an assistant summarizing Bilibili dynamics for one creator. \
Given source posts with indices, return strict JSON only.\n\
Required format:\n\
{\"summary\":[{\"sentence\":\"...\",\"refs\":[1,2]}]}\n\
Rules:\n\
1) 3-8 concise sentences.\n\
2) Every sentence must have refs and refs must only use provided indices.\n\
3) Keep statements factual and grounded in sources.\n\
4) Do not include markdown, comments, or extra fields.\n\
Sources:\n";

/// Fixed instructions followed by one `[n] time=... | snippet` line per source.
pub fn build_prompt(sources: &[SummarySource]) -> String {
    let lines: Vec<String> = sources
        .iter()
        .map(|s| format!("[{}] time={} | {}", s.index, s.time, s.snippet))
        .collect();
    format!("{INSTRUCTIONS}{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilifeed_core::PostRecord;

    fn source(index: usize, snippet: &str) -> SummarySource {
        SummarySource {
            index,
            post: PostRecord::default(),
            snippet: snippet.to_string(),
            time: "2024-01-02 03:04".to_string(),
        }
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt(&[source(1, "First"), source(2, "Second | body")]);

        assert!(prompt.starts_with("You are an assistant summarizing Bilibili dynamics"));
        assert!(prompt.contains("{\"summary\":[{\"sentence\":\"...\",\"refs\":[1,2]}]}\n"));
        assert!(prompt.contains("1) 3-8 concise sentences.\n"));
        assert!(prompt.ends_with(
            "Sources:\n[1] time=2024-01-02 03:04 | First\n[2] time=2024-01-02 03:04 | Second | body"
        ));
    }

    #[test]
    fn test_no_line_continuation_artifacts() {
        let prompt = build_prompt(&[]);
        assert!(prompt.contains("one creator. Given source posts"));
        assert!(prompt.contains("\nRules:\n"));
    }
}
