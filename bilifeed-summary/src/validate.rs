//! Grounding validation for model-produced sentences.

use bilifeed_core::SummarySentence;
use serde_json::Value;

use crate::redact::safe_text;

/// Keeps the `summary` rows that cite at least one valid source.
///
/// A row needs a non-empty `sentence` string and a `refs` list. Refs are
/// coerced to integers; anything outside `1..=source_count`, uncoercible
/// or repeated is dropped, keeping first-seen order.
pub fn normalize_summary(payload: &Value, source_count: usize) -> Vec<SummarySentence> {
    let Some(rows) = payload.get("summary").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let row = row.as_object()?;
            let sentence = safe_text(row.get("sentence")?.as_str()?);
            let refs = row.get("refs")?.as_array()?;
            if sentence.is_empty() {
                return None;
            }

            let mut clean: Vec<usize> = Vec::new();
            for idx in refs.iter().filter_map(coerce_ref) {
                if (1..=source_count).contains(&idx) && !clean.contains(&idx) {
                    clean.push(idx);
                }
            }
            (!clean.is_empty()).then(|| SummarySentence::new(sentence, clean))
        })
        .collect()
}

/// Integer, float (truncated) or numeric string; negatives are rejected.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_ref(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                usize::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as usize)
            }
        }
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}
