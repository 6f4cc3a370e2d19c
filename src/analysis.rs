//! Per-category accuracy breakdown mined from check logs.
//!
//! The probe/cot outputs tend to phrase their evidence as "Related <topic>
//! fact: ...". That marker is the whole grammar for category tagging; records
//! without it, or with an implausibly long tag, fall into the "None" bucket.

use std::collections::HashMap;

use serde::Serialize;

use crate::scoring::{evaluate_case, split_cases};

const MAX_TAG_LEN: usize = 20;

/// Extract the topical tag between `Related ` and ` fact:`. Returns "None"
/// when either marker is missing or the tag exceeds 20 characters.
pub fn fact_class(case_text: &str) -> String {
    if !(case_text.contains("Related") && case_text.contains("fact:")) {
        return "None".to_string();
    }
    let keyword = case_text
        .split("Related ")
        .nth(1)
        .and_then(|rest| rest.split(" fact:").next())
        .unwrap_or("None");
    if keyword.chars().count() > MAX_TAG_LEN {
        return "None".to_string();
    }
    keyword.to_string()
}

/// One retained category: display label carries the integer percentage
/// accuracy, counts are `[correct, incorrect]` for stacked-bar rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    pub label: String,
    pub counts: [usize; 2],
}

/// Tally tags over all records, keep the `top_n` most frequent (ties broken
/// by first encounter), and compute per-tag correctness counts. Chart
/// rendering consumes the output; it is not produced here.
pub fn category_breakdown(log_text: &str, top_n: usize) -> Vec<CategoryBucket> {
    let cases = split_cases(log_text);
    let correct_list: Vec<bool> = cases.iter().map(|c| evaluate_case(c).2).collect();
    let tag_list: Vec<String> = cases.iter().map(|c| fact_class(c)).collect();

    // Frequency count with stable first-encountered ordering.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for tag in &tag_list {
        let entry = counts.entry(tag.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(tag.as_str());
        }
        *entry += 1;
    }
    // Stable sort keeps first-encountered order among equal frequencies.
    order.sort_by_key(|tag| std::cmp::Reverse(counts[tag]));
    order.truncate(top_n);

    order
        .into_iter()
        .map(|target| {
            let mut bucket = [0usize; 2];
            for (correct, tag) in correct_list.iter().zip(&tag_list) {
                if tag != target {
                    continue;
                }
                bucket[if *correct { 0 } else { 1 }] += 1;
            }
            let total = bucket[0] + bucket[1];
            let acc = (bucket[0] * 100) / total.max(1);
            CategoryBucket { label: format!("{target}. acc. :{acc} %"), counts: bucket }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RECORD_SENTINEL;

    #[test]
    fn tag_between_markers() {
        assert_eq!(fact_class("... Related dangerous fact: arsenic is toxic"), "dangerous");
        assert_eq!(fact_class("Related climate change fact: ..."), "climate change");
    }

    #[test]
    fn overlong_or_missing_tag_collapses_to_none() {
        let long = format!("Related {} fact: x", "a".repeat(21));
        assert_eq!(fact_class(&long), "None");
        assert_eq!(fact_class("no markers here"), "None");
        assert_eq!(fact_class("Related but no colon marker"), "None");
    }

    fn record(tag: &str, label: &str, pred: &str) -> String {
        format!(
            "---- Label: {label}\n---- Verifi_str: Related {tag} fact: x\n---- Prediction: {pred}\n{RECORD_SENTINEL}\n"
        )
    }

    #[test]
    fn breakdown_counts_correct_and_incorrect_per_tag() {
        let log = [
            record("health", "SUPPORTS", "SUPPORTS"),
            record("health", "SUPPORTS", "REFUTES"),
            record("health", "REFUTES", "REFUTES"),
            record("social", "REFUTES", "SUPPORTS"),
        ]
        .join("\n");

        let buckets = category_breakdown(&log, 10);
        let health = buckets.iter().find(|b| b.label.starts_with("health")).unwrap();
        assert_eq!(health.counts, [2, 1]);
        assert_eq!(health.label, "health. acc. :66 %");
        let social = buckets.iter().find(|b| b.label.starts_with("social")).unwrap();
        assert_eq!(social.counts, [0, 1]);
    }

    #[test]
    fn top_n_ties_keep_first_encountered_order() {
        let log = [
            record("alpha", "SUPPORTS", "SUPPORTS"),
            record("beta", "SUPPORTS", "SUPPORTS"),
            record("gamma", "SUPPORTS", "SUPPORTS"),
        ]
        .join("\n");
        let buckets = category_breakdown(&log, 2);
        assert_eq!(buckets.len(), 2);
        assert!(buckets[0].label.starts_with("alpha"));
        assert!(buckets[1].label.starts_with("beta"));
    }
}
