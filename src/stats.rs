use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{question::VoteOption, vote::Vote};

/// Tally of one question's votes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStats {
    pub total_votes: u64,
    pub options: Vec<OptionStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionStat {
    pub option_id: String,
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

impl VoteStats {
    /// Equal totals and equal `(option_id, count)` rows in the same order.
    /// Labels and percentages follow from those, so they are not compared.
    pub fn same_tally(&self, other: &VoteStats) -> bool {
        self.total_votes == other.total_votes
            && self.options.len() == other.options.len()
            && self
                .options
                .iter()
                .zip(&other.options)
                .all(|(a, b)| a.option_id == b.option_id && a.count == b.count)
    }
}

/// Counts votes per option.
///
/// With a non-empty `options` list the output has one row per option, in that
/// order and with its labels, including options nobody picked. Without one,
/// rows follow the order in which option ids first appear in `votes` and are
/// labelled with the id itself.
pub fn calculate_stats(votes: &[Vote], options: Option<&[VoteOption]>) -> VoteStats {
    let total_votes = votes.len() as u64;

    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for vote in votes {
        let count = counts.entry(vote.option_id.as_str()).or_insert_with(|| {
            first_seen.push(vote.option_id.as_str());
            0
        });
        *count += 1;
    }

    let percentage = |count: u64| {
        if total_votes > 0 {
            count as f64 / total_votes as f64 * 100.0
        } else {
            0.0
        }
    };

    let rows = match options.filter(|options| !options.is_empty()) {
        Some(options) => options
            .iter()
            .map(|option| {
                let count = counts.get(option.id.as_str()).copied().unwrap_or(0);
                OptionStat {
                    option_id: option.id.clone(),
                    label: option.label.clone(),
                    count,
                    percentage: percentage(count),
                }
            })
            .collect(),
        None => first_seen
            .into_iter()
            .map(|option_id| {
                let count = counts[option_id];
                OptionStat {
                    option_id: option_id.to_string(),
                    label: option_id.to_string(),
                    count,
                    percentage: percentage(count),
                }
            })
            .collect(),
    };

    VoteStats {
        total_votes,
        options: rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn vote_for(option_id: &str) -> Vote {
        Vote {
            id: uuid::Uuid::new_v4().to_string(),
            question_id: "q1".to_string(),
            option_id: option_id.to_string(),
            device_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        }
    }

    fn option(id: &str, label: &str) -> VoteOption {
        VoteOption {
            id: id.to_string(),
            label: label.to_string(),
            color: None,
        }
    }

    #[test]
    fn two_to_one_split() {
        let votes = vec![vote_for("opt1"), vote_for("opt1"), vote_for("opt2")];
        let options = vec![option("opt1", "Yes"), option("opt2", "No")];

        let stats = calculate_stats(&votes, Some(&options));

        assert_eq!(stats.total_votes, 3);
        assert_eq!(stats.options.len(), 2);
        assert_eq!(stats.options[0].option_id, "opt1");
        assert_eq!(stats.options[0].count, 2);
        assert!((stats.options[0].percentage - 66.67).abs() < 0.01);
        assert_eq!(stats.options[1].option_id, "opt2");
        assert_eq!(stats.options[1].count, 1);
        assert!((stats.options[1].percentage - 33.33).abs() < 0.01);
    }

    #[test]
    fn empty_votes_keep_zero_rows() {
        let options = vec![option("opt1", "Yes"), option("opt2", "No")];

        let stats = calculate_stats(&[], Some(&options));

        assert_eq!(stats.total_votes, 0);
        assert_eq!(stats.options.len(), 2);
        for row in &stats.options {
            assert_eq!(row.count, 0);
            assert_eq!(row.percentage, 0.0);
        }
    }

    #[test]
    fn explicit_options_fix_order_and_labels() {
        let votes = vec![vote_for("c"), vote_for("c"), vote_for("a")];
        let options = vec![option("a", "Alpha"), option("b", "Beta"), option("c", "Gamma")];

        let stats = calculate_stats(&votes, Some(&options));

        let ids: Vec<_> = stats.options.iter().map(|o| o.option_id.as_str()).collect();
        let labels: Vec<_> = stats.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(labels, ["Alpha", "Beta", "Gamma"]);
        assert_eq!(stats.options[1].count, 0);
    }

    #[test]
    fn without_options_rows_follow_first_seen_order() {
        let votes = vec![vote_for("z"), vote_for("m"), vote_for("z"), vote_for("a")];

        let stats = calculate_stats(&votes, None);

        let ids: Vec<_> = stats.options.iter().map(|o| o.option_id.as_str()).collect();
        assert_eq!(ids, ["z", "m", "a"]);
        assert_eq!(stats.options[0].label, "z");
        assert_eq!(stats.options[0].count, 2);
    }

    #[test]
    fn empty_option_list_behaves_like_none() {
        let votes = vec![vote_for("x")];

        let stats = calculate_stats(&votes, Some(&[]));

        assert_eq!(stats.options.len(), 1);
        assert_eq!(stats.options[0].label, "x");
        assert_eq!(stats.options[0].percentage, 100.0);
    }

    #[test]
    fn totals_and_percentages_are_consistent() {
        let options = vec![option("a", "A"), option("b", "B"), option("c", "C")];
        let pattern = ["a", "b", "c", "a", "a", "b", "c", "c", "c", "b", "a"];

        for len in 1..=pattern.len() {
            let votes: Vec<_> = pattern[..len].iter().map(|id| vote_for(id)).collect();
            let stats = calculate_stats(&votes, Some(&options));

            assert_eq!(stats.total_votes, len as u64);
            let count_sum: u64 = stats.options.iter().map(|o| o.count).sum();
            assert_eq!(count_sum, len as u64);

            let pct_sum: f64 = stats.options.iter().map(|o| o.percentage).sum();
            assert!((pct_sum - 100.0).abs() < 0.1, "sum was {pct_sum}");

            for row in &stats.options {
                let expected = row.count as f64 / len as f64 * 100.0;
                assert!((row.percentage - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn same_tally_ignores_labels() {
        let votes = vec![vote_for("a")];
        let labelled = calculate_stats(&votes, Some(&[option("a", "Alpha")]));
        let bare = calculate_stats(&votes, None);

        assert!(labelled.same_tally(&bare));
        assert!(!labelled.same_tally(&VoteStats::default()));
    }
}
