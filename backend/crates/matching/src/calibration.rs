use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::candidate::CandidatePair;

/// A hand-reviewed verdict on whether two contacts are the same person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPair {
    pub left_id: String,
    pub right_id: String,
    pub is_duplicate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    /// Reported pairs that no label covers.
    pub unlabeled_reported: usize,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Compare reported candidates against labeled pairs.
///
/// Labels are unordered; when the same pair is labeled twice the last label
/// wins.
pub fn calibrate(candidates: &[CandidatePair], labels: &[LabeledPair]) -> CalibrationReport {
    let reported: HashSet<(&str, &str)> = candidates
        .iter()
        .map(|c| pair_key(&c.left_id, &c.right_id))
        .collect();

    let verdicts: HashMap<(&str, &str), bool> = labels
        .iter()
        .map(|l| (pair_key(&l.left_id, &l.right_id), l.is_duplicate))
        .collect();

    let mut report = CalibrationReport::default();
    for (key, is_duplicate) in &verdicts {
        match (*is_duplicate, reported.contains(key)) {
            (true, true) => report.true_positives += 1,
            (true, false) => report.false_negatives += 1,
            (false, true) => report.false_positives += 1,
            (false, false) => report.true_negatives += 1,
        }
    }
    report.unlabeled_reported = reported
        .iter()
        .filter(|key| !verdicts.contains_key(*key))
        .count();

    report.precision = ratio(
        report.true_positives,
        report.true_positives + report.false_positives,
    );
    report.recall = ratio(
        report.true_positives,
        report.true_positives + report.false_negatives,
    );
    report.f1 = match (report.precision, report.recall) {
        (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
        (Some(_), Some(_)) => Some(0.0),
        _ => None,
    };

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::RuleTrace;
    use std::collections::BTreeMap;

    fn candidate(left: &str, right: &str) -> CandidatePair {
        CandidatePair {
            left_id: left.to_string(),
            right_id: right.to_string(),
            score: 0.9,
            subscores: BTreeMap::new(),
            rule_trace: RuleTrace {
                scorers: Vec::new(),
                raw_total: 0.9,
                weight_sum: 1.0,
                confidence: 0.9,
            },
        }
    }

    fn label(left: &str, right: &str, is_duplicate: bool) -> LabeledPair {
        LabeledPair {
            left_id: left.to_string(),
            right_id: right.to_string(),
            is_duplicate,
        }
    }

    #[test]
    fn counts_confusion_matrix() {
        let candidates = vec![candidate("a", "b"), candidate("c", "d"), candidate("e", "f")];
        let labels = vec![
            label("b", "a", true),
            label("c", "d", false),
            label("g", "h", true),
            label("i", "j", false),
        ];
        let report = calibrate(&candidates, &labels);
        assert_eq!(report.true_positives, 1);
        assert_eq!(report.false_positives, 1);
        assert_eq!(report.false_negatives, 1);
        assert_eq!(report.true_negatives, 1);
        assert_eq!(report.unlabeled_reported, 1);
        assert_eq!(report.precision, Some(0.5));
        assert_eq!(report.recall, Some(0.5));
        assert_eq!(report.f1, Some(0.5));
    }

    #[test]
    fn no_labels_leaves_rates_undefined() {
        let report = calibrate(&[candidate("a", "b")], &[]);
        assert_eq!(report.unlabeled_reported, 1);
        assert_eq!(report.precision, None);
        assert_eq!(report.recall, None);
        assert_eq!(report.f1, None);
    }

    #[test]
    fn last_label_wins() {
        let labels = vec![label("a", "b", false), label("a", "b", true)];
        let report = calibrate(&[candidate("a", "b")], &labels);
        assert_eq!(report.true_positives, 1);
        assert_eq!(report.false_positives, 0);
    }
}
