//! Binary classification metrics over predicted probabilities.
//!
//! Labels are treated as positive when `> 0`. Metrics that are undefined for
//! the given labels (e.g. AUC with a single class) come back as `None`.

use std::collections::BTreeMap;

/// Metric names accepted in `eval_metric`.
pub const METRIC_NAMES: [&str; 4] = ["logloss", "auc", "error", "aucpr"];

const EPS: f64 = 1e-15;

/// Mean negative log-likelihood, probabilities clipped to `[eps, 1 - eps]`.
pub fn logloss(labels: &[i32], probs: &[f64]) -> Option<f64> {
    if labels.is_empty() {
        return None;
    }
    let total: f64 = labels
        .iter()
        .zip(probs)
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if y > 0 { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    Some(total / labels.len() as f64)
}

/// Fraction of rows misclassified at the 0.5 threshold.
pub fn error_rate(labels: &[i32], probs: &[f64]) -> Option<f64> {
    if labels.is_empty() {
        return None;
    }
    let wrong = labels
        .iter()
        .zip(probs)
        .filter(|&(&y, &p)| (p > 0.5) != (y > 0))
        .count();
    Some(wrong as f64 / labels.len() as f64)
}

/// Area under the ROC curve (Mann-Whitney U with averaged tie ranks).
pub fn auc(labels: &[i32], probs: &[f64]) -> Option<f64> {
    let n_pos = labels.iter().filter(|&&y| y > 0).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| probs[a].total_cmp(&probs[b]));

    let mut pos_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && probs[order[end]] == probs[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1..=end share their mean
        let rank = (start + end + 1) as f64 / 2.0;
        let tied_pos = order[start..end].iter().filter(|&&i| labels[i] > 0).count();
        pos_rank_sum += rank * tied_pos as f64;
        start = end;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Some((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Area under the precision-recall curve, as average precision.
pub fn aucpr(labels: &[i32], probs: &[f64]) -> Option<f64> {
    let n_pos = labels.iter().filter(|&&y| y > 0).count();
    if n_pos == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));

    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (seen, &i) in order.iter().enumerate() {
        if labels[i] > 0 {
            hits += 1;
            precision_sum += hits as f64 / (seen + 1) as f64;
        }
    }
    Some(precision_sum / n_pos as f64)
}

/// Evaluate the named metrics, dropping those undefined for these labels.
pub fn evaluate<S: AsRef<str>>(
    names: &[S],
    labels: &[i32],
    probs: &[f64],
) -> BTreeMap<String, f64> {
    names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let value = match name {
                "logloss" => logloss(labels, probs),
                "auc" => auc(labels, probs),
                "error" => error_rate(labels, probs),
                "aucpr" => aucpr(labels, probs),
                _ => None,
            }?;
            Some((name.to_string(), value))
        })
        .collect()
}
