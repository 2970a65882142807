//! Pattern summary over a project's recent experiments.

use std::collections::{BTreeMap, HashMap};

use crate::domain::models::{Experiment, PatternSummary};

/// Fewer experiments than this produce no summary.
pub const MIN_EXPERIMENTS: usize = 3;

/// Count methods, categories and completions.
///
/// `successful_methods` lists the distinct methods of completed experiments,
/// most frequent first; ties keep the order in which the methods first
/// appear in `experiments`.
pub fn summarize(experiments: &[Experiment]) -> Option<PatternSummary> {
    if experiments.len() < MIN_EXPERIMENTS {
        return None;
    }

    let mut method_counts: HashMap<&str, (u32, usize)> = HashMap::new();
    let mut common_categories: BTreeMap<String, u32> = BTreeMap::new();
    let mut completed = 0usize;

    for (index, experiment) in experiments.iter().enumerate() {
        if let Some(category) = non_empty(experiment.category.as_deref()) {
            *common_categories.entry(category.to_string()).or_default() += 1;
        }
        if !experiment.status.is_completed() {
            continue;
        }
        completed += 1;
        if let Some(method) = non_empty(experiment.method.as_deref()) {
            method_counts.entry(method).or_insert((0, index)).0 += 1;
        }
    }

    let mut ranked: Vec<(&str, u32, usize)> = method_counts
        .into_iter()
        .map(|(method, (count, first_seen))| (method, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    Some(PatternSummary {
        successful_methods: ranked.into_iter().map(|(method, _, _)| method.to_string()).collect(),
        common_categories,
        completion_rate: percentage(completed, experiments.len()),
    })
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
