//! Construction-time grammar analysis.
//!
//! * termination height of every rule and alternative (least fixpoint)
//! * transitive reachability between rules
//! * bottom-out and escape alternatives, fallback and shortest alternative
//!   per rule

use crate::model::{Alternative, Grammar, Rule, RuleId};
use std::collections::HashMap;
use tracing::debug;

/// Analyze `rules` and freeze them into a [`Grammar`].
pub(crate) fn build_grammar(mut rules: Vec<Rule>, index: HashMap<String, RuleId>) -> Grammar {
    compute_heights(&mut rules);
    let reachable = compute_reachability(&rules);
    mark_bottom_outs(&mut rules, &reachable);
    select_alternatives(&mut rules);

    let unproductive: Vec<&str> = rules
        .iter()
        .filter(|r| !r.is_productive())
        .map(|r| r.name.as_str())
        .collect();
    if !unproductive.is_empty() {
        debug!("Unproductive rules: {}", unproductive.join(", "));
    }

    Grammar {
        rules,
        index,
        reachable,
    }
}

fn alternative_height(alternative: &Alternative, heights: &[Option<u32>]) -> Option<u32> {
    let mut deepest: Option<u32> = None;
    for id in alternative.references() {
        let h = heights[id.index()]?;
        deepest = Some(deepest.map_or(h, |d| d.max(h)));
    }
    Some(deepest.map_or(0, |d| d + 1))
}

/// Heights only ever decrease, so iterating to a fixpoint terminates.
fn compute_heights(rules: &mut [Rule]) {
    let mut heights: Vec<Option<u32>> = vec![None; rules.len()];

    let mut changed = true;
    while changed {
        changed = false;
        for (r, rule) in rules.iter().enumerate() {
            let best = rule
                .alternatives
                .iter()
                .filter_map(|alt| alternative_height(alt, &heights))
                .min();
            let improved = match (best, heights[r]) {
                (Some(new), Some(old)) => new < old,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if improved {
                heights[r] = best;
                changed = true;
            }
        }
    }

    for (r, rule) in rules.iter_mut().enumerate() {
        rule.height = heights[r];
        for alternative in &mut rule.alternatives {
            alternative.height = alternative_height(alternative, &heights);
        }
    }
}

fn compute_reachability(rules: &[Rule]) -> Vec<Vec<bool>> {
    let edges: Vec<Vec<usize>> = rules
        .iter()
        .map(|rule| {
            let mut targets: Vec<usize> = rule
                .alternatives
                .iter()
                .flat_map(|alt| alt.references())
                .map(RuleId::index)
                .collect();
            targets.sort_unstable();
            targets.dedup();
            targets
        })
        .collect();

    let mut reachable = vec![vec![false; rules.len()]; rules.len()];
    for (start, row) in reachable.iter_mut().enumerate() {
        let mut stack: Vec<usize> = edges[start].clone();
        while let Some(next) = stack.pop() {
            if row[next] {
                continue;
            }
            row[next] = true;
            stack.extend(edges[next].iter().copied().filter(|&t| !row[t]));
        }
    }
    reachable
}

/// An alternative bottoms out when it does not reference its own rule. It is
/// an escape when, in addition, none of its references reaches the rule.
fn mark_bottom_outs(rules: &mut [Rule], reachable: &[Vec<bool>]) {
    for (r, rule) in rules.iter_mut().enumerate() {
        let mut bottom_out = Vec::new();
        let mut escape = Vec::new();
        for (a, alternative) in rule.alternatives.iter_mut().enumerate() {
            let bottoms_out = alternative.references().all(|id| id.index() != r);
            alternative.bottoms_out = bottoms_out;
            if !bottoms_out {
                continue;
            }
            bottom_out.push(a);
            if alternative.references().all(|id| !reachable[id.index()][r]) {
                escape.push(a);
            }
        }
        rule.bottom_out = bottom_out;
        rule.escape = escape;
    }
}

fn select_alternatives(rules: &mut [Rule]) {
    for rule in rules.iter_mut() {
        rule.fallback = rule
            .alternatives
            .iter()
            .enumerate()
            .min_by_key(|(_, alt)| alt.rule_refs)
            .map_or(0, |(i, _)| i);
        rule.shortest = rule
            .alternatives
            .iter()
            .enumerate()
            .filter_map(|(i, alt)| alt.height.map(|h| (i, h)))
            .min_by_key(|&(_, h)| h)
            .map(|(i, _)| i);
    }
}
