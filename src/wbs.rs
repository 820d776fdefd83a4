// src/wbs.rs — Work breakdown structure tree assembly and cost rollup

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::WbsRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbsNode {
    pub object_id: i64,
    pub parent_object_id: Option<i64>,
    pub wbs_code: String,
    pub name: String,
    /// Cost booked directly on this element.
    pub budget_cost: f64,
    pub actual_cost: f64,
    /// Own cost plus every descendant's.
    pub total_budget: f64,
    pub total_actual: f64,
    pub percent_complete: f64,
    pub depth: usize,
    pub children: Vec<WbsNode>,
}

impl WbsNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Budget left after actuals; negative means overrun.
    pub fn variance(&self) -> f64 {
        self.total_budget - self.total_actual
    }
}

/// A project's WBS as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbsTree {
    pub project_id: String,
    pub total_budget: f64,
    pub total_actual: f64,
    pub nodes: Vec<WbsNode>,
}

impl WbsTree {
    pub fn build(project_id: impl Into<String>, records: &[WbsRecord]) -> Self {
        let nodes = build_tree(records);
        Self {
            project_id: project_id.into(),
            total_budget: nodes.iter().map(|n| n.total_budget).sum(),
            total_actual: nodes.iter().map(|n| n.total_actual).sum(),
            nodes,
        }
    }
}

/// Assemble flat records into a forest ordered by WBS code.
///
/// Records whose parent is missing become roots. Records caught in a parent
/// cycle are also promoted to roots, so every record appears exactly once.
pub fn build_tree(records: &[WbsRecord]) -> Vec<WbsNode> {
    let ids: HashSet<i64> = records.iter().map(|r| r.object_id).collect();
    let mut children: HashMap<i64, Vec<&WbsRecord>> = HashMap::new();
    let mut roots: Vec<&WbsRecord> = Vec::new();

    for r in records {
        match r.parent_object_id {
            Some(p) if p != r.object_id && ids.contains(&p) => {
                children.entry(p).or_default().push(r)
            }
            _ => roots.push(r),
        }
    }
    for list in children.values_mut() {
        list.sort_by(|a, b| code_cmp(&a.wbs_code, &b.wbs_code));
    }
    roots.sort_by(|a, b| code_cmp(&a.wbs_code, &b.wbs_code));

    let mut visited = HashSet::new();
    let mut forest: Vec<WbsNode> = roots
        .into_iter()
        .filter_map(|r| assemble(r, 0, &children, &mut visited))
        .collect();

    // Anything still unvisited sits on a cycle.
    let mut stranded: Vec<&WbsRecord> = records
        .iter()
        .filter(|r| !visited.contains(&r.object_id))
        .collect();
    stranded.sort_by(|a, b| code_cmp(&a.wbs_code, &b.wbs_code));
    for r in stranded {
        if let Some(mut node) = assemble(r, 0, &children, &mut visited) {
            node.parent_object_id = None;
            forest.push(node);
        }
    }

    forest
}

fn assemble(
    record: &WbsRecord,
    depth: usize,
    children: &HashMap<i64, Vec<&WbsRecord>>,
    visited: &mut HashSet<i64>,
) -> Option<WbsNode> {
    if !visited.insert(record.object_id) {
        return None;
    }

    let kids: Vec<WbsNode> = children
        .get(&record.object_id)
        .map(|list| {
            list.iter()
                .filter_map(|c| assemble(c, depth + 1, children, visited))
                .collect()
        })
        .unwrap_or_default();

    let total_budget = record.budget_cost + kids.iter().map(|k| k.total_budget).sum::<f64>();
    let total_actual = record.actual_cost + kids.iter().map(|k| k.total_actual).sum::<f64>();

    let child_weight: f64 = kids.iter().map(|k| k.total_budget).sum();
    let percent_complete = if !kids.is_empty() && child_weight > 0.0 {
        kids.iter()
            .map(|k| k.total_budget * k.percent_complete)
            .sum::<f64>()
            / child_weight
    } else {
        record.percent_complete
    };

    Some(WbsNode {
        object_id: record.object_id,
        parent_object_id: record.parent_object_id,
        wbs_code: record.wbs_code.clone(),
        name: record.name.clone(),
        budget_cost: record.budget_cost,
        actual_cost: record.actual_cost,
        total_budget,
        total_actual,
        percent_complete,
        depth,
        children: kids,
    })
}

/// Depth-first listing for row-based display. Children of ids in
/// `collapsed` are skipped.
pub fn flatten<'a>(nodes: &'a [WbsNode], collapsed: &HashSet<i64>) -> Vec<&'a WbsNode> {
    let mut out = Vec::new();
    fn walk<'n>(nodes: &'n [WbsNode], collapsed: &HashSet<i64>, out: &mut Vec<&'n WbsNode>) {
        for n in nodes {
            out.push(n);
            if !collapsed.contains(&n.object_id) {
                walk(&n.children, collapsed, out);
            }
        }
    }
    walk(nodes, collapsed, &mut out);
    out
}

/// Back to flat records (own costs, original parents).
pub fn to_records(nodes: &[WbsNode]) -> Vec<WbsRecord> {
    flatten(nodes, &HashSet::new())
        .into_iter()
        .map(|n| WbsRecord {
            object_id: n.object_id,
            parent_object_id: n.parent_object_id,
            wbs_code: n.wbs_code.clone(),
            name: n.name.clone(),
            budget_cost: n.budget_cost,
            actual_cost: n.actual_cost,
            percent_complete: if n.is_leaf() { n.percent_complete } else { 0.0 },
        })
        .collect()
}

/// Compare dotted codes segment by segment, numerically where both
/// segments are numbers ("1.2" < "1.10").
fn code_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, parent: Option<i64>, code: &str, budget: f64, actual: f64) -> WbsRecord {
        WbsRecord {
            object_id: id,
            parent_object_id: parent,
            wbs_code: code.into(),
            name: format!("WBS {code}"),
            budget_cost: budget,
            actual_cost: actual,
            percent_complete: 0.0,
        }
    }

    #[test]
    fn test_rollup_sums_descendants() {
        let records = vec![
            rec(1, None, "1", 0.0, 0.0),
            rec(2, Some(1), "1.1", 100.0, 40.0),
            rec(3, Some(1), "1.2", 50.0, 60.0),
            rec(4, Some(3), "1.2.1", 25.0, 5.0),
        ];
        let tree = build_tree(&records);
        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.total_budget, 175.0);
        assert_eq!(root.total_actual, 105.0);
        assert_eq!(root.children[1].total_budget, 75.0);
        assert_eq!(root.children[1].children[0].depth, 2);
    }

    #[test]
    fn test_children_sorted_numerically() {
        let records = vec![
            rec(1, None, "1", 0.0, 0.0),
            rec(2, Some(1), "1.10", 0.0, 0.0),
            rec(3, Some(1), "1.2", 0.0, 0.0),
            rec(4, Some(1), "1.9", 0.0, 0.0),
        ];
        let tree = build_tree(&records);
        let codes: Vec<&str> = tree[0].children.iter().map(|c| c.wbs_code.as_str()).collect();
        assert_eq!(codes, vec!["1.2", "1.9", "1.10"]);
    }

    #[test]
    fn test_orphans_become_roots() {
        let records = vec![rec(1, None, "1", 10.0, 0.0), rec(2, Some(77), "2", 5.0, 0.0)];
        let tree = build_tree(&records);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_cycle_does_not_loop_or_drop() {
        let records = vec![
            rec(1, Some(2), "1", 10.0, 0.0),
            rec(2, Some(1), "2", 5.0, 0.0),
            rec(3, None, "3", 1.0, 0.0),
        ];
        let tree = build_tree(&records);
        let all = flatten(&tree, &HashSet::new());
        assert_eq!(all.len(), 3);
        let total: f64 = tree.iter().map(|n| n.total_budget).sum();
        assert_eq!(total, 16.0);
    }

    #[test]
    fn test_percent_weighted_by_budget() {
        let mut a = rec(2, Some(1), "1.1", 300.0, 0.0);
        a.percent_complete = 100.0;
        let b = rec(3, Some(1), "1.2", 100.0, 0.0);
        let tree = build_tree(&[rec(1, None, "1", 0.0, 0.0), a, b]);
        assert_eq!(tree[0].percent_complete, 75.0);
    }

    #[test]
    fn test_flatten_respects_collapsed() {
        let records = vec![
            rec(1, None, "1", 0.0, 0.0),
            rec(2, Some(1), "1.1", 0.0, 0.0),
            rec(3, None, "2", 0.0, 0.0),
        ];
        let tree = build_tree(&records);
        assert_eq!(flatten(&tree, &HashSet::new()).len(), 3);
        let collapsed: HashSet<i64> = [1].into_iter().collect();
        assert_eq!(flatten(&tree, &collapsed).len(), 2);
    }

    #[test]
    fn test_tree_totals_and_records() {
        let records = vec![rec(1, None, "1", 10.0, 2.0), rec(2, Some(1), "1.1", 5.0, 1.0)];
        let tree = WbsTree::build("PRJ-1", &records);
        assert_eq!(tree.total_budget, 15.0);
        assert_eq!(tree.total_actual, 3.0);
        let back = to_records(&tree.nodes);
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].parent_object_id, Some(1));
        assert_eq!(back[0].budget_cost, 10.0);
    }
}
