//! Creation-statement ordering.
//!
//! Reorders one database's creation statements so that tables precede views
//! and every view is emitted after the views it references. Dependency
//! detection is deliberately textual and sits behind [`ReferenceDetector`]
//! so it can be swapped for an identifier-aware scan without touching the
//! sort.

use tracing::warn;

use crate::core::{Table, TableKind};

/// Detects whether one creation statement references another object.
pub trait ReferenceDetector {
    /// True if `create_sql` (the defining text of some view) mentions
    /// `name`, meaning `name` must be emitted first.
    fn references(&self, create_sql: &str, name: &str) -> bool;
}

/// Substring matching, the sole dependency signal of the original tool.
///
/// A view name that happens to be a substring of another identifier
/// produces a false dependency edge. Accepted imprecision.
pub struct SubstringDetector;

impl ReferenceDetector for SubstringDetector {
    fn references(&self, create_sql: &str, name: &str) -> bool {
        create_sql.contains(name)
    }
}

/// One creation statement with its table descriptor.
#[derive(Debug, Clone)]
pub struct CreateEntry {
    pub table: Table,
    pub create_sql: String,
}

/// Reorder entries in place: non-view prefix first, then the view suffix in
/// dependency order.
pub fn resolve_order(entries: &mut [CreateEntry], detector: &dyn ReferenceDetector) {
    let start = partition_views(entries);
    order_views(&mut entries[start..], detector);
}

/// Two-pointer swap scan moving views to the suffix. Returns the index of
/// the first view.
fn partition_views(entries: &mut [CreateEntry]) -> usize {
    let len = entries.len();
    let mut left = 0;
    let mut right = len;
    loop {
        while left < len && entries[left].table.kind != TableKind::View {
            left += 1;
        }
        while right > 0 && entries[right - 1].table.kind == TableKind::View {
            right -= 1;
        }
        if right <= left + 1 {
            break;
        }
        entries.swap(left, right - 1);
    }
    left
}

/// Topological sort of the view suffix over the textual-reference graph.
///
/// Edge Y -> X exists when Y's name appears in X's creation text; Y is then
/// emitted before X. Views on a reference cycle never reach in-degree zero;
/// they are appended in their original relative order with a warning, since
/// no correct order exists for them.
fn order_views(views: &mut [CreateEntry], detector: &dyn ReferenceDetector) {
    let n = views.len();
    if n < 2 {
        return;
    }

    // in_degree[i] = number of views that view i depends on;
    // dependents[j] = views whose text mentions view j.
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if detector.references(&views[i].create_sql, &views[j].table.name) {
                in_degree[i] += 1;
                dependents[j].push(i);
            }
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    loop {
        let before = order.len();
        for i in 0..n {
            if in_degree[i] == 0 && !visited[i] {
                visited[i] = true;
                order.push(i);
                for &dep in &dependents[i] {
                    in_degree[dep] -= 1;
                }
            }
        }
        if order.len() == n || order.len() == before {
            break;
        }
    }

    if order.len() < n {
        let stuck: Vec<&str> = (0..n)
            .filter(|&i| !visited[i])
            .map(|i| views[i].table.name.as_str())
            .collect();
        warn!(
            "view reference cycle detected, keeping original order for: {}",
            stuck.join(", ")
        );
        order.extend((0..n).filter(|&i| !visited[i]));
    }

    let reordered: Vec<CreateEntry> = order.iter().map(|&i| views[i].clone()).collect();
    for (slot, entry) in views.iter_mut().zip(reordered) {
        *slot = entry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: TableKind, sql: &str) -> CreateEntry {
        CreateEntry {
            table: Table {
                name: name.to_string(),
                kind,
            },
            create_sql: sql.to_string(),
        }
    }

    fn names(entries: &[CreateEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.table.name.as_str()).collect()
    }

    #[test]
    fn test_tables_before_views() {
        let mut entries = vec![
            entry("v1", TableKind::View, "CREATE VIEW v1 AS SELECT * FROM t1"),
            entry("t1", TableKind::Ordinary, "CREATE TABLE t1 (a int)"),
            entry("t2", TableKind::Ordinary, "CREATE TABLE t2 (b int)"),
        ];
        resolve_order(&mut entries, &SubstringDetector);
        assert_eq!(
            entries
                .iter()
                .take_while(|e| e.table.kind != TableKind::View)
                .count(),
            2
        );
        assert_eq!(entries[2].table.name, "v1");
    }

    #[test]
    fn test_chained_views_ordered() {
        let mut entries = vec![
            entry("t1", TableKind::Ordinary, "CREATE TABLE t1 (a int)"),
            entry("v2", TableKind::View, "CREATE VIEW v2 AS SELECT * FROM v1"),
            entry("v1", TableKind::View, "CREATE VIEW v1 AS SELECT * FROM t1"),
        ];
        resolve_order(&mut entries, &SubstringDetector);
        assert_eq!(names(&entries), vec!["t1", "v1", "v2"]);
    }

    #[test]
    fn test_every_edge_respected() {
        let mut entries = vec![
            entry("a", TableKind::View, "CREATE VIEW a AS SELECT * FROM b, c"),
            entry("b", TableKind::View, "CREATE VIEW b AS SELECT * FROM c"),
            entry("c", TableKind::View, "CREATE VIEW c AS SELECT 1"),
        ];
        resolve_order(&mut entries, &SubstringDetector);
        let order = names(&entries);
        let pos = |n: &str| order.iter().position(|&x| x == n).unwrap();
        assert!(pos("c") < pos("b"));
        assert!(pos("b") < pos("a"));
        assert!(pos("c") < pos("a"));
    }

    #[test]
    fn test_independent_views_keep_relative_order() {
        let mut entries = vec![
            entry("v1", TableKind::View, "CREATE VIEW v1 AS SELECT 1"),
            entry("v2", TableKind::View, "CREATE VIEW v2 AS SELECT 2"),
        ];
        resolve_order(&mut entries, &SubstringDetector);
        assert_eq!(names(&entries), vec!["v1", "v2"]);
    }

    #[test]
    fn test_cycle_appends_remainder() {
        let mut entries = vec![
            entry("x", TableKind::View, "CREATE VIEW x AS SELECT * FROM y"),
            entry("y", TableKind::View, "CREATE VIEW y AS SELECT * FROM x"),
            entry("z", TableKind::View, "CREATE VIEW z AS SELECT 1"),
        ];
        resolve_order(&mut entries, &SubstringDetector);
        // z is the only acyclic view; x and y keep their original order.
        assert_eq!(names(&entries), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<CreateEntry> = Vec::new();
        resolve_order(&mut empty, &SubstringDetector);

        let mut one = vec![entry("v", TableKind::View, "CREATE VIEW v AS SELECT 1")];
        resolve_order(&mut one, &SubstringDetector);
        assert_eq!(names(&one), vec!["v"]);
    }
}
