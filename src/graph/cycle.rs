use std::collections::HashMap;

/// Detect a cycle in a dependency graph using the DFS 3-color algorithm.
/// `edges` is `(task_id, dependency_id)` meaning `task_id` depends on
/// `dependency_id`. Returns the offending edges (in discovery order) if a
/// cycle exists, or `None` if the graph is a DAG.
///
/// Used both for the epic-level graph and, independently, for each epic's
/// internal feature graph — callers pass in just the nodes/edges relevant
/// to whichever graph they're checking.
pub fn detect_cycle(nodes: &[String], edges: &[(String, String)]) -> Option<Vec<(String, String)>> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in nodes {
        adj.entry(node.as_str()).or_default();
    }
    for (task_id, dep_id) in edges {
        adj.entry(task_id.as_str()).or_default().push(dep_id.as_str());
    }

    let mut color: HashMap<&str, u8> = HashMap::new();
    for node in adj.keys() {
        color.insert(node, 0);
    }

    let mut found = Vec::new();
    let mut node_order: Vec<&str> = nodes.iter().map(|n| n.as_str()).collect();
    for n in adj.keys() {
        if !node_order.contains(n) {
            node_order.push(n);
        }
    }
    for node in node_order {
        if color.get(node).copied().unwrap_or(0) == 0 {
            has_cycle_dfs(node, &adj, &mut color, &mut found);
            if !found.is_empty() {
                return Some(found);
            }
        }
    }
    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    color: &mut HashMap<&'a str, u8>,
    found: &mut Vec<(String, String)>,
) -> bool {
    color.insert(node, 1); // gray
    if let Some(neighbors) = adj.get(node) {
        for &neighbor in neighbors {
            match color.get(neighbor).copied() {
                Some(1) => {
                    found.push((node.to_string(), neighbor.to_string()));
                    return true;
                }
                Some(2) => {}
                _ => {
                    if has_cycle_dfs(neighbor, adj, color, found) {
                        found.push((node.to_string(), neighbor.to_string()));
                        return true;
                    }
                }
            }
        }
    }
    color.insert(node, 2); // black
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cycle_in_dag() {
        let nodes = vec!["a".into(), "b".into(), "c".into()];
        let edges = vec![("b".into(), "a".into()), ("c".into(), "b".into())];
        assert!(detect_cycle(&nodes, &edges).is_none());
    }

    #[test]
    fn detects_three_node_cycle() {
        let nodes = vec!["a".into(), "b".into(), "c".into()];
        let edges = vec![
            ("b".into(), "a".into()),
            ("c".into(), "b".into()),
            ("a".into(), "c".into()),
        ];
        assert!(detect_cycle(&nodes, &edges).is_some());
    }

    #[test]
    fn detects_self_cycle() {
        let nodes = vec!["a".into()];
        let edges = vec![("a".into(), "a".into())];
        assert!(detect_cycle(&nodes, &edges).is_some());
    }

    #[test]
    fn disconnected_nodes_are_fine() {
        let nodes = vec!["a".into(), "b".into()];
        let edges: Vec<(String, String)> = vec![];
        assert!(detect_cycle(&nodes, &edges).is_none());
    }
}
