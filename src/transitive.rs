//! `TransitiveModificationPropagator`: grows each function's set of
//! modified parameters to a fixed point over the call graph, so that a
//! parameter passed through to a modifying callee loses its auto-const
//! eligibility in every caller transitively.

use std::collections::{HashMap, HashSet};

/// One outgoing call edge: `caller` passes `arg_param_name` as the
/// `param_index`-th argument to `callee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEdge {
    pub callee: String,
    pub param_index: usize,
    pub arg_param_name: String,
}

pub struct TransitiveModificationPropagator;

impl TransitiveModificationPropagator {
    /// Runs the fixed-point closure described above. `call_graph` maps
    /// caller name to its outgoing edges; `parameter_lists` maps function
    /// name to its ordered parameter names; `modified` maps function name
    /// to the set of parameter names directly written in its own body and
    /// is grown in place.
    ///
    /// Missing callees and out-of-bounds indices are skipped rather than
    /// treated as errors — they indicate a callee outside the translation
    /// unit. No new caller entries are ever added.
    pub fn propagate(
        call_graph: &HashMap<String, Vec<CallEdge>>,
        parameter_lists: &HashMap<String, Vec<String>>,
        modified: &mut HashMap<String, HashSet<String>>,
    ) {
        loop {
            let mut changed = false;
            for (caller, edges) in call_graph {
                for edge in edges {
                    let Some(callee_params) = parameter_lists.get(&edge.callee) else {
                        continue;
                    };
                    let Some(callee_param_name) = callee_params.get(edge.param_index) else {
                        continue;
                    };
                    let callee_modifies = modified
                        .get(&edge.callee)
                        .map(|set| set.contains(callee_param_name))
                        .unwrap_or(false);
                    if !callee_modifies {
                        continue;
                    }
                    let caller_set = modified.entry(caller.clone()).or_default();
                    if caller_set.insert(edge.arg_param_name.clone()) {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(callee: &str, index: usize, arg: &str) -> CallEdge {
        CallEdge {
            callee: callee.to_string(),
            param_index: index,
            arg_param_name: arg.to_string(),
        }
    }

    #[test]
    fn single_hop_propagation() {
        let mut call_graph = HashMap::new();
        call_graph.insert("caller".to_string(), vec![edge("callee", 0, "y")]);

        let mut parameter_lists = HashMap::new();
        parameter_lists.insert("callee".to_string(), vec!["p".to_string()]);

        let mut modified = HashMap::new();
        modified.insert("callee".to_string(), HashSet::from(["p".to_string()]));

        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);

        assert!(modified["caller"].contains("y"));
    }

    #[test]
    fn transitive_chain_propagates_through_middle_function() {
        let mut call_graph = HashMap::new();
        call_graph.insert("top".to_string(), vec![edge("mid", 0, "a")]);
        call_graph.insert("mid".to_string(), vec![edge("bottom", 0, "b")]);

        let mut parameter_lists = HashMap::new();
        parameter_lists.insert("mid".to_string(), vec!["b".to_string()]);
        parameter_lists.insert("bottom".to_string(), vec!["c".to_string()]);

        let mut modified = HashMap::new();
        modified.insert("bottom".to_string(), HashSet::from(["c".to_string()]));

        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);

        assert!(modified["mid"].contains("b"));
        assert!(modified["top"].contains("a"));
    }

    #[test]
    fn mutual_recursion_terminates() {
        let mut call_graph = HashMap::new();
        call_graph.insert("a".to_string(), vec![edge("b", 0, "x")]);
        call_graph.insert("b".to_string(), vec![edge("a", 0, "y")]);

        let mut parameter_lists = HashMap::new();
        parameter_lists.insert("a".to_string(), vec!["y".to_string()]);
        parameter_lists.insert("b".to_string(), vec!["x".to_string()]);

        let mut modified = HashMap::new();
        modified.insert("a".to_string(), HashSet::from(["y".to_string()]));

        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);

        assert!(modified["b"].contains("x"));
        assert!(modified["a"].contains("y"));
    }

    #[test]
    fn missing_callee_and_out_of_bounds_index_are_skipped() {
        let mut call_graph = HashMap::new();
        call_graph.insert(
            "caller".to_string(),
            vec![edge("external", 0, "y"), edge("callee", 9, "z")],
        );

        let mut parameter_lists = HashMap::new();
        parameter_lists.insert("callee".to_string(), vec!["p".to_string()]);

        let mut modified = HashMap::new();
        modified.insert("callee".to_string(), HashSet::from(["p".to_string()]));

        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);

        assert!(!modified.contains_key("caller"));
    }

    #[test]
    fn running_twice_is_a_no_op() {
        let mut call_graph = HashMap::new();
        call_graph.insert("caller".to_string(), vec![edge("callee", 0, "y")]);

        let mut parameter_lists = HashMap::new();
        parameter_lists.insert("callee".to_string(), vec!["p".to_string()]);

        let mut modified = HashMap::new();
        modified.insert("callee".to_string(), HashSet::from(["p".to_string()]));

        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);
        let first_pass = modified.clone();
        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);

        assert_eq!(modified, first_pass);
    }
}
