use crate::spec::chart::ChartSpec;
use crate::task_graph::scope::TaskScope;
use crate::variable::{ScopedVariable, Variable};
use log::debug;
use petgraph::algo::toposort;
use petgraph::prelude::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};
use vegascale_common::error::{Result, ResultWithContext, VegaScaleError};

/// Directed graph from change sources (signals, datasets) through group marks to scales.
/// Edges point from a dependency to its dependent.
#[derive(Clone, Debug)]
pub struct DependencyGraph {
    graph: DiGraph<ScopedVariable, ()>,
    node_indexes: HashMap<ScopedVariable, NodeIndex>,
    topo_rank: HashMap<NodeIndex, usize>,
}

impl DependencyGraph {
    pub fn try_new(chart_spec: &ChartSpec, task_scope: &TaskScope) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut node_indexes = HashMap::new();

        for (dependency, dependent) in chart_spec.input_vars(task_scope)? {
            let source = *node_indexes
                .entry(dependency.clone())
                .or_insert_with(|| graph.add_node(dependency));
            let target = *node_indexes
                .entry(dependent.clone())
                .or_insert_with(|| graph.add_node(dependent));
            graph.add_edge(source, target, ());
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            let var = graph
                .node_weight(cycle.node_id())
                .map(|(var, scope)| format!("{var} in scope {scope:?}"))
                .unwrap_or_default();
            VegaScaleError::specification(format!("Dependency cycle through {var}"))
        })?;
        let topo_rank = order
            .into_iter()
            .enumerate()
            .map(|(rank, node)| (node, rank))
            .collect();
        debug!(
            "Built dependency graph with {} node(s) and {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            node_indexes,
            topo_rank,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Direct dependencies of `var`
    pub fn dependencies(&self, var: &ScopedVariable) -> Result<Vec<ScopedVariable>> {
        let node = self.node_index(var)?;
        let mut deps = self
            .graph
            .neighbors_directed(node, petgraph::Incoming)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect::<Vec<_>>();
        deps.sort();
        Ok(deps)
    }

    /// Every variable downstream of any of `changed`, each listed once, in an order where
    /// dependencies come before their dependents. The changed variables themselves are
    /// not included. Variables unknown to the graph have no dependents.
    pub fn affected(&self, changed: &[ScopedVariable]) -> Result<Vec<ScopedVariable>> {
        let sources: HashSet<NodeIndex> = changed
            .iter()
            .filter_map(|var| self.node_indexes.get(var).copied())
            .collect();

        let mut reached: HashSet<NodeIndex> = HashSet::new();
        for source in &sources {
            let mut dfs = Dfs::new(&self.graph, *source);
            while let Some(node) = dfs.next(&self.graph) {
                if !sources.contains(&node) {
                    reached.insert(node);
                }
            }
        }

        let mut reached = reached.into_iter().collect::<Vec<_>>();
        reached.sort_by_key(|node| self.topo_rank.get(node).copied().unwrap_or(usize::MAX));
        reached
            .into_iter()
            .map(|node| {
                self.graph
                    .node_weight(node)
                    .cloned()
                    .with_context(|| format!("Missing dependency node {node:?}"))
            })
            .collect()
    }

    fn node_index(&self, var: &ScopedVariable) -> Result<NodeIndex> {
        self.node_indexes
            .get(var)
            .copied()
            .with_context(|| format!("Missing dependency node: {var:?}"))
    }
}

/// Scoped variable for a top-level signal
pub fn root_signal(name: &str) -> ScopedVariable {
    (Variable::new_signal(name), Vec::new())
}

/// Scoped variable for a top-level dataset
pub fn root_data(name: &str) -> ScopedVariable {
    (Variable::new_data(name), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph_for(spec: serde_json::Value) -> DependencyGraph {
        let spec: ChartSpec = serde_json::from_value(spec).unwrap();
        let task_scope = spec.to_task_scope().unwrap();
        DependencyGraph::try_new(&spec, &task_scope).unwrap()
    }

    #[test]
    fn test_signal_affects_scale_once() {
        let graph = graph_for(json!({
            "signals": [{"name": "s1", "init": 5}, {"name": "s2", "init": 7}],
            "scales": [
                {"name": "x", "type": "ordinal", "domain": [1, {"signal": "s1"}, {"signal": "s2"}]},
                {"name": "y", "domainMin": {"signal": "s2"}}
            ]
        }));
        let affected = graph
            .affected(&[root_signal("s1"), root_signal("s2")])
            .unwrap();
        assert_eq!(
            affected.iter().map(|(v, _)| v.name.as_str()).collect::<HashSet<_>>(),
            HashSet::from(["x", "y"])
        );
        assert_eq!(affected.len(), 2);
        assert!(graph.affected(&[root_signal("unused")]).unwrap().is_empty());
    }

    #[test]
    fn test_group_precedes_group_scales() {
        let graph = graph_for(json!({
            "data": [{"name": "table", "transform": [{"type": "facet", "groupby": ["category"]}]}],
            "marks": [{
                "type": "group",
                "from": {"data": "table"},
                "scales": [{"name": "pos", "type": "ordinal", "domain": {"field": "position"}}]
            }]
        }));
        let affected = graph.affected(&[root_data("table")]).unwrap();
        assert_eq!(
            affected,
            vec![
                (Variable::new_group(0), vec![]),
                (Variable::new_scale("pos"), vec![0]),
            ]
        );
        assert_eq!(
            graph
                .dependencies(&(Variable::new_scale("pos"), vec![0]))
                .unwrap(),
            vec![(Variable::new_group(0), vec![])]
        );
    }

    #[test]
    fn test_unresolved_signal_fails() {
        let spec: ChartSpec = serde_json::from_value(json!({
            "scales": [{"name": "x", "domain": [{"signal": "missing"}]}]
        }))
        .unwrap();
        let task_scope = spec.to_task_scope().unwrap();
        assert!(DependencyGraph::try_new(&spec, &task_scope).is_err());
    }
}
