use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::{debug, info, warn};

use crate::config::*;
use crate::history::VotingHistory;

/// An undirected graph of legislators and divisions.
///
/// Nodes are kept sorted by identifier, so division nodes always come
/// before legislator nodes when iterating.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoteGraph {
    nodes: BTreeMap<NodeId, NodeData>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl VoteGraph {
    pub fn new() -> VoteGraph {
        VoteGraph {
            nodes: BTreeMap::new(),
            adjacency: BTreeMap::new(),
        }
    }

    pub fn add_node(&mut self, id: NodeId, data: NodeData) {
        self.nodes.insert(id, data);
        self.adjacency.entry(id).or_insert_with(BTreeSet::new);
    }

    /// Adds an edge between two existing nodes. Adding the same edge again
    /// has no effect. Returns false if one of the nodes does not exist.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return false;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &NodeData)> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    /// Every edge once, as (smaller id, larger id).
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.adjacency
            .iter()
            .flat_map(|(a, ns)| ns.iter().filter(move |b| a < *b).map(move |b| (*a, *b)))
            .collect()
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = &NodeId> {
        self.adjacency.get(&id).into_iter().flat_map(|ns| ns.iter())
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(&a)
            .map(|ns| ns.contains(&b))
            .unwrap_or(false)
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(&id).map(|ns| ns.len()).unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|ns| ns.len()).sum::<usize>() / 2
    }

    pub fn division_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_division()).count()
    }

    pub fn legislator_count(&self) -> usize {
        self.node_count() - self.division_count()
    }

    /// Removes the nodes without any edge and returns their identifiers.
    pub fn remove_isolated_nodes(&mut self) -> Vec<NodeId> {
        let isolated: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| self.degree(**id) == 0)
            .cloned()
            .collect();
        for id in isolated.iter() {
            self.nodes.remove(id);
            self.adjacency.remove(id);
        }
        debug!("remove_isolated_nodes: removed {} nodes", isolated.len());
        isolated
    }
}

/// The result of building a network from a selection of divisions.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Network {
    pub graph: VoteGraph,
    /// division number -> node id
    pub division_nodes: BTreeMap<u32, NodeId>,
    /// legislator name -> node id
    pub legislator_nodes: HashMap<String, NodeId>,
    /// All the parties of the legislators in the graph.
    pub parties: BTreeSet<String>,
}

/// Builds the bipartite network of the selected divisions.
///
/// Division nodes are numbered by the position of the division in the whole
/// history, so that a division keeps the same node id whatever the
/// selection. Legislators are numbered from `LEGISLATOR_ID_OFFSET` in order
/// of first appearance. A legislator is linked to a division when they voted
/// aye in it.
pub fn build_network(history: &VotingHistory, selection: &[u32]) -> Result<Network, NetworkError> {
    if history.len() as u64 >= LEGISLATOR_ID_OFFSET {
        return Err(NetworkError::TooManyDivisions {
            count: history.len(),
        });
    }
    let selected: HashSet<u32> = selection.iter().cloned().collect();
    for nr in selected.iter() {
        if history.get(*nr).is_none() {
            warn!("build_network: division {} is not in the history, ignoring it", nr);
        }
    }

    let mut graph = VoteGraph::new();
    let mut division_nodes: BTreeMap<u32, NodeId> = BTreeMap::new();
    let mut legislator_nodes: HashMap<String, NodeId> = HashMap::new();
    let mut parties: BTreeSet<String> = BTreeSet::new();
    let mut next_legislator: NodeId = LEGISLATOR_ID_OFFSET;

    // The node counter advances for every division, selected or not.
    for (idx, (division_nr, division)) in history.divisions().iter().enumerate() {
        if !selected.contains(division_nr) {
            continue;
        }
        let division_node = idx as NodeId;
        graph.add_node(
            division_node,
            NodeData::Division(DivisionNode {
                division_nr: *division_nr,
                date: division.date,
                title: division.title.clone(),
                aye_count: division.aye_count,
                noes_count: division.noes_count,
            }),
        );
        division_nodes.insert(*division_nr, division_node);

        for vote in division.votes.iter() {
            let legislator_node = match legislator_nodes.get(&vote.name) {
                Some(id) => *id,
                None => {
                    let id = next_legislator;
                    next_legislator += 1;
                    graph.add_node(
                        id,
                        NodeData::Legislator(LegislatorNode {
                            name: vote.name.clone(),
                            party: vote.party.clone(),
                            constituency: vote.constituency.clone(),
                        }),
                    );
                    legislator_nodes.insert(vote.name.clone(), id);
                    parties.insert(vote.party.clone());
                    id
                }
            };
            if vote.is_aye() {
                graph.add_edge(legislator_node, division_node);
            }
        }
    }

    info!(
        "Built network: {} divisions, {} legislators, {} edges",
        division_nodes.len(),
        legislator_nodes.len(),
        graph.edge_count()
    );
    Ok(Network {
        graph,
        division_nodes,
        legislator_nodes,
        parties,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parser::parse_division;
    use crate::parser::tests::{record, row};

    /// Division 1 passes, division 2 fails.
    /// - Anna votes aye in both
    /// - Bob votes aye in 1, no in 2
    /// - Carl votes no in both
    /// - Dora only votes in 2, aye
    pub(crate) fn small_history() -> VotingHistory {
        let d1_rows = vec![
            row("Anna", "Labour", "Aye"),
            row("Bob", "Conservative", "Aye"),
            row("Carl", "Conservative", "No"),
        ];
        let d2_rows = vec![
            row("Anna", "Labour", "aye"),
            row("Bob", "Conservative", "No"),
            row("Carl", "Conservative", "No"),
            row("Dora", "Green Party", "AYE"),
        ];
        let d3_rows = vec![row("Eve", "Independent", "Aye")];
        let mut h = VotingHistory::new();
        for (nr, rows, ayes, noes) in [(1, d1_rows, 2, 1), (2, d2_rows, 2, 3), (3, d3_rows, 1, 0)] {
            let rows_s: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
            let content = record(nr, "01/03/2019", &format!("Division {}", nr), ayes, noes, &rows_s);
            h.insert(parse_division(&content).unwrap());
        }
        h
    }

    #[test]
    fn builds_bipartite_graph() {
        let h = small_history();
        let n = build_network(&h, &[1, 2]).unwrap();
        let g = &n.graph;
        assert_eq!(g.division_count(), 2);
        // Every name seen in the selection becomes a node.
        assert_eq!(g.legislator_count(), 4);
        assert_eq!(n.legislator_nodes.len(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(
            n.parties.iter().cloned().collect::<Vec<String>>(),
            vec!["Conservative", "Green Party", "Labour"]
        );

        // Edges only go across kinds.
        for (a, b) in g.edges() {
            let da = g.node(a).unwrap().is_division();
            let db = g.node(b).unwrap().is_division();
            assert_ne!(da, db);
        }
    }

    #[test]
    fn legislator_is_a_single_node() {
        let h = small_history();
        let n = build_network(&h, &[1, 2]).unwrap();
        let anna = n.legislator_nodes["Anna"];
        assert_eq!(n.graph.degree(anna), 2);
        assert!(n.graph.has_edge(anna, n.division_nodes[&1]));
        assert!(n.graph.has_edge(anna, n.division_nodes[&2]));

        let bob = n.legislator_nodes["Bob"];
        assert_eq!(n.graph.degree(bob), 1);
        assert!(!n.graph.has_edge(bob, n.division_nodes[&2]));

        let carl = n.legislator_nodes["Carl"];
        assert_eq!(n.graph.degree(carl), 0);
    }

    #[test]
    fn node_ids_do_not_collide() {
        let h = small_history();
        let n = build_network(&h, &[1, 2, 3]).unwrap();
        assert_eq!(n.division_nodes[&1], 0);
        assert_eq!(n.division_nodes[&2], 1);
        assert_eq!(n.division_nodes[&3], 2);
        let mut legislator_ids: Vec<NodeId> = n.legislator_nodes.values().cloned().collect();
        legislator_ids.sort();
        assert_eq!(
            legislator_ids,
            (LEGISLATOR_ID_OFFSET..LEGISLATOR_ID_OFFSET + 5).collect::<Vec<NodeId>>()
        );
        assert_eq!(n.legislator_nodes["Anna"], LEGISLATOR_ID_OFFSET);
    }

    #[test]
    fn division_ids_stable_across_selections() {
        let h = small_history();
        let all = build_network(&h, &[1, 2, 3]).unwrap();
        let some = build_network(&h, &[3]).unwrap();
        assert_eq!(some.division_nodes[&3], all.division_nodes[&3]);
        assert_eq!(some.graph.division_count(), 1);
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let h = small_history();
        let n = build_network(&h, &[2, 42]).unwrap();
        assert_eq!(n.division_nodes.len(), 1);
        let empty = build_network(&h, &[]).unwrap();
        assert_eq!(empty.graph.node_count(), 0);
    }

    #[test]
    fn pruning_removes_only_isolated_nodes() {
        let h = small_history();
        let n = build_network(&h, &[1, 2]).unwrap();
        let mut g = n.graph.clone();
        let removed = g.remove_isolated_nodes();
        assert_eq!(removed, vec![n.legislator_nodes["Carl"]]);
        assert_eq!(g.node_count(), n.graph.node_count() - 1);
        assert_eq!(g.edge_count(), n.graph.edge_count());
    }
}
