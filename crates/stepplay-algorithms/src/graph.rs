#![forbid(unsafe_code)]

//! Graph producers: DFS (lazy), BFS, Kahn's topological sort, Kruskal's MST.
//!
//! All of them parse a [`GraphForm`] edge list. Every sequence starts with
//! `Start(Graph)` so a visual model can draw the full graph before the first
//! step; node ids index into the parsed label table.

use std::collections::VecDeque;

use stepplay_core::{
    GraphForm, Limits, ParsedGraph, Payload, StepKind, StepProducer, StepRecord, StepRecorder,
    StepSequence, ValidationError, parse_graph,
};

fn graph_payload(graph: &ParsedGraph) -> Payload {
    Payload::Graph {
        labels: graph.labels.clone(),
        edges: graph.edges.clone(),
    }
}

fn graph_start(graph: &ParsedGraph, what: &str) -> StepRecorder {
    StepRecorder::start(
        graph_payload(graph),
        format!(
            "{what} over {} nodes and {} edges",
            graph.node_count(),
            graph.edges.len()
        ),
    )
}

fn labels_of(graph: &ParsedGraph, nodes: &[usize]) -> String {
    nodes
        .iter()
        .map(|&n| graph.labels[n].as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// DFS
// ---------------------------------------------------------------------------

/// Depth-first traversal of an undirected graph with an explicit stack.
///
/// Returns a lazy sequence: steps are generated as the cursor reaches them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstSearch;

impl StepProducer for DepthFirstSearch {
    type Input = GraphForm;

    fn name(&self) -> &'static str {
        "dfs"
    }

    fn produce(&self, input: &GraphForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let graph = parse_graph(&input.edges, limits)?;
        let start = graph.start_node(&input.start)?;
        Ok(StepSequence::lazy(DfsSteps::new(graph, start)))
    }
}

/// Step generator behind [`DepthFirstSearch`].
#[derive(Debug)]
struct DfsSteps {
    adjacency: Vec<Vec<usize>>,
    graph: ParsedGraph,
    stack: Vec<usize>,
    visited: Vec<bool>,
    order: Vec<usize>,
    pending: VecDeque<StepRecord>,
    exhausted: bool,
}

impl DfsSteps {
    fn new(graph: ParsedGraph, start: usize) -> Self {
        let adjacency = graph.adjacency(false);
        let mut pending = VecDeque::new();
        pending.push_back(StepRecord::new(
            StepKind::Start,
            graph_payload(&graph),
            format!("Depth-first search from {}", graph.labels[start]),
        ));
        pending.push_back(StepRecord::new(
            StepKind::Push,
            Payload::Node {
                node: start,
                frontier: vec![start],
            },
            format!("Push {}", graph.labels[start]),
        ));
        Self {
            visited: vec![false; graph.node_count()],
            adjacency,
            graph,
            stack: vec![start],
            order: Vec::new(),
            pending,
            exhausted: false,
        }
    }

    /// Pop one node and queue the steps it produces.
    fn expand(&mut self) {
        let Some(node) = self.stack.pop() else {
            self.exhausted = true;
            self.pending.push_back(StepRecord::new(
                StepKind::Done,
                Payload::Order {
                    order: self.order.clone(),
                },
                format!("Visit order: {}", labels_of(&self.graph, &self.order)),
            ));
            return;
        };
        let label = &self.graph.labels[node];
        self.pending.push_back(StepRecord::new(
            StepKind::Pop,
            Payload::Node {
                node,
                frontier: self.stack.clone(),
            },
            format!("Pop {label}"),
        ));
        if self.visited[node] {
            self.pending.push_back(StepRecord::new(
                StepKind::Reject,
                Payload::Node {
                    node,
                    frontier: self.stack.clone(),
                },
                format!("{label} already visited"),
            ));
            return;
        }
        self.visited[node] = true;
        self.order.push(node);
        self.pending.push_back(StepRecord::new(
            StepKind::Visit,
            Payload::Node {
                node,
                frontier: self.stack.clone(),
            },
            format!("Visit {label}"),
        ));
        // Reverse so the first listed neighbour is popped first.
        for &next in self.adjacency[node].iter().rev() {
            if self.visited[next] {
                continue;
            }
            self.stack.push(next);
            self.pending.push_back(StepRecord::new(
                StepKind::Push,
                Payload::Node {
                    node: next,
                    frontier: self.stack.clone(),
                },
                format!("Push {}", self.graph.labels[next]),
            ));
        }
    }
}

impl Iterator for DfsSteps {
    type Item = StepRecord;

    fn next(&mut self) -> Option<StepRecord> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(record);
            }
            if self.exhausted {
                return None;
            }
            self.expand();
        }
    }
}

// ---------------------------------------------------------------------------
// BFS
// ---------------------------------------------------------------------------

/// Breadth-first traversal of an undirected graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSearch;

impl StepProducer for BreadthFirstSearch {
    type Input = GraphForm;

    fn name(&self) -> &'static str {
        "bfs"
    }

    fn produce(&self, input: &GraphForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let graph = parse_graph(&input.edges, limits)?;
        let start = graph.start_node(&input.start)?;
        let adjacency = graph.adjacency(false);

        let mut rec = graph_start(&graph, "Breadth-first search");
        let mut seen = vec![false; graph.node_count()];
        let mut queue = VecDeque::from([start]);
        let mut order = Vec::new();
        seen[start] = true;
        rec.push(
            StepKind::Enqueue,
            Payload::Node {
                node: start,
                frontier: vec![start],
            },
            format!("Enqueue {}", graph.labels[start]),
        );
        while let Some(node) = queue.pop_front() {
            let frontier: Vec<usize> = queue.iter().copied().collect();
            rec.push(
                StepKind::Dequeue,
                Payload::Node {
                    node,
                    frontier: frontier.clone(),
                },
                format!("Dequeue {}", graph.labels[node]),
            );
            order.push(node);
            rec.push(
                StepKind::Visit,
                Payload::Node { node, frontier },
                format!("Visit {}", graph.labels[node]),
            );
            for &next in &adjacency[node] {
                if seen[next] {
                    continue;
                }
                seen[next] = true;
                queue.push_back(next);
                rec.push(
                    StepKind::Enqueue,
                    Payload::Node {
                        node: next,
                        frontier: queue.iter().copied().collect(),
                    },
                    format!("Enqueue {}", graph.labels[next]),
                );
            }
        }
        let note = format!("Visit order: {}", labels_of(&graph, &order));
        Ok(rec.done(Payload::Order { order }, note))
    }
}

// ---------------------------------------------------------------------------
// Topological sort
// ---------------------------------------------------------------------------

/// Kahn's algorithm over a directed graph.
///
/// Ends in `Done(Order)` for a DAG and `NotFound(Order)` carrying the partial
/// order when a cycle blocks the remaining nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologicalSort;

impl StepProducer for TopologicalSort {
    type Input = GraphForm;

    fn name(&self) -> &'static str {
        "topological_sort"
    }

    fn produce(&self, input: &GraphForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let graph = parse_graph(&input.edges, limits)?;
        let n = graph.node_count();
        let mut indegree = vec![0usize; n];
        for &(_, to, _) in &graph.edges {
            indegree[to] += 1;
        }

        let mut rec = graph_start(&graph, "Topological sort");
        let mut queue = VecDeque::new();
        for node in (0..n).filter(|&v| indegree[v] == 0) {
            queue.push_back(node);
            rec.push(
                StepKind::Enqueue,
                Payload::Node {
                    node,
                    frontier: queue.iter().copied().collect(),
                },
                format!("{} has no incoming edges", graph.labels[node]),
            );
        }

        let mut order = Vec::with_capacity(n);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            rec.push(
                StepKind::Visit,
                Payload::Node {
                    node,
                    frontier: queue.iter().copied().collect(),
                },
                format!("Output {}", graph.labels[node]),
            );
            for &(from, to, weight) in &graph.edges {
                if from != node {
                    continue;
                }
                indegree[to] -= 1;
                rec.push(
                    StepKind::Highlight,
                    Payload::Edge { from, to, weight },
                    format!(
                        "Remove {} -> {}; {} now has {} incoming",
                        graph.labels[from], graph.labels[to], graph.labels[to], indegree[to]
                    ),
                );
                if indegree[to] == 0 {
                    queue.push_back(to);
                    rec.push(
                        StepKind::Enqueue,
                        Payload::Node {
                            node: to,
                            frontier: queue.iter().copied().collect(),
                        },
                        format!("Enqueue {}", graph.labels[to]),
                    );
                }
            }
        }

        if order.len() == n {
            let note = format!("Topological order: {}", labels_of(&graph, &order));
            Ok(rec.done(Payload::Order { order }, note))
        } else {
            let blocked: Vec<usize> = (0..n).filter(|v| !order.contains(v)).collect();
            let note = format!("Cycle detected among {}", labels_of(&graph, &blocked));
            Ok(rec.not_found(Payload::Order { order }, note))
        }
    }
}

// ---------------------------------------------------------------------------
// Minimum spanning tree
// ---------------------------------------------------------------------------

/// Union-find with path halving and union by size.
#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns false if `a` and `b` were already connected.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

/// Kruskal's algorithm over an undirected weighted graph.
///
/// Each edge considered in weight order is one `Accept` or `Reject` step.
/// `Done(Indices)` lists the accepted edges by position in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumSpanningTree;

impl StepProducer for MinimumSpanningTree {
    type Input = GraphForm;

    fn name(&self) -> &'static str {
        "kruskal_mst"
    }

    fn produce(&self, input: &GraphForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let graph = parse_graph(&input.edges, limits)?;
        let n = graph.node_count();
        let mut by_weight: Vec<usize> = (0..graph.edges.len()).collect();
        by_weight.sort_by_key(|&e| graph.edges[e].2);

        let mut rec = graph_start(&graph, "Kruskal's minimum spanning tree");
        let mut sets = DisjointSet::new(n);
        let mut accepted = Vec::new();
        let mut total = 0i64;
        for e in by_weight {
            if accepted.len() + 1 == n {
                break;
            }
            let (from, to, weight) = graph.edges[e];
            let edge = Payload::Edge { from, to, weight };
            let name = format!("{}-{} ({weight})", graph.labels[from], graph.labels[to]);
            if sets.union(from, to) {
                accepted.push(e);
                total = limits.checked_add(total, weight)?;
                rec.push(StepKind::Accept, edge, format!("Add {name}"));
            } else {
                rec.push(StepKind::Reject, edge, format!("Skip {name}: would form a cycle"));
            }
        }
        let note = if accepted.len() + 1 == n {
            format!("Spanning tree weight {total} with {} edges", accepted.len())
        } else {
            format!(
                "Graph is disconnected; spanning forest weight {total} with {} edges",
                accepted.len()
            )
        };
        Ok(rec.done(Payload::Indices { indices: accepted }, note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(mut seq: StepSequence) -> Vec<StepRecord> {
        seq.materialize();
        seq.records().to_vec()
    }

    fn form(edges: &str, start: &str) -> GraphForm {
        GraphForm::new(edges, start)
    }

    #[test]
    fn dfs_is_lazy_and_visits_depth_first() {
        let mut seq = DepthFirstSearch
            .produce(&form("A-B, A-C, B-D", ""), &Limits::default())
            .unwrap();
        assert!(seq.is_pending());
        assert_eq!(seq.len(), None);
        seq.materialize();
        match seq.terminal().map(StepRecord::payload) {
            Some(Payload::Order { order }) => assert_eq!(order, &vec![0, 1, 3, 2]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dfs_rejects_unknown_start() {
        let err = DepthFirstSearch
            .produce(&form("A-B", "Z"), &Limits::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Start node \"Z\" is not in the graph.");
    }

    #[test]
    fn bfs_visits_by_level() {
        let recs = records(
            BreadthFirstSearch
                .produce(&form("A-B A-C B-D C-E", "A"), &Limits::default())
                .unwrap(),
        );
        assert_eq!(
            recs.last().map(StepRecord::payload),
            Some(&Payload::Order {
                order: vec![0, 1, 2, 3, 4]
            })
        );
        let visits = recs.iter().filter(|r| r.kind() == StepKind::Visit).count();
        assert_eq!(visits, 5);
    }

    #[test]
    fn topological_sort_orders_dag() {
        let recs = records(
            TopologicalSort
                .produce(&form("shirt-tie tie-jacket pants-shoes pants-jacket", ""), &Limits::default())
                .unwrap(),
        );
        let last = recs.last().unwrap();
        assert_eq!(last.kind(), StepKind::Done);
        // shirt=0 tie=1 jacket=2 pants=3 shoes=4
        assert_eq!(last.payload(), &Payload::Order { order: vec![0, 3, 1, 4, 2] });
    }

    #[test]
    fn topological_sort_reports_cycle() {
        let recs = records(
            TopologicalSort
                .produce(&form("A-B B-C C-B", ""), &Limits::default())
                .unwrap(),
        );
        let last = recs.last().unwrap();
        assert_eq!(last.kind(), StepKind::NotFound);
        assert_eq!(last.payload(), &Payload::Order { order: vec![0] });
        assert!(last.note().contains("B, C"));
    }

    #[test]
    fn kruskal_picks_lightest_tree() {
        let recs = records(
            MinimumSpanningTree
                .produce(&form("A-B:4 A-C:1 B-C:2 C-D:5 B-D:7", ""), &Limits::default())
                .unwrap(),
        );
        let last = recs.last().unwrap();
        assert_eq!(last.payload(), &Payload::Indices { indices: vec![1, 2, 3] });
        assert!(last.note().starts_with("Spanning tree weight 8"));
        assert!(recs.iter().any(|r| r.kind() == StepKind::Reject));
    }

    #[test]
    fn kruskal_rejects_overflowing_total() {
        let limits = Limits {
            max_len: 64,
            max_abs_value: i64::MAX,
        };
        let err = MinimumSpanningTree
            .produce(
                &form("A-B:9223372036854775807 B-C:9223372036854775807", ""),
                &limits,
            )
            .unwrap_err();
        assert_eq!(err, ValidationError::ValueOutOfRange { max: i64::MAX });
    }

    #[test]
    fn malformed_edges_are_rejected() {
        let err = BreadthFirstSearch
            .produce(&form("A-B-C", ""), &Limits::default())
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidGraph);
    }
}
