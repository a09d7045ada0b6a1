//! Known-topology regression tests for betweenness and partitioning.
//!
//! Each test uses a hand-crafted graph with known properties. Expected
//! values are computed analytically and hardcoded, so any algorithm change
//! that shifts them will be caught.

use cohort_cluster::betweenness::{BetweennessConfig, edge_betweenness, edge_betweenness_with};
use cohort_cluster::bfs::build_bfs_tree;
use cohort_cluster::credit::accumulate_credit;
use cohort_cluster::partition::partition;
use cohort_cluster::ClusterError;
use cohort_core::build::{build_follow_graph, count_friends};
use cohort_core::graph::{Edge, FollowGraph};
use cohort_core::records::UserRecord;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn assert_score(g: &FollowGraph, depth: usize, a: &str, b: &str, expected: f64) {
    let bc = edge_betweenness(g, depth);
    let got = bc.get(a, b).unwrap_or_else(|| panic!("edge ({a}, {b}) missing"));
    assert!(
        (got - expected).abs() < 1e-10,
        "({a}, {b}) at depth {depth}: expected {expected}, got {got}"
    );
}

fn complete(n: usize) -> FollowGraph {
    let names: Vec<String> = (0..n).map(|i| format!("k{i}")).collect();
    let mut g = FollowGraph::new();
    for i in 0..n {
        for j in i + 1..n {
            g.add_edge(&names[i], &names[j]);
        }
    }
    g
}

// ---------------------------------------------------------------------------
// Betweenness
// ---------------------------------------------------------------------------

#[test]
fn star_every_edge_scores_three() {
    let g = FollowGraph::from_edges([("A", "B"), ("B", "C"), ("B", "D")]);
    for depth in [2, 3, 10] {
        assert_score(&g, depth, "A", "B", 3.0);
        assert_score(&g, depth, "B", "C", 3.0);
        assert_score(&g, depth, "B", "D", 3.0);
    }
}

#[test]
fn path_interior_edge_exceeds_boundary_edges() {
    let g = FollowGraph::from_edges([("A", "B"), ("B", "C"), ("C", "D")]);
    for depth in [3, 4, 100] {
        assert_score(&g, depth, "A", "B", 3.0);
        assert_score(&g, depth, "B", "C", 4.0);
        assert_score(&g, depth, "C", "D", 3.0);
    }
}

#[test]
fn path_with_short_depth_drops_far_pairs() {
    // At depth 2 the A..D pair (3 hops) is out of reach, removing one unit
    // from every edge on that path.
    let g = FollowGraph::from_edges([("A", "B"), ("B", "C"), ("C", "D")]);
    assert_score(&g, 2, "A", "B", 2.0);
    assert_score(&g, 2, "B", "C", 3.0);
    assert_score(&g, 2, "C", "D", 2.0);
}

#[test]
fn complete_graph_edges_are_equal() {
    let g = complete(4);
    let bc = edge_betweenness(&g, 3);
    assert_eq!(bc.len(), 6);
    let scores: Vec<f64> = bc.iter().map(|(_, s)| s).collect();
    for s in &scores {
        assert!((s - scores[0]).abs() < 1e-10, "{scores:?}");
    }
    // Every pair is adjacent, so each edge carries exactly its own pair.
    assert!((scores[0] - 1.0).abs() < 1e-10);
}

#[test]
fn square_cycle_requires_two_parents() {
    // A 4-cycle a-b-c-d-a. Opposite corners are joined by two equal-length
    // paths; a single-parent BFS would route all of that through one side.
    let g = FollowGraph::from_edges([("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]);

    let tree = build_bfs_tree(&g, "a", 4).expect("tree");
    assert_eq!(tree.parents("c"), Some(vec!["b", "d"]));
    assert_eq!(tree.path_count("c"), Some(2));

    // Each edge: its own pair (1) + half of each of the two diagonal pairs
    // that may use it (0.5 + 0.5) = 2.
    for (x, y) in [("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")] {
        assert_score(&g, 4, x, y, 2.0);
    }
}

#[test]
fn diamond_credit_split_is_symmetric() {
    let g = FollowGraph::from_edges([("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
    let tree = build_bfs_tree(&g, "A", 3).expect("tree");
    let credit = accumulate_credit(&tree);
    let bd = credit.get("B", "D").expect("(B,D)");
    let cd = credit.get("C", "D").expect("(C,D)");
    assert!((bd - cd).abs() < 1e-12);
    assert!((bd - 0.5).abs() < 1e-12);
}

#[test]
fn disconnected_pieces_score_independently() {
    let joined = FollowGraph::from_edges([("a", "b"), ("b", "c"), ("x", "y")]);
    let alone = FollowGraph::from_edges([("a", "b"), ("b", "c")]);
    let bc_joined = edge_betweenness(&joined, 5);
    let bc_alone = edge_betweenness(&alone, 5);
    assert_eq!(bc_joined.get("a", "b"), bc_alone.get("a", "b"));
    assert_eq!(bc_joined.get("b", "c"), bc_alone.get("b", "c"));
    assert_score(&joined, 5, "x", "y", 1.0);
}

#[test]
fn aggregate_is_idempotent() {
    let g = complete(6);
    let first = edge_betweenness(&g, 3);
    let second = edge_betweenness(&g, 3);
    assert_eq!(first, second);
}

#[test]
fn parallel_run_is_identical() {
    let g = FollowGraph::from_edges([
        ("a", "b"),
        ("b", "c"),
        ("c", "a"),
        ("c", "d"),
        ("d", "e"),
        ("e", "f"),
        ("f", "d"),
    ]);
    let seq = edge_betweenness(&g, 5);
    let par = edge_betweenness_with(
        &g,
        &BetweennessConfig {
            max_depth: 5,
            parallel: true,
        },
    );
    assert_eq!(seq, par);
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

#[test]
fn disconnected_graph_at_target_removes_nothing() {
    let mut g = FollowGraph::from_edges([("a", "b"), ("b", "c"), ("x", "y"), ("y", "z")]);
    g.add_node("lonely");
    // Three components: {a,b,c}, {lonely}, {x,y,z}.
    let p = partition(&g, 4, 3).expect("partition");
    assert!(p.removed.is_empty());
    assert_eq!(p.working.content_hash(), g.content_hash());

    let nodes: Vec<Vec<&str>> = p.components.iter().map(|c| c.nodes().collect()).collect();
    assert_eq!(nodes, vec![vec!["a", "b", "c"], vec!["x", "y", "z"]]);
    assert_eq!(p.components[0].edges(), vec![Edge::new("a", "b"), Edge::new("b", "c")]);
}

#[test]
fn three_cliques_split_along_bridges() {
    // Three 4-cliques chained by single bridges.
    let mut g = FollowGraph::new();
    for prefix in ["p", "q", "r"] {
        let ids: Vec<String> = (0..4).map(|i| format!("{prefix}{i}")).collect();
        for i in 0..4 {
            for j in i + 1..4 {
                g.add_edge(&ids[i], &ids[j]);
            }
        }
    }
    g.add_edge("p3", "q0");
    g.add_edge("q3", "r0");

    let p = partition(&g, 6, 3).expect("partition");
    let removed: Vec<Edge> = p.removed.iter().map(|s| s.edge.clone()).collect();
    assert_eq!(removed.len(), 2);
    assert!(removed.contains(&Edge::new("p3", "q0")));
    assert!(removed.contains(&Edge::new("q3", "r0")));
    assert_eq!(p.components.len(), 3);
    for component in &p.components {
        assert_eq!(component.node_count(), 4);
        assert_eq!(component.edge_count(), 6);
    }
}

#[test]
fn component_count_never_decreases_along_removal_order() {
    let g = FollowGraph::from_edges([
        ("a", "b"),
        ("b", "c"),
        ("c", "a"),
        ("c", "d"),
        ("d", "e"),
        ("e", "f"),
        ("f", "d"),
        ("f", "g"),
    ]);
    let mut working = g.clone();
    let mut last = working.component_count();
    for scored in edge_betweenness(&g, 4).ranked() {
        working.remove_edge(scored.edge.first(), scored.edge.second());
        let now = working.component_count();
        assert!(now >= last, "removing {} dropped components", scored.edge);
        last = now;
    }
    assert_eq!(last, g.node_count());
}

#[test]
fn too_many_clusters_is_unreachable() {
    let g = FollowGraph::from_edges([("a", "b")]);
    assert_eq!(
        partition(&g, 2, 5).unwrap_err(),
        ClusterError::UnreachableTargetComponents {
            target: 5,
            reached: 2
        }
    );
}

// ---------------------------------------------------------------------------
// End to end: records → graph → partition
// ---------------------------------------------------------------------------

#[test]
fn two_follower_camps_separate() {
    let users = vec![
        UserRecord::new("u1", ["s1", "s2", "s3", "bridge"]),
        UserRecord::new("u2", ["s1", "s2", "s3"]),
        UserRecord::new("u3", ["t1", "t2", "t3", "bridge"]),
        UserRecord::new("u4", ["t1", "t2", "t3"]),
    ];
    let counts = count_friends(&users);
    let graph = build_follow_graph(&users, &counts, 1);
    assert!(graph.contains_node("bridge"));

    let p = partition(&graph, 5, 2).expect("partition");
    assert_eq!(p.components.len(), 2);
    let first: Vec<&str> = p.components[0].nodes().collect();
    let second: Vec<&str> = p.components[1].nodes().collect();
    let u1_side = if first.contains(&"u1") { &first } else { &second };
    let u3_side = if first.contains(&"u3") { &first } else { &second };
    assert!(u1_side.contains(&"u2"));
    assert!(u3_side.contains(&"u4"));
    assert!(!u1_side.contains(&"u3"));
}
