#![no_main]

use cohort_cluster::{ClusterError, partition};
use cohort_core::graph::FollowGraph;
use libfuzzer_sys::fuzz_target;

// Each byte pair is an edge between two of at most 16 nodes. The last byte
// picks the target component count.
fuzz_target!(|data: &[u8]| {
    let Some((&target, pairs)) = data.split_last() else {
        return;
    };
    let mut graph = FollowGraph::new();
    for pair in pairs.chunks_exact(2) {
        graph.add_edge(&format!("n{}", pair[0] % 16), &format!("n{}", pair[1] % 16));
    }
    let target = usize::from(target % 20);

    match partition(&graph, 4, target) {
        Ok(p) => {
            assert!(p.component_count >= target);
            assert_eq!(p.working.edge_count() + p.removed.len(), graph.edge_count());
        }
        Err(ClusterError::InvalidTarget) => assert_eq!(target, 0),
        Err(ClusterError::UnreachableTargetComponents { reached, .. }) => {
            assert_eq!(reached, graph.node_count());
        }
        Err(ClusterError::InvalidRoot(_)) => unreachable!("partition takes no root"),
    }
});
