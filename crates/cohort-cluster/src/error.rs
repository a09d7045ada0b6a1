/// Errors from the partitioning engine.
///
/// All errors are local to one call; nothing is retried and no partial
/// result accompanies a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    /// The requested BFS root is not a node of the graph.
    #[error("root not found in graph: {0}")]
    InvalidRoot(String),

    /// Zero components were requested.
    #[error("target component count must be at least 1")]
    InvalidTarget,

    /// Every ranked edge was removed and the graph still has fewer
    /// components than requested.
    #[error("cannot reach {target} components: graph splits into at most {reached}")]
    UnreachableTargetComponents { target: usize, reached: usize },
}
