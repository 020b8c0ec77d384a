use std::fmt;

use crate::ir::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    Source,
    Target,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Input validation failures, reported before any placement work starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("edge {index} references unknown {end} node '{node}'")]
    UnknownEdgeEndpoint {
        index: usize,
        end: EdgeEnd,
        node: NodeId,
    },

    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),
}
