//! Error type shared by every voxgraph crate.
//!
//! Invalid configuration and malformed inputs are rejected before any
//! geometry is computed. Empty inputs are never errors: builders return an
//! empty [`crate::IncidenceMatrix`] instead.

/// Result alias used throughout voxgraph.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Distance pruning (or a distance-ranked strategy) ran without a matrix.
    #[error("strategy `{strategy}` requires a distance matrix but none was supplied")]
    MissingDistanceMatrix { strategy: &'static str },

    /// A strategy-specific input (voxels, clusters, primary mask) is absent.
    #[error("strategy `{strategy}` requires `{input}` but none was supplied")]
    MissingInput {
        strategy: &'static str,
        input: &'static str,
    },

    #[error("graph orientation not recognized: `{0}` (expected `primary` or `secondary`)")]
    UnknownOrientation(String),

    #[error("graph strategy not recognized: `{0}`")]
    UnknownStrategy(String),

    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cluster {cluster} references voxel {voxel}, but only {len} voxels exist")]
    VoxelOutOfRange {
        cluster: usize,
        voxel: usize,
        len: usize,
    },

    #[error("edge references cluster {index}, but only {len} clusters exist")]
    ClusterOutOfRange { index: usize, len: usize },

    #[error("cluster {0} has no voxels")]
    EmptyCluster(usize),

    #[error("cluster {cluster} lists voxel {voxel} more than once")]
    DuplicateVoxel { cluster: usize, voxel: usize },

    /// The triangulation escape hatch gave up after escalating its jitter.
    #[error("triangulation of {points} points failed after {attempts} attempts: {reason}")]
    Triangulation {
        points: usize,
        attempts: u32,
        reason: String,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages_name_the_offending_strategy() {
        let err = Error::MissingDistanceMatrix { strategy: "knn" };
        assert!(err.to_string().contains("`knn`"));

        let err = Error::MissingInput {
            strategy: "bipartite",
            input: "primaries",
        };
        assert!(err.to_string().contains("primaries"));
    }

    #[test]
    fn orientation_message_lists_valid_values() {
        let msg = Error::UnknownOrientation("sideways".into()).to_string();
        assert!(msg.contains("sideways"));
        assert!(msg.contains("primary"));
        assert!(msg.contains("secondary"));
    }
}
