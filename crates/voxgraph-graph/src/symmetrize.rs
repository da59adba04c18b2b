//! Edge direction handling.
//!
//! Undirected graphs are stored as directed edge lists holding both
//! directions of every pair: the forward block first, then its reversal.
//! Bipartite graphs may instead keep a single, explicit orientation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voxgraph_core::{Error, IncidenceMatrix};

/// Which side of a bipartite graph the edges point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Primary → secondary.
    #[default]
    Secondary,
    /// Secondary → primary.
    Primary,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secondary" => Ok(Self::Secondary),
            "primary" => Ok(Self::Primary),
            other => Err(Error::UnknownOrientation(other.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secondary => f.write_str("secondary"),
            Self::Primary => f.write_str("primary"),
        }
    }
}

/// Directedness of a bipartite graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directedness {
    Undirected,
    Directed(Orientation),
}

impl Default for Directedness {
    fn default() -> Self {
        Self::Directed(Orientation::default())
    }
}

impl Directedness {
    /// Resolve the `directed` / `directed_to` configuration pair.
    ///
    /// `directed_to` is only read when `directed` is true.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOrientation`] when a directed graph names an
    /// orientation other than `primary` or `secondary`.
    pub fn from_flags(directed: bool, directed_to: &str) -> Result<Self, Error> {
        if directed {
            Ok(Self::Directed(directed_to.parse()?))
        } else {
            Ok(Self::Undirected)
        }
    }
}

/// Append the reciprocal of every edge, dropping repeated directed edges.
///
/// The forward edges keep their order and the reversed block follows in the
/// same order. A self-loop appears once.
#[must_use]
pub fn make_undirected(edges: &IncidenceMatrix) -> IncidenceMatrix {
    let mut out = IncidenceMatrix::with_capacity(edges.len() * 2);
    out.extend_from(edges);
    out.extend_from(&edges.reversed());
    out.dedup()
}

/// Orient bipartite `primary → secondary` edges as requested.
#[must_use]
pub fn orient(edges: &IncidenceMatrix, directedness: Directedness) -> IncidenceMatrix {
    match directedness {
        Directedness::Directed(Orientation::Secondary) => edges.clone(),
        Directedness::Directed(Orientation::Primary) => edges.reversed(),
        Directedness::Undirected => make_undirected(edges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_appends_reversed_block() {
        let edges = IncidenceMatrix::from_pairs(&[(0, 1), (0, 2)]);
        assert_eq!(
            make_undirected(&edges).to_pairs(),
            vec![(0, 1), (0, 2), (1, 0), (2, 0)]
        );
    }

    #[test]
    fn mutual_edges_are_not_doubled() {
        let edges = IncidenceMatrix::from_pairs(&[(0, 1), (1, 0), (3, 3)]);
        assert_eq!(
            make_undirected(&edges).to_pairs(),
            vec![(0, 1), (1, 0), (3, 3)]
        );
    }

    #[test]
    fn orientation_parsing_is_strict() {
        assert_eq!("primary".parse::<Orientation>(), Ok(Orientation::Primary));
        assert_eq!(
            "Secondary".parse::<Orientation>(),
            Err(Error::UnknownOrientation("Secondary".into()))
        );
        assert_eq!(Orientation::Primary.to_string(), "primary");
    }

    #[test]
    fn directedness_flags() {
        assert_eq!(
            Directedness::from_flags(true, "secondary"),
            Ok(Directedness::Directed(Orientation::Secondary))
        );
        assert_eq!(
            Directedness::from_flags(false, "primary"),
            Ok(Directedness::Undirected)
        );
        assert_eq!(
            Directedness::from_flags(false, "both"),
            Ok(Directedness::Undirected)
        );
        assert_eq!(
            Directedness::from_flags(true, "both"),
            Err(Error::UnknownOrientation("both".into()))
        );
    }

    #[test]
    fn orient_flips_or_doubles() {
        let edges = IncidenceMatrix::from_pairs(&[(0, 1)]);
        assert_eq!(
            orient(&edges, Directedness::Directed(Orientation::Primary)).to_pairs(),
            vec![(1, 0)]
        );
        assert_eq!(orient(&edges, Directedness::Undirected).len(), 2);
        assert_eq!(orient(&edges, Directedness::default()), edges);
    }
}
