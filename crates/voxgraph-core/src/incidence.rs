//! Directed edge lists in `(2, E)` row layout.
//!
//! Row 0 holds source ids and row 1 target ids, so `sources()[k]` and
//! `targets()[k]` together form edge `k`. The same type carries cluster-id
//! edges and voxel-id edges; the caller knows which space it is in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidenceMatrix {
    sources: Vec<usize>,
    targets: Vec<usize>,
}

impl IncidenceMatrix {
    /// The `(2, 0)` matrix.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sources: Vec::new(),
            targets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            sources: Vec::with_capacity(edges),
            targets: Vec::with_capacity(edges),
        }
    }

    /// Build from the two rows of a `(2, E)` array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the rows differ in length.
    pub fn from_rows(sources: Vec<usize>, targets: Vec<usize>) -> Result<Self> {
        if sources.len() != targets.len() {
            return Err(Error::LengthMismatch {
                what: "incidence target row",
                expected: sources.len(),
                actual: targets.len(),
            });
        }
        Ok(Self { sources, targets })
    }

    #[must_use]
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        pairs.iter().copied().collect()
    }

    pub fn push(&mut self, source: usize, target: usize) {
        self.sources.push(source);
        self.targets.push(target);
    }

    /// Append every edge of `other`, in order.
    pub fn extend_from(&mut self, other: &Self) {
        self.sources.extend_from_slice(&other.sources);
        self.targets.extend_from_slice(&other.targets);
    }

    /// Number of edges `E`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    #[must_use]
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    #[must_use]
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    #[must_use]
    pub fn edge(&self, k: usize) -> Option<(usize, usize)> {
        Some((*self.sources.get(k)?, *self.targets.get(k)?))
    }

    /// Iterate edges as `(source, target)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.sources
            .iter()
            .zip(self.targets.iter())
            .map(|(&s, &t)| (s, t))
    }

    /// Same edges with every direction flipped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            sources: self.targets.clone(),
            targets: self.sources.clone(),
        }
    }

    /// Keep the edges for which `keep(k, source, target)` holds, in order.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(usize, usize, usize) -> bool) -> Self {
        self.iter()
            .enumerate()
            .filter(|&(k, (s, t))| keep(k, s, t))
            .map(|(_, edge)| edge)
            .collect()
    }

    /// Drop repeated directed edges, keeping each first occurrence.
    #[must_use]
    pub fn dedup(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.len());
        self.filter(|_, s, t| seen.insert((s, t)))
    }

    /// Membership test for a directed edge. Linear in `E`.
    #[must_use]
    pub fn contains(&self, source: usize, target: usize) -> bool {
        self.iter().any(|e| e == (source, target))
    }

    /// Largest node id referenced, if any edge exists.
    #[must_use]
    pub fn max_node(&self) -> Option<usize> {
        self.sources.iter().chain(&self.targets).copied().max()
    }

    /// Check every endpoint is below `n_nodes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClusterOutOfRange`] for the largest offending id.
    pub fn validate(&self, n_nodes: usize) -> Result<()> {
        match self.max_node() {
            Some(index) if index >= n_nodes => Err(Error::ClusterOutOfRange {
                index,
                len: n_nodes,
            }),
            _ => Ok(()),
        }
    }

    /// Edge list in `(E, 2)` row-per-edge form.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.iter().collect()
    }
}

impl FromIterator<(usize, usize)> for IncidenceMatrix {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let (sources, targets) = iter.into_iter().unzip();
        Self { sources, targets }
    }
}
