//! Grouping clusters by batch id.
//!
//! Every strategy iterates batches independently: clusters from different
//! batches are never paired, so each batch is handled as its own event.

use std::collections::BTreeMap;

use voxgraph_core::BatchId;

/// The clusters belonging to one batch, in ascending cluster id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchGroup {
    pub batch: BatchId,
    pub members: Vec<usize>,
}

impl BatchGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of unordered pairs within the batch.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.len() * self.len().saturating_sub(1) / 2
    }
}

/// Cluster ids partitioned by batch, batches in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPartition {
    groups: Vec<BatchGroup>,
    /// `group_of[c]` is the index in `groups` of cluster `c`'s batch.
    group_of: Vec<usize>,
}

impl BatchPartition {
    #[must_use]
    pub fn new(batch_ids: &[BatchId]) -> Self {
        let mut by_batch: BTreeMap<BatchId, Vec<usize>> = BTreeMap::new();
        for (cluster, &batch) in batch_ids.iter().enumerate() {
            by_batch.entry(batch).or_default().push(cluster);
        }

        let mut group_of = vec![0; batch_ids.len()];
        let groups: Vec<BatchGroup> = by_batch
            .into_iter()
            .enumerate()
            .map(|(g, (batch, members))| {
                for &c in &members {
                    group_of[c] = g;
                }
                BatchGroup { batch, members }
            })
            .collect();

        Self { groups, group_of }
    }

    #[must_use]
    pub fn groups(&self) -> &[BatchGroup] {
        &self.groups
    }

    /// The batch group containing `cluster`.
    ///
    /// # Panics
    ///
    /// Panics if `cluster` was not part of the partitioned id list.
    #[must_use]
    pub fn group_of(&self, cluster: usize) -> &BatchGroup {
        &self.groups[self.group_of[cluster]]
    }

    /// `Σ m(m-1)/2` over batch sizes `m`.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.groups.iter().map(BatchGroup::pair_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_are_sorted_and_members_ascending() {
        let partition = BatchPartition::new(&[2, 0, 2, 1, 0]);
        assert_eq!(
            partition.groups(),
            &[
                BatchGroup {
                    batch: 0,
                    members: vec![1, 4]
                },
                BatchGroup {
                    batch: 1,
                    members: vec![3]
                },
                BatchGroup {
                    batch: 2,
                    members: vec![0, 2]
                },
            ]
        );
        assert_eq!(partition.group_of(2).batch, 2);
        assert_eq!(partition.group_of(4).members, vec![1, 4]);
    }

    #[test]
    fn pair_count_sums_per_batch() {
        assert_eq!(BatchPartition::new(&[0, 0, 0, 1, 2, 2]).pair_count(), 3 + 1);
        assert_eq!(BatchPartition::new(&[]).pair_count(), 0);
    }
}
