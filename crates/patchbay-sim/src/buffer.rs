//! Live population of cross-connect holders.

use patchbay_proto::CrossConnect;
use rand::Rng;

/// One unit of population: a standalone local cross-connect, or the linked
/// sender/receiver halves of a cross-manager pair.
///
/// The two halves of a pair enter and leave the buffer together; they are
/// never tracked separately.
#[derive(Debug, Clone)]
pub(crate) enum CrossConnectHolder {
    /// Fully local cross-connect.
    Local(CrossConnect),
    /// Linked pair sharing one remote record.
    RemotePair {
        /// Local source into the remote leg.
        sender: CrossConnect,
        /// Remote leg into the local destination.
        receiver: CrossConnect,
    },
}

impl CrossConnectHolder {
    pub(crate) fn is_remote(&self) -> bool {
        matches!(self, Self::RemotePair { .. })
    }
}

/// Ordered collection of the currently active holders.
///
/// The buffer itself is unbounded; the simulation loop enforces the
/// population cap before inserting. Counters track holder variants in
/// lock-step, so `local_count + remote_count` always equals the holder
/// count.
#[derive(Debug, Default)]
pub(crate) struct LifecycleBuffer {
    holders: Vec<CrossConnectHolder>,
    local_count: usize,
    remote_count: usize,
}

impl LifecycleBuffer {
    /// Appends `holder` to the population.
    pub(crate) fn insert(&mut self, holder: CrossConnectHolder) {
        if holder.is_remote() {
            self.remote_count += 1;
        } else {
            self.local_count += 1;
        }
        self.holders.push(holder);
    }

    /// Uniformly random index over the current holders, `None` when empty.
    pub(crate) fn pick_random_index<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.holders.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.holders.len()))
        }
    }

    /// Removes and returns the holder at `index`, preserving the relative
    /// order of the rest.
    pub(crate) fn remove_at(&mut self, index: usize) -> CrossConnectHolder {
        let holder = self.holders.remove(index);
        if holder.is_remote() {
            self.remote_count -= 1;
        } else {
            self.local_count -= 1;
        }
        holder
    }

    pub(crate) fn len(&self) -> usize {
        self.holders.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub(crate) fn local_count(&self) -> usize {
        self.local_count
    }

    pub(crate) fn remote_count(&self) -> usize {
        self.remote_count
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::factory::ConnectionFactory;

    #[test]
    fn counters_track_holder_variants() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut factory = ConnectionFactory::default();
        let mut buffer = LifecycleBuffer::default();

        buffer.insert(factory.create_local(&mut rng));
        buffer.insert(factory.create_remote_pair(&mut rng));
        buffer.insert(factory.create_local(&mut rng));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.local_count(), 2);
        assert_eq!(buffer.remote_count(), 1);
        assert_eq!(buffer.local_count() + buffer.remote_count(), buffer.len());

        let mut removed_remote = 0;
        while let Some(index) = buffer.pick_random_index(&mut rng) {
            if buffer.remove_at(index).is_remote() {
                removed_remote += 1;
            }
        }
        assert_eq!(removed_remote, 1);
        assert!(buffer.is_empty());
        assert_eq!(buffer.local_count(), 0);
        assert_eq!(buffer.remote_count(), 0);
    }

    #[test]
    fn empty_buffer_has_no_removal_candidate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let buffer = LifecycleBuffer::default();
        assert_eq!(buffer.pick_random_index(&mut rng), None);
    }

    #[test]
    fn removal_preserves_relative_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut factory = ConnectionFactory::default();
        let mut buffer = LifecycleBuffer::default();
        for _ in 0..4 {
            buffer.insert(factory.create_local(&mut rng));
        }

        // Stems 0..4 in order; dropping index 1 must leave 0, 2, 3.
        buffer.remove_at(1);
        let ids: Vec<&str> = buffer
            .holders
            .iter()
            .map(|holder| match holder {
                CrossConnectHolder::Local(cross_connect) => cross_connect.id.as_str(),
                CrossConnectHolder::RemotePair { sender, .. } => sender.id.as_str(),
            })
            .collect();
        assert_eq!(ids, ["00000000", "00000002", "00000003"]);
    }
}
