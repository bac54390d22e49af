//! Per-channel message buffers.
//!
//! Every `process_edges` call leases one channel for its duration. A channel
//! owns one emit buffer per lane; buffers are kept between rounds so steady-state
//! traversal does not reallocate. Two traversals issued concurrently against the
//! same engine must use different channels.

use core::any::Any;
use core::fmt;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crossbeam_utils::CachePadded;

use crate::graph::VertexId;

/// Index of a message channel.
pub type ChannelId = usize;

/// Emit buffers of one lane: `(vertex, payload)` in emission order.
pub type LaneBuffer<M> = Vec<(VertexId, M)>;

struct ChannelSlot {
    busy: AtomicBool,
    spare: Mutex<Option<Box<dyn Any + Send>>>,
}

/// Fixed table of channels.
pub struct ChannelTable {
    slots: Box<[CachePadded<ChannelSlot>]>,
}

impl ChannelTable {
    /// Creates `channels` idle channels.
    pub fn new(channels: usize) -> Self {
        let slots = (0..channels)
            .map(|_| {
                CachePadded::new(ChannelSlot {
                    busy: AtomicBool::new(false),
                    spare: Mutex::new(None),
                })
            })
            .collect();
        Self { slots }
    }

    /// Number of channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no channels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `channel` currently has a traversal in flight.
    pub fn is_busy(&self, channel: ChannelId) -> bool {
        self.slot(channel).busy.load(Ordering::Acquire)
    }

    /// Leases `channel` with `lanes` empty buffers for messages of type `M`.
    ///
    /// Buffers cached from an earlier lease with the same message type are
    /// reused; a lease with a different message type starts fresh.
    ///
    /// # Panics
    /// Panics if `channel` is out of range or already leased.
    pub fn lease<M: Send + 'static>(&self, channel: ChannelId, lanes: usize) -> ChannelLease<'_, M> {
        let slot = self.slot(channel);
        assert!(
            !slot.busy.swap(true, Ordering::AcqRel),
            "channel {channel} already has a traversal in flight"
        );
        let cached = slot
            .spare
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .and_then(|b| b.downcast::<Vec<LaneBuffer<M>>>().ok());
        let mut buffers = cached.map_or_else(Vec::new, |b| *b);
        buffers.resize_with(lanes, Vec::new);
        ChannelLease { slot, buffers }
    }

    fn slot(&self, channel: ChannelId) -> &ChannelSlot {
        assert!(
            channel < self.slots.len(),
            "channel {channel} out of range for {} channels",
            self.slots.len()
        );
        &self.slots[channel]
    }
}

impl fmt::Debug for ChannelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTable")
            .field("channels", &self.slots.len())
            .finish()
    }
}

/// Exclusive use of one channel; released on drop.
pub struct ChannelLease<'a, M: Send + 'static> {
    slot: &'a ChannelSlot,
    buffers: Vec<LaneBuffer<M>>,
}

impl<M: Send + 'static> Deref for ChannelLease<'_, M> {
    type Target = [LaneBuffer<M>];

    fn deref(&self) -> &Self::Target {
        &self.buffers
    }
}

impl<M: Send + 'static> DerefMut for ChannelLease<'_, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffers
    }
}

impl<M: Send + 'static> Drop for ChannelLease<'_, M> {
    fn drop(&mut self) {
        let mut buffers = core::mem::take(&mut self.buffers);
        buffers.iter_mut().for_each(Vec::clear);
        *self.slot.spare.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(buffers));
        self.slot.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lease_releases_on_drop() {
        let table = ChannelTable::new(2);
        {
            let lease = table.lease::<u32>(1, 3);
            assert_eq!(lease.len(), 3);
            assert!(table.is_busy(1));
            assert!(!table.is_busy(0));
        }
        assert!(!table.is_busy(1));
    }

    #[test]
    fn buffers_are_reused_and_cleared() {
        let table = ChannelTable::new(1);
        let capacity = {
            let mut lease = table.lease::<f64>(0, 2);
            lease[0].extend((0..100).map(|v| (v, 0.5)));
            lease[0].capacity()
        };
        let lease = table.lease::<f64>(0, 2);
        assert!(lease[0].is_empty());
        assert_eq!(lease[0].capacity(), capacity);
    }

    #[test]
    fn message_type_change_starts_fresh() {
        let table = ChannelTable::new(1);
        drop(table.lease::<u32>(0, 4));
        let lease = table.lease::<(u32, f32)>(0, 2);
        assert_eq!(lease.len(), 2);
    }

    #[test]
    #[should_panic(expected = "already has a traversal in flight")]
    fn double_lease_panics() {
        let table = ChannelTable::new(1);
        let _first = table.lease::<u32>(0, 1);
        let _second = table.lease::<u32>(0, 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn unknown_channel_panics() {
        let table = ChannelTable::new(2);
        let _lease = table.lease::<u32>(2, 1);
    }
}
