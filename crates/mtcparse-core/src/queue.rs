use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::timecode::TimecodePacket;

/// Default number of packets held before overflow.
pub const DEFAULT_CAPACITY: usize = 3;

/// What [`PacketQueue::push`] does when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Discard the oldest queued packet to make room.
    #[default]
    DropOldest,
    /// Keep the queue as is and discard the incoming packet.
    DropNewest,
}

/// Capacity-bounded FIFO of decoded packets.
///
/// The queue owns copies of the packets; consumers receive copies on
/// [`PacketQueue::pop`]. Its length never exceeds the capacity.
///
/// # Examples
/// ```
/// use mtcparse_core::{OverflowPolicy, PacketQueue, RateClass, TimecodePacket};
///
/// let mut queue = PacketQueue::with_capacity(1, OverflowPolicy::DropOldest);
/// queue.push(TimecodePacket::new(RateClass::Fps25, 0, 0, 0, 1));
/// queue.push(TimecodePacket::new(RateClass::Fps25, 0, 0, 0, 2));
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.front().map(|tc| tc.frame), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct PacketQueue {
    packets: VecDeque<TimecodePacket>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl PacketQueue {
    /// Create an empty queue. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            packets: VecDeque::with_capacity(capacity),
            capacity,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Append a packet, returning the packet discarded by overflow, if any.
    pub fn push(&mut self, packet: TimecodePacket) -> Option<TimecodePacket> {
        if self.packets.len() < self.capacity {
            self.packets.push_back(packet);
            return None;
        }
        match self.policy {
            OverflowPolicy::DropOldest => {
                let dropped = self.packets.pop_front();
                self.packets.push_back(packet);
                dropped
            }
            OverflowPolicy::DropNewest => Some(packet),
        }
    }

    /// Oldest packet, without removing it.
    pub fn front(&self) -> Option<&TimecodePacket> {
        self.packets.front()
    }

    pub fn pop(&mut self) -> Option<TimecodePacket> {
        self.packets.pop_front()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

impl Default for PacketQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, OverflowPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{OverflowPolicy, PacketQueue};
    use crate::timecode::{RateClass, TimecodePacket};

    fn packet(frame: u8) -> TimecodePacket {
        TimecodePacket::new(RateClass::Fps30, 0, 0, 0, frame)
    }

    #[test]
    fn length_is_bounded_by_capacity() {
        for policy in [OverflowPolicy::DropOldest, OverflowPolicy::DropNewest] {
            let mut queue = PacketQueue::with_capacity(3, policy);
            for n in 0..10u8 {
                queue.push(packet(n));
                assert_eq!(queue.len(), (n as usize + 1).min(3));
            }
        }
    }

    #[test]
    fn drop_oldest_keeps_latest_packets() {
        let mut queue = PacketQueue::with_capacity(2, OverflowPolicy::DropOldest);
        assert_eq!(queue.push(packet(1)), None);
        assert_eq!(queue.push(packet(2)), None);
        assert_eq!(queue.push(packet(3)), Some(packet(1)));
        assert_eq!(queue.pop(), Some(packet(2)));
        assert_eq!(queue.pop(), Some(packet(3)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn drop_newest_rejects_incoming() {
        let mut queue = PacketQueue::with_capacity(2, OverflowPolicy::DropNewest);
        queue.push(packet(1));
        queue.push(packet(2));
        assert_eq!(queue.push(packet(3)), Some(packet(3)));
        assert_eq!(queue.front(), Some(&packet(1)));
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut queue = PacketQueue::with_capacity(0, OverflowPolicy::DropOldest);
        assert_eq!(queue.capacity(), 1);
        queue.push(packet(7));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn front_does_not_remove() {
        let mut queue = PacketQueue::default();
        queue.push(packet(4));
        assert_eq!(queue.front(), Some(&packet(4)));
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn default_queue_settings() {
        let queue = PacketQueue::default();
        assert_eq!(queue.capacity(), super::DEFAULT_CAPACITY);
        assert_eq!(queue.policy(), OverflowPolicy::DropOldest);

        let queue = PacketQueue::with_capacity(5, OverflowPolicy::DropNewest);
        assert_eq!(queue.policy(), OverflowPolicy::DropNewest);
    }
}
