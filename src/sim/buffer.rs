/// Direction buffer: the single pending heading between two ticks.
///
/// Input handlers `offer` headings as fast as they arrive; the engine
/// `take`s at most one per tick. The slot is overwritten, never appended,
/// so two presses between ticks leave only the second one.
///
/// Stored in an `AtomicU8` (0 = empty) so set and take are each a single
/// indivisible operation, whoever holds a reference.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::domain::heading::Heading;

const EMPTY: u8 = 0;

#[derive(Debug, Default)]
pub struct DirectionBuffer {
    slot: AtomicU8,
}

fn encode(h: Heading) -> u8 {
    match h {
        Heading::Up    => 1,
        Heading::Down  => 2,
        Heading::Left  => 3,
        Heading::Right => 4,
    }
}

fn decode(v: u8) -> Option<Heading> {
    match v {
        1 => Some(Heading::Up),
        2 => Some(Heading::Down),
        3 => Some(Heading::Left),
        4 => Some(Heading::Right),
        _ => None,
    }
}

impl DirectionBuffer {
    pub fn new() -> Self {
        DirectionBuffer { slot: AtomicU8::new(EMPTY) }
    }

    /// Queue `requested` unless it reverses `current`, the heading the
    /// snake is actually travelling in (not whatever is already pending).
    /// Returns whether the slot was written.
    pub fn offer(&self, requested: Heading, current: Heading) -> bool {
        if requested.is_opposite(current) {
            return false;
        }
        self.slot.store(encode(requested), Ordering::SeqCst);
        true
    }

    /// Consume the pending heading, leaving the slot empty.
    pub fn take(&self) -> Option<Heading> {
        decode(self.slot.swap(EMPTY, Ordering::SeqCst))
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<Heading> {
        decode(self.slot.load(Ordering::SeqCst))
    }

    pub fn clear(&self) {
        self.slot.store(EMPTY, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_offered() {
        let b = DirectionBuffer::new();
        assert_eq!(b.take(), None);
        assert!(b.offer(Heading::Left, Heading::Up));
        assert_eq!(b.peek(), Some(Heading::Left));
        assert_eq!(b.take(), Some(Heading::Left));
        assert_eq!(b.take(), None);
    }

    #[test]
    fn reversal_leaves_pending_unchanged() {
        for current in Heading::ALL {
            let b = DirectionBuffer::new();
            let keep = Heading::ALL.into_iter()
                .find(|h| !h.is_opposite(current))
                .unwrap();
            b.offer(keep, current);
            assert!(!b.offer(current.opposite(), current));
            assert_eq!(b.peek(), Some(keep));
        }
    }

    #[test]
    fn reversal_into_empty_slot_stays_empty() {
        let b = DirectionBuffer::new();
        assert!(!b.offer(Heading::Down, Heading::Up));
        assert_eq!(b.peek(), None);
    }

    #[test]
    fn last_offer_wins() {
        let b = DirectionBuffer::new();
        b.offer(Heading::Left, Heading::Up);
        b.offer(Heading::Right, Heading::Up);
        assert_eq!(b.take(), Some(Heading::Right));
    }

    #[test]
    fn checked_against_current_not_pending() {
        // Pending LEFT while moving UP: RIGHT is still legal because the
        // snake has not turned yet.
        let b = DirectionBuffer::new();
        b.offer(Heading::Left, Heading::Up);
        assert!(b.offer(Heading::Right, Heading::Up));
        assert_eq!(b.take(), Some(Heading::Right));
    }

    #[test]
    fn clear_empties_slot() {
        let b = DirectionBuffer::new();
        b.offer(Heading::Left, Heading::Up);
        b.clear();
        assert_eq!(b.take(), None);
    }
}
