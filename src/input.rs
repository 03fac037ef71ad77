//! Directional intent handed from the input side to the simulation.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::components::Direction;

const EMPTY: u8 = u8::MAX;

/// Single-slot mailbox: one pending direction, overwritten by every post and
/// emptied by every take. One writer and one reader need no further locking.
#[derive(Debug)]
pub struct InputSlot {
    pending: AtomicU8,
}

impl Default for InputSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSlot {
    pub fn new() -> Self {
        Self {
            pending: AtomicU8::new(EMPTY),
        }
    }

    pub fn post(&self, dir: Direction) {
        self.pending.store(dir.to_code(), Ordering::Release);
    }

    pub fn take(&self) -> Option<Direction> {
        match self.pending.swap(EMPTY, Ordering::AcqRel) {
            EMPTY => None,
            code => Some(Direction::from_code(code)),
        }
    }

    pub fn peek(&self) -> Option<Direction> {
        match self.pending.load(Ordering::Acquire) {
            EMPTY => None,
            code => Some(Direction::from_code(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_last_post_wins() {
        let slot = InputSlot::new();
        assert_eq!(slot.take(), None);
        slot.post(Direction::Up);
        slot.post(Direction::Left);
        assert_eq!(slot.peek(), Some(Direction::Left));
        assert_eq!(slot.take(), Some(Direction::Left));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_none_is_a_real_request() {
        let slot = InputSlot::new();
        slot.post(Direction::None);
        assert_eq!(slot.take(), Some(Direction::None));
    }

    #[test]
    fn test_post_from_another_thread() {
        let slot = Arc::new(InputSlot::new());
        let writer = Arc::clone(&slot);
        thread::spawn(move || {
            for dir in Direction::CARDINALS {
                writer.post(dir);
            }
        })
        .join()
        .unwrap();
        assert_eq!(slot.take(), Some(Direction::Right));
    }
}
