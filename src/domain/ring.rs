/// Snake body store: a fixed-capacity ring of visited head positions.
///
/// ```text
///   slots:  [ .. | tail | seg | seg | ... | head | .. ]
///                   ^ trailing slot, zeroed    ^ newest segment
/// ```
///
/// The live body is the `length` slots ending at `head`. `tail_index()` is
/// the slot just behind the body: on each advance the oldest segment falls
/// into it and is handed back for erasing. Every slot outside the live body
/// reads as `Point::NOWHERE`, so growing the body into old slots never
/// erases anything stale.

use super::snake::Point;

pub const RING_CAPACITY: usize = 1000;

/// Largest target value on the board.
pub const MAX_TARGET: u32 = 9;
/// Growth per point of target value.
pub const GROWTH_PER_POINT: usize = 4;
/// Most a single pickup can add in one tick.
pub const MAX_PICKUP_GROWTH: usize = GROWTH_PER_POINT * MAX_TARGET as usize;
/// Slots kept free between tail and head. One pickup's worth, so a length
/// checked just before growing can never wrap the tail into the head.
pub const GROWTH_MARGIN: usize = MAX_PICKUP_GROWTH;

pub const INITIAL_LENGTH: usize = 2;

/// Passes of the staggered erase effect.
pub const ERASE_PASSES: usize = 10;

#[derive(Clone, Debug)]
pub struct BodyRing {
    slots: Vec<Point>,
    head: usize,
    length: usize,
}

impl BodyRing {
    pub fn new() -> Self {
        Self::with_capacity(RING_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity > GROWTH_MARGIN + INITIAL_LENGTH,
            "ring capacity {capacity} leaves no room above the growth margin"
        );
        BodyRing {
            slots: vec![Point::NOWHERE; capacity],
            head: 1,
            length: INITIAL_LENGTH,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn max_len(&self) -> usize {
        self.capacity() - GROWTH_MARGIN
    }

    /// Index `back` slots behind the head.
    #[inline]
    fn behind(&self, back: usize) -> usize {
        (self.head + self.capacity() - back) % self.capacity()
    }

    #[inline]
    pub fn tail_index(&self) -> usize {
        self.behind(self.length)
    }

    #[cfg(test)]
    pub fn slot(&self, index: usize) -> Point {
        self.slots[index]
    }

    /// Empty body at the initial length, all slots zeroed.
    pub fn reset(&mut self) {
        self.slots.fill(Point::NOWHERE);
        self.head = 1;
        self.length = INITIAL_LENGTH;
    }

    /// Record a new head. Returns the segment that dropped off the end,
    /// if there was a real one.
    pub fn advance(&mut self, pos: Point) -> Option<Point> {
        self.head = (self.head + 1) % self.capacity();
        self.slots[self.head] = pos;
        let tail = self.tail_index();
        let fallen = std::mem::replace(&mut self.slots[tail], Point::NOWHERE);
        (!fallen.is_nowhere()).then_some(fallen)
    }

    /// Lengthen the body, clamped to `max_len`. Returns the new length.
    pub fn grow(&mut self, by: usize) -> usize {
        self.length = (self.length + by).min(self.max_len());
        self.length
    }

    /// One pass of the staggered erase: every tenth segment, starting
    /// `pass` back from the oldest. The slots are zeroed and their old
    /// positions returned for painting over.
    pub fn erase_pass(&mut self, pass: usize) -> Vec<Point> {
        let mut erased = Vec::new();
        if pass > self.length {
            return erased;
        }
        let mut back = self.length - pass;
        loop {
            let idx = self.behind(back);
            let p = std::mem::replace(&mut self.slots[idx], Point::NOWHERE);
            if !p.is_nowhere() {
                erased.push(p);
            }
            if back < ERASE_PASSES { break; }
            back -= ERASE_PASSES;
        }
        erased
    }

    /// Live segments, oldest first.
    #[cfg(test)]
    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.length).rev().map(move |b| self.slots[self.behind(b)])
    }
}
