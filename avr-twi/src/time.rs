//! Wait bounds for polling the TWI completion flag.
//!
//! A [`Deadline`] is armed right before a phase is polled and asked on every
//! poll whether the phase should be given up on.

use num_traits::{Bounded, CheckedAdd, NumAssignOps, One, Unsigned, Zero};

pub trait UInt: Unsigned + Copy + NumAssignOps + Ord + Bounded + CheckedAdd {}

impl<I: Unsigned + Copy + NumAssignOps + Ord + Bounded + CheckedAdd> UInt for I {}

pub trait Deadline {
    /// Restart the bound, called once per awaited phase.
    fn arm(&mut self);

    /// Called once per unsuccessful poll.
    fn expired(&mut self) -> bool;
}

impl<D: Deadline + ?Sized> Deadline for &mut D {
    #[inline(always)]
    fn arm(&mut self) {
        (**self).arm()
    }

    #[inline(always)]
    fn expired(&mut self) -> bool {
        (**self).expired()
    }
}

/// Never expires: a stuck bus hangs the caller forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl Deadline for Unbounded {
    #[inline(always)]
    fn arm(&mut self) {}

    #[inline(always)]
    fn expired(&mut self) -> bool {
        false
    }
}

/// Gives up after a fixed number of polls.
#[derive(Debug, Clone, Copy)]
pub struct PollLimit<I: UInt> {
    limit: I,
    remaining: I,
}

impl<I: UInt> PollLimit<I> {
    #[inline]
    pub fn new(limit: I) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    #[inline(always)]
    pub fn limit(&self) -> I {
        self.limit
    }
}

impl<I: UInt> Deadline for PollLimit<I> {
    #[inline(always)]
    fn arm(&mut self) {
        self.remaining = self.limit;
    }

    #[inline]
    fn expired(&mut self) -> bool {
        if self.remaining.is_zero() {
            true
        } else {
            self.remaining -= One::one();
            false
        }
    }
}

/// A free running counter, usually advanced by a timer interrupt.
pub trait TickSource {
    type Tick: UInt;

    fn now(&mut self) -> Self::Tick;
}

impl<I: UInt, F: FnMut() -> I> TickSource for F {
    type Tick = I;

    #[inline(always)]
    fn now(&mut self) -> I {
        self()
    }
}

/// Gives up once `timeout` ticks of `source` went by since [`Deadline::arm`].
pub struct TickDeadline<S: TickSource> {
    source: S,
    timeout: S::Tick,
    start: S::Tick,
}

impl<S: TickSource> TickDeadline<S> {
    #[inline]
    pub fn new(mut source: S, timeout: S::Tick) -> Self {
        let start = source.now();
        Self {
            source,
            timeout,
            start,
        }
    }

    #[inline(always)]
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: TickSource> Deadline for TickDeadline<S> {
    #[inline(always)]
    fn arm(&mut self) {
        self.start = self.source.now();
    }

    #[inline]
    fn expired(&mut self) -> bool {
        elapsed(self.start, self.source.now())
            .map(|x| x >= self.timeout)
            .unwrap_or(true)
    }
}

/// Ticks between `start` and `now`, across at most one counter wraparound.
#[inline(always)]
pub fn elapsed<I: UInt>(start: I, now: I) -> Option<I> {
    if start > now {
        (I::max_value() - start)
            .checked_add(&now)
            .and_then(|x| x.checked_add(&One::one()))
    } else {
        Some(now - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_wraps_once() {
        assert_eq!(elapsed(10u8, 15u8), Some(5));
        assert_eq!(elapsed(250u8, 4u8), Some(10));
        assert_eq!(elapsed(0u16, 0u16), Some(0));
    }

    #[test]
    fn poll_limit_rearms() {
        let mut d = PollLimit::new(2u8);
        d.arm();
        assert!(!d.expired());
        assert!(!d.expired());
        assert!(d.expired());
        d.arm();
        assert!(!d.expired());
    }

    #[test]
    fn tick_deadline_counts_from_arm() {
        let mut now = 0u16;
        let mut ticks = core::iter::from_fn(move || {
            now = now.wrapping_add(3);
            Some(now)
        });
        let mut d = TickDeadline::new(move || ticks.next().unwrap_or(0), 10);
        d.arm();
        assert!(!d.expired());
        assert!(!d.expired());
        assert!(!d.expired());
        assert!(d.expired());
    }

    #[test]
    fn tick_deadline_survives_wraparound() {
        let mut now = u8::MAX - 2;
        let mut d = TickDeadline::new(
            move || {
                now = now.wrapping_add(1);
                now
            },
            4,
        );
        d.arm();
        assert!(!d.expired());
        assert!(!d.expired());
        assert!(!d.expired());
        assert!(d.expired());
    }

    #[test]
    fn unbounded_never_expires() {
        let mut d = Unbounded;
        d.arm();
        assert!((0..1000).all(|_| !d.expired()));
    }
}
