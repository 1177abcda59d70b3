//! Progress reporting for long-running codec calls.
//!
//! The codec calls a [`Progress`] sink with a fraction in `[0, 1]` at
//! coarse intervals (once per flushed block, then a final `1.0`). Values
//! never decrease within one call. The sink is purely cosmetic: the codec
//! ignores anything it does and never waits on it.
//!
//! A sink can be a closure, or the sending half of a channel whose
//! receiver lives on a display thread:
//!
//! ```rust
//! use qhuff_core::progress::Progress;
//! use std::sync::mpsc;
//! use std::thread;
//!
//! let (tx, rx) = mpsc::channel::<f32>();
//! let display = thread::spawn(move || rx.iter().last());
//!
//! let mut sink = tx;
//! sink.report(0.25);
//! sink.report(1.0);
//! drop(sink);
//!
//! assert_eq!(display.join().unwrap(), Some(1.0));
//! ```

use std::sync::mpsc::Sender;

/// A sink for progress fractions.
pub trait Progress {
    /// Report that `fraction` of the work is done.
    fn report(&mut self, fraction: f32);
}

/// A sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _fraction: f32) {}
}

impl<F: FnMut(f32)> Progress for F {
    fn report(&mut self, fraction: f32) {
        self(fraction)
    }
}

impl Progress for Sender<f32> {
    fn report(&mut self, fraction: f32) {
        // A display thread that went away is not an error for the codec.
        let _ = self.send(fraction);
    }
}

/// Borrows a sink so that it only ever sees clamped, non-decreasing
/// values.
#[derive(Debug)]
pub struct Monotonic<'a, P: ?Sized> {
    inner: &'a mut P,
    last: f32,
}

impl<'a, P: Progress + ?Sized> Monotonic<'a, P> {
    /// Wrap `inner`.
    pub fn new(inner: &'a mut P) -> Self {
        Self { inner, last: 0.0 }
    }

    /// Last value forwarded to the inner sink.
    pub fn last(&self) -> f32 {
        self.last
    }
}

impl<P: Progress + ?Sized> Progress for Monotonic<'_, P> {
    fn report(&mut self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            self.last
        } else {
            fraction.clamp(0.0, 1.0)
        };
        if fraction >= self.last {
            self.last = fraction;
            self.inner.report(fraction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |f: f32| seen.push(f);
            sink.report(0.5);
            sink.report(1.0);
        }
        assert_eq!(seen, vec![0.5, 1.0]);
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sink = tx;
        sink.report(0.3);
    }

    #[test]
    fn test_monotonic_clamps_and_filters() {
        let mut seen = Vec::new();
        {
            let mut record = |f: f32| seen.push(f);
            let mut sink = Monotonic::new(&mut record);
            sink.report(0.4);
            sink.report(0.2);
            sink.report(f32::NAN);
            sink.report(3.0);
            assert_eq!(sink.last(), 1.0);
        }
        assert_eq!(seen, vec![0.4, 0.4, 1.0]);
    }
}
