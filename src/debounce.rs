//! Quiet-interval debouncing for the search box.
//!
//! Works on caller-supplied [`Instant`]s rather than timers so the main loop
//! can drive it from its tick and tests can step time by hand.

use std::time::{Duration, Instant};

/// Default quiet interval before a typed query takes effect.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Holds the latest value and releases it once input has gone quiet.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// Record a new input value and restart the quiet window.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Return the pending value if it has been stable for the full delay and
    /// differs from the last settled one.  Each settled value is returned at
    /// most once.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = match &self.pending {
            Some((_, since)) => now.saturating_duration_since(*since) >= self.delay,
            None => false,
        };
        if !ready {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_settles_before_the_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(String::new(), DEFAULT_DEBOUNCE);
        d.set("a".to_string(), start);

        assert_eq!(d.poll(start + ms(349)), None);
        assert!(d.is_pending());
    }

    #[test]
    fn value_settles_after_the_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(String::new(), DEFAULT_DEBOUNCE);
        d.set("a".to_string(), start);

        assert_eq!(d.poll(start + ms(350)), Some("a".to_string()));
        assert_eq!(d.poll(start + ms(700)), None, "settles only once");
    }

    #[test]
    fn rapid_typing_only_settles_the_last_value() {
        let start = Instant::now();
        let mut d = Debouncer::new(String::new(), DEFAULT_DEBOUNCE);

        let mut released = Vec::new();
        for (i, value) in ["h", "he", "hel", "hell", "hello"].iter().enumerate() {
            let at = start + ms(100 * i as u64);
            d.set(value.to_string(), at);
            released.extend(d.poll(at));
        }
        released.extend(d.poll(start + ms(400 + 349)));
        assert!(released.is_empty());

        released.extend(d.poll(start + ms(400 + 350)));
        assert_eq!(released, vec!["hello".to_string()]);
    }

    #[test]
    fn returning_to_the_settled_value_is_silent() {
        let start = Instant::now();
        let mut d = Debouncer::new(String::new(), DEFAULT_DEBOUNCE);
        d.set("a".to_string(), start);
        d.set(String::new(), start + ms(10));

        assert_eq!(d.poll(start + ms(1000)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn custom_delay_is_respected() {
        let start = Instant::now();
        let mut d = Debouncer::new(0u32, ms(50));
        d.set(7, start);
        assert_eq!(d.poll(start + ms(49)), None);
        assert_eq!(d.poll(start + ms(50)), Some(7));
    }
}
