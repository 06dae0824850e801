//! The double-buffered event channel.

/// A typed event channel with one tick of propagation delay.
///
/// `emit` only ever appends to the current buffer; `poll` only ever reads
/// the previous buffer; `swap` promotes current to previous (discarding the
/// old previous) and leaves current empty. Polling does not drain: any
/// number of consumers may read the same buffer within a tick.
pub struct EventChannel<T> {
    /// Written this tick, invisible until the next swap.
    current: Vec<T>,
    /// Written last tick, readable this tick.
    previous: Vec<T>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventChannel<T> {
    /// Create an empty channel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Vec::new(),
            previous: Vec::new(),
        }
    }

    /// Emit an event. It becomes visible to [`poll`](Self::poll) after the
    /// next [`swap`](Self::swap).
    pub fn emit(&mut self, event: T) {
        self.current.push(event);
    }

    /// Advance the channel by one tick: the events emitted since the last
    /// swap become readable, and last tick's readable events are dropped.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
    }

    /// The events emitted during the previous tick.
    #[must_use]
    pub fn poll(&self) -> &[T] {
        &self.previous
    }

    /// Number of events currently readable via [`poll`](Self::poll).
    #[must_use]
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    /// Whether [`poll`](Self::poll) would return no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    /// Number of events waiting for the next swap.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.current.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitted_event_invisible_before_swap() {
        let mut channel = EventChannel::new();
        channel.emit(7_u32);

        assert!(channel.poll().is_empty());
        assert_eq!(channel.pending(), 1);
    }

    #[test]
    fn test_event_visible_after_one_swap() {
        let mut channel = EventChannel::new();
        channel.emit(7_u32);
        channel.swap();

        assert_eq!(channel.poll(), &[7]);
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_second_swap_discards_unread_events() {
        let mut channel = EventChannel::new();
        channel.emit(7_u32);
        channel.swap();
        channel.swap();

        assert!(channel.poll().is_empty());
        assert!(channel.is_empty());
    }

    #[test]
    fn test_poll_does_not_drain() {
        let mut channel = EventChannel::new();
        channel.emit("hello");
        channel.swap();

        assert_eq!(channel.poll(), &["hello"]);
        assert_eq!(channel.poll(), &["hello"]);
    }

    #[test]
    fn test_emissions_during_readable_tick_stay_separate() {
        let mut channel = EventChannel::new();
        channel.emit(1_u32);
        channel.swap();
        channel.emit(2);
        channel.emit(3);

        assert_eq!(channel.poll(), &[1]);

        channel.swap();
        assert_eq!(channel.poll(), &[2, 3]);
    }
}
