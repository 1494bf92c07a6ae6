use crate::message::Tick;
use async_stream::stream;
use futures::Stream;
use log::*;
use tokio::time::{self, Duration, Instant, Interval, MissedTickBehavior};

/// Time between two frames of the demo stream.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Number of frames the demo stream writes before closing.
pub const TICK_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Streaming,
    Closed(CloseReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Every tick up to the limit was produced.
    Completed,
    /// The consumer went away before the limit was reached.
    ClientClosed,
}

/// Per-request tick state: a bounded counter plus the timer driving it.
///
/// The timer handle only lives while the stream is `Streaming`. It is taken
/// out and dropped by [`TickStream::release`], which both the completion path
/// and `Drop` go through.
#[derive(Debug)]
pub struct TickStream {
    count: u32,
    limit: u32,
    period: Duration,
    handle: Option<Interval>,
    state: State,
}

impl TickStream {
    pub fn new(period: Duration, limit: u32) -> Self {
        Self {
            count: 0,
            limit,
            period,
            handle: None,
            state: State::Idle,
        }
    }

    /// The `/stream/test` configuration: three ticks, one second apart.
    pub fn demo() -> Self {
        Self::new(TICK_PERIOD, TICK_LIMIT)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Arms the timer. The first firing happens one full period from now.
    pub fn start(&mut self) {
        if self.state != State::Idle {
            return;
        }

        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.handle = Some(interval);
        self.state = State::Streaming;
        debug!("Tick stream started (period {:?}, limit {})", self.period, self.limit);
    }

    /// Advances the counter by one firing. Returns `None` once the stream is not streaming.
    pub fn step(&mut self) -> Option<Tick> {
        if self.state != State::Streaming {
            return None;
        }
        if self.count >= self.limit {
            self.release(CloseReason::Completed);
            return None;
        }

        self.count += 1;
        let tick = Tick::new(self.count);

        if self.count >= self.limit {
            self.release(CloseReason::Completed);
        }

        Some(tick)
    }

    /// Waits for the next timer firing and steps. Starts the timer on first use.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.start();

        let handle = self.handle.as_mut()?;
        handle.tick().await;
        self.step()
    }

    /// Stops the timer and moves to `Closed`. Returns `true` only for the call
    /// that actually released the handle.
    pub fn release(&mut self, reason: CloseReason) -> bool {
        match self.handle.take() {
            Some(_interval) => {
                self.state = State::Closed(reason);
                debug!(
                    "Tick stream closed after {} of {} ticks: {:?}",
                    self.count, self.limit, reason
                );
                true
            }
            None => false,
        }
    }

    /// Turns the state machine into a stream of ticks that ends after the last one.
    pub fn into_stream(mut self) -> impl Stream<Item = Tick> {
        stream! {
            while let Some(tick) = self.next_tick().await {
                yield tick;
            }
        }
    }
}

impl Drop for TickStream {
    fn drop(&mut self) {
        self.release(CloseReason::ClientClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test(start_paused = true)]
    async fn test_demo_stream_yields_three_ticks_then_ends() {
        let started = Instant::now();

        let ticks: Vec<u32> = TickStream::demo()
            .into_stream()
            .map(|tick| tick.tick)
            .collect()
            .await;

        assert_eq!(ticks, vec![1, 2, 3]);
        assert!(started.elapsed() >= TICK_PERIOD * 3);
        assert!(started.elapsed() < TICK_PERIOD * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_arrives_after_one_period() {
        let started = Instant::now();
        let mut ticker = TickStream::demo();

        assert_eq!(ticker.next_tick().await, Some(Tick::new(1)));
        assert!(started.elapsed() >= TICK_PERIOD);
        assert!(started.elapsed() < TICK_PERIOD * 2);
        assert_eq!(ticker.state(), State::Streaming);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_closes_and_releases_timer() {
        let mut ticker = TickStream::new(Duration::from_millis(10), 2);

        assert_eq!(ticker.next_tick().await, Some(Tick::new(1)));
        assert_eq!(ticker.next_tick().await, Some(Tick::new(2)));
        assert_eq!(ticker.state(), State::Closed(CloseReason::Completed));

        assert_eq!(ticker.next_tick().await, None);
        assert!(!ticker.release(CloseReason::ClientClosed));
        assert_eq!(ticker.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_close_releases_exactly_once() {
        let mut ticker = TickStream::demo();
        assert_eq!(ticker.next_tick().await, Some(Tick::new(1)));

        assert!(ticker.release(CloseReason::ClientClosed));
        assert!(!ticker.release(CloseReason::ClientClosed));
        assert_eq!(ticker.state(), State::Closed(CloseReason::ClientClosed));

        assert_eq!(ticker.next_tick().await, None);
        assert_eq!(ticker.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_close_is_ignored() {
        let mut ticker = TickStream::demo();
        ticker.start();
        ticker.release(CloseReason::ClientClosed);

        ticker.start();
        assert_eq!(ticker.state(), State::Closed(CloseReason::ClientClosed));
        assert_eq!(ticker.next_tick().await, None);
    }

    #[test]
    fn test_step_before_start_produces_nothing() {
        let mut ticker = TickStream::demo();
        assert_eq!(ticker.step(), None);
        assert_eq!(ticker.state(), State::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_stream_is_empty() {
        let ticks: Vec<Tick> = TickStream::new(TICK_PERIOD, 0)
            .into_stream()
            .collect()
            .await;

        assert!(ticks.is_empty());
    }
}
