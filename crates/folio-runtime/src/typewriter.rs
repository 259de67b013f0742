#![forbid(unsafe_code)]

//! Timed character-by-character text reveal.
//!
//! A [`Typewriter`] is a small state machine driven by its own
//! [`TimerQueue`]:
//!
//! ```text
//! Idle --(delay elapses)--> Revealing --(last char shown)--> Complete
//!   ^                            |
//!   +------- set_text(new) ------+   (from any phase)
//! ```
//!
//! At most one timer is ever pending: the previous one is cancelled before
//! the next is scheduled, so rapid text swaps cannot double-advance.
//!
//! Characters are Unicode scalar values; a partially revealed string never
//! ends in the middle of a multi-byte character.

use crate::timer::{TimerId, TimerQueue};
use tracing::{debug, trace};
use web_time::Duration;

/// Default interval between revealed characters.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(50);

/// Reveal timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterConfig {
    /// Interval between characters.
    pub speed: Duration,
    /// Wait before the first character.
    pub delay: Duration,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            delay: Duration::ZERO,
        }
    }
}

impl TypewriterConfig {
    /// Config from millisecond values.
    #[must_use]
    pub const fn from_millis(speed_ms: u64, delay_ms: u64) -> Self {
        Self {
            speed: Duration::from_millis(speed_ms),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Where the reveal currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    /// Waiting for the start delay.
    Idle,
    /// Showing one more character per tick.
    Revealing,
    /// Full text shown. Terminal until the text changes.
    Complete,
}

/// What a consumer renders on each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterFrame {
    pub display_text: String,
    pub is_complete: bool,
}

impl TypewriterFrame {
    /// The blinking caret is shown only while the reveal is unfinished.
    #[must_use]
    pub const fn caret_visible(&self) -> bool {
        !self.is_complete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Start,
    Reveal,
}

/// Per-use typewriter state. Not shared between consumers.
#[derive(Debug)]
pub struct Typewriter {
    text: String,
    config: TypewriterConfig,
    phase: TypewriterPhase,
    /// Characters revealed so far.
    index: usize,
    /// Byte length of the revealed prefix.
    revealed_bytes: usize,
    timers: TimerQueue<Tick>,
    pending: Option<TimerId>,
    mounted: bool,
}

impl Typewriter {
    /// Mount a typewriter for `text`: enters `Idle` and starts the delay.
    #[must_use]
    pub fn new(text: impl Into<String>, config: TypewriterConfig) -> Self {
        let mut tw = Self {
            text: text.into(),
            config,
            phase: TypewriterPhase::Idle,
            index: 0,
            revealed_bytes: 0,
            timers: TimerQueue::new(),
            pending: None,
            mounted: true,
        };
        tw.arm(config.delay, Tick::Start);
        tw
    }

    /// Full target text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn config(&self) -> TypewriterConfig {
        self.config
    }

    #[must_use]
    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    /// Revealed prefix of the text.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.text[..self.revealed_bytes]
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == TypewriterPhase::Complete
    }

    #[must_use]
    pub fn caret_visible(&self) -> bool {
        !self.is_complete()
    }

    /// Virtual time elapsed since mount.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// False after [`Typewriter::unmount`].
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Time until the next state change, if one is scheduled.
    #[must_use]
    pub fn next_tick_in(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|d| d.saturating_sub(self.timers.now()))
    }

    /// Snapshot of the consumer-facing output.
    #[must_use]
    pub fn frame(&self) -> TypewriterFrame {
        TypewriterFrame {
            display_text: self.display_text().to_string(),
            is_complete: self.is_complete(),
        }
    }

    /// Let `dt` of virtual time pass, firing every timer that falls due.
    pub fn advance(&mut self, dt: Duration) -> TypewriterFrame {
        if self.mounted {
            let until = self.timers.now().saturating_add(dt);
            while let Some((id, tick)) = self.timers.pop_due(until) {
                if self.pending == Some(id) {
                    self.pending = None;
                }
                self.fire(tick);
            }
        }
        self.frame()
    }

    /// Swap the target text. A different text resets to `Idle` with nothing
    /// revealed and restarts the delay; the same text is a no-op.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        debug!(from_phase = ?self.phase, "typewriter text changed, restarting");
        self.text = text;
        self.phase = TypewriterPhase::Idle;
        self.index = 0;
        self.revealed_bytes = 0;
        if self.mounted {
            self.arm(self.config.delay, Tick::Start);
        }
    }

    /// Tear down: cancels the pending timer. Later `advance` calls change
    /// nothing.
    pub fn unmount(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
        self.mounted = false;
    }

    fn arm(&mut self, after: Duration, tick: Tick) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
        self.pending = Some(self.timers.schedule(after, tick));
    }

    fn fire(&mut self, tick: Tick) {
        match tick {
            Tick::Start => {
                trace!(elapsed_ms = self.elapsed().as_millis() as u64, "typewriter started");
                self.phase = TypewriterPhase::Revealing;
            }
            Tick::Reveal => {
                if let Some(ch) = self.text[self.revealed_bytes..].chars().next() {
                    self.revealed_bytes += ch.len_utf8();
                    self.index += 1;
                }
            }
        }
        if self.revealed_bytes >= self.text.len() {
            trace!(chars = self.index, "typewriter complete");
            self.phase = TypewriterPhase::Complete;
        } else {
            self.arm(self.config.speed, Tick::Reveal);
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn defaults_match_hook_defaults() {
        let c = TypewriterConfig::default();
        assert_eq!(c.speed, ms(50));
        assert_eq!(c.delay, Duration::ZERO);
    }

    #[test]
    fn starts_idle_and_empty() {
        let tw = Typewriter::new("Hi", TypewriterConfig::from_millis(10, 100));
        assert_eq!(tw.phase(), TypewriterPhase::Idle);
        assert_eq!(tw.display_text(), "");
        assert!(!tw.is_complete());
        assert_eq!(tw.next_tick_in(), Some(ms(100)));
    }

    #[test]
    fn delay_moves_to_revealing_without_showing_text() {
        let mut tw = Typewriter::new("Hi", TypewriterConfig::from_millis(10, 100));
        let frame = tw.advance(ms(100));
        assert_eq!(tw.phase(), TypewriterPhase::Revealing);
        assert_eq!(frame.display_text, "");
        assert!(frame.caret_visible());
    }

    #[test]
    fn reveals_one_char_per_tick() {
        let mut tw = Typewriter::new("abc", TypewriterConfig::from_millis(10, 0));
        assert_eq!(tw.advance(Duration::ZERO).display_text, "");
        assert_eq!(tw.advance(ms(10)).display_text, "a");
        assert_eq!(tw.advance(ms(10)).display_text, "ab");
        let last = tw.advance(ms(10));
        assert_eq!(last.display_text, "abc");
        assert!(last.is_complete);
        assert!(!last.caret_visible());
    }

    #[test]
    fn complete_is_terminal() {
        let mut tw = Typewriter::new("ok", TypewriterConfig::from_millis(5, 0));
        tw.advance(ms(100));
        assert!(tw.is_complete());
        assert_eq!(tw.next_tick_in(), None);
        tw.advance(ms(1_000));
        assert_eq!(tw.display_text(), "ok");
        assert_eq!(tw.phase(), TypewriterPhase::Complete);
    }

    #[test]
    fn empty_text_completes_when_delay_elapses() {
        let mut tw = Typewriter::new("", TypewriterConfig::from_millis(10, 20));
        assert!(!tw.advance(ms(19)).is_complete);
        assert!(tw.advance(ms(1)).is_complete);
    }

    #[test]
    fn multibyte_chars_are_never_split() {
        let mut tw = Typewriter::new("Perú ñ", TypewriterConfig::from_millis(1, 0));
        tw.advance(ms(4));
        assert_eq!(tw.display_text(), "Perú");
        tw.advance(ms(2));
        assert_eq!(tw.display_text(), "Perú ñ");
        assert!(tw.is_complete());
    }

    #[test]
    fn only_one_timer_pending() {
        let mut tw = Typewriter::new("abcdef", TypewriterConfig::from_millis(10, 0));
        tw.advance(ms(25));
        assert_eq!(tw.timers.len(), 1);
        tw.set_text("xyz");
        tw.set_text("uvw");
        assert_eq!(tw.timers.len(), 1);
    }

    #[test]
    fn set_same_text_is_noop() {
        let mut tw = Typewriter::new("abc", TypewriterConfig::from_millis(10, 0));
        tw.advance(ms(20));
        tw.set_text("abc");
        assert_eq!(tw.display_text(), "ab");
    }

    #[test]
    fn unmount_cancels_pending_timer() {
        let mut tw = Typewriter::new("abc", TypewriterConfig::from_millis(10, 0));
        tw.advance(ms(10));
        tw.unmount();
        assert!(!tw.is_mounted());
        assert_eq!(tw.next_tick_in(), None);
        let frame = tw.advance(ms(1_000));
        assert_eq!(frame.display_text, "a");
        assert!(!frame.is_complete);
    }
}
