// Spoken announcement capability
//
// The engine announces run, step, and completion events through this trait.
// Announcements gate the countdown: the engine waits for `announce` to
// resolve before ticking, so implementations must resolve when speech
// actually finishes (or immediately when they have nothing to say).

use std::time::Duration;

use async_trait::async_trait;

/// Text-to-speech collaborator.
///
/// A backend that fails to initialize degrades the run rather than aborting
/// it: the engine checks `await_ready` once per run and skips every
/// announcement when readiness times out.
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Wait until the backend can speak, up to `timeout`.
    ///
    /// Returns `true` when ready. Implementations that need no warm-up
    /// return `true` immediately.
    async fn await_ready(&self, timeout: Duration) -> bool;

    /// Speak `text`, resolving once the utterance has finished.
    ///
    /// The engine races this future against run cancellation; it must be
    /// safe to drop mid-speech (followed by a `silence` call).
    async fn announce(&self, text: &str);

    /// Cut off any in-flight utterance.
    fn silence(&self);
}

/// Announcer that prints to stdout, pacing output like speech.
///
/// Used by the CLI so announcement ordering is observable: the simulated
/// speaking time keeps the countdown from starting before the line is
/// "spoken", matching how a real speech backend behaves.
#[derive(Debug, Clone, Default)]
pub struct ConsoleAnnouncer;

/// Per-word pacing for the simulated speech
const MILLIS_PER_WORD: u64 = 200;

#[async_trait]
impl Announcer for ConsoleAnnouncer {
    async fn await_ready(&self, _timeout: Duration) -> bool {
        true
    }

    async fn announce(&self, text: &str) {
        println!("🔊 {}", text);
        let words = text.split_whitespace().count() as u64;
        tokio::time::sleep(Duration::from_millis(words * MILLIS_PER_WORD)).await;
    }

    fn silence(&self) {}
}

/// Announcer that discards all announcements.
///
/// Useful for tests and headless runs where no speech backend exists.
#[derive(Debug, Clone, Default)]
pub struct NullAnnouncer;

#[async_trait]
impl Announcer for NullAnnouncer {
    async fn await_ready(&self, _timeout: Duration) -> bool {
        true
    }

    async fn announce(&self, _text: &str) {}

    fn silence(&self) {}
}
