//! Host platform capability consumed by the playback core.
//!
//! The host is the process-wide speech synthesis engine (in a browser,
//! `window.speechSynthesis`). It is injected once, as an `Arc<dyn SpeechHost>`,
//! into the catalog loader and the utterance controller; nothing else issues
//! speak or cancel commands to it.
//!
//! All callbacks are delivered on the caller's thread. A host may run them
//! synchronously from inside [`SpeechHost::speak`] or [`SpeechHost::cancel`];
//! the core never holds a lock while calling into the host.

use read_aloud_domain::{PlaybackRequest, Voice};

pub use crate::controller::UtteranceCallbacks;

/// Handler invoked when the host's voice list changes.
///
/// It takes no arguments; the receiver re-queries [`SpeechHost::list_voices`].
pub type ReadinessHandler = Box<dyn Fn() + 'static>;

/// Token identifying a registered [`ReadinessHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Speech synthesis capability of the host platform.
pub trait SpeechHost {
    /// Current voice list. May be empty until the host signals readiness.
    fn list_voices(&self) -> Vec<Voice>;

    /// Register a handler for the "voices changed" notification.
    fn on_voices_ready(&self, handler: ReadinessHandler) -> SubscriptionId;

    /// Remove a handler registered with [`SpeechHost::on_voices_ready`].
    ///
    /// Unknown identifiers are ignored.
    fn remove_voices_ready(&self, subscription: SubscriptionId);

    /// Begin an asynchronous playback session.
    ///
    /// Returns immediately. Lifecycle events are reported through `callbacks`
    /// at unspecified later times.
    fn speak(&self, request: &PlaybackRequest, callbacks: UtteranceCallbacks);

    /// Request termination of any in-flight session.
    fn cancel(&self);
}
