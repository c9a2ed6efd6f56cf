//! Utterance controller: the `Idle`/`Speaking` state machine over the host
//! engine's asynchronous session lifecycle.
//!
//! ```text
//!   Idle --speak--> (request submitted) --on_start--> Speaking
//!   Speaking --on_end | on_error | stop--> Idle
//! ```
//!
//! Every submitted request gets a generation number. Callbacks are tagged
//! with the generation of the request they belong to, and only callbacks for
//! the current generation move the state machine. `stop()` retires the
//! current generation, so nothing a cancelled session reports afterwards can
//! bring `Speaking` back.

use std::sync::{Arc, Weak};

use derive_more::Display;
use parking_lot::Mutex;
use read_aloud_domain::{
    PlaybackRequest, PlaybackState, SynthesisErrorKind, VocalPitchMod, VocalSpeedMod, VoiceError,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::PlaybackConfig;
use crate::host::SpeechHost;

/// Why a speak intent was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectReason {
    /// The text is empty or whitespace only.
    #[display("empty text")]
    EmptyText,
    /// An utterance is already playing.
    #[display("already speaking")]
    AlreadySpeaking,
}

/// Result of a speak intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The request was handed to the host under this generation.
    Submitted(u64),
    /// The guard refused the request; nothing was sent to the host.
    Rejected(RejectReason),
}

impl SpeakOutcome {
    pub fn is_submitted(self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

#[derive(Debug, Clone, Copy)]
enum Lifecycle {
    Start,
    End,
    Error(SynthesisErrorKind),
}

#[derive(Debug)]
struct ControllerInner {
    state: PlaybackState,
    /// Last generation handed out.
    generation: u64,
    /// Generation whose callbacks are still honoured.
    active: Option<u64>,
    text: String,
    pitch: VocalPitchMod,
    rate: VocalSpeedMod,
    last_error: Option<VoiceError>,
}

struct ControllerShared {
    inner: Mutex<ControllerInner>,
    state_tx: watch::Sender<PlaybackState>,
}

impl ControllerShared {
    fn transition(&self, inner: &mut ControllerInner, next: PlaybackState) {
        if inner.state != next {
            debug!(from = %inner.state, to = %next, "playback state changed");
            inner.state = next;
            self.state_tx.send_replace(next);
        }
    }

    fn handle(&self, generation: u64, event: Lifecycle) {
        let mut inner = self.inner.lock();
        if inner.active != Some(generation) {
            debug!(generation, ?event, current = ?inner.active, "ignoring stale callback");
            return;
        }
        match event {
            Lifecycle::Start => {
                if inner.state.is_speaking() {
                    debug!(generation, "duplicate start callback");
                } else {
                    self.transition(&mut inner, PlaybackState::Speaking);
                }
            }
            Lifecycle::End => {
                inner.active = None;
                self.transition(&mut inner, PlaybackState::Idle);
            }
            Lifecycle::Error(kind) => {
                if kind.is_interruption() {
                    debug!(generation, %kind, "utterance interrupted");
                } else {
                    warn!(generation, %kind, "speech synthesis failed");
                }
                inner.active = None;
                inner.last_error = Some(VoiceError::Synthesis(kind));
                self.transition(&mut inner, PlaybackState::Idle);
            }
        }
    }
}

/// Lifecycle callbacks for one submitted request.
///
/// Hosts call these from their start/end/error events. The handle only holds
/// a weak reference to the controller, so it is safe to keep after the
/// controller is gone; late calls are no-ops.
#[derive(Clone)]
pub struct UtteranceCallbacks {
    generation: u64,
    shared: Weak<ControllerShared>,
}

impl UtteranceCallbacks {
    /// Generation of the request these callbacks belong to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The host started speaking.
    pub fn on_start(&self) {
        self.dispatch(Lifecycle::Start);
    }

    /// The host finished speaking.
    pub fn on_end(&self) {
        self.dispatch(Lifecycle::End);
    }

    /// The host reported a failure.
    pub fn on_error(&self, kind: SynthesisErrorKind) {
        self.dispatch(Lifecycle::Error(kind));
    }

    fn dispatch(&self, event: Lifecycle) {
        if let Some(shared) = self.shared.upgrade() {
            shared.handle(self.generation, event);
        }
    }
}

impl std::fmt::Debug for UtteranceCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtteranceCallbacks")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Owns the playback state and the draft text/pitch/rate of the form.
pub struct UtteranceController {
    host: Arc<dyn SpeechHost>,
    shared: Arc<ControllerShared>,
}

impl UtteranceController {
    pub fn new(host: Arc<dyn SpeechHost>, config: &PlaybackConfig) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::Idle);
        let inner = ControllerInner {
            state: PlaybackState::Idle,
            generation: 0,
            active: None,
            text: String::new(),
            pitch: config.default_pitch,
            rate: config.default_rate,
            last_error: None,
        };
        Self {
            host,
            shared: Arc::new(ControllerShared {
                inner: Mutex::new(inner),
                state_tx,
            }),
        }
    }

    /// Submit `request` to the host.
    ///
    /// Rejected without touching the host when the text is blank or an
    /// utterance is already playing. Otherwise the host is told to cancel
    /// whatever it may still be playing and then to speak the new request;
    /// the state becomes `Speaking` only once the host reports a start.
    pub fn speak(&self, request: PlaybackRequest) -> SpeakOutcome {
        let generation = {
            let mut inner = self.shared.inner.lock();
            if !request.is_speakable() {
                debug!("speak rejected: empty text");
                return SpeakOutcome::Rejected(RejectReason::EmptyText);
            }
            if inner.state.is_speaking() {
                debug!("speak rejected: already speaking");
                return SpeakOutcome::Rejected(RejectReason::AlreadySpeaking);
            }
            inner.generation += 1;
            inner.active = Some(inner.generation);
            inner.last_error = None;
            inner.generation
        };

        debug!(
            generation,
            voice = ?request.voice,
            pitch = request.pitch.value(),
            rate = request.rate.value(),
            "submitting utterance"
        );
        self.host.cancel();
        let callbacks = UtteranceCallbacks {
            generation,
            shared: Arc::downgrade(&self.shared),
        };
        self.host.speak(&request, callbacks);
        SpeakOutcome::Submitted(generation)
    }

    /// Request built from the draft text, pitch and rate, without a voice.
    pub fn draft_request(&self) -> PlaybackRequest {
        let inner = self.shared.inner.lock();
        PlaybackRequest::new(inner.text.clone())
            .pitch(inner.pitch)
            .rate(inner.rate)
    }

    /// Stop playback.
    ///
    /// While `Speaking`, cancels the host and returns to `Idle` immediately,
    /// without waiting for the host's own end or error callback. Returns
    /// `false` and does nothing while `Idle`.
    ///
    /// A request that was submitted but has not reported its start yet still
    /// leaves the state `Idle`, so `stop` neither cancels nor retires it; if
    /// the host starts it later the state becomes `Speaking`.
    pub fn stop(&self) -> bool {
        {
            let mut inner = self.shared.inner.lock();
            if !inner.state.is_speaking() {
                return false;
            }
            inner.active = None;
            self.shared.transition(&mut inner, PlaybackState::Idle);
        }
        debug!("cancelling utterance");
        self.host.cancel();
        true
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.inner.lock().state
    }

    /// Watch channel that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// Most recent synthesis failure, cleared by the next accepted speak.
    pub fn last_error(&self) -> Option<VoiceError> {
        self.shared.inner.lock().last_error.clone()
    }

    pub fn text(&self) -> String {
        self.shared.inner.lock().text.clone()
    }

    pub fn pitch(&self) -> VocalPitchMod {
        self.shared.inner.lock().pitch
    }

    pub fn rate(&self) -> VocalSpeedMod {
        self.shared.inner.lock().rate
    }

    /// Replace the draft text. Ignored while speaking.
    pub fn set_text(&self, text: impl Into<String>) -> bool {
        self.edit("text", |inner| inner.text = text.into())
    }

    /// Set the draft pitch, clamped into range. Ignored while speaking.
    pub fn set_pitch(&self, pitch: impl Into<VocalPitchMod>) -> bool {
        let pitch = pitch.into();
        self.edit("pitch", |inner| inner.pitch = pitch)
    }

    /// Set the draft rate, clamped into range. Ignored while speaking.
    pub fn set_rate(&self, rate: impl Into<VocalSpeedMod>) -> bool {
        let rate = rate.into();
        self.edit("rate", |inner| inner.rate = rate)
    }

    fn edit(&self, field: &'static str, apply: impl FnOnce(&mut ControllerInner)) -> bool {
        let mut inner = self.shared.inner.lock();
        if inner.state.is_speaking() {
            debug!(field, "ignoring edit while speaking");
            return false;
        }
        apply(&mut inner);
        true
    }
}

impl std::fmt::Debug for UtteranceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtteranceController")
            .field("inner", &*self.shared.inner.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HostCall, ScriptedHost};

    fn controller() -> (Arc<ScriptedHost>, UtteranceController) {
        let host = Arc::new(ScriptedHost::new());
        let controller = UtteranceController::new(host.clone(), &PlaybackConfig::default());
        (host, controller)
    }

    #[test]
    fn submission_alone_does_not_enter_speaking() {
        let (host, controller) = controller();
        let outcome = controller.speak(PlaybackRequest::new("hello"));
        assert_eq!(outcome, SpeakOutcome::Submitted(1));
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(host.speak_count(), 1);

        host.start(0);
        assert_eq!(controller.state(), PlaybackState::Speaking);
    }

    #[test]
    fn cancel_precedes_every_submission() {
        let (host, controller) = controller();
        controller.speak(PlaybackRequest::new("hello"));
        assert!(matches!(
            host.calls().as_slice(),
            [HostCall::Cancel, HostCall::Speak(request)] if request.text == "hello"
        ));
    }

    #[test]
    fn error_records_last_error_and_returns_to_idle() {
        let (host, controller) = controller();
        controller.speak(PlaybackRequest::new("hello"));
        host.start(0);
        host.fail(0, SynthesisErrorKind::AudioHardware);

        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(
            controller.last_error(),
            Some(VoiceError::Synthesis(SynthesisErrorKind::AudioHardware))
        );

        controller.speak(PlaybackRequest::new("again"));
        assert_eq!(controller.last_error(), None);
    }

    #[test]
    fn end_before_start_retires_request() {
        let (host, controller) = controller();
        controller.speak(PlaybackRequest::new("hello"));
        host.end(0);
        host.start(0);
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn edits_are_ignored_while_speaking() {
        let (host, controller) = controller();
        assert!(controller.set_text("hello"));
        assert!(controller.set_pitch(1.5));
        controller.speak(controller.draft_request());
        host.start(0);

        assert!(!controller.set_text("changed"));
        assert!(!controller.set_pitch(0.7));
        assert!(!controller.set_rate(1.8));
        assert_eq!(controller.text(), "hello");
        assert_eq!(controller.pitch().value(), 1.5);
        assert_eq!(controller.rate().value(), 1.0);
    }

    #[test]
    fn callbacks_outliving_controller_are_harmless() {
        let (host, controller) = controller();
        controller.speak(PlaybackRequest::new("hello"));
        drop(controller);
        host.start(0);
        host.end(0);
    }

    #[test]
    fn defaults_come_from_config() {
        let host = Arc::new(ScriptedHost::new());
        let config = PlaybackConfig {
            default_pitch: VocalPitchMod::new(1.2),
            default_rate: VocalSpeedMod::new(0.8),
            ..PlaybackConfig::default()
        };
        let controller = UtteranceController::new(host, &config);
        let request = controller.draft_request();
        assert_eq!(request.pitch.value(), 1.2);
        assert_eq!(request.rate.value(), 0.8);
    }
}
