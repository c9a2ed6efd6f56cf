//! [`SpeechHost`] over the browser's `window.speechSynthesis`.
//!
//! The page exposes a single `onvoiceschanged` slot, so only one readiness
//! handler is live at a time; registering another replaces it.

use std::cell::{Cell, RefCell};

use js_sys::{Function, Reflect};
use read_aloud_domain::{PlaybackRequest, SynthesisErrorKind, Voice, VoiceError, VoiceId};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen::closure::Closure;
use web_sys::{
    SpeechSynthesis, SpeechSynthesisErrorCode, SpeechSynthesisErrorEvent, SpeechSynthesisEvent,
    SpeechSynthesisUtterance, SpeechSynthesisVoice,
};

use crate::host::{ReadinessHandler, SpeechHost, SubscriptionId, UtteranceCallbacks};

type EventClosure = Closure<dyn FnMut(SpeechSynthesisEvent)>;
type ErrorClosure = Closure<dyn FnMut(SpeechSynthesisErrorEvent)>;

/// The utterance being spoken, kept alive with its handlers.
///
/// Some engines stop firing events for utterances that get garbage collected,
/// so the host holds on to it until the next `speak`.
struct LiveUtterance {
    utterance: SpeechSynthesisUtterance,
    _on_start: EventClosure,
    _on_end: EventClosure,
    _on_error: ErrorClosure,
}

impl Drop for LiveUtterance {
    fn drop(&mut self) {
        self.utterance.set_onstart(None);
        self.utterance.set_onend(None);
        self.utterance.set_onerror(None);
    }
}

pub struct WebSpeechHost {
    synth: SpeechSynthesis,
    next_subscription: Cell<u64>,
    readiness: RefCell<Option<(SubscriptionId, Closure<dyn Fn()>)>>,
    /// Detached readiness closures. Detaching happens from inside the
    /// handler itself, which must not be freed while it runs.
    retired: RefCell<Vec<Closure<dyn Fn()>>>,
    live: RefCell<Option<LiveUtterance>>,
}

impl WebSpeechHost {
    /// Bind to `window.speechSynthesis`.
    pub fn new() -> Result<Self, VoiceError> {
        let window =
            web_sys::window().ok_or_else(|| VoiceError::Host("no global window".to_string()))?;
        let synth = window
            .speech_synthesis()
            .map_err(|e| VoiceError::Host(format!("speechSynthesis unavailable: {e:?}")))?;
        Ok(Self {
            synth,
            next_subscription: Cell::new(0),
            readiness: RefCell::new(None),
            retired: RefCell::new(Vec::new()),
            live: RefCell::new(None),
        })
    }

    fn platform_voices(&self) -> impl Iterator<Item = SpeechSynthesisVoice> {
        self.synth
            .get_voices()
            .into_iter()
            .filter_map(|value| value.dyn_into::<SpeechSynthesisVoice>().ok())
    }

    fn find_voice(&self, id: &VoiceId) -> Option<SpeechSynthesisVoice> {
        self.platform_voices().find(|voice| voice.voice_uri() == id.id())
    }

    fn retire_readiness(&self) {
        if let Some((_, closure)) = self.readiness.borrow_mut().take() {
            self.synth.set_onvoiceschanged(None);
            self.retired.borrow_mut().push(closure);
        }
    }
}

impl SpeechHost for WebSpeechHost {
    fn list_voices(&self) -> Vec<Voice> {
        self.platform_voices()
            .map(|voice| {
                Voice::new(voice.voice_uri(), voice.name(), voice.lang())
                    .default_voice(voice.default())
                    .local_service(voice.local_service())
            })
            .collect()
    }

    fn on_voices_ready(&self, handler: ReadinessHandler) -> SubscriptionId {
        self.retire_readiness();

        let id = SubscriptionId(self.next_subscription.get() + 1);
        self.next_subscription.set(id.0);

        let closure = Closure::<dyn Fn()>::new(move || handler());
        self.synth
            .set_onvoiceschanged(Some(closure.as_ref().unchecked_ref::<Function>()));
        *self.readiness.borrow_mut() = Some((id, closure));
        id
    }

    fn remove_voices_ready(&self, subscription: SubscriptionId) {
        let matches = matches!(&*self.readiness.borrow(), Some((id, _)) if *id == subscription);
        if matches {
            self.retire_readiness();
        }
    }

    fn speak(&self, request: &PlaybackRequest, callbacks: UtteranceCallbacks) {
        let utterance = match SpeechSynthesisUtterance::new_with_text(&request.text) {
            Ok(utterance) => utterance,
            Err(e) => {
                warn!(error = ?e, "could not create utterance");
                callbacks.on_error(SynthesisErrorKind::SynthesisFailed);
                return;
            }
        };

        utterance.set_pitch(request.pitch.value());
        utterance.set_rate(request.rate.value());
        if let Some(language) = &request.language {
            utterance.set_lang(language.code());
        }
        if let Some(id) = &request.voice {
            match self.find_voice(id) {
                Some(voice) => utterance.set_voice(Some(&voice)),
                None => debug!(%id, "voice vanished from host; using default"),
            }
        }

        let started = callbacks.clone();
        let on_start = EventClosure::new(move |_: SpeechSynthesisEvent| started.on_start());
        let ended = callbacks.clone();
        let on_end = EventClosure::new(move |_: SpeechSynthesisEvent| ended.on_end());
        let failed = callbacks;
        let on_error = ErrorClosure::new(move |event: SpeechSynthesisErrorEvent| {
            let raw = Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|value| value.as_string());
            failed.on_error(error_kind(raw.as_deref(), event.error()))
        });
        utterance.set_onstart(Some(on_start.as_ref().unchecked_ref()));
        utterance.set_onend(Some(on_end.as_ref().unchecked_ref()));
        utterance.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        self.synth.speak(&utterance);
        // Replacing drops the superseded utterance's handlers.
        *self.live.borrow_mut() = Some(LiveUtterance {
            utterance,
            _on_start: on_start,
            _on_end: on_end,
            _on_error: on_error,
        });
    }

    fn cancel(&self) {
        self.synth.cancel();
    }
}

impl Drop for WebSpeechHost {
    fn drop(&mut self) {
        self.synth.set_onvoiceschanged(None);
    }
}

/// Map the event's error to a [`SynthesisErrorKind`].
///
/// `raw` is the untyped `error` string. Browsers send `"not-allowed"` when
/// autoplay policy blocks speech, which `SpeechSynthesisErrorCode` has no
/// variant for.
fn error_kind(raw: Option<&str>, code: SpeechSynthesisErrorCode) -> SynthesisErrorKind {
    if raw == Some("not-allowed") {
        return SynthesisErrorKind::NotAllowed;
    }
    match code {
        SpeechSynthesisErrorCode::Canceled => SynthesisErrorKind::Canceled,
        SpeechSynthesisErrorCode::Interrupted => SynthesisErrorKind::Interrupted,
        SpeechSynthesisErrorCode::AudioBusy => SynthesisErrorKind::AudioBusy,
        SpeechSynthesisErrorCode::AudioHardware => SynthesisErrorKind::AudioHardware,
        SpeechSynthesisErrorCode::Network => SynthesisErrorKind::Network,
        SpeechSynthesisErrorCode::SynthesisUnavailable => SynthesisErrorKind::SynthesisUnavailable,
        SpeechSynthesisErrorCode::SynthesisFailed => SynthesisErrorKind::SynthesisFailed,
        SpeechSynthesisErrorCode::LanguageUnavailable => SynthesisErrorKind::LanguageUnavailable,
        SpeechSynthesisErrorCode::VoiceUnavailable => SynthesisErrorKind::VoiceUnavailable,
        SpeechSynthesisErrorCode::TextTooLong => SynthesisErrorKind::TextTooLong,
        SpeechSynthesisErrorCode::InvalidArgument => SynthesisErrorKind::InvalidArgument,
        // Strings the bindings do not know decode to a hidden placeholder.
        _ => SynthesisErrorKind::SynthesisFailed,
    }
}
