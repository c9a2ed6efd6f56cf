//! Deterministic [`SpeechHost`] double.
//!
//! `ScriptedHost` records every call the core makes and hands timing control
//! to the test: readiness notifications and utterance callbacks fire only
//! when the test asks, in whatever order it asks, for any past request.

use std::cell::RefCell;
use std::rc::Rc;

use read_aloud_domain::{PlaybackRequest, SynthesisErrorKind, Voice};

use crate::host::{ReadinessHandler, SpeechHost, SubscriptionId, UtteranceCallbacks};

/// One interaction with the host, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ListVoices,
    Subscribe(SubscriptionId),
    Unsubscribe(SubscriptionId),
    Speak(PlaybackRequest),
    Cancel,
}

#[derive(Default)]
struct Script {
    voices: Vec<Voice>,
    calls: Vec<HostCall>,
    next_subscription: u64,
    handlers: Vec<(SubscriptionId, Rc<dyn Fn()>)>,
    utterances: Vec<(PlaybackRequest, UtteranceCallbacks)>,
    start_on_speak: bool,
    interrupt_on_cancel: bool,
    /// Utterances that have not yet reported end or error.
    open: Vec<usize>,
}

/// Scripted host engine for tests.
#[derive(Default)]
pub struct ScriptedHost {
    script: RefCell<Script>,
}

impl ScriptedHost {
    /// Host with no voices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose voices are ready immediately.
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        let host = Self::new();
        host.script.borrow_mut().voices = voices;
        host
    }

    /// Report a start synchronously from inside `speak`.
    pub fn starting_on_speak(self) -> Self {
        self.script.borrow_mut().start_on_speak = true;
        self
    }

    /// Deliver `interrupted` for the open utterance from inside `cancel`,
    /// like browsers do.
    pub fn interrupting_on_cancel(self) -> Self {
        self.script.borrow_mut().interrupt_on_cancel = true;
        self
    }

    /// Replace the voice list without notifying anyone.
    pub fn set_voices(&self, voices: Vec<Voice>) {
        self.script.borrow_mut().voices = voices;
    }

    /// Fire every registered readiness handler.
    pub fn announce_voices_ready(&self) {
        let handlers: Vec<_> = self
            .script
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            (*handler)();
        }
    }

    /// Install `voices` and announce readiness.
    pub fn ready_with(&self, voices: Vec<Voice>) {
        self.set_voices(voices);
        self.announce_voices_ready();
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.script.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.script.borrow_mut().calls.clear();
    }

    pub fn speak_count(&self) -> usize {
        self.count(|call| matches!(call, HostCall::Speak(_)))
    }

    pub fn cancel_count(&self) -> usize {
        self.count(|call| matches!(call, HostCall::Cancel))
    }

    /// Readiness handlers currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.script.borrow().handlers.len()
    }

    /// Requests passed to `speak`, oldest first.
    pub fn requests(&self) -> Vec<PlaybackRequest> {
        self.script
            .borrow()
            .utterances
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// Callbacks handed over with the `index`-th `speak` call.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `index + 1` requests were submitted.
    pub fn callbacks(&self, index: usize) -> UtteranceCallbacks {
        self.script.borrow().utterances[index].1.clone()
    }

    /// Deliver "start" for the `index`-th request.
    pub fn start(&self, index: usize) {
        self.callbacks(index).on_start();
    }

    /// Deliver "end" for the `index`-th request.
    pub fn end(&self, index: usize) {
        self.close(index);
        self.callbacks(index).on_end();
    }

    /// Deliver "error" for the `index`-th request.
    pub fn fail(&self, index: usize, kind: SynthesisErrorKind) {
        self.close(index);
        self.callbacks(index).on_error(kind);
    }

    fn close(&self, index: usize) {
        self.script.borrow_mut().open.retain(|open| *open != index);
    }

    fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.script.borrow().calls.iter().filter(|&call| predicate(call)).count()
    }
}

impl SpeechHost for ScriptedHost {
    fn list_voices(&self) -> Vec<Voice> {
        let mut script = self.script.borrow_mut();
        script.calls.push(HostCall::ListVoices);
        script.voices.clone()
    }

    fn on_voices_ready(&self, handler: ReadinessHandler) -> SubscriptionId {
        let mut script = self.script.borrow_mut();
        script.next_subscription += 1;
        let id = SubscriptionId(script.next_subscription);
        script.handlers.push((id, Rc::from(handler)));
        script.calls.push(HostCall::Subscribe(id));
        id
    }

    fn remove_voices_ready(&self, subscription: SubscriptionId) {
        let mut script = self.script.borrow_mut();
        script.handlers.retain(|(id, _)| *id != subscription);
        script.calls.push(HostCall::Unsubscribe(subscription));
    }

    fn speak(&self, request: &PlaybackRequest, callbacks: UtteranceCallbacks) {
        let start_now = {
            let mut script = self.script.borrow_mut();
            script.calls.push(HostCall::Speak(request.clone()));
            let index = script.utterances.len();
            script.utterances.push((request.clone(), callbacks.clone()));
            script.open.push(index);
            script.start_on_speak
        };
        if start_now {
            callbacks.on_start();
        }
    }

    fn cancel(&self) {
        let interrupted: Vec<UtteranceCallbacks> = {
            let mut script = self.script.borrow_mut();
            script.calls.push(HostCall::Cancel);
            if script.interrupt_on_cancel {
                let open = std::mem::take(&mut script.open);
                open.into_iter()
                    .map(|index| script.utterances[index].1.clone())
                    .collect()
            } else {
                Vec::new()
            }
        };
        for callbacks in interrupted {
            callbacks.on_error(SynthesisErrorKind::Interrupted);
        }
    }
}
