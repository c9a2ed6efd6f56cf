//! Playback state machine against the scripted host.

use std::sync::Arc;

use read_aloud::prelude::*;
use read_aloud::testing::{HostCall, ScriptedHost};

fn setup() -> (Arc<ScriptedHost>, UtteranceController) {
    let host = Arc::new(ScriptedHost::new());
    let controller = UtteranceController::new(host.clone(), &PlaybackConfig::default());
    (host, controller)
}

#[test]
fn speak_then_start_then_end() {
    let (host, controller) = setup();

    let outcome = controller.speak(PlaybackRequest::new("hello").voice_id("v1"));
    assert!(outcome.is_submitted());
    assert_eq!(controller.state(), PlaybackState::Idle);

    host.start(0);
    assert_eq!(controller.state(), PlaybackState::Speaking);

    host.end(0);
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(host.speak_count(), 1);
}

#[test]
fn error_returns_to_idle() {
    let (host, controller) = setup();
    controller.speak(PlaybackRequest::new("hello"));
    host.start(0);
    host.fail(0, SynthesisErrorKind::SynthesisFailed);

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(
        controller.last_error(),
        Some(VoiceError::Synthesis(SynthesisErrorKind::SynthesisFailed))
    );
}

#[test]
fn blank_text_never_reaches_the_host() {
    let (host, controller) = setup();

    for text in ["", "   ", "\n\t"] {
        assert_eq!(
            controller.speak(PlaybackRequest::new(text)),
            SpeakOutcome::Rejected(RejectReason::EmptyText)
        );
    }
    assert!(host.calls().is_empty());
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[test]
fn speak_while_speaking_is_a_no_op() {
    let (host, controller) = setup();
    controller.speak(PlaybackRequest::new("first"));
    host.start(0);
    host.clear_calls();

    assert_eq!(
        controller.speak(PlaybackRequest::new("second")),
        SpeakOutcome::Rejected(RejectReason::AlreadySpeaking)
    );
    assert!(host.calls().is_empty());
    assert_eq!(controller.state(), PlaybackState::Speaking);

    // The original session still drives the state.
    host.end(0);
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[test]
fn stop_is_synchronous_and_cancels_once() {
    let (host, controller) = setup();
    controller.speak(PlaybackRequest::new("hello"));
    host.start(0);
    host.clear_calls();

    assert!(controller.stop());
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(host.calls(), vec![HostCall::Cancel]);

    // The engine's own late end for the cancelled session changes nothing.
    host.end(0);
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.last_error(), None);
}

#[test]
fn stop_while_idle_is_idempotent() {
    let (host, controller) = setup();
    assert!(!controller.stop());
    assert!(!controller.stop());
    assert!(host.calls().is_empty());
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[test]
fn stop_before_start_leaves_the_pending_request() {
    let (host, controller) = setup();
    controller.speak(PlaybackRequest::new("hello"));
    let cancels = host.cancel_count();

    assert!(!controller.stop());
    assert_eq!(host.cancel_count(), cancels);

    host.start(0);
    assert_eq!(controller.state(), PlaybackState::Speaking);
    host.end(0);
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[test]
fn late_start_after_stop_does_not_resurrect_speaking() {
    let (host, controller) = setup();
    controller.speak(PlaybackRequest::new("hello"));
    host.start(0);
    controller.stop();

    host.start(0);
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[test]
fn rapid_double_speak_supersedes_first_request() {
    let (host, controller) = setup();
    controller.speak(PlaybackRequest::new("first"));
    host.clear_calls();

    // Second intent arrives before the first one started.
    assert!(controller.speak(PlaybackRequest::new("second")).is_submitted());
    let calls = host.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], HostCall::Cancel);
    assert!(matches!(&calls[1], HostCall::Speak(request) if request.text == "second"));

    host.start(1);
    assert_eq!(controller.state(), PlaybackState::Speaking);

    // Stale callbacks for the first request are ignored while the second plays.
    host.fail(0, SynthesisErrorKind::Interrupted);
    assert_eq!(controller.state(), PlaybackState::Speaking);

    host.end(1);
    assert_eq!(controller.state(), PlaybackState::Idle);

    // And after it ended.
    host.start(0);
    host.end(0);
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.last_error(), None);
}

#[test]
fn synchronous_host_callbacks_do_not_deadlock() {
    let host = Arc::new(ScriptedHost::new().starting_on_speak().interrupting_on_cancel());
    let controller = UtteranceController::new(host.clone(), &PlaybackConfig::default());

    controller.speak(PlaybackRequest::new("hello"));
    assert_eq!(controller.state(), PlaybackState::Speaking);

    // Cancel delivers "interrupted" for the session we just stopped.
    assert!(controller.stop());
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.last_error(), None);

    controller.speak(PlaybackRequest::new("again"));
    assert_eq!(controller.state(), PlaybackState::Speaking);
}

#[test]
fn out_of_range_parameters_are_clamped() {
    let (host, controller) = setup();
    controller.set_text("hello");
    controller.set_pitch(0.3);
    controller.set_rate(2.5);
    controller.speak(controller.draft_request());

    let request = &host.requests()[0];
    assert_eq!(request.pitch.value(), 0.5);
    assert_eq!(request.rate.value(), 2.0);
}

#[tokio::test]
async fn watchers_observe_transitions() {
    let (host, controller) = setup();
    let mut updates = controller.subscribe();
    assert_eq!(*updates.borrow(), PlaybackState::Idle);

    controller.speak(PlaybackRequest::new("hello"));
    host.start(0);
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow_and_update(), PlaybackState::Speaking);

    host.end(0);
    updates.changed().await.unwrap();
    assert_eq!(*updates.borrow_and_update(), PlaybackState::Idle);
}
