//! # Read Aloud
//!
//! Speech-playback control core for a "type text, hear it spoken" form.
//!
//! The crate discovers the host's voices, tracks whether an utterance is
//! playing, and keeps that state consistent with the host engine's
//! asynchronous start/end/error callbacks. Rendering is left to the caller.
//!
//! ## Usage Pattern
//!
//! ```
//! use std::sync::Arc;
//! use read_aloud::prelude::*;
//! use read_aloud::testing::ScriptedHost;
//!
//! let host = Arc::new(ScriptedHost::with_voices(vec![
//!     Voice::new("v1", "Alex", "en-US"),
//!     Voice::new("v2", "Amélie", "fr-FR"),
//! ]));
//! let app = ReadAloud::with_defaults(host.clone());
//! assert_eq!(app.view().selected_voice, Some(VoiceId::new("v1")));
//!
//! app.set_text("hello");
//! assert!(app.speak().is_submitted());
//! host.start(0);
//! assert_eq!(app.view().state, PlaybackState::Speaking);
//!
//! assert!(app.stop());
//! assert_eq!(app.view().state, PlaybackState::Idle);
//! ```
//!
//! `testing::ScriptedHost` needs the `testing` feature outside this crate's
//! own tests. In a browser, enable the `web` feature and build the app over
//! `web::WebSpeechHost::new()?` instead of the scripted host.

/* ───── host seam ───── */
pub mod host;

/* ───── state machines ───── */
pub mod catalog;
pub mod controller;
pub mod read_aloud;

/* ───── ambient ───── */
pub mod config;
#[cfg(feature = "telemetry")]
pub mod telemetry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/* ───── host backends ───── */
#[cfg(feature = "web")]
pub mod web;

pub use read_aloud_domain as domain;

pub use catalog::{Availability, VoiceCatalog, VoiceCatalogLoader};
pub use config::PlaybackConfig;
pub use controller::{RejectReason, SpeakOutcome, UtteranceCallbacks, UtteranceController};
pub use host::{ReadinessHandler, SpeechHost, SubscriptionId};
pub use read_aloud::{ReadAloud, ReadAloudView};

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        Availability, PlaybackConfig, ReadAloud, ReadAloudView, RejectReason, SpeakOutcome,
        SpeechHost, UtteranceCallbacks, UtteranceController, VoiceCatalog, VoiceCatalogLoader,
    };
    pub use read_aloud_domain::prelude::*;
}
