//! The object a presentation layer holds.
//!
//! [`ReadAloud`] wires one [`VoiceCatalogLoader`] and one
//! [`UtteranceController`] to the same host, turns the form values into a
//! fresh [`PlaybackRequest`] on every speak, and renders everything a view
//! needs into a [`ReadAloudView`].

use std::sync::Arc;
use std::time::Duration;

use read_aloud_domain::{
    PlaybackState, VocalPitchMod, VocalSpeedMod, Voice, VoiceError, VoiceId,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::catalog::{Availability, VoiceCatalog, VoiceCatalogLoader};
use crate::config::PlaybackConfig;
use crate::controller::{SpeakOutcome, UtteranceController};
use crate::host::SpeechHost;

/// Snapshot of everything a view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadAloudView {
    pub voices: Vec<Voice>,
    pub loading: bool,
    pub selected_voice: Option<VoiceId>,
    pub text: String,
    pub pitch: VocalPitchMod,
    pub rate: VocalSpeedMod,
    pub state: PlaybackState,
    /// Text, voice, pitch and rate inputs accept edits.
    pub inputs_enabled: bool,
    /// The speak control would submit something.
    pub can_speak: bool,
    /// Most recent synthesis failure.
    pub last_error: Option<VoiceError>,
}

/// Speech playback for one text form.
pub struct ReadAloud {
    catalog: VoiceCatalogLoader,
    controller: UtteranceController,
    config: PlaybackConfig,
}

impl ReadAloud {
    pub fn new(host: Arc<dyn SpeechHost>, config: PlaybackConfig) -> Self {
        let catalog = VoiceCatalogLoader::new(Arc::clone(&host), &config);
        let controller = UtteranceController::new(host, &config);
        Self {
            catalog,
            controller,
            config,
        }
    }

    /// Build with [`PlaybackConfig::default`].
    pub fn with_defaults(host: Arc<dyn SpeechHost>) -> Self {
        Self::new(host, PlaybackConfig::default())
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn catalog(&self) -> &VoiceCatalogLoader {
        &self.catalog
    }

    pub fn controller(&self) -> &UtteranceController {
        &self.controller
    }

    /// Speak the current text with the selected voice, pitch and rate.
    pub fn speak(&self) -> SpeakOutcome {
        let mut request = self.controller.draft_request();
        if let Some(voice) = self.catalog.selected_voice() {
            request = request.with_voice(&voice);
        }
        self.controller.speak(request)
    }

    pub fn stop(&self) -> bool {
        self.controller.stop()
    }

    pub fn set_text(&self, text: impl Into<String>) -> bool {
        self.controller.set_text(text)
    }

    pub fn set_pitch(&self, pitch: impl Into<VocalPitchMod>) -> bool {
        self.controller.set_pitch(pitch)
    }

    pub fn set_rate(&self, rate: impl Into<VocalSpeedMod>) -> bool {
        self.controller.set_rate(rate)
    }

    /// Select a voice by identifier.
    ///
    /// Returns `Ok(false)` without changing anything while speaking.
    pub fn select_voice(&self, id: &VoiceId) -> Result<bool, VoiceError> {
        if self.controller.state().is_speaking() {
            debug!(%id, "ignoring voice selection while speaking");
            return Ok(false);
        }
        self.catalog.select(id)?;
        Ok(true)
    }

    /// Re-query the host for voices.
    pub fn refresh_voices(&self) -> bool {
        self.catalog.refresh()
    }

    pub fn availability(&self, waited: Duration) -> Availability {
        self.catalog.availability(waited)
    }

    pub fn playback_updates(&self) -> watch::Receiver<PlaybackState> {
        self.controller.subscribe()
    }

    pub fn catalog_updates(&self) -> watch::Receiver<VoiceCatalog> {
        self.catalog.subscribe()
    }

    pub fn view(&self) -> ReadAloudView {
        let catalog = self.catalog.catalog();
        let request = self.controller.draft_request();
        let state = self.controller.state();
        let idle = !state.is_speaking();
        ReadAloudView {
            loading: catalog.is_loading(),
            selected_voice: catalog.selected().cloned(),
            voices: catalog.voices().to_vec(),
            can_speak: idle && request.is_speakable(),
            text: request.text,
            pitch: request.pitch,
            rate: request.rate,
            state,
            inputs_enabled: idle,
            last_error: self.controller.last_error(),
        }
    }
}
