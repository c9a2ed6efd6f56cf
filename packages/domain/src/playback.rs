//! Playback requests and the two-state playback flag.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::vocal_pitch::VocalPitchMod;
use crate::vocal_speed::VocalSpeedMod;
use crate::voice::Voice;
use crate::voice_id::VoiceId;

/// One text-to-speech job, built fresh for every speak action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackRequest {
    /// Text to speak.
    pub text: String,
    /// Chosen voice; `None` lets the host pick its default.
    pub voice: Option<VoiceId>,
    /// Utterance language, usually copied from the chosen voice.
    pub language: Option<Language>,
    /// Pitch multiplier.
    pub pitch: VocalPitchMod,
    /// Rate multiplier.
    pub rate: VocalSpeedMod,
}

impl PlaybackRequest {
    /// Request for `text` with the host's default voice and neutral pitch/rate.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Use `voice`, taking its language as the utterance language.
    pub fn with_voice(mut self, voice: &Voice) -> Self {
        self.voice = Some(voice.id.clone());
        self.language = Some(voice.language.clone());
        self
    }

    /// Use a voice by identifier only.
    pub fn voice_id(mut self, id: impl Into<VoiceId>) -> Self {
        self.voice = Some(id.into());
        self
    }

    /// Set the pitch, clamped into range.
    pub fn pitch(mut self, pitch: impl Into<VocalPitchMod>) -> Self {
        self.pitch = pitch.into();
        self
    }

    /// Set the rate, clamped into range.
    pub fn rate(mut self, rate: impl Into<VocalSpeedMod>) -> Self {
        self.rate = rate.into();
        self
    }

    /// Whether the text contains anything worth speaking.
    pub fn is_speakable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Whether an utterance is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No active utterance.
    #[default]
    #[display("idle")]
    Idle,
    /// The host engine reported that an utterance started.
    #[display("speaking")]
    Speaking,
}

impl PlaybackState {
    /// Convenience for views toggling a speak/stop control.
    pub fn is_speaking(self) -> bool {
        self == Self::Speaking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_not_speakable() {
        assert!(!PlaybackRequest::new("").is_speakable());
        assert!(!PlaybackRequest::new("  \t\n").is_speakable());
        assert!(PlaybackRequest::new(" hi ").is_speakable());
    }

    #[test]
    fn builder_clamps_parameters() {
        let request = PlaybackRequest::new("hello").pitch(0.3).rate(2.5);
        assert_eq!(request.pitch.value(), 0.5);
        assert_eq!(request.rate.value(), 2.0);
    }

    #[test]
    fn with_voice_copies_language() {
        let voice = Voice::new("v2", "Amélie", Language::FRENCH);
        let request = PlaybackRequest::new("bonjour").with_voice(&voice);
        assert_eq!(request.voice, Some(VoiceId::new("v2")));
        assert_eq!(request.language, Some(Language::FRENCH));
    }
}
