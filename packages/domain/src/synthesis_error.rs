//! Reasons a host engine reports for a failed utterance.
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Failure reported by the host engine during an active session.
///
/// Mirrors the error codes browsers attach to speech-synthesis error events;
/// hosts without a precise code use [`SynthesisErrorKind::SynthesisFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisErrorKind {
    /// The utterance was removed before it started.
    #[display("canceled")]
    Canceled,
    /// The utterance was cut off while speaking.
    #[display("interrupted")]
    Interrupted,
    /// The audio output device is busy.
    #[display("audio busy")]
    AudioBusy,
    /// The audio output device failed.
    #[display("audio hardware")]
    AudioHardware,
    /// A network-backed voice could not be reached.
    #[display("network")]
    Network,
    /// No synthesis engine is available.
    #[display("synthesis unavailable")]
    SynthesisUnavailable,
    /// The engine failed for an unspecified reason.
    #[display("synthesis failed")]
    SynthesisFailed,
    /// No voice is available for the requested language.
    #[display("language unavailable")]
    LanguageUnavailable,
    /// The requested voice is not available.
    #[display("voice unavailable")]
    VoiceUnavailable,
    /// The text exceeds the engine's length limit.
    #[display("text too long")]
    TextTooLong,
    /// Pitch, rate or another argument was refused.
    #[display("invalid argument")]
    InvalidArgument,
    /// The host refused to speak (autoplay policy, permissions).
    #[display("not allowed")]
    NotAllowed,
}

impl SynthesisErrorKind {
    /// Whether the failure is a consequence of cancelling rather than a
    /// genuine engine fault.
    pub fn is_interruption(self) -> bool {
        matches!(self, Self::Canceled | Self::Interrupted)
    }
}
