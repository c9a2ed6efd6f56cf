//! Unified error for the playback core.
use serde::Serialize;
use thiserror::Error;

use crate::synthesis_error::SynthesisErrorKind;
use crate::voice_id::VoiceId;

/// Top-level error covering catalog, playback and configuration failures.
///
/// Serialises as `{"kind": ..., "detail": ...}` for web front ends.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum VoiceError {
    /// The host has not reported any voices.
    #[error("no voices available from the host platform")]
    VoiceUnavailable,
    /// A voice identifier that is not present in the catalog.
    #[error("unknown voice: {0}")]
    UnknownVoice(VoiceId),
    /// The host engine failed during an active session.
    #[error("synthesis: {0}")]
    Synthesis(SynthesisErrorKind),
    /// Configuration-related failure reason.
    #[error("configuration: {0}")]
    Configuration(String),
    /// The host platform capability could not be reached.
    #[error("host: {0}")]
    Host(String),
}
