//! # Read Aloud Domain
//!
//! Shared domain objects and types for the read-aloud playback core.
//!
//! These are plain values: voices as the host enumerates them, bounded
//! pitch/rate multipliers, the playback request handed to a host engine, and
//! the two-state playback flag. Host integration and state management live
//! in the `read_aloud` crate.

mod bounded;

pub mod language;
pub mod playback;
pub mod synthesis_error;
pub mod vocal_pitch;
pub mod vocal_speed;
pub mod voice;
pub mod voice_error;
pub mod voice_id;

// Re-export core types
pub use language::Language;
pub use playback::{PlaybackRequest, PlaybackState};
pub use synthesis_error::SynthesisErrorKind;
pub use vocal_pitch::VocalPitchMod;
pub use vocal_speed::VocalSpeedMod;
pub use voice::Voice;
pub use voice_error::VoiceError;
pub use voice_id::VoiceId;

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        Language, PlaybackRequest, PlaybackState, SynthesisErrorKind, VocalPitchMod,
        VocalSpeedMod, Voice, VoiceError, VoiceId,
    };
}
