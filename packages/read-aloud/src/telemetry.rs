//! Tracing subscriber setup for native hosts.

use read_aloud_domain::VoiceError;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive applied on top of `RUST_LOG`.
pub const DEFAULT_DIRECTIVE: &str = "read_aloud=info";

/// Install a global fmt subscriber filtered by `RUST_LOG` plus `directive`.
///
/// Only fails on a malformed directive; a subscriber that is already
/// installed is left in place.
pub fn init_tracing(directive: &str) -> Result<(), VoiceError> {
    let parsed: Directive = directive
        .parse()
        .map_err(|e| VoiceError::Configuration(format!("tracing directive {directive:?}: {e}")))?;

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(parsed))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing(DEFAULT_DIRECTIVE).unwrap();
        init_tracing("read_aloud=debug").unwrap();
    }

    #[test]
    fn malformed_directive_is_rejected() {
        let err = init_tracing("read_aloud=loud=yes").unwrap_err();
        assert!(matches!(err, VoiceError::Configuration(_)));
    }
}
