//! Autotype Error Types
//!
//! Error taxonomy for the key-injection engine. Callers get a single
//! human-readable message per failure; the variants exist so callers
//! can tell "nothing was typed" apart from "typing was interrupted".

use thiserror::Error;

/// Result type for autotype operations
pub type Result<T> = std::result::Result<T, AutotypeError>;

/// Autotype engine error types
///
/// `ConnectionUnavailable`, `UnmappableCharacter` and `KeycodeResolutionFailed`
/// are raised before any key event is sent, so they guarantee zero injected
/// keys. `ProtocolError` is reported after injection started and may leave a
/// partially typed fragment in the target window.
#[derive(Error, Debug)]
pub enum AutotypeError {
    /// Cannot reach the X display
    #[error("could not open X display for autotyping: {0}")]
    ConnectionUnavailable(String),

    /// A character has no keysym representation
    #[error("cannot convert '{character}' [U+{codepoint:04X}] to keysym, aborting autotype")]
    UnmappableCharacter {
        /// Human-readable transliteration of the offending character
        character: String,
        /// Unicode code point of the offending character
        codepoint: u32,
    },

    /// A keysym has no keycode in the active layout
    #[error(
        "could not get keycode for '{character}' (keysym {keysym:#06x}, {name}), aborting autotype; \
         if `xmodmap -pk` does not list this keysym you probably need to install \
         an appropriate keyboard layout"
    )]
    KeycodeResolutionFailed {
        /// Human-readable transliteration of the offending character
        character: String,
        /// The keysym that could not be bound
        keysym: u32,
        /// Keysym name, or a hex form when no name is known
        name: String,
    },

    /// The server reported an error during injection
    #[error("X protocol error ({code}): {message}")]
    ProtocolError {
        /// X error code as reported by the server
        code: u8,
        /// Textual description of the error
        message: String,
    },
}

impl AutotypeError {
    /// True when the failure cannot have typed anything into the target
    pub fn is_pre_injection(&self) -> bool {
        !matches!(self, AutotypeError::ProtocolError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmappable_message_contains_codepoint() {
        let err = AutotypeError::UnmappableCharacter {
            character: "U+0085".to_string(),
            codepoint: 0x85,
        };
        let msg = err.to_string();
        assert!(msg.contains("U+0085"));
        assert!(msg.contains("aborting autotype"));
    }

    #[test]
    fn test_keycode_failure_mentions_layout_hint() {
        let err = AutotypeError::KeycodeResolutionFailed {
            character: "€".to_string(),
            keysym: 0x20ac,
            name: "EuroSign".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("xmodmap -pk"));
        assert!(msg.contains("0x20ac"));
    }

    #[test]
    fn test_partial_effect_classification() {
        assert!(AutotypeError::ConnectionUnavailable("gone".into()).is_pre_injection());
        assert!(!AutotypeError::ProtocolError {
            code: 2,
            message: "BadValue".into()
        }
        .is_pre_injection());
    }
}
