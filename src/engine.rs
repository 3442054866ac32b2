//! Autotype Engine
//!
//! Orchestrates one injection request: resolve every character to a
//! keycode and modifier set first, then inject the whole sequence with
//! the selected strategy. The two-phase shape is the load-bearing
//! correctness property: a translation failure anywhere in the text
//! means zero key events reach the target, so a half-typed secret can
//! never land in the wrong field. Only a server fault during the
//! injection pass itself can leave a partial effect, and that is
//! surfaced as a `ProtocolError` rather than hidden.

use crate::error::{AutotypeError, Result};
use crate::inject::{self, Strategy};
use crate::keymap::{self, KeyboardMap, Keycode, ModifierMap, ResolvedKeypress};
use crate::keysym::{self, XK_SHIFT_L};
use crate::server::{XServer, XSession};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Vertical tab: caller-side sentinel meaning "do not type this",
/// kept for compatibility with stored autotype sequences that used it
/// as a shift-tab workaround on other platforms.
const SKIP_SENTINEL: char = '\u{0b}';

/// Strategy preference for one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutotypeMethod {
    /// Use XTEST when the server supports it, SendEvent otherwise
    #[default]
    PreferXtest,
    /// Always use the SendEvent fallback, e.g. for targets that do not
    /// respond correctly to fake physical events
    ForceSendEvent,
}

/// One autotype request: the text, the strategy preference, and the
/// inter-key pacing delay. Immutable for the duration of the call.
#[derive(Debug, Clone)]
pub struct InjectionRequest {
    /// Characters to type, in order
    pub text: String,
    /// Strategy preference
    pub method: AutotypeMethod,
    /// Minimum gap between successive injected keys (zero is legal and
    /// means no deliberate pacing)
    pub inter_key_delay: Duration,
}

impl InjectionRequest {
    /// Request with default method and no pacing
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            method: AutotypeMethod::default(),
            inter_key_delay: Duration::ZERO,
        }
    }

    /// Set the strategy preference
    pub fn with_method(mut self, method: AutotypeMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the inter-key delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inter_key_delay = delay;
        self
    }
}

/// Outcome of a successful injection
#[derive(Debug, Clone, Copy)]
pub struct InjectionReport {
    /// Number of keypresses injected (input length minus filtered
    /// sentinels)
    pub keys_injected: usize,
    /// Strategy actually used after capability selection
    pub strategy: Strategy,
}

/// The key-injection engine, generic over the server backend
///
/// One engine per server scope; calls must not run concurrently
/// against the same scope. The usual entry point for live typing is
/// [`send_string`], which opens a fresh [`XSession`] per call.
pub struct AutotypeEngine<S: XServer> {
    server: S,
}

impl<S: XServer> AutotypeEngine<S> {
    /// Wrap a server scope
    pub fn new(server: S) -> Self {
        Self { server }
    }

    /// Type a request into the focused window
    ///
    /// Resolves every character before sending anything. Empty text
    /// (or text that filters down to nothing) succeeds with zero
    /// injected keys.
    pub fn send_string(&self, request: &InjectionRequest) -> Result<InjectionReport> {
        let strategy = Strategy::select(request.method, self.server.supports_xtest());
        if request.text.is_empty() {
            return Ok(InjectionReport {
                keys_injected: 0,
                strategy,
            });
        }

        let kbmap = self.server.keyboard_mapping()?;
        let modmap = self.server.modifier_mapping()?;
        let keys = resolve_keypresses(&kbmap, &modmap, &request.text)?;

        // The XTEST path brackets shifted keys with a real shift press,
        // so the physical shift key must resolve too. Checked here to
        // keep the all-or-nothing property.
        let shift_keycode = if strategy == Strategy::Xtest
            && keys.iter().any(ResolvedKeypress::needs_shift)
        {
            resolve_shift_keycode(&kbmap)?
        } else {
            0
        };

        // Deliberately no per-character logging anywhere in this pass:
        // keycodes reconstruct the secret being typed.
        debug!(
            keys = keys.len(),
            ?strategy,
            delay_ms = request.inter_key_delay.as_millis() as u64,
            "resolution complete, starting injection"
        );

        inject::inject_keypresses(
            &self.server,
            strategy,
            &keys,
            shift_keycode,
            request.inter_key_delay,
        )?;

        debug!(keys = keys.len(), "injection complete");
        Ok(InjectionReport {
            keys_injected: keys.len(),
            strategy,
        })
    }

    /// The underlying server scope
    pub fn server(&self) -> &S {
        &self.server
    }
}

/// Resolution pass: every retained character becomes exactly one
/// [`ResolvedKeypress`], or the whole request fails
fn resolve_keypresses(
    kbmap: &KeyboardMap,
    modmap: &ModifierMap,
    text: &str,
) -> Result<Vec<ResolvedKeypress>> {
    let mut keys = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if ch == SKIP_SENTINEL {
            continue;
        }
        let sym = keysym::keysym_for_char(ch).ok_or_else(|| AutotypeError::UnmappableCharacter {
            character: keysym::display_char(ch),
            codepoint: ch as u32,
        })?;
        let keycode =
            kbmap
                .keycode_for(sym)
                .ok_or_else(|| AutotypeError::KeycodeResolutionFailed {
                    character: keysym::display_char(ch),
                    keysym: sym,
                    name: keysym::keysym_name(sym),
                })?;
        let state = keymap::modifier_mask_for(kbmap, modmap, keycode, sym);
        keys.push(ResolvedKeypress { keycode, state });
    }
    Ok(keys)
}

fn resolve_shift_keycode(kbmap: &KeyboardMap) -> Result<Keycode> {
    kbmap
        .keycode_for(XK_SHIFT_L)
        .ok_or_else(|| AutotypeError::KeycodeResolutionFailed {
            character: "Shift".to_string(),
            keysym: XK_SHIFT_L,
            name: keysym::keysym_name(XK_SHIFT_L),
        })
}

/// Type a string into the window currently holding input focus
///
/// The single operation exposed to collaborators. Opens a fresh
/// display connection scoped to this call and releases it on every
/// exit path. Callers must serialize autotype requests; two calls must
/// not be in flight concurrently against the same display session.
pub fn send_string(
    text: &str,
    method: AutotypeMethod,
    inter_key_delay: Duration,
) -> Result<InjectionReport> {
    let session = XSession::open(None)?;
    let engine = AutotypeEngine::new(session);
    engine.send_string(
        &InjectionRequest::new(text)
            .with_method(method)
            .with_delay(inter_key_delay),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::SHIFT_MASK;

    fn test_map() -> (KeyboardMap, ModifierMap) {
        let mut keysyms = vec![0u32; 2 * 40];
        let mut bind = |keycode: usize, column: usize, sym: u32| {
            keysyms[(keycode - 8) * 2 + column] = sym;
        };
        for (offset, ch) in ('a'..='z').enumerate() {
            bind(10 + offset, 0, ch as u32);
            bind(10 + offset, 1, ch.to_ascii_uppercase() as u32);
        }
        bind(38, 0, XK_SHIFT_L);
        (KeyboardMap::new(8, 2, keysyms), ModifierMap::new(2, vec![0; 16]))
    }

    #[test]
    fn test_resolution_produces_one_keypress_per_char() {
        let (kbmap, modmap) = test_map();
        let keys = resolve_keypresses(&kbmap, &modmap, "abc").unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], ResolvedKeypress { keycode: 10, state: 0 });
        assert_eq!(keys[2], ResolvedKeypress { keycode: 12, state: 0 });
    }

    #[test]
    fn test_resolution_shifted_letter() {
        let (kbmap, modmap) = test_map();
        let keys = resolve_keypresses(&kbmap, &modmap, "aA").unwrap();
        assert_eq!(keys[0].state, 0);
        assert_eq!(keys[1].state, SHIFT_MASK);
        assert_eq!(keys[0].keycode, keys[1].keycode);
    }

    #[test]
    fn test_vertical_tab_is_filtered() {
        let (kbmap, modmap) = test_map();
        let with_sentinel = resolve_keypresses(&kbmap, &modmap, "ab\u{0b}cd").unwrap();
        let without = resolve_keypresses(&kbmap, &modmap, "abcd").unwrap();
        assert_eq!(with_sentinel, without);
    }

    #[test]
    fn test_unmappable_character_fails_resolution() {
        let (kbmap, modmap) = test_map();
        let err = resolve_keypresses(&kbmap, &modmap, "ab\u{85}cd").unwrap_err();
        match err {
            AutotypeError::UnmappableCharacter { codepoint, .. } => {
                assert_eq!(codepoint, 0x85);
            }
            other => panic!("expected UnmappableCharacter, got {other}"),
        }
    }

    #[test]
    fn test_unbound_keysym_fails_resolution() {
        let (kbmap, modmap) = test_map();
        // '1' is mappable to a keysym but the test layout has no digit keys.
        let err = resolve_keypresses(&kbmap, &modmap, "a1").unwrap_err();
        match err {
            AutotypeError::KeycodeResolutionFailed { keysym, .. } => {
                assert_eq!(keysym, '1' as u32);
            }
            other => panic!("expected KeycodeResolutionFailed, got {other}"),
        }
    }

    #[test]
    fn test_shift_keycode_resolution() {
        let (kbmap, _) = test_map();
        assert_eq!(resolve_shift_keycode(&kbmap).unwrap(), 38);

        let bare = KeyboardMap::new(8, 2, vec![0; 4]);
        assert!(resolve_shift_keycode(&bare).is_err());
    }

    #[test]
    fn test_request_builder() {
        let request = InjectionRequest::new("secret")
            .with_method(AutotypeMethod::ForceSendEvent)
            .with_delay(Duration::from_millis(25));
        assert_eq!(request.method, AutotypeMethod::ForceSendEvent);
        assert_eq!(request.inter_key_delay, Duration::from_millis(25));
    }
}
