//! Injection Strategies and Pacing
//!
//! Two interchangeable ways to deliver a resolved keypress sequence,
//! selected once per call: XTEST synthesizes physical key state
//! directly (with explicit shift bracketing, since fake physical events
//! do not carry a modifier mask), while the SendEvent fallback posts a
//! core key event with the modifier mask in its `state` field, addressed
//! to the window that held focus at scope acquisition. The inter-key
//! delay establishes a strict minimum gap between injected keys.

use crate::engine::AutotypeMethod;
use crate::error::Result;
use crate::keymap::{Keycode, ResolvedKeypress};
use crate::server::XServer;
use std::time::Duration;
use tracing::{debug, warn};

/// Injection strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// XTEST fake physical key events (preferred)
    Xtest,
    /// Core SendEvent addressed to the focus-snapshot window (fallback)
    SendEvent,
}

impl Strategy {
    /// Pick the strategy for one call
    ///
    /// Forcing the fallback always wins; preferring XTEST degrades
    /// transparently to SendEvent when the extension is missing.
    pub fn select(method: AutotypeMethod, xtest_available: bool) -> Self {
        match method {
            AutotypeMethod::ForceSendEvent => Strategy::SendEvent,
            AutotypeMethod::PreferXtest if xtest_available => Strategy::Xtest,
            AutotypeMethod::PreferXtest => {
                debug!("XTEST extension unavailable, falling back to SendEvent");
                Strategy::SendEvent
            }
        }
    }
}

/// Deliver a resolved keypress sequence
///
/// `shift_keycode` is the physical left-shift key, needed only for the
/// XTEST shift bracketing. The first server error aborts the pass and
/// propagates; keys already delivered at that point stay delivered. A
/// final sync makes accepted events visible before returning.
pub(crate) fn inject_keypresses<S: XServer>(
    server: &S,
    strategy: Strategy,
    keys: &[ResolvedKeypress],
    shift_keycode: Keycode,
    delay: Duration,
) -> Result<()> {
    if strategy == Strategy::Xtest {
        server.grab_control(true)?;
    }

    let result = send_all(server, strategy, keys, shift_keycode, delay);

    if strategy == Strategy::Xtest {
        // Release the grab even when the pass failed partway.
        if let Err(e) = server.grab_control(false) {
            warn!(error = %e, "failed to release XTEST grab control");
        }
    }

    result?;
    server.sync()
}

fn send_all<S: XServer>(
    server: &S,
    strategy: Strategy,
    keys: &[ResolvedKeypress],
    shift_keycode: Keycode,
    delay: Duration,
) -> Result<()> {
    let focus = server.focused_window();
    for (index, keypress) in keys.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
        match strategy {
            Strategy::Xtest => {
                if keypress.needs_shift() {
                    server.fake_key_event(shift_keycode, true)?;
                }
                server.fake_key_event(keypress.keycode, true)?;
                server.fake_key_event(keypress.keycode, false)?;
                if keypress.needs_shift() {
                    server.fake_key_event(shift_keycode, false)?;
                }
            }
            Strategy::SendEvent => {
                server.send_key_event(focus, keypress.keycode, keypress.state, true)?;
                server.send_key_event(focus, keypress.keycode, keypress.state, false)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_selection() {
        assert_eq!(
            Strategy::select(AutotypeMethod::PreferXtest, true),
            Strategy::Xtest
        );
        assert_eq!(
            Strategy::select(AutotypeMethod::PreferXtest, false),
            Strategy::SendEvent
        );
        assert_eq!(
            Strategy::select(AutotypeMethod::ForceSendEvent, true),
            Strategy::SendEvent
        );
        assert_eq!(
            Strategy::select(AutotypeMethod::ForceSendEvent, false),
            Strategy::SendEvent
        );
    }
}
