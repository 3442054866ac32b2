//! X Server Connection Scope
//!
//! [`XSession`] owns the display connection for the duration of one
//! autotype call and snapshots the focused window at acquisition time.
//! The rest of the pipeline talks to the server through the [`XServer`]
//! trait so tests can substitute a scripted double that records
//! injected events.
//!
//! Error handling note: the original Xlib engine installed a
//! process-wide `XSetErrorHandler` and latched the first error into a
//! global slot. x11rb's checked requests carry the error back on the
//! request itself, so every injection request here is issued checked
//! and the first protocol error simply propagates as
//! [`AutotypeError::ProtocolError`]. No process-wide state, nothing to
//! restore on exit.

use crate::error::{AutotypeError, Result};
use crate::keymap::{Keycode, KeyboardMap, ModifierMap};
use tracing::{debug, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xproto::{
    ConnectionExt as _, EventMask, KeyButMask, KeyPressEvent, Window, KEY_PRESS_EVENT,
    KEY_RELEASE_EVENT,
};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

/// Server operations the injection pipeline needs
///
/// One implementation per backend: [`XSession`] over a live display,
/// plus the scripted mock the integration tests use. All methods take
/// `&self`; a session must not be shared between concurrent calls.
pub trait XServer {
    /// Window holding input focus when the scope was acquired
    ///
    /// Snapshot, never re-queried: the engine types into whatever had
    /// focus at acquisition even if focus moves mid-call.
    fn focused_window(&self) -> Window;

    /// Whether the server advertises the XTEST extension
    fn supports_xtest(&self) -> bool;

    /// Fetch the keyboard mapping for the full keycode range
    fn keyboard_mapping(&self) -> Result<KeyboardMap>;

    /// Fetch the modifier mapping
    fn modifier_mapping(&self) -> Result<ModifierMap>;

    /// XTEST grab control bracket around the native injection pass
    fn grab_control(&self, grab: bool) -> Result<()>;

    /// Synthesize a physical key press or release via XTEST
    fn fake_key_event(&self, keycode: Keycode, press: bool) -> Result<()>;

    /// Synthesize a core key event addressed to a window via SendEvent
    fn send_key_event(&self, window: Window, keycode: Keycode, state: u16, press: bool)
        -> Result<()>;

    /// Block until all injected events are visible to the server
    fn sync(&self) -> Result<()>;
}

/// Live connection scope over a real X display
///
/// Opening the scope connects and snapshots the focus window; dropping
/// it closes the connection on every exit path, including the
/// resolution-failure early returns.
pub struct XSession {
    conn: RustConnection,
    root: Window,
    focus: Window,
    xtest: bool,
}

impl XSession {
    /// Connect to a display and snapshot the focused window
    ///
    /// `display` of `None` uses `$DISPLAY`. Fails with
    /// [`AutotypeError::ConnectionUnavailable`] when the server cannot
    /// be reached.
    pub fn open(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(display)
            .map_err(|e| AutotypeError::ConnectionUnavailable(e.to_string()))?;
        let root = conn.setup().roots[screen_num].root;

        let focus = conn
            .get_input_focus()
            .map_err(connection_lost)?
            .reply()
            .map_err(protocol_error)?
            .focus;

        let xtest = match conn.extension_information(xtest::X11_EXTENSION_NAME) {
            Ok(Some(_)) => match conn.xtest_get_version(2, 2) {
                Ok(cookie) => cookie.reply().is_ok(),
                Err(_) => false,
            },
            _ => false,
        };

        debug!(focus, xtest, "X session acquired");
        Ok(Self {
            conn,
            root,
            focus,
            xtest,
        })
    }
}

impl XServer for XSession {
    fn focused_window(&self) -> Window {
        self.focus
    }

    fn supports_xtest(&self) -> bool {
        self.xtest
    }

    fn keyboard_mapping(&self) -> Result<KeyboardMap> {
        let setup = self.conn.setup();
        let min = setup.min_keycode;
        let count = setup.max_keycode - min + 1;
        let reply = self
            .conn
            .get_keyboard_mapping(min, count)
            .map_err(connection_lost)?
            .reply()
            .map_err(protocol_error)?;
        Ok(KeyboardMap::new(
            min,
            reply.keysyms_per_keycode as usize,
            reply.keysyms,
        ))
    }

    fn modifier_mapping(&self) -> Result<ModifierMap> {
        let reply = self
            .conn
            .get_modifier_mapping()
            .map_err(connection_lost)?
            .reply()
            .map_err(protocol_error)?;
        Ok(ModifierMap::new(
            reply.keycodes_per_modifier() as usize,
            reply.keycodes,
        ))
    }

    fn grab_control(&self, grab: bool) -> Result<()> {
        self.conn
            .xtest_grab_control(grab)
            .map_err(connection_lost)?
            .check()
            .map_err(protocol_error)
    }

    fn fake_key_event(&self, keycode: Keycode, press: bool) -> Result<()> {
        let kind = if press {
            KEY_PRESS_EVENT
        } else {
            KEY_RELEASE_EVENT
        };
        self.conn
            .xtest_fake_input(kind, keycode, x11rb::CURRENT_TIME, self.root, 0, 0, 0)
            .map_err(connection_lost)?
            .check()
            .map_err(protocol_error)
    }

    fn send_key_event(
        &self,
        window: Window,
        keycode: Keycode,
        state: u16,
        press: bool,
    ) -> Result<()> {
        let event = KeyPressEvent {
            response_type: if press {
                KEY_PRESS_EVENT
            } else {
                KEY_RELEASE_EVENT
            },
            detail: keycode,
            sequence: 0,
            time: x11rb::CURRENT_TIME,
            root: self.root,
            event: window,
            child: x11rb::NONE,
            root_x: 1,
            root_y: 1,
            event_x: 1,
            event_y: 1,
            state: KeyButMask::from(state),
            same_screen: true,
        };
        self.conn
            .send_event(true, window, EventMask::KEY_PRESS, event)
            .map_err(connection_lost)?
            .check()
            .map_err(protocol_error)
    }

    fn sync(&self) -> Result<()> {
        self.conn.sync().map_err(protocol_error)
    }
}

impl Drop for XSession {
    fn drop(&mut self) {
        // RustConnection closes on drop; flush whatever is still queued
        // so a failed call does not swallow events already accepted.
        if let Err(e) = self.conn.flush() {
            warn!(error = %e, "flush on session teardown failed");
        }
    }
}

fn connection_lost(err: ConnectionError) -> AutotypeError {
    AutotypeError::ConnectionUnavailable(err.to_string())
}

fn protocol_error(err: ReplyError) -> AutotypeError {
    match err {
        ReplyError::ConnectionError(e) => connection_lost(e),
        ReplyError::X11Error(e) => AutotypeError::ProtocolError {
            code: e.error_code,
            message: format!(
                "{:?} (bad value {:#x}, request {})",
                e.error_kind, e.bad_value, e.major_opcode
            ),
        },
    }
}
