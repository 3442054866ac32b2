//! # xautotype
//!
//! X11 autotype key-injection engine: given a sequence of Unicode
//! characters (typically a stored secret), synthesizes keyboard input
//! delivered to whichever window currently holds input focus, without
//! cooperation from the target application.
//!
//! # Architecture
//!
//! ```text
//! send_string(text, method, delay)
//!   ├─> XSession         (connection scope + focus snapshot)
//!   ├─> Resolution pass  (char → keysym → keycode → modifier bits)
//!   │     └─> all-or-nothing: any failure ⇒ zero keys injected
//!   └─> Injection pass   (XTEST fake events, or SendEvent fallback)
//!         └─> paced by the inter-key delay, synced before return
//! ```
//!
//! The resolution pass runs to completion before anything is sent, so
//! translation failures can never leave a partially typed secret in the
//! target window. Only a server-side fault during the injection pass
//! can cause a partial effect, and that is always reported as
//! [`AutotypeError::ProtocolError`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use xautotype::{send_string, AutotypeMethod};
//!
//! # fn main() -> xautotype::Result<()> {
//! // Types into whatever window has focus right now.
//! send_string("Pass1!", AutotypeMethod::PreferXtest, Duration::from_millis(10))?;
//! # Ok(())
//! # }
//! ```
//!
//! Callers must serialize requests: no two calls may be in flight
//! concurrently against the same display session.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Configuration loading and validation
pub mod config;

/// Two-phase resolution/injection orchestration
pub mod engine;

/// Error taxonomy
pub mod error;

/// Injection strategies and pacing
pub mod inject;

/// Keyboard and modifier map snapshots, keycode and modifier resolution
pub mod keymap;

/// Code point to keysym resolution
pub mod keysym;

/// X server connection scope and backend trait
pub mod server;

pub use config::AutotypeConfig;
pub use engine::{send_string, AutotypeEngine, AutotypeMethod, InjectionReport, InjectionRequest};
pub use error::{AutotypeError, Result};
pub use inject::Strategy;
pub use keymap::{KeyboardMap, Keycode, ModifierMap, ResolvedKeypress};
pub use keysym::Keysym;
pub use server::{XServer, XSession};
