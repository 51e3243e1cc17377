//! tabime-im: table-based input method core
//!
//! This crate turns key events into code-buffer edits, looks the code up in
//! a phrase table from tabime-engine, and reports preedit, candidate and
//! commit updates to the host through a C ABI.

pub mod config;
pub mod core;
pub mod ffi;

pub use core::candidate::{Candidate, CandidatePage};
pub use core::editor::{Editor, EditorConfig, EditorError};
pub use core::engine::{
    CandidateView, CharWidth, EngineAction, EngineResult, InputMethodEngine, InputMode,
    WidthTarget,
};
pub use core::keycode::{KeyEvent, KeyModifiers, Keysym};
pub use core::session::{Session, SessionError};
pub use core::state::InputState;
