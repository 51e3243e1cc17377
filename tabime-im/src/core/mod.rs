//! Core IME functionality
//!
//! This module contains the code buffer, candidate paging and the key
//! dispatch state machine.

pub mod candidate;
pub mod editor;
pub mod engine;
pub mod keycode;
pub mod preedit;
pub mod session;
pub mod state;
