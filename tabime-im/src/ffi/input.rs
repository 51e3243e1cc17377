#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::ffi::{c_int, c_uint};

use crate::core::keycode::KeyEvent;

use super::{TabimeSession, ffi_mut};

/// Process a key event
/// Returns 1 if the key was consumed, 0 if not
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_process_key(
    session: *mut TabimeSession,
    keysym: c_uint,
    keycode: c_uint,
    state: c_uint,
    is_release: c_int,
) -> c_int {
    let session = ffi_mut!(session, 0);
    session.clear_flags();

    let key_event = KeyEvent::from_raw(keysym, keycode, state, is_release != 0);
    let result = session.session.process_key(&key_event);

    session.apply_actions(result.actions);

    if result.consumed { 1 } else { 0 }
}

/// Focus gained
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_focus_in(session: *mut TabimeSession) {
    let session = ffi_mut!(session);
    session.clear_flags();
    let result = session.session.focus_in();
    session.apply_actions(result.actions);
}

/// Focus lost: pending code is dropped and rank changes are saved
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_focus_out(session: *mut TabimeSession) {
    let session = ffi_mut!(session);
    session.clear_flags();
    let result = session.session.focus_out();
    session.apply_actions(result.actions);
}

/// Reset the session state
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_reset(session: *mut TabimeSession) {
    let session = ffi_mut!(session);
    session.session.reset();
    session.clear_caches();
}
