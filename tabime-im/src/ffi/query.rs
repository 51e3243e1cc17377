#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::ffi::{c_char, c_int, c_uint};
use std::ptr;

use super::{TabimeSession, ffi_ref};

/// Check if there's a preedit update pending
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_has_preedit(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.preedit.dirty { 1 } else { 0 }
}

/// Get the current preedit text
/// Returns a pointer to a null-terminated UTF-8 string (valid until next process_key call)
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_get_preedit(session: *const TabimeSession) -> *const c_char {
    let session = ffi_ref!(session, ptr::null());
    session.preedit.text.as_ptr()
}

/// Get the preedit caret position in bytes
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_get_preedit_caret(session: *const TabimeSession) -> c_uint {
    let session = ffi_ref!(session, 0);
    session.preedit.caret_bytes as c_uint
}

/// Check if there's a commit pending
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_has_commit(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.commit.dirty { 1 } else { 0 }
}

/// Get the commit text
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_get_commit(session: *const TabimeSession) -> *const c_char {
    let session = ffi_ref!(session, ptr::null());
    session.commit.text.as_ptr()
}

/// Check if there's a candidates update pending
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_has_candidates(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.candidates.dirty { 1 } else { 0 }
}

/// Check if candidates should be hidden
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_should_hide_candidates(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.candidates.hide { 1 } else { 0 }
}

/// Get the number of candidates on the current page
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_get_candidate_count(session: *const TabimeSession) -> c_uint {
    let session = ffi_ref!(session, 0);
    session.candidates.texts.len() as c_uint
}

/// Get a candidate of the current page by index
/// Returns a pointer to a null-terminated UTF-8 string, or null if index is out of range
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_get_candidate(
    session: *const TabimeSession,
    index: c_uint,
) -> *const c_char {
    let session = ffi_ref!(session, ptr::null());
    session
        .candidates
        .texts
        .get(index as usize)
        .map(|c| c.as_ptr())
        .unwrap_or(ptr::null())
}

/// Whether a page exists before the current one
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_has_prev_page(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.candidates.has_prev { 1 } else { 0 }
}

/// Whether a page exists after the current one
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_has_next_page(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.candidates.has_next { 1 } else { 0 }
}

/// Check if there's an aux text update pending
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_has_aux(session: *const TabimeSession) -> c_int {
    let session = ffi_ref!(session, 0);
    if session.aux.dirty { 1 } else { 0 }
}

/// Get the aux text
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_get_aux(session: *const TabimeSession) -> *const c_char {
    let session = ffi_ref!(session, ptr::null());
    session.aux.text.as_ptr()
}
