//! C FFI interface for host input-method frameworks
//!
//! This module provides C-compatible functions that a host addon (fcitx5,
//! IBus, ...) calls to drive table sessions and read back UI updates.

use std::ffi::{CStr, CString, c_char};
use std::sync::Once;

mod input;
mod lifecycle;
mod query;


/// Null-check + deref for `*const` FFI pointers. Returns `$default` if null.
macro_rules! ffi_ref {
    ($ptr:expr, $default:expr) => {{
        if $ptr.is_null() {
            return $default;
        }
        unsafe { &*$ptr }
    }};
}

/// Null-check + deref for `*mut` FFI pointers. Returns `$default` if null.
/// Use without default for void functions.
macro_rules! ffi_mut {
    ($ptr:expr) => {{
        if $ptr.is_null() {
            return;
        }
        unsafe { &mut *$ptr }
    }};
    ($ptr:expr, $default:expr) => {{
        if $ptr.is_null() {
            return $default;
        }
        unsafe { &mut *$ptr }
    }};
}

// Make macros available to submodules
pub(crate) use ffi_mut;
pub(crate) use ffi_ref;

use tabime_engine::TableRegistry;

use crate::config::Settings;
use crate::core::engine::EngineAction;
use crate::core::session::Session;

static INIT_LOGGING: Once = Once::new();

fn init_logging() {
    INIT_LOGGING.call_once(|| {
        // try_init: the host process may already have installed a subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Borrow a C string argument as UTF-8. `None` for null or invalid UTF-8.
fn c_str_arg<'a>(ptr: *const c_char, what: &str) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null (checked above); the host passes a NUL-terminated string
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!("{}: invalid UTF-8: {}", what, e);
            None
        }
    }
}

/// Cached preedit text and caret position for FFI consumption.
#[derive(Default)]
struct PreeditCache {
    text: CString,
    caret_bytes: u32,
    dirty: bool,
}

/// Cached candidate page for FFI consumption.
#[derive(Default)]
struct CandidateCache {
    texts: Vec<CString>,
    has_prev: bool,
    has_next: bool,
    dirty: bool,
    hide: bool,
}

/// Cached commit text for FFI consumption.
#[derive(Default)]
struct CommitCache {
    text: CString,
    dirty: bool,
}

/// Cached aux text for FFI consumption.
#[derive(Default)]
struct AuxCache {
    text: CString,
    dirty: bool,
}

/// Opaque handle to settings plus the tables shared by sessions
pub struct TabimeRegistry {
    settings: Settings,
    tables: TableRegistry,
}

impl TabimeRegistry {
    fn new(settings: Settings) -> Self {
        let tables = settings.table_registry();
        Self { settings, tables }
    }
}

/// Opaque handle to one input context
pub struct TabimeSession {
    session: Session,
    preedit: PreeditCache,
    candidates: CandidateCache,
    commit: CommitCache,
    aux: AuxCache,
}

impl TabimeSession {
    fn new(session: Session) -> Self {
        Self {
            session,
            preedit: PreeditCache::default(),
            candidates: CandidateCache::default(),
            commit: CommitCache::default(),
            aux: AuxCache::default(),
        }
    }

    fn clear_flags(&mut self) {
        self.preedit.dirty = false;
        self.candidates.dirty = false;
        self.candidates.hide = false;
        self.commit.dirty = false;
        self.aux.dirty = false;
    }

    fn clear_caches(&mut self) {
        self.preedit = PreeditCache::default();
        self.candidates = CandidateCache::default();
        self.commit = CommitCache::default();
        self.aux = AuxCache::default();
    }

    /// Process engine actions and cache results for FFI consumption.
    fn apply_actions(&mut self, actions: Vec<EngineAction>) {
        for action in actions {
            match action {
                EngineAction::UpdatePreedit(preedit) => {
                    let caret_chars = preedit.caret();
                    let caret_bytes = preedit
                        .text()
                        .char_indices()
                        .nth(caret_chars)
                        .map(|(i, _)| i)
                        .unwrap_or(preedit.text().len());
                    self.preedit.caret_bytes = caret_bytes as u32;
                    self.preedit.text = CString::new(preedit.text()).unwrap_or_default();
                    self.preedit.dirty = true;
                }
                EngineAction::ShowCandidates(view) => {
                    self.candidates.texts = view
                        .texts
                        .iter()
                        .filter_map(|t| CString::new(t.as_str()).ok())
                        .collect();
                    self.candidates.has_prev = view.has_prev;
                    self.candidates.has_next = view.has_next;
                    self.candidates.dirty = true;
                    self.candidates.hide = false;
                }
                EngineAction::HideCandidates => {
                    self.candidates.texts.clear();
                    self.candidates.has_prev = false;
                    self.candidates.has_next = false;
                    self.candidates.hide = true;
                    self.candidates.dirty = true;
                }
                EngineAction::Commit(text) => {
                    self.commit.text = CString::new(text).unwrap_or_default();
                    self.commit.dirty = true;
                }
                EngineAction::UpdateAuxText(text) => {
                    self.aux.text = CString::new(text).unwrap_or_default();
                    self.aux.dirty = true;
                }
                EngineAction::HideAuxText => {
                    self.aux.text = CString::default();
                    self.aux.dirty = true;
                }
            }
        }
    }
}
