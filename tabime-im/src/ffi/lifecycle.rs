#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::ffi::c_char;
use std::path::Path;
use std::ptr;

use crate::config::Settings;
use crate::core::session::Session;

use super::{TabimeRegistry, TabimeSession, c_str_arg, ffi_ref, init_logging};

/// Create a registry from a configuration file.
/// `config_path` may be null to use the user's config.toml (or defaults).
/// Returns null if the given file cannot be loaded.
#[unsafe(no_mangle)]
pub extern "C" fn tabime_registry_new(config_path: *const c_char) -> *mut TabimeRegistry {
    init_logging();

    let settings = if config_path.is_null() {
        Settings::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {:#}", e);
            Settings::default()
        })
    } else {
        let Some(path) = c_str_arg(config_path, "registry_new") else {
            return ptr::null_mut();
        };
        match Settings::load_from(Path::new(path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Failed to load config {:?}: {:#}", path, e);
                return ptr::null_mut();
            }
        }
    };

    tracing::info!(
        "tabime registry: tables dir={:?}, match_mode={:?}",
        settings.table_locations().dir(),
        settings.editor.match_mode
    );
    Box::into_raw(Box::new(TabimeRegistry::new(settings)))
}

/// Destroy a registry. Sessions created from it stay valid.
#[unsafe(no_mangle)]
pub extern "C" fn tabime_registry_free(registry: *mut TabimeRegistry) {
    if !registry.is_null() {
        // SAFETY: Pointer is non-null (checked above) and was created by Box::into_raw in tabime_registry_new
        unsafe {
            drop(Box::from_raw(registry));
        }
    }
}

/// Start a session on the named table.
/// Returns null if the table cannot be opened.
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_new(
    registry: *const TabimeRegistry,
    table_name: *const c_char,
) -> *mut TabimeSession {
    let registry = ffi_ref!(registry, ptr::null_mut());
    let Some(name) = c_str_arg(table_name, "session_new") else {
        return ptr::null_mut();
    };

    match Session::open(&registry.tables, name, registry.settings.editor_config()) {
        Ok(session) => Box::into_raw(Box::new(TabimeSession::new(session))),
        Err(e) => {
            // Error + source chain
            tracing::error!("{:#}", anyhow::Error::new(e));
            ptr::null_mut()
        }
    }
}

/// Destroy a session. The last session on a table saves it.
#[unsafe(no_mangle)]
pub extern "C" fn tabime_session_free(session: *mut TabimeSession) {
    if !session.is_null() {
        // SAFETY: Pointer is non-null (checked above) and was created by Box::into_raw in tabime_session_new
        unsafe {
            drop(Box::from_raw(session));
        }
    }
}
