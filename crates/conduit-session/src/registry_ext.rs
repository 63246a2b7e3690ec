//! The core → bootstrap surface: session counting and diagnostics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

use conduit_mappings::MappingRegistry;

use crate::session::CoreConfig;

/// Live-session accounting shared with the bootstrap.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    active: Arc<AtomicUsize>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Claim a slot; released when the guard drops with the session.
    pub fn guard(&self) -> SessionGuard {
        self.active.fetch_add(1, Ordering::Relaxed);
        SessionGuard {
            active: self.active.clone(),
        }
    }
}

#[derive(Debug)]
pub struct SessionGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Support-dump snapshot: configuration plus derived runtime facts.
#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub sessions: usize,
    pub supported_versions: Vec<i32>,
    pub item_rows_per_version: Vec<usize>,
    pub custom_items_per_version: Vec<usize>,
    pub extended_world_height: bool,
    pub add_non_native_items: bool,
    pub debug_mode: bool,
    pub default_locale: String,
}

/// Assemble the diagnostics snapshot.
pub fn diagnostics(
    mappings: &MappingRegistry,
    config: &CoreConfig,
    sessions: &SessionRegistry,
) -> DiagnosticsReport {
    let versions: Vec<i32> = mappings.supported_versions().collect();
    let item_rows = versions
        .iter()
        .map(|v| mappings.for_version(*v).map(|t| t.items.len()).unwrap_or(0))
        .collect();
    let custom_items = versions
        .iter()
        .map(|v| {
            mappings
                .for_version(*v)
                .map(|t| t.items.custom_items.len())
                .unwrap_or(0)
        })
        .collect();
    DiagnosticsReport {
        sessions: sessions.count(),
        supported_versions: versions,
        item_rows_per_version: item_rows,
        custom_items_per_version: custom_items,
        extended_world_height: config.extended_world_height,
        add_non_native_items: config.add_non_native_items,
        debug_mode: config.debug_mode,
        default_locale: config.default_locale.clone(),
    }
}
