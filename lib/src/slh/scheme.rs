// Process-wide scheme configuration with atomic snapshot switching

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;
use tracing::{debug, info};

use crate::slh::config::{ParameterCatalog, ParameterRecord, ParameterSet, StandardCatalog};
use crate::slh::error::{BridgeError, BridgeResult};

/// The active scheme together with its resolved record.
///
/// Published as one immutable snapshot, so a reader can never pair one
/// scheme's identifier with another scheme's constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveScheme {
    pub set: ParameterSet,
    pub record: ParameterRecord,
}

/// Owner of the "current" parameter set.
///
/// Readers are lock-free and always observe a complete snapshot. Writers
/// are serialized and validate the new record before publishing it; a
/// failed write leaves the previous snapshot in place.
pub struct SchemeConfig<C: ParameterCatalog = StandardCatalog> {
    catalog: C,
    active: ArcSwapOption<ActiveScheme>,
    writer: Mutex<()>,
}

impl SchemeConfig<StandardCatalog> {
    pub fn new() -> Self {
        Self::with_catalog(StandardCatalog)
    }
}

impl Default for SchemeConfig<StandardCatalog> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ParameterCatalog> SchemeConfig<C> {
    pub fn with_catalog(catalog: C) -> Self {
        Self {
            catalog,
            active: ArcSwapOption::empty(),
            writer: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Set the current scheme for the first time, or re-initialize it.
    pub fn initialize(&self, set: ParameterSet) -> BridgeResult<ActiveScheme> {
        let _guard = self.lock_writer();
        let next = self.resolve(set)?;
        self.active.store(Some(Arc::new(next)));
        info!(scheme = %set, "scheme configuration initialized");
        Ok(next)
    }

    /// Switch the current scheme at runtime.
    ///
    /// Only valid once initialized. Every load that starts after this
    /// returns sees the new snapshot.
    pub fn set_scheme(&self, set: ParameterSet) -> BridgeResult<ActiveScheme> {
        let _guard = self.lock_writer();
        let previous = self.active.load_full().ok_or(BridgeError::NotInitialized)?;
        let next = self.resolve(set)?;
        self.active.store(Some(Arc::new(next)));
        debug!(from = %previous.set, to = %set, "parameter scheme switched");
        Ok(next)
    }

    pub fn snapshot(&self) -> Option<Arc<ActiveScheme>> {
        self.active.load_full()
    }

    /// Snapshot for operations that cannot run without a scheme.
    pub fn require_active(&self) -> BridgeResult<Arc<ActiveScheme>> {
        self.snapshot().ok_or(BridgeError::NotInitialized)
    }

    pub fn current_scheme(&self) -> Option<ParameterSet> {
        self.active.load().as_ref().map(|active| active.set)
    }

    pub fn current_params(&self) -> Option<ParameterRecord> {
        self.active.load().as_ref().map(|active| active.record)
    }

    pub fn is_initialized(&self) -> bool {
        self.active.load().is_some()
    }

    fn resolve(&self, set: ParameterSet) -> BridgeResult<ActiveScheme> {
        let record = self.catalog.lookup(set);
        record.validate()?;
        Ok(ActiveScheme { set, record })
    }

    // Nothing is published while the guard is held until validation
    // passed, so a poisoned lock still protects a consistent snapshot.
    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
