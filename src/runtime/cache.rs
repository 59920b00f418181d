// Thu Oct 15 2026 - Alex

use crate::finders::{LocateError, ResolvedApi};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Set-once slot for the outcome of resolution.
///
/// The first caller runs resolution; concurrent first callers wait for it
/// and every later caller gets the stored outcome. Failures are stored too,
/// so a broken image fails the same way on every access without rescanning.
#[derive(Debug, Default)]
pub struct ResolverState {
    slot: OnceCell<Result<Arc<ResolvedApi>, LocateError>>,
}

impl ResolverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that is already resolved, for hosts whose addresses are known.
    pub fn from_resolved(api: ResolvedApi) -> Self {
        Self {
            slot: OnceCell::with_value(Ok(Arc::new(api))),
        }
    }

    pub fn get_or_resolve<F>(&self, resolve: F) -> Result<Arc<ResolvedApi>, LocateError>
    where
        F: FnOnce() -> Result<ResolvedApi, LocateError>,
    {
        self.slot
            .get_or_init(|| {
                let outcome = resolve().map(Arc::new);
                if let Err(e) = &outcome {
                    log::warn!("Resolution failed: {}", e);
                }
                outcome
            })
            .clone()
    }

    /// The stored outcome, if resolution has run.
    pub fn resolved(&self) -> Option<&Result<Arc<ResolvedApi>, LocateError>> {
        self.slot.get()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }
}
