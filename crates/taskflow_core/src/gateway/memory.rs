//! In-memory gateway for tests and previews.

use super::{GatewayError, GatewayResult, StateGateway};
use crate::codec::{self, PersistedState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemorySlot {
    document: Option<String>,
    fail_writes: bool,
    saves: usize,
}

/// Cloneable handle to one shared in-memory slot.
///
/// Clones observe the same slot, so a test can keep a handle while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateGateway {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStateGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway whose slot already holds `document` text.
    pub fn with_document(document: impl Into<String>) -> Self {
        let gateway = Self::new();
        gateway.lock().document = Some(document.into());
        gateway
    }

    /// Returns the stored document text.
    pub fn document(&self) -> Option<String> {
        self.lock().document.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Makes subsequent saves fail with `GatewayError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateGateway for MemoryStateGateway {
    fn load(&self) -> GatewayResult<Option<PersistedState>> {
        match self.lock().document.as_deref() {
            Some(text) => Ok(Some(codec::decode(text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &PersistedState) -> GatewayResult<()> {
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(GatewayError::Unavailable(
                "memory slot rejects writes".to_string(),
            ));
        }
        slot.document = Some(codec::encode(snapshot)?);
        slot.saves += 1;
        Ok(())
    }
}
