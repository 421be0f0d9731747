//! Caller-side cancellation
//!
//! Operations started from an interactive caller run under a
//! [`CancellationToken`]. [`ActionSlots`] keeps one token per action name so
//! re-triggering an action cancels the instance still in flight.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{CacheError, Result};

/// Races `operation` against `token`.
///
/// Returns [`CacheError::Cancelled`] if the token fires first; the operation
/// future is dropped and stops awaiting substrate I/O.
pub async fn cancellable<T, F>(token: &CancellationToken, action: &str, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CacheError::cancelled(action)),
        result = operation => result,
    }
}

#[derive(Default)]
struct SlotTable {
    next_generation: u64,
    closed: bool,
    slots: HashMap<String, (u64, CancellationToken)>,
}

/// One cancellation slot per action name, latest invocation wins.
#[derive(Clone, Default)]
pub struct ActionSlots {
    table: Arc<Mutex<SlotTable>>,
}

/// Holds an action's slot; the slot is released on drop unless a newer
/// invocation has already replaced it.
pub struct ActionGuard {
    slots: ActionSlots,
    action: String,
    generation: u64,
    token: CancellationToken,
}

impl ActionGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        let mut table = self.slots.lock();
        if matches!(table.slots.get(&self.action), Some((generation, _)) if *generation == self.generation)
        {
            table.slots.remove(&self.action);
        }
    }
}

impl ActionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the slot for `action`, cancelling whatever held it before.
    pub fn begin(&self, action: &str) -> ActionGuard {
        let token = CancellationToken::new();
        let mut table = self.lock();

        table.next_generation += 1;
        let generation = table.next_generation;

        if table.closed {
            token.cancel();
        }

        if let Some((_, previous)) = table
            .slots
            .insert(action.to_string(), (generation, token.clone()))
        {
            debug!("Superseding in-flight '{}' action", action);
            previous.cancel();
        }

        ActionGuard {
            slots: self.clone(),
            action: action.to_string(),
            generation,
            token,
        }
    }

    /// Runs `operation` as the sole in-flight instance of `action`.
    pub async fn run<T, F>(&self, action: &str, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let guard = self.begin(action);
        cancellable(guard.token(), action, operation).await
    }

    /// Cancels every in-flight action. Actions begun afterwards start out
    /// cancelled.
    pub fn close(&self) {
        let mut table = self.lock();
        table.closed = true;
        for (_, (_, token)) in table.slots.drain() {
            token.cancel();
        }
    }

    /// Whether an instance of `action` currently holds its slot.
    pub fn is_running(&self, action: &str) -> bool {
        self.lock().slots.contains_key(action)
    }
}
