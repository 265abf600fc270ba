// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test session that collects cleanup actions and runs them in reverse order.

use crate::error::Result;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

type CleanupFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

#[derive(Clone, Default)]
pub struct Session {
    cleanups: Arc<Mutex<Vec<CleanupFn>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action to run when the session is cleaned up
    pub fn register_cleanup<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let mut cleanups = self.cleanups.lock().unwrap_or_else(|e| e.into_inner());
        cleanups.push(Box::new(move || Box::pin(f())));
        debug!("Registered cleanup action #{}", cleanups.len());
    }

    /// Number of cleanup actions waiting to run
    pub fn pending(&self) -> usize {
        self.cleanups.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Run every registered action, last registered first.
    /// All actions run even when one fails; the first failure is returned.
    pub async fn cleanup(&self) -> Result<()> {
        let actions = std::mem::take(&mut *self.cleanups.lock().unwrap_or_else(|e| e.into_inner()));
        info!("Running {} cleanup actions", actions.len());

        let mut first_error = None;
        for action in actions.into_iter().rev() {
            if let Err(e) = action().await {
                error!("Cleanup action failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pending", &self.pending())
            .finish()
    }
}
