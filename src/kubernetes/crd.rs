// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::{Result, ShepherdError};
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

/// Wait for a custom resource kind to be served by the API server.
/// Polls with exponential backoff starting at POLL_INTERVAL_SECS seconds and
/// gives up once `timeout` has elapsed.
pub async fn wait_for_crd(
    client: &Client,
    group: &str,
    version: &str,
    kind: &str,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match crd_exists(client, group, version, kind).await {
            Ok(true) => {
                info!("{} CRD ({}/{}) is available", kind, group, version);
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "{} CRD ({}/{}) not yet available, waiting {} seconds...",
                    kind, group, version, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for {} CRD: {}, retrying in {} seconds...",
                    kind, e, interval
                );
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ShepherdError::Timeout(
                timeout,
                format!("{} CRD ({}/{})", kind, group, version),
            ));
        }
        sleep(Duration::from_secs(interval).min(deadline - now)).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// Check if a kind exists in a group/version by attempting to discover it.
async fn crd_exists(client: &Client, group: &str, version: &str, kind: &str) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[group])
        .run()
        .await?;

    for api_group in discovery.groups() {
        if api_group.name() == group {
            for (ar, _) in api_group.recommended_resources() {
                if ar.kind == kind && ar.version == version {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}
