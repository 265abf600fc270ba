// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::helm::Values;
use crate::install::RancherChannel;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Installer configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub rancher_version: String,
    pub cert_manager_version: String,
    pub channel: RancherChannel,
    pub hostname: String,
    pub bootstrap_password: String,
    pub replicas: u32,
    /// Path or name of the helm binary
    pub helm_binary: String,
    /// Merged over the default Rancher chart values
    pub extra_values: Values,
    pub wait_for_rancher: bool,
    pub wait_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rancher_version =
            lookup("RANCHER_VERSION").context("RANCHER_VERSION environment variable not set")?;
        let cert_manager_version = lookup("CERT_MANAGER_VERSION")
            .context("CERT_MANAGER_VERSION environment variable not set")?;

        let channel = match lookup("RANCHER_CHANNEL") {
            Some(c) => c.parse().context("Invalid RANCHER_CHANNEL")?,
            None => RancherChannel::Stable,
        };
        let replicas = match lookup("RANCHER_REPLICAS") {
            Some(r) => r.parse().context("RANCHER_REPLICAS must be a number")?,
            None => 1,
        };
        let wait_timeout_secs: u64 = match lookup("RANCHER_WAIT_TIMEOUT_SECS") {
            Some(t) => t
                .parse()
                .context("RANCHER_WAIT_TIMEOUT_SECS must be a number of seconds")?,
            None => 600,
        };
        let extra_values: Values = match lookup("RANCHER_VALUES") {
            Some(v) => serde_json::from_str(&v).context("RANCHER_VALUES must be a JSON object")?,
            None => Values::new(),
        };
        let wait_for_rancher: bool = match lookup("WAIT_FOR_RANCHER") {
            Some(w) => w.parse().context("WAIT_FOR_RANCHER must be true or false")?,
            None => false,
        };

        Ok(Config {
            rancher_version,
            cert_manager_version,
            channel,
            hostname: lookup("RANCHER_HOSTNAME").unwrap_or_else(|| "localhost".to_string()),
            bootstrap_password: lookup("RANCHER_BOOTSTRAP_PASSWORD")
                .unwrap_or_else(|| "admin".to_string()),
            replicas,
            helm_binary: lookup("HELM_BIN").unwrap_or_else(|| "helm".to_string()),
            extra_values,
            wait_for_rancher,
            wait_timeout: Duration::from_secs(wait_timeout_secs),
        })
    }
}
