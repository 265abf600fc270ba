// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shepherd::config::Config;
use shepherd::helm::merge_values;
use shepherd::install::{default_rancher_values, wait_for_rancher, Installer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Shepherd");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: rancher={} ({}), cert-manager={}",
        config.rancher_version, config.channel, config.cert_manager_version
    );

    let kube_config = kube::Config::infer()
        .await
        .context("Unable to load Kubernetes configuration")?;
    let installer = Installer::new(None, &kube_config, &config.helm_binary)?;

    let values = merge_values(
        default_rancher_values(&config.hostname, &config.bootstrap_password, config.replicas),
        config.extra_values.clone(),
    );

    let release = installer
        .install_rancher(
            config.channel,
            &config.rancher_version,
            &config.cert_manager_version,
            values,
        )
        .await?;
    info!(
        "Rancher {} installed as {}/{} ({})",
        release.chart_version().unwrap_or_default(),
        release.namespace,
        release.name,
        release.info.status
    );

    if config.wait_for_rancher {
        info!("Waiting for Rancher to become ready...");
        let client = kube::Client::try_from(kube_config)?;
        let local = wait_for_rancher(&client, config.wait_timeout).await?;
        info!("Rancher local cluster {} is ready", local.internal_name());
    }

    Ok(())
}
