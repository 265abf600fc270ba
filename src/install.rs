// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Installation of cert-manager and Rancher into a cluster.
//!
//! Each step aborts on the first error: create namespace, install cert-manager,
//! register the Rancher chart repository, install the Rancher chart.

use crate::constants::{cert_manager, rancher};
use crate::controllers::core::v1::SecretClient;
use crate::controllers::provisioning::v1::ClusterClient;
use crate::error::{Result, ShepherdError};
use crate::helm::{
    release_secret_selector, HelmCli, HelmClient, HelmExecutor, HelmSettings, InstallOptions,
    Release, Values,
};
use crate::kubernetes::{create_namespace, generate_kubeconfig, wait_for_crd};
use crate::session::Session;
use crate::types::cluster::Cluster;
use kube::api::ListParams;
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

/// Rancher chart repository to install from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RancherChannel {
    #[default]
    Stable,
    Latest,
    Alpha,
}

impl RancherChannel {
    pub fn repo_name(&self) -> &'static str {
        match self {
            RancherChannel::Stable => rancher::STABLE_REPO_NAME,
            RancherChannel::Latest => rancher::LATEST_REPO_NAME,
            RancherChannel::Alpha => rancher::ALPHA_REPO_NAME,
        }
    }

    pub fn repo_url(&self) -> &'static str {
        match self {
            RancherChannel::Stable => rancher::STABLE_REPO_URL,
            RancherChannel::Latest => rancher::LATEST_REPO_URL,
            RancherChannel::Alpha => rancher::ALPHA_REPO_URL,
        }
    }

    /// `<repo>/rancher`
    pub fn chart_ref(&self) -> String {
        format!("{}/{}", self.repo_name(), rancher::RELEASE_NAME)
    }
}

impl FromStr for RancherChannel {
    type Err = ShepherdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(RancherChannel::Stable),
            "latest" => Ok(RancherChannel::Latest),
            "alpha" => Ok(RancherChannel::Alpha),
            _ => Err(ShepherdError::InvalidChannel(s.to_string())),
        }
    }
}

impl fmt::Display for RancherChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RancherChannel::Stable => "stable",
            RancherChannel::Latest => "latest",
            RancherChannel::Alpha => "alpha",
        };
        f.write_str(name)
    }
}

/// Values for a single-node test installation of Rancher
pub fn default_rancher_values(hostname: &str, bootstrap_password: &str, replicas: u32) -> Values {
    let mut values = Values::new();
    values.insert("hostname".to_string(), json!(hostname));
    values.insert("bootstrapPassword".to_string(), json!(bootstrap_password));
    values.insert("replicas".to_string(), json!(replicas));
    values
}

/// Runs the installation steps against one cluster
pub struct Installer {
    client: kube::Client,
    kubeconfig: Vec<u8>,
    executor: Arc<dyn HelmExecutor>,
    session: Option<Session>,
}

impl Installer {
    /// Connect to the cluster `config` points at, running helm from `helm_binary`
    pub fn new(session: Option<&Session>, config: &kube::Config, helm_binary: &str) -> Result<Self> {
        let client = kube::Client::try_from(config.clone())?;
        let kubeconfig = generate_kubeconfig(
            config,
            rancher::LOCAL_CLUSTER,
            rancher::LOCAL_CLUSTER,
            rancher::LOCAL_CLUSTER,
        )?;

        Ok(Self::with_parts(
            session,
            client,
            kubeconfig,
            Arc::new(HelmCli::new(helm_binary)),
        ))
    }

    pub fn with_parts(
        session: Option<&Session>,
        client: kube::Client,
        kubeconfig: Vec<u8>,
        executor: Arc<dyn HelmExecutor>,
    ) -> Self {
        Self {
            client,
            kubeconfig,
            executor,
            session: session.cloned(),
        }
    }

    fn helm_client(&self, namespace: &str) -> Result<HelmClient> {
        let settings = HelmSettings::new(self.kubeconfig.clone(), rancher::LOCAL_CLUSTER, namespace);
        HelmClient::with_executor(self.session.as_ref(), settings, self.executor.clone())
    }

    /// Install cert-manager, including its CRDs
    #[instrument(skip(self))]
    pub async fn install_cert_manager(&self, version: &str) -> Result<Release> {
        create_namespace(&self.client, cert_manager::NAMESPACE).await?;

        let helm = self.helm_client(cert_manager::NAMESPACE)?;
        helm.add_or_update_repo(cert_manager::REPO_NAME, cert_manager::REPO_URL, false)
            .await?;

        let mut values = Values::new();
        values.insert("installCRDs".to_string(), json!(true));

        helm.install_chart(
            InstallOptions::new(cert_manager::RELEASE_NAME, cert_manager::CHART_REF)
                .namespace(cert_manager::NAMESPACE)
                .version(version)
                .values(values),
        )
        .await
    }

    /// Install cert-manager and then Rancher from `channel`
    #[instrument(skip(self, values))]
    pub async fn install_rancher(
        &self,
        channel: RancherChannel,
        rancher_version: &str,
        cert_manager_version: &str,
        values: Values,
    ) -> Result<Release> {
        create_namespace(&self.client, rancher::NAMESPACE).await?;

        self.install_cert_manager(cert_manager_version).await?;

        let helm = self.helm_client(rancher::NAMESPACE)?;
        helm.add_or_update_repo(channel.repo_name(), channel.repo_url(), false)
            .await?;

        info!("Installing Rancher {} from {} channel", rancher_version, channel);
        helm.install_chart(
            InstallOptions::new(rancher::RELEASE_NAME, &channel.chart_ref())
                .namespace(rancher::NAMESPACE)
                .version(rancher_version)
                .values(values),
        )
        .await
    }
}

/// Install cert-manager into the cluster `config` points at
pub async fn install_cert_manager(
    session: Option<&Session>,
    config: &kube::Config,
    version: &str,
) -> Result<Release> {
    Installer::new(session, config, "helm")?
        .install_cert_manager(version)
        .await
}

/// Install cert-manager and Rancher from the stable channel
pub async fn install_rancher(
    session: Option<&Session>,
    config: &kube::Config,
    rancher_version: &str,
    cert_manager_version: &str,
    values: Values,
) -> Result<Release> {
    install_rancher_from_channel(
        session,
        config,
        RancherChannel::Stable,
        rancher_version,
        cert_manager_version,
        values,
    )
    .await
}

pub async fn install_rancher_from_channel(
    session: Option<&Session>,
    config: &kube::Config,
    channel: RancherChannel,
    rancher_version: &str,
    cert_manager_version: &str,
    values: Values,
) -> Result<Release> {
    Installer::new(session, config, "helm")?
        .install_rancher(channel, rancher_version, cert_manager_version, values)
        .await
}

/// Whether helm has stored a revision of `release` in `namespace`
pub async fn release_exists(client: &kube::Client, namespace: &str, release: &str) -> Result<bool> {
    let list = SecretClient::namespaced(client.clone())
        .list(
            namespace,
            &ListParams::default().labels(&release_secret_selector(release)),
        )
        .await?;
    Ok(!list.items.is_empty())
}

/// Whether the Rancher release exists in cattle-system
pub async fn rancher_release_exists(client: &kube::Client) -> Result<bool> {
    release_exists(client, rancher::NAMESPACE, rancher::RELEASE_NAME).await
}

/// Wait for Rancher to register its local cluster and report it ready
#[instrument(skip(client))]
pub async fn wait_for_rancher(client: &kube::Client, timeout: Duration) -> Result<Cluster> {
    let deadline = Instant::now() + timeout;
    wait_for_crd(client, "provisioning.cattle.io", "v1", "Cluster", timeout).await?;

    let clusters = ClusterClient::namespaced(client.clone());
    loop {
        match clusters
            .get(rancher::LOCAL_CLUSTER_NAMESPACE, rancher::LOCAL_CLUSTER)
            .await
        {
            Ok(cluster) if cluster.is_ready() => {
                info!("Rancher local cluster is ready");
                return Ok(cluster);
            }
            Ok(_) => debug!("Rancher local cluster is not ready yet"),
            Err(e) if e.is_not_found() => debug!("Rancher local cluster not registered yet"),
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ShepherdError::Timeout(
                timeout,
                format!(
                    "cluster {}/{} to become ready",
                    rancher::LOCAL_CLUSTER_NAMESPACE,
                    rancher::LOCAL_CLUSTER
                ),
            ));
        }
        sleep(Duration::from_secs(10).min(deadline - now)).await;
    }
}
