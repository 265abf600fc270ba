// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helm client bound to one cluster and namespace

use crate::constants::helm::{NAME_LABEL, OWNER_LABEL, OWNER_VALUE};
use crate::error::Result;
use crate::helm::executor::{HelmCli, HelmExecutor};
use crate::helm::release::{Release, ReleaseSummary};
use crate::helm::values::Values;
use crate::session::Session;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{info, instrument};
use url::Url;

/// Where and how helm runs
#[derive(Debug, Clone)]
pub struct HelmSettings {
    /// Path or name of the helm binary
    pub binary: String,
    /// Kubeconfig document helm talks to the cluster with
    pub kubeconfig: Vec<u8>,
    pub kube_context: String,
    /// Default namespace for releases
    pub namespace: String,
}

impl HelmSettings {
    pub fn new(kubeconfig: Vec<u8>, kube_context: &str, namespace: &str) -> Self {
        Self {
            binary: "helm".to_string(),
            kubeconfig,
            kube_context: kube_context.to_string(),
            namespace: namespace.to_string(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

/// Options for `helm install` and `helm upgrade --install`
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub release_name: String,
    /// Chart reference, e.g. `rancher-stable/rancher`
    pub chart: String,
    /// Fetch the chart from this repository instead of a registered one
    pub repo_url: Option<String>,
    /// Overrides the client's namespace
    pub namespace: Option<String>,
    pub version: Option<String>,
    pub wait: bool,
    pub create_namespace: bool,
    pub timeout: Option<Duration>,
    pub values: Values,
}

impl InstallOptions {
    pub fn new(release_name: &str, chart: &str) -> Self {
        Self {
            release_name: release_name.to_string(),
            chart: chart.to_string(),
            ..Default::default()
        }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// An empty version installs the latest chart
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string()).filter(|v| !v.is_empty());
        self
    }

    pub fn repo_url(mut self, repo_url: &str) -> Self {
        self.repo_url = Some(repo_url.to_string());
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn create_namespace(mut self, create_namespace: bool) -> Self {
        self.create_namespace = create_namespace;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn values(mut self, values: Values) -> Self {
        self.values = values;
        self
    }
}

/// Label selector matching the Secrets helm stores a release's revisions in
pub fn release_secret_selector(release_name: &str) -> String {
    format!(
        "{}={},{}={}",
        OWNER_LABEL, OWNER_VALUE, NAME_LABEL, release_name
    )
}

/// Runs helm against the cluster described by a kubeconfig. When created with a
/// session, every installed release is uninstalled on session cleanup.
#[derive(Clone)]
pub struct HelmClient {
    executor: Arc<dyn HelmExecutor>,
    kubeconfig: Arc<NamedTempFile>,
    kube_context: String,
    namespace: String,
    session: Option<Session>,
}

impl HelmClient {
    pub fn new(session: Option<&Session>, settings: HelmSettings) -> Result<Self> {
        let executor = Arc::new(HelmCli::new(settings.binary.clone()));
        Self::with_executor(session, settings, executor)
    }

    pub fn with_executor(
        session: Option<&Session>,
        settings: HelmSettings,
        executor: Arc<dyn HelmExecutor>,
    ) -> Result<Self> {
        let mut kubeconfig = NamedTempFile::new()?;
        kubeconfig.write_all(&settings.kubeconfig)?;
        kubeconfig.flush()?;

        Ok(Self {
            executor,
            kubeconfig: Arc::new(kubeconfig),
            kube_context: settings.kube_context,
            namespace: settings.namespace,
            session: session.cloned(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn run(&self, mut args: Vec<String>, stdin: Option<Vec<u8>>) -> Result<Vec<u8>> {
        args.push("--kubeconfig".to_string());
        args.push(self.kubeconfig.path().to_string_lossy().to_string());
        if !self.kube_context.is_empty() {
            args.push("--kube-context".to_string());
            args.push(self.kube_context.clone());
        }
        self.executor.execute(args, stdin).await
    }

    /// Register a chart repository, refreshing its index
    #[instrument(skip(self))]
    pub async fn add_or_update_repo(&self, name: &str, url: &str, force_update: bool) -> Result<()> {
        Url::parse(url)?;

        let mut args = vec![
            "repo".to_string(),
            "add".to_string(),
            name.to_string(),
            url.to_string(),
        ];
        if force_update {
            args.push("--force-update".to_string());
        }
        self.run(args, None).await?;

        self.run(
            vec!["repo".to_string(), "update".to_string(), name.to_string()],
            None,
        )
        .await?;

        info!("Helm repository {} ({}) is up to date", name, url);
        Ok(())
    }

    /// `helm install`
    #[instrument(skip(self, options), fields(release = %options.release_name, chart = %options.chart))]
    pub async fn install_chart(&self, options: InstallOptions) -> Result<Release> {
        self.deploy("install", options).await
    }

    /// `helm upgrade --install`
    #[instrument(skip(self, options), fields(release = %options.release_name, chart = %options.chart))]
    pub async fn upgrade_chart(&self, options: InstallOptions) -> Result<Release> {
        self.deploy("upgrade", options).await
    }

    async fn deploy(&self, verb: &str, options: InstallOptions) -> Result<Release> {
        let namespace = options
            .namespace
            .clone()
            .unwrap_or_else(|| self.namespace.clone());

        let mut args = vec![
            verb.to_string(),
            options.release_name.clone(),
            options.chart.clone(),
        ];
        if verb == "upgrade" {
            args.push("--install".to_string());
        }
        args.push("--namespace".to_string());
        args.push(namespace.clone());
        if let Some(version) = &options.version {
            args.push("--version".to_string());
            args.push(version.clone());
        }
        if let Some(repo_url) = &options.repo_url {
            args.push("--repo".to_string());
            args.push(repo_url.clone());
        }
        if options.wait {
            args.push("--wait".to_string());
        }
        if options.create_namespace {
            args.push("--create-namespace".to_string());
        }
        if let Some(timeout) = options.timeout {
            args.push("--timeout".to_string());
            args.push(format!("{}s", timeout.as_secs()));
        }
        args.extend(["--values", "-", "--output", "json"].map(String::from));

        let values = serde_json::to_vec(&options.values)?;
        let stdout = self.run(args, Some(values)).await?;
        let release: Release = serde_json::from_slice(&stdout)?;

        info!(
            "Release {}/{} is {} at revision {}",
            release.namespace, release.name, release.info.status, release.revision
        );

        if let Some(session) = &self.session {
            let client = Self {
                session: None,
                ..self.clone()
            };
            let release_name = release.name.clone();
            session.register_cleanup(move || async move {
                client.uninstall_release_in(&release_name, &namespace).await
            });
        }

        Ok(release)
    }

    /// `helm uninstall` in the client's namespace
    pub async fn uninstall_release(&self, release_name: &str) -> Result<()> {
        self.uninstall_release_in(release_name, &self.namespace).await
    }

    #[instrument(skip(self))]
    async fn uninstall_release_in(&self, release_name: &str, namespace: &str) -> Result<()> {
        self.run(
            vec![
                "uninstall".to_string(),
                release_name.to_string(),
                "--namespace".to_string(),
                namespace.to_string(),
                "--wait".to_string(),
            ],
            None,
        )
        .await?;
        info!("Release {}/{} uninstalled", namespace, release_name);
        Ok(())
    }

    /// `helm status`
    pub async fn get_release(&self, release_name: &str) -> Result<Release> {
        let stdout = self
            .run(
                vec![
                    "status".to_string(),
                    release_name.to_string(),
                    "--namespace".to_string(),
                    self.namespace.clone(),
                    "--output".to_string(),
                    "json".to_string(),
                ],
                None,
            )
            .await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    /// `helm list` in the client's namespace
    pub async fn list_releases(&self) -> Result<Vec<ReleaseSummary>> {
        let stdout = self
            .run(
                vec![
                    "list".to_string(),
                    "--namespace".to_string(),
                    self.namespace.clone(),
                    "--output".to_string(),
                    "json".to_string(),
                ],
                None,
            )
            .await?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}
