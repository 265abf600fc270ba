// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// cert-manager chart coordinates
pub mod cert_manager {
    pub const REPO_NAME: &str = "jetstack";
    pub const REPO_URL: &str = "https://charts.jetstack.io";
    pub const CHART_REF: &str = "jetstack/cert-manager";
    pub const RELEASE_NAME: &str = "cert-manager";
    pub const NAMESPACE: &str = "cert-manager";
}

/// Rancher chart coordinates
pub mod rancher {
    pub const STABLE_REPO_NAME: &str = "rancher-stable";
    pub const STABLE_REPO_URL: &str = "https://releases.rancher.com/server-charts/stable";
    pub const LATEST_REPO_NAME: &str = "rancher-latest";
    pub const LATEST_REPO_URL: &str = "https://releases.rancher.com/server-charts/latest";
    pub const ALPHA_REPO_NAME: &str = "rancher-alpha";
    pub const ALPHA_REPO_URL: &str = "https://releases.rancher.com/server-charts/alpha";
    pub const RELEASE_NAME: &str = "rancher";
    pub const NAMESPACE: &str = "cattle-system";
    /// Name used for the cluster, context and user of generated kubeconfigs
    pub const LOCAL_CLUSTER: &str = "local";
    /// Namespace holding the provisioning Cluster of the local cluster
    pub const LOCAL_CLUSTER_NAMESPACE: &str = "fleet-local";
}

/// Helm release storage labels
pub mod helm {
    pub const OWNER_LABEL: &str = "owner";
    pub const OWNER_VALUE: &str = "helm";
    pub const NAME_LABEL: &str = "name";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
