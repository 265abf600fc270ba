// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShepherdError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigLoadError(#[from] kube::config::KubeconfigError),

    #[error("helm command `{command}` failed with exit code {code:?}: {stderr}")]
    HelmCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{kind} \"{name}\" not found in namespace \"{namespace}\"")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("Invalid label selector: {0}")]
    InvalidSelector(String),

    #[error("Unknown cache index: {0}")]
    UnknownIndex(String),

    #[error("Cache is not synced: {0}")]
    CacheNotSynced(#[from] kube::runtime::reflector::store::WriterDropped),

    #[error("Unknown Rancher channel: {0}")]
    InvalidChannel(String),

    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),

    #[error("Invalid repository URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ShepherdError {
    /// True when the API server answered 404 or a cache lookup missed
    pub fn is_not_found(&self) -> bool {
        match self {
            ShepherdError::NotFound { .. } => true,
            ShepherdError::KubeError(kube::Error::Api(resp)) => resp.code == 404,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShepherdError>;
