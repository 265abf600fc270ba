// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Accessors for the core/v1 kinds used by the test suites.

pub mod configmap;
pub mod namespace;
pub mod pod;
pub mod secret;
pub mod service;
pub mod serviceaccount;

pub use configmap::{ConfigMapCache, ConfigMapClient, ConfigMapController};
pub use namespace::{NamespaceCache, NamespaceClient, NamespaceController};
pub use pod::{PodCache, PodClient, PodController};
pub use secret::{SecretCache, SecretClient, SecretController};
pub use service::{ServiceCache, ServiceClient, ServiceController};
pub use serviceaccount::{ServiceAccountCache, ServiceAccountClient, ServiceAccountController};

use crate::controllers::generic::{Client, Controller};

/// Hands out a controller per core/v1 kind, all sharing one API client
#[derive(Clone)]
pub struct CoreV1 {
    client: kube::Client,
}

impl CoreV1 {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    pub fn config_map(&self) -> ConfigMapController {
        Controller::new(Client::namespaced(self.client.clone()))
    }

    pub fn namespace(&self) -> NamespaceController {
        Controller::new(Client::cluster(self.client.clone()))
    }

    pub fn pod(&self) -> PodController {
        Controller::new(Client::namespaced(self.client.clone()))
    }

    pub fn secret(&self) -> SecretController {
        Controller::new(Client::namespaced(self.client.clone()))
    }

    pub fn service(&self) -> ServiceController {
        Controller::new(Client::namespaced(self.client.clone()))
    }

    pub fn service_account(&self) -> ServiceAccountController {
        Controller::new(Client::namespaced(self.client.clone()))
    }
}
