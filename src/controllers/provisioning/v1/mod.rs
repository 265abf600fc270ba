// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Accessors for Rancher's provisioning.cattle.io/v1 kinds.

pub mod cluster;

pub use cluster::{ClusterCache, ClusterClient, ClusterController};

use crate::controllers::generic::{Client, Controller};

#[derive(Clone)]
pub struct ProvisioningV1 {
    client: kube::Client,
}

impl ProvisioningV1 {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    pub fn cluster(&self) -> ClusterController {
        Controller::new(Client::namespaced(self.client.clone()))
    }
}
