// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::controllers::core::v1::NamespaceClient;
use crate::error::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ObjectMeta, Client};
use tracing::{info, instrument};

/// Create a namespace. An already existing namespace is reported as an error.
#[instrument(skip(client))]
pub async fn create_namespace(client: &Client, name: &str) -> Result<Namespace> {
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let created = NamespaceClient::cluster(client.clone()).create(&ns).await?;
    info!("Namespace {} created successfully", name);
    Ok(created)
}
