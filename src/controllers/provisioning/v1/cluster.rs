// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::controllers::generic::resource_accessors;
use crate::types::cluster::Cluster;

resource_accessors!(Cluster, ClusterController, ClusterClient, ClusterCache);
