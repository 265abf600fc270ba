// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types that k8s-openapi does not provide.

pub mod cluster;

pub use cluster::{Cluster, ClusterSpec, ClusterStatus, Condition};
