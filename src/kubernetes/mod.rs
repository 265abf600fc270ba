// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery, kubeconfig handling, and namespace management.

pub mod crd;
pub mod kubeconfig;
pub mod namespaces;

pub use crd::wait_for_crd;
pub use kubeconfig::{client_from_kubeconfig, generate_kubeconfig};
pub use namespaces::create_namespace;
