// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helm chart repositories and releases, driven through the helm binary.

pub mod client;
pub mod executor;
pub mod release;
pub mod values;

pub use client::{release_secret_selector, HelmClient, HelmSettings, InstallOptions};
pub use executor::{HelmCli, HelmExecutor};
pub use release::{Release, ReleaseStatus, ReleaseSummary};
pub use values::{merge_values, Values};
