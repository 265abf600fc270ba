// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed Controller/Client/Cache accessors per resource kind, grouped by API group and version.

pub mod core;
pub mod generic;
pub mod provisioning;
