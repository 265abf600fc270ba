// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::controllers::generic::resource_accessors;
use k8s_openapi::api::core::v1::ConfigMap;

resource_accessors!(ConfigMap, ConfigMapController, ConfigMapClient, ConfigMapCache);
