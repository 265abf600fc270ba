// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One implementation of Controller, Client and Cache shared by every resource kind.

pub mod cache;
pub mod client;
pub mod controller;
pub mod selector;

pub use cache::Cache;
pub use client::Client;
pub use controller::Controller;
pub use selector::parse_label_selector;

use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A statically typed Kubernetes object
pub trait Object:
    Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug + Send + Sync + 'static
{
}

impl<K> Object for K where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Serialize + Debug + Send + Sync + 'static
{
}

/// Declares the `<Kind>Controller`, `<Kind>Client` and `<Kind>Cache` aliases of a kind
macro_rules! resource_accessors {
    ($kind:ty, $controller:ident, $client:ident, $cache:ident) => {
        #[doc = concat!("Controller for ", stringify!($kind), " resources.")]
        pub type $controller = $crate::controllers::generic::Controller<$kind>;
        #[doc = concat!("Client for ", stringify!($kind), " resources in Kubernetes.")]
        pub type $client = $crate::controllers::generic::Client<$kind>;
        #[doc = concat!("Cache retrieving ", stringify!($kind), " resources in memory.")]
        pub type $cache = $crate::controllers::generic::Cache<$kind>;
    };
}

pub(crate) use resource_accessors;
