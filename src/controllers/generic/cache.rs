// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read access to the in-memory copy of one resource kind

use crate::controllers::generic::selector::parse_label_selector;
use crate::controllers::generic::Object;
use crate::error::{Result, ShepherdError};
use kube::core::SelectorExt;
use kube::runtime::reflector::{ObjectRef, Store};
use kube::{Resource, ResourceExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Computes the index keys of an object
pub type IndexFunc<K> = Arc<dyn Fn(&K) -> Vec<String> + Send + Sync>;

pub struct Cache<K: Object> {
    store: Store<K>,
    indexers: Arc<RwLock<HashMap<String, IndexFunc<K>>>>,
}

impl<K: Object> Clone for Cache<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            indexers: self.indexers.clone(),
        }
    }
}

impl<K: Object> Cache<K> {
    pub fn new(store: Store<K>) -> Self {
        Self {
            store,
            indexers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Look up one object; the empty namespace addresses cluster-scoped objects
    pub fn get(&self, namespace: &str, name: &str) -> Result<Arc<K>> {
        let mut key = ObjectRef::<K>::new(name);
        if !namespace.is_empty() {
            key = key.within(namespace);
        }

        self.store.get(&key).ok_or_else(|| ShepherdError::NotFound {
            kind: K::kind(&()).to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// Objects in `namespace` (all namespaces when empty) whose labels match `selector`,
    /// ordered by namespace and name
    pub fn list(&self, namespace: &str, selector: &str) -> Result<Vec<Arc<K>>> {
        let selector = parse_label_selector(selector)?;
        let no_labels = BTreeMap::new();

        let mut objects: Vec<Arc<K>> = self
            .store
            .state()
            .into_iter()
            .filter(|o| namespace.is_empty() || o.namespace().as_deref() == Some(namespace))
            .filter(|o| selector.matches(o.meta().labels.as_ref().unwrap_or(&no_labels)))
            .collect();
        objects.sort_by_key(|o| (o.namespace(), o.name_any()));
        Ok(objects)
    }

    /// Register a named index. Adding an index under an existing name replaces it.
    pub fn add_indexer<F>(&self, name: &str, indexer: F)
    where
        F: Fn(&K) -> Vec<String> + Send + Sync + 'static,
    {
        self.indexers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), Arc::new(indexer));
    }

    /// Objects whose index `name` produced `key`
    pub fn get_by_index(&self, name: &str, key: &str) -> Result<Vec<Arc<K>>> {
        let indexer = self
            .indexers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| ShepherdError::UnknownIndex(name.to_string()))?;

        let mut objects: Vec<Arc<K>> = self
            .store
            .state()
            .into_iter()
            .filter(|o| indexer(o.as_ref()).iter().any(|k| k == key))
            .collect();
        objects.sort_by_key(|o| (o.namespace(), o.name_any()));
        Ok(objects)
    }

    /// Resolves once the initial listing has been loaded
    pub async fn wait_until_ready(&self) -> Result<()> {
        self.store.wait_until_ready().await?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<K>> {
        self.store.state()
    }
}
