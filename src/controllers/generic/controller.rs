// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watch loop that keeps a cache current and runs handlers on changes

use crate::controllers::generic::{Cache, Client, Object};
use crate::error::Result;
use futures::StreamExt;
use kube::core::GroupVersionKind;
use kube::runtime::reflector::store::Writer;
use kube::runtime::WatchStreamExt;
use kube::{Resource, ResourceExt};
use kube_runtime::watcher;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Receives the object key (`namespace/name` or `name`) and the object
pub type Handler<K> = Arc<dyn Fn(&str, &K) -> Result<()> + Send + Sync>;

struct Handlers<K> {
    on_change: Vec<(String, Handler<K>)>,
    on_remove: Vec<(String, Handler<K>)>,
}

pub struct Controller<K: Object> {
    client: Client<K>,
    cache: Cache<K>,
    writer: Arc<Mutex<Writer<K>>>,
    handlers: Arc<RwLock<Handlers<K>>>,
    /// Objects of a listing in progress, dispatched once the listing completes
    listing: Arc<Mutex<Vec<K>>>,
    watcher_config: watcher::Config,
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the watch loop ends or is dropped
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<K: Object> Clone for Controller<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            cache: self.cache.clone(),
            writer: self.writer.clone(),
            handlers: self.handlers.clone(),
            listing: self.listing.clone(),
            watcher_config: self.watcher_config.clone(),
            running: self.running.clone(),
        }
    }
}

fn object_key<K: Object>(obj: &K) -> String {
    match obj.namespace() {
        Some(ns) if !ns.is_empty() => format!("{}/{}", ns, obj.name_any()),
        _ => obj.name_any(),
    }
}

impl<K: Object> Controller<K> {
    pub fn new(client: Client<K>) -> Self {
        let writer: Writer<K> = Writer::default();
        let cache = Cache::new(writer.as_reader());

        Self {
            client,
            cache,
            writer: Arc::new(Mutex::new(writer)),
            handlers: Arc::new(RwLock::new(Handlers {
                on_change: Vec::new(),
                on_remove: Vec::new(),
            })),
            listing: Arc::new(Mutex::new(Vec::new())),
            watcher_config: watcher::Config::default(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Restrict the watch, e.g. with a label selector
    pub fn with_watcher_config(mut self, config: watcher::Config) -> Self {
        self.watcher_config = config;
        self
    }

    pub fn client(&self) -> &Client<K> {
        &self.client
    }

    pub fn cache(&self) -> Cache<K> {
        self.cache.clone()
    }

    pub fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(&K::group(&()), &K::version(&()), &K::kind(&()))
    }

    /// Run `handler` for every created or updated object
    pub fn on_change<F>(&self, name: &str, handler: F)
    where
        F: Fn(&str, &K) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .on_change
            .push((name.to_string(), Arc::new(handler)));
    }

    /// Run `handler` for every deleted object
    pub fn on_remove<F>(&self, name: &str, handler: F)
    where
        F: Fn(&str, &K) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .on_remove
            .push((name.to_string(), Arc::new(handler)));
    }

    /// Run the change handlers again for a cached object
    pub fn enqueue(&self, namespace: &str, name: &str) -> Result<()> {
        let obj = self.cache.get(namespace, name)?;
        self.dispatch(&obj, false);
        Ok(())
    }

    /// Watch all namespaces until the watch stream ends. Only one watch loop per
    /// controller (and its clones) may run at a time.
    pub async fn run(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Controller for {} is already running", K::kind(&()));
            return Ok(());
        }
        let _running = RunningGuard(self.running.clone());

        info!("Starting controller for {}", K::kind(&()));
        let stream = self
            .client
            .watch("", self.watcher_config.clone())
            .default_backoff();
        futures::pin_mut!(stream);

        while let Some(event) = stream.next().await {
            match event {
                Ok(event) => self.process_event(&event),
                Err(e) => warn!("Recoverable error watching {}: {}", K::kind(&()), e),
            }
        }

        Ok(())
    }

    /// Apply a watch event to the cache, then run the matching handlers.
    /// Objects of a (re)listing are dispatched once the listing is complete and
    /// in the cache; objects missing from the new listing count as removed.
    pub(crate) fn process_event(&self, event: &watcher::Event<K>) {
        let before_listing = match event {
            watcher::Event::InitDone => Some(self.cache.snapshot()),
            _ => None,
        };

        self.writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .apply_watcher_event(event);

        match event {
            watcher::Event::Apply(obj) => self.dispatch(obj, false),
            watcher::Event::Delete(obj) => self.dispatch(obj, true),
            watcher::Event::Init => {
                debug!("Relisting {}", K::kind(&()));
                self.listing.lock().unwrap_or_else(|e| e.into_inner()).clear();
            }
            watcher::Event::InitApply(obj) => {
                self.listing
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(obj.clone());
            }
            watcher::Event::InitDone => {
                let listed =
                    std::mem::take(&mut *self.listing.lock().unwrap_or_else(|e| e.into_inner()));
                debug!("Cache for {} is synced with {} objects", K::kind(&()), listed.len());

                let present: HashSet<String> = listed.iter().map(object_key).collect();
                for obj in &listed {
                    self.dispatch(obj, false);
                }
                for obj in before_listing.unwrap_or_default() {
                    if !present.contains(&object_key(obj.as_ref())) {
                        self.dispatch(&obj, true);
                    }
                }
            }
        }
    }

    fn dispatch(&self, obj: &K, removed: bool) {
        let key = object_key(obj);
        let handlers: Vec<(String, Handler<K>)> = {
            let guard = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            if removed {
                guard.on_remove.clone()
            } else {
                guard.on_change.clone()
            }
        };

        for (name, handler) in handlers {
            if let Err(e) = handler(&key, obj) {
                warn!("Handler {} failed for {} {}: {}", name, K::kind(&()), key, e);
            }
        }
    }

    /// Wait until the watch loop has loaded the initial listing
    pub async fn wait_for_cache_sync(&self) -> Result<()> {
        self.cache.wait_until_ready().await
    }
}
