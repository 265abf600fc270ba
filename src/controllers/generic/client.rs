// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed API access for one resource kind

use crate::controllers::generic::Object;
use crate::error::Result;
use futures::Stream;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::{
    api::{DeleteParams, ListParams, ObjectList, Patch, PatchParams, PostParams},
    Api, Resource, ResourceExt,
};
use kube_runtime::watcher;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, instrument};

type ApiFor<K> = fn(kube::Client, &str) -> Api<K>;

fn namespaced_api<K>(client: kube::Client, namespace: &str) -> Api<K>
where
    K: Object + Resource<Scope = NamespaceResourceScope>,
{
    if namespace.is_empty() {
        Api::all(client)
    } else {
        Api::namespaced(client, namespace)
    }
}

fn cluster_api<K>(client: kube::Client, _namespace: &str) -> Api<K>
where
    K: Object + Resource<Scope = ClusterResourceScope>,
{
    Api::all(client)
}

/// Create/read/update/delete/watch for one kind. Operations take a namespace;
/// the empty namespace means all namespaces, and cluster-scoped kinds ignore it.
pub struct Client<K: Object> {
    client: kube::Client,
    api_for: ApiFor<K>,
}

impl<K: Object> Clone for Client<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_for: self.api_for,
        }
    }
}

impl<K: Object + Resource<Scope = NamespaceResourceScope>> Client<K> {
    pub fn namespaced(client: kube::Client) -> Self {
        Self {
            client,
            api_for: namespaced_api::<K>,
        }
    }
}

impl<K: Object + Resource<Scope = ClusterResourceScope>> Client<K> {
    pub fn cluster(client: kube::Client) -> Self {
        Self {
            client,
            api_for: cluster_api::<K>,
        }
    }
}

impl<K: Object> Client<K> {
    pub fn api(&self, namespace: &str) -> Api<K> {
        (self.api_for)(self.client.clone(), namespace)
    }

    pub fn kube_client(&self) -> &kube::Client {
        &self.client
    }

    #[instrument(skip(self, obj), fields(kind = %K::kind(&()), name = %obj.name_any()))]
    pub async fn create(&self, obj: &K) -> Result<K> {
        let namespace = obj.namespace().unwrap_or_default();
        let created = self
            .api(&namespace)
            .create(&PostParams::default(), obj)
            .await?;
        debug!("Created {} {}", K::kind(&()), created.name_any());
        Ok(created)
    }

    /// Replace the object; its resourceVersion guards against lost updates
    #[instrument(skip(self, obj), fields(kind = %K::kind(&()), name = %obj.name_any()))]
    pub async fn update(&self, obj: &K) -> Result<K> {
        let namespace = obj.namespace().unwrap_or_default();
        Ok(self
            .api(&namespace)
            .replace(&obj.name_any(), &PostParams::default(), obj)
            .await?)
    }

    /// Write only the status subresource of the object
    #[instrument(skip(self, obj), fields(kind = %K::kind(&()), name = %obj.name_any()))]
    pub async fn update_status(&self, obj: &K) -> Result<K> {
        let namespace = obj.namespace().unwrap_or_default();
        let status = serde_json::to_value(obj)?
            .get("status")
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        Ok(self
            .api(&namespace)
            .patch_status(
                &obj.name_any(),
                &PatchParams::default(),
                &Patch::Merge(serde_json::json!({ "status": status })),
            )
            .await?)
    }

    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        debug!("Deleted {} {}", K::kind(&()), name);
        Ok(())
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Result<K> {
        Ok(self.api(namespace).get(name).await?)
    }

    pub async fn list(&self, namespace: &str, params: &ListParams) -> Result<ObjectList<K>> {
        Ok(self.api(namespace).list(params).await?)
    }

    pub fn watch(
        &self,
        namespace: &str,
        config: watcher::Config,
    ) -> impl Stream<Item = watcher::Result<watcher::Event<K>>> + Send {
        watcher(self.api(namespace), config)
    }

    pub async fn patch<P: Serialize + Debug>(
        &self,
        namespace: &str,
        name: &str,
        params: &PatchParams,
        patch: &Patch<P>,
    ) -> Result<K> {
        Ok(self.api(namespace).patch(name, params, patch).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{list_json, namespace_json, not_found_json, secret_value, MockService};
    use k8s_openapi::api::core::v1::{Namespace, Secret};
    use kube::api::ObjectMeta;
    use serde_json::json;

    fn secret(namespace: &str, name: &str) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_uses_object_namespace() {
        let body = secret_value("cattle-system", "tls-ca", json!({})).to_string();
        let mock = MockService::new().on_post("/api/v1/namespaces/cattle-system/secrets", 201, &body);
        let client: Client<Secret> = Client::namespaced(mock.clone().into_client());

        let created = client.create(&secret("cattle-system", "tls-ca")).await.unwrap();

        assert_eq!(created.name_any(), "tls-ca");
        assert_eq!(mock.requests()[0].0, "POST");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/default/secrets/missing",
            404,
            &not_found_json("secrets", "missing"),
        );
        let client: Client<Secret> = Client::namespaced(mock.into_client());

        let err = client.get("default", "missing").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_all_namespaces_with_selector() {
        let body = list_json(
            "SecretList",
            vec![secret_value("cattle-system", "sh.helm.release.v1.rancher.v1", json!({"owner": "helm"}))],
        );
        let mock = MockService::new().on_get("/api/v1/secrets", 200, &body);
        let client: Client<Secret> = Client::namespaced(mock.clone().into_client());

        let list = client
            .list("", &ListParams::default().labels("owner=helm"))
            .await
            .unwrap();

        assert_eq!(list.items.len(), 1);
        let (_, path, _) = &mock.requests()[0];
        assert!(path.starts_with("/api/v1/secrets?"));
        assert!(path.contains("labelSelector=owner%3Dhelm"));
    }

    #[tokio::test]
    async fn test_cluster_scoped_ignores_namespace() {
        let mock = MockService::new().on_get("/api/v1/namespaces/cattle-system", 200, &namespace_json("cattle-system"));
        let client: Client<Namespace> = Client::cluster(mock.clone().into_client());

        let ns = client.get("ignored", "cattle-system").await.unwrap();

        assert_eq!(ns.name_any(), "cattle-system");
        assert_eq!(mock.requests()[0].1, "/api/v1/namespaces/cattle-system");
    }

    #[tokio::test]
    async fn test_update_replaces_by_name() {
        let body = secret_value("default", "creds", json!({})).to_string();
        let mock = MockService::new().on_put("/api/v1/namespaces/default/secrets/creds", 200, &body);
        let client: Client<Secret> = Client::namespaced(mock.clone().into_client());

        client.update(&secret("default", "creds")).await.unwrap();

        assert_eq!(mock.requests()[0].0, "PUT");
    }

    #[tokio::test]
    async fn test_update_status_sends_only_status() {
        let body = namespace_json("cattle-system");
        let mock = MockService::new().on_patch("/api/v1/namespaces/cattle-system/status", 200, &body);
        let client: Client<Namespace> = Client::cluster(mock.clone().into_client());

        let ns: Namespace = serde_json::from_value(json!({
            "metadata": {"name": "cattle-system", "labels": {"a": "b"}},
            "status": {"phase": "Terminating"}
        }))
        .unwrap();
        client.update_status(&ns).await.unwrap();

        let (method, _, body) = &mock.requests()[0];
        assert_eq!(method, "PATCH");
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent, json!({"status": {"phase": "Terminating"}}));
    }

    #[tokio::test]
    async fn test_delete() {
        let body = secret_value("default", "creds", json!({})).to_string();
        let mock = MockService::new().on_delete("/api/v1/namespaces/default/secrets/creds", 200, &body);
        let client: Client<Secret> = Client::namespaced(mock.clone().into_client());

        client.delete("default", "creds").await.unwrap();

        assert_eq!(mock.requests()[0].0, "DELETE");
    }

    #[tokio::test]
    async fn test_patch_sends_merge_patch() {
        let body = secret_value("default", "creds", json!({"rotated": "true"})).to_string();
        let mock = MockService::new().on_patch("/api/v1/namespaces/default/secrets/creds", 200, &body);
        let client: Client<Secret> = Client::namespaced(mock.clone().into_client());

        let patched = client
            .patch(
                "default",
                "creds",
                &PatchParams::default(),
                &Patch::Merge(json!({"metadata": {"labels": {"rotated": "true"}}})),
            )
            .await
            .unwrap();

        assert_eq!(patched.labels().get("rotated").map(String::as_str), Some("true"));
        let (method, _, body) = &mock.requests()[0];
        assert_eq!(method, "PATCH");
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent, json!({"metadata": {"labels": {"rotated": "true"}}}));
    }

    #[tokio::test]
    async fn test_watch_lists_namespace_first() {
        use futures::StreamExt;

        let body = list_json("SecretList", vec![secret_value("cattle-system", "tls-ca", json!({}))]);
        let mock = MockService::new().on_get("/api/v1/namespaces/cattle-system/secrets", 200, &body);
        let client: Client<Secret> = Client::namespaced(mock.clone().into_client());

        let events: Vec<_> = client
            .watch("cattle-system", watcher::Config::default())
            .take(3)
            .collect()
            .await;

        assert!(matches!(events[0], Ok(watcher::Event::Init)));
        match &events[1] {
            Ok(watcher::Event::InitApply(secret)) => assert_eq!(secret.name_any(), "tls-ca"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(events[2], Ok(watcher::Event::InitDone)));
        assert!(mock.requests()[0].1.starts_with("/api/v1/namespaces/cattle-system/secrets?"));
    }
}
