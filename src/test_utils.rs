// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and helm invocations.

use crate::error::{Result as ShepherdResult, ShepherdError};
use crate::helm::HelmExecutor;
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request seen by [`MockService`]: method, path with query, body
pub type RecordedRequest = (String, String, String);

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Longest prefix wins for paths like /api/v1/namespaces/foo
        responses
            .iter()
            .filter(|((m, p), _)| m == method && path.starts_with(p.as_str()))
            .max_by_key(|((_, p), _)| p.len())
            .map(|(_, resp)| resp.clone())
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| path.clone());

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push((
                method,
                path_and_query,
                String::from_utf8_lossy(&body).to_string(),
            ));

            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (
                    404,
                    r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#
                        .to_string(),
                )
            });

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a mock secret JSON value
pub fn secret_value(namespace: &str, name: &str, labels: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "labels": labels,
            "resourceVersion": "1"
        },
        "type": "Opaque"
    })
}

/// Wrap items in a list response
pub fn list_json(kind: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": kind,
        "metadata": { "resourceVersion": "10" },
        "items": items
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 already exists response
pub fn already_exists_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" already exists", resource, name),
        "reason": "AlreadyExists",
        "code": 409
    })
    .to_string()
}

/// Helm executor fake: records every invocation and answers from a queue of
/// canned outputs. An empty queue answers with empty output.
#[derive(Clone, Default)]
pub struct FakeHelm {
    calls: Arc<Mutex<Vec<(Vec<String>, Option<Vec<u8>>)>>>,
    outputs: Arc<Mutex<VecDeque<ShepherdResult<Vec<u8>>>>>,
}

impl FakeHelm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, stdout: &str) -> Self {
        self.outputs
            .lock()
            .unwrap()
            .push_back(Ok(stdout.as_bytes().to_vec()));
        self
    }

    pub fn fail(self, code: i32, stderr: &str) -> Self {
        self.outputs
            .lock()
            .unwrap()
            .push_back(Err(ShepherdError::HelmCommand {
                command: "helm".to_string(),
                code: Some(code),
                stderr: stderr.to_string(),
            }));
        self
    }

    /// Arguments of every call, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(args, _)| args.clone())
            .collect()
    }

    /// Stdin of every call, in order
    pub fn stdins(&self) -> Vec<Option<Vec<u8>>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, stdin)| stdin.clone())
            .collect()
    }
}

#[async_trait]
impl HelmExecutor for FakeHelm {
    async fn execute(&self, args: Vec<String>, stdin: Option<Vec<u8>>) -> ShepherdResult<Vec<u8>> {
        self.calls.lock().unwrap().push((args, stdin));
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Helm's JSON description of a deployed release
pub fn release_json(name: &str, namespace: &str, chart: &str, version: &str) -> String {
    serde_json::json!({
        "name": name,
        "namespace": namespace,
        "version": 1,
        "info": {
            "first_deployed": "2026-10-18T10:00:00.000000000Z",
            "last_deployed": "2026-10-18T10:00:00.000000000Z",
            "deleted": "",
            "description": "Install complete",
            "status": "deployed",
            "notes": "Thanks for installing"
        },
        "chart": {
            "metadata": {
                "name": chart,
                "version": version,
                "appVersion": version,
                "apiVersion": "v2"
            }
        },
        "config": {}
    })
    .to_string()
}
