// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubeconfig rendering for a client configuration, and client creation from kubeconfig text

use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde_json::json;
use tracing::{debug, instrument};

/// Render a kubeconfig document that reaches the same API server, with the same
/// credentials, as `config`. The single cluster, context and user are named by
/// the given arguments and the context becomes the current one.
#[instrument(skip(config), fields(server = %config.cluster_url))]
pub fn generate_kubeconfig(
    config: &Config,
    cluster_name: &str,
    context_name: &str,
    user_name: &str,
) -> Result<Vec<u8>> {
    let server = config.cluster_url.to_string();
    let server = server.trim_end_matches('/');

    let mut cluster = json!({ "server": server });
    if let Some(certs) = config.root_cert.as_ref().filter(|c| !c.is_empty()) {
        let bundle: String = certs.iter().map(|der| der_to_pem(der)).collect();
        cluster["certificate-authority-data"] = json!(STANDARD.encode(bundle));
    }
    if config.accept_invalid_certs {
        cluster["insecure-skip-tls-verify"] = json!(true);
    }
    if let Some(tls_server_name) = &config.tls_server_name {
        cluster["tls-server-name"] = json!(tls_server_name);
    }
    if let Some(proxy_url) = &config.proxy_url {
        cluster["proxy-url"] = json!(proxy_url.to_string());
    }

    let user = serde_json::to_value(&config.auth_info)?;

    let document = json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{ "name": cluster_name, "cluster": cluster }],
        "users": [{ "name": user_name, "user": user }],
        "contexts": [{
            "name": context_name,
            "context": {
                "cluster": cluster_name,
                "user": user_name,
                "namespace": config.default_namespace,
            }
        }],
        "current-context": context_name,
    });

    debug!("Generated kubeconfig for context {}", context_name);
    Ok(serde_yaml::to_string(&document)?.into_bytes())
}

fn der_to_pem(der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
    for line in encoded.as_bytes().chunks(64) {
        // base64 output is always ASCII
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem
}

/// Create a Kubernetes client from a kubeconfig string
pub async fn client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed = Kubeconfig::from_yaml(kubeconfig)?;

    let client_config =
        Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default()).await?;

    Ok(Client::try_from(client_config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> Config {
        let mut config = Config::new("https://10.0.0.1:6443".parse().unwrap());
        config.default_namespace = "cattle-system".to_string();
        config
    }

    fn parse(bytes: &[u8]) -> serde_yaml::Value {
        serde_yaml::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_generate_kubeconfig_names_entries() {
        let kubeconfig = generate_kubeconfig(&make_config(), "local", "local-ctx", "admin").unwrap();
        let doc = parse(&kubeconfig);

        assert_eq!(doc["current-context"].as_str(), Some("local-ctx"));
        assert_eq!(doc["clusters"][0]["name"].as_str(), Some("local"));
        assert_eq!(doc["users"][0]["name"].as_str(), Some("admin"));
        assert_eq!(doc["contexts"][0]["context"]["cluster"].as_str(), Some("local"));
        assert_eq!(doc["contexts"][0]["context"]["user"].as_str(), Some("admin"));
        assert_eq!(
            doc["contexts"][0]["context"]["namespace"].as_str(),
            Some("cattle-system")
        );
    }

    #[test]
    fn test_generate_kubeconfig_server_without_trailing_slash() {
        let kubeconfig = generate_kubeconfig(&make_config(), "local", "local", "local").unwrap();
        let doc = parse(&kubeconfig);

        assert_eq!(
            doc["clusters"][0]["cluster"]["server"].as_str(),
            Some("https://10.0.0.1:6443")
        );
    }

    #[test]
    fn test_generate_kubeconfig_tls_settings() {
        let mut config = make_config();
        config.accept_invalid_certs = true;
        config.tls_server_name = Some("kubernetes.default".to_string());
        config.root_cert = Some(vec![vec![1, 2, 3, 4]]);

        let doc = parse(&generate_kubeconfig(&config, "local", "local", "local").unwrap());
        let cluster = &doc["clusters"][0]["cluster"];

        assert_eq!(cluster["insecure-skip-tls-verify"].as_bool(), Some(true));
        assert_eq!(cluster["tls-server-name"].as_str(), Some("kubernetes.default"));

        let ca = STANDARD
            .decode(cluster["certificate-authority-data"].as_str().unwrap())
            .unwrap();
        let pem = String::from_utf8(ca).unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\nAQIDBA==\n"));
        assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
    }

    #[test]
    fn test_generate_kubeconfig_omits_unset_tls_fields() {
        let doc = parse(&generate_kubeconfig(&make_config(), "local", "local", "local").unwrap());
        let cluster = &doc["clusters"][0]["cluster"];

        assert!(cluster.get("certificate-authority-data").is_none());
        assert!(cluster.get("insecure-skip-tls-verify").is_none());
        assert!(cluster.get("proxy-url").is_none());
    }

    #[test]
    fn test_der_to_pem_wraps_lines() {
        let pem = der_to_pem(&[0u8; 96]);
        let body: Vec<&str> = pem.lines().collect();

        // 96 bytes encode to 128 base64 characters, two full lines
        assert_eq!(body.len(), 4);
        assert_eq!(body[1].len(), 64);
        assert_eq!(body[2].len(), 64);
    }

    #[tokio::test]
    async fn test_generated_kubeconfig_loads_back() {
        let kubeconfig = generate_kubeconfig(&make_config(), "local", "local", "local").unwrap();
        let parsed = Kubeconfig::from_yaml(std::str::from_utf8(&kubeconfig).unwrap()).unwrap();

        let loaded = Config::from_custom_kubeconfig(parsed, &KubeConfigOptions::default())
            .await
            .unwrap();

        assert_eq!(loaded.cluster_url.host(), Some("10.0.0.1"));
        assert_eq!(loaded.cluster_url.port_u16(), Some(6443));
        assert_eq!(loaded.default_namespace, "cattle-system");
    }

    #[tokio::test]
    async fn test_client_from_invalid_kubeconfig() {
        assert!(client_from_kubeconfig("not: [valid").await.is_err());
    }

    #[tokio::test]
    async fn test_client_from_kubeconfig_without_context() {
        let kubeconfig = "apiVersion: v1\nkind: Config\nclusters: []\ncontexts: []\nusers: []\ncurrent-context: missing\n";

        let err = client_from_kubeconfig(kubeconfig).await.err().unwrap();

        assert!(matches!(err, crate::error::ShepherdError::KubeconfigLoadError(_)));
    }
}
