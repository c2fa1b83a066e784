//! [`IndexClient`] implementation over the official Elasticsearch client.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts};
use serde_json::{Value, json};

use crate::error::{ClientError, ConfigError};

use super::client::IndexClient;
use super::config::{ElasticsearchAuth, ElasticsearchConfig};
use super::mapping::MappingDocument;
use super::settings::IndexSettings;

const BACKEND_NAME: &str = "elasticsearch";

fn transport_error(message: String, source: elasticsearch::Error) -> ClientError {
    ClientError::Transport {
        backend_name: BACKEND_NAME.to_string(),
        message,
        source: Some(Box::new(source)),
    }
}

/// Builds the body of an index creation request.
///
/// The document type identifier is carried in the mapping's `_meta` block;
/// without a mapping only settings are sent.
pub(crate) fn create_index_body(
    type_name: &str,
    settings: &IndexSettings,
    mapping: Option<&MappingDocument>,
) -> Value {
    let mut body = json!({ "settings": settings.to_json() });

    if let Some(mapping) = mapping {
        let mut mappings = mapping.as_json().clone();
        mappings["_meta"] = json!({ "type": type_name });
        body["mappings"] = mappings;
    }

    body
}

/// Elasticsearch cluster client used by the schema installer.
pub struct ElasticsearchClient {
    client: Elasticsearch,
    node: String,
}

impl Debug for ElasticsearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchClient")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchClient {
    /// Builds a client for the first node in `config`.
    ///
    /// This only builds the transport; no request is sent.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, ConfigError> {
        let node = config.nodes.first().cloned().ok_or(ConfigError::NoNodes)?;

        let parsed_url: elasticsearch::http::Url =
            node.parse().map_err(|e| ConfigError::InvalidNode {
                node: node.clone(),
                message: format!("Invalid URL: {}", e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| ConfigError::InvalidNode {
            node: node.clone(),
            message: format!("Failed to build transport: {}", e),
        })?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            node,
        })
    }

    /// The node this client talks to.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Checks that the cluster is reachable and not red.
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self
            .client
            .cluster()
            .health(elasticsearch::cluster::ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| transport_error("Health check failed".to_string(), e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                operation: "cluster health".to_string(),
                index: "_cluster".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = read_json(response, "cluster health", "_cluster").await?;
        let cluster_status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if cluster_status == "red" {
            return Err(ClientError::InvalidResponse {
                operation: "cluster health".to_string(),
                index: "_cluster".to_string(),
                message: format!("Cluster status is red: {:?}", body),
            });
        }

        tracing::debug!(node = %self.node, cluster_status, "Elasticsearch cluster healthy");
        Ok(())
    }
}

async fn read_json(
    response: Response,
    operation: &str,
    index: &str,
) -> Result<Value, ClientError> {
    response
        .json::<Value>()
        .await
        .map_err(|e| ClientError::InvalidResponse {
            operation: operation.to_string(),
            index: index.to_string(),
            message: format!("Failed to parse response: {}", e),
        })
}

fn acknowledged(body: &Value) -> bool {
    body.get("acknowledged")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[async_trait]
impl IndexClient for ElasticsearchClient {
    async fn create_index(
        &self,
        name: &str,
        type_name: &str,
        settings: &IndexSettings,
        mapping: Option<&MappingDocument>,
    ) -> Result<bool, ClientError> {
        let body = create_index_body(type_name, settings, mapping);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(format!("Failed to create index {}", name), e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                operation: "create".to_string(),
                index: name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = read_json(response, "create", name).await?;
        Ok(acknowledged(&body))
    }

    async fn delete_index(&self, name: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| transport_error(format!("Failed to delete index {}", name), e))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 404 || body.contains("index_not_found_exception") {
                return Err(ClientError::IndexNotFound {
                    index: name.to_string(),
                });
            }
            return Err(ClientError::UnexpectedStatus {
                operation: "delete".to_string(),
                index: name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = read_json(response, "delete", name).await?;
        Ok(acknowledged(&body))
    }

    async fn exists_index(&self, name: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| {
                transport_error(format!("Failed to check index existence {}", name), e)
            })?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(ClientError::UnexpectedStatus {
                operation: "exists".to_string(),
                index: name.to_string(),
                status,
                body: String::new(),
            }),
        }
    }
}
