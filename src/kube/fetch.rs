//! Resource collection fetching
//!
//! The service map only ever needs one thing from the cluster: the full,
//! all-namespaces list of each of the six resource kinds. `ResourceFetcher`
//! is that capability; `KubeResourceFetcher` provides it over kube-rs and
//! tests substitute deterministic fixtures.

use crate::models::ResourceKind;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::Api;
use kube::api::ListParams;
use serde_json::Value;

/// Status used when the API server could not be reached at all
const TRANSPORT_FAILURE_STATUS: u16 = 502;

/// A failed collection fetch, tagged with the kind being listed
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Kubernetes API error: {reason} - {body}")]
    Api {
        kind: ResourceKind,
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Failed to encode {kind} list: {source}")]
    Decode {
        kind: ResourceKind,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Kind whose list operation failed
    pub fn kind(&self) -> ResourceKind {
        match self {
            FetchError::Api { kind, .. } | FetchError::Decode { kind, .. } => *kind,
        }
    }

    /// Upstream status code, if the failure came from the API server side
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Api { status, .. } => Some(*status),
            FetchError::Decode { .. } => None,
        }
    }

    /// Convert a kube-rs error into a fetch error for `kind`
    ///
    /// API server rejections keep their status, reason and message. Anything
    /// below HTTP (connect, TLS, timeouts) has no upstream status and is reported
    /// as a bad gateway.
    pub fn from_kube(kind: ResourceKind, err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => FetchError::Api {
                kind,
                status: response.code,
                reason: response.reason.clone(),
                body: response.message.clone(),
            },
            other => FetchError::Api {
                kind,
                status: TRANSPORT_FAILURE_STATUS,
                reason: "Bad Gateway".to_string(),
                body: other.to_string(),
            },
        }
    }
}

/// Lists every instance of a resource kind across all namespaces
///
/// The returned value is the raw list document, i.e. an object whose `items`
/// field holds the resources as loosely-typed JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn list_all(&self, kind: ResourceKind) -> Result<Value, FetchError>;
}

/// `ResourceFetcher` backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeResourceFetcher {
    client: kube::Client,
}

impl KubeResourceFetcher {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for KubeResourceFetcher {
    async fn list_all(&self, kind: ResourceKind) -> Result<Value, FetchError> {
        let client = &self.client;
        let params = ListParams::default();

        // Full objects, re-encoded to their wire JSON
        macro_rules! list_objects {
            ($type:ty) => {{
                let api: Api<$type> = Api::all(client.clone());
                let list = api
                    .list(&params)
                    .await
                    .map_err(|e| FetchError::from_kube(kind, e))?;
                serde_json::to_value(&list).map_err(|source| FetchError::Decode { kind, source })
            }};
        }

        // Metadata only; payloads (notably secret data) never leave the API server
        macro_rules! list_metadata {
            ($type:ty) => {{
                let api: Api<$type> = Api::all(client.clone());
                let list = api
                    .list_metadata(&params)
                    .await
                    .map_err(|e| FetchError::from_kube(kind, e))?;
                serde_json::to_value(&list).map_err(|source| FetchError::Decode { kind, source })
            }};
        }

        tracing::debug!("Listing {} resources in all namespaces", kind);
        match kind {
            ResourceKind::Service => list_objects!(Service),
            ResourceKind::Pod => list_objects!(Pod),
            ResourceKind::Deployment => list_objects!(Deployment),
            ResourceKind::Ingress => list_objects!(Ingress),
            ResourceKind::ConfigMap => list_metadata!(ConfigMap),
            ResourceKind::Secret => list_metadata!(Secret),
        }
    }
}
