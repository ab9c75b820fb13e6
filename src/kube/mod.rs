//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and the cluster-wide
//! resource listings the service map is derived from.

pub mod fetch;

pub use fetch::{FetchError, KubeResourceFetcher, ResourceFetcher};

use anyhow::{Context, Result};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};

/// Initialize and return a Kubernetes client
///
/// Without an explicit context `Config::infer` is used: the local kubeconfig
/// (`KUBECONFIG`, else `~/.kube/config`) with its current context, falling
/// back to the in-cluster service account environment.
///
/// With a context, that kubeconfig context is loaded directly.
pub async fn create_client(context: Option<&str>) -> Result<Client> {
    let config = match context {
        Some(name) => {
            let options = KubeConfigOptions {
                context: Some(name.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig context '{}'", name))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    tracing::info!(
        context = context.unwrap_or("(inferred)"),
        "Using Kubernetes API server at {}",
        config.cluster_url
    );

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}
