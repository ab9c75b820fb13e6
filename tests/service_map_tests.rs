//! Service map endpoint tests
//!
//! Drive the axum router in-process against a fixture fetcher built from
//! JSON list documents. No Kubernetes cluster is required.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use kube_service_map::server::{self, AppState, HEALTH_PATH, SERVICE_MAP_PATH};
use kube_service_map::{
    Edge, EdgeType, FetchError, FetchMode, ResourceFetcher, ResourceKind, ServiceMap,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Serves canned list documents; kinds without a fixture list as empty
#[derive(Default)]
struct FixtureFetcher {
    lists: HashMap<ResourceKind, Value>,
    failure: Option<(ResourceKind, u16, &'static str)>,
    panic_on: Option<ResourceKind>,
}

impl FixtureFetcher {
    fn with_items(mut self, kind: ResourceKind, items: Vec<Value>) -> Self {
        self.lists.insert(kind, json!({ "items": items }));
        self
    }

    fn with_list(mut self, kind: ResourceKind, list: Value) -> Self {
        self.lists.insert(kind, list);
        self
    }

    fn failing(mut self, kind: ResourceKind, status: u16, reason: &'static str) -> Self {
        self.failure = Some((kind, status, reason));
        self
    }
}

#[async_trait]
impl ResourceFetcher for FixtureFetcher {
    async fn list_all(&self, kind: ResourceKind) -> Result<Value, FetchError> {
        if self.panic_on == Some(kind) {
            panic!("fixture panic listing {}", kind);
        }
        if let Some((failing, status, reason)) = self.failure {
            if failing == kind {
                return Err(FetchError::Api {
                    kind,
                    status,
                    reason: reason.to_string(),
                    body: format!("{} is unavailable", kind),
                });
            }
        }
        Ok(self
            .lists
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| json!({ "items": [] })))
    }
}

fn service(namespace: &str, name: &str, selector: Value) -> Value {
    json!({
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"selector": selector, "ports": [{"port": 80, "targetPort": 8080}]}
    })
}

fn pod(namespace: &str, name: &str, labels: Value) -> Value {
    json!({
        "metadata": {"name": name, "namespace": namespace, "labels": labels},
        "spec": {"containers": [{"name": "app"}]},
        "status": {"phase": "Running"}
    })
}

fn deployment(namespace: &str, name: &str, match_labels: Value) -> Value {
    json!({
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"replicas": 2, "selector": {"matchLabels": match_labels}}
    })
}

fn ingress(namespace: &str, name: &str, service_name: &str) -> Value {
    json!({
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"rules": [{
            "host": "example.test",
            "http": {"paths": [{
                "path": "/",
                "pathType": "Prefix",
                "backend": {"service": {"name": service_name, "port": {"number": 80}}}
            }]}
        }]}
    })
}

fn metadata_only(namespace: &str, name: &str) -> Value {
    json!({"metadata": {"name": name, "namespace": namespace}})
}

/// One resource of each kind in `ns-1`, all wired together
fn basic_cluster(pod_item: Value) -> FixtureFetcher {
    FixtureFetcher::default()
        .with_items(
            ResourceKind::Service,
            vec![service("ns-1", "service-1", json!({"app": "app-1"}))],
        )
        .with_items(ResourceKind::Pod, vec![pod_item])
        .with_items(
            ResourceKind::Deployment,
            vec![deployment("ns-1", "dep-1", json!({"app": "app-1"}))],
        )
        .with_items(
            ResourceKind::Ingress,
            vec![ingress("ns-1", "ingress-1", "service-1")],
        )
        .with_items(ResourceKind::ConfigMap, vec![metadata_only("ns-1", "cm-1")])
        .with_items(ResourceKind::Secret, vec![metadata_only("ns-1", "secret-1")])
}

async fn get(fetcher: FixtureFetcher, path: &str) -> (StatusCode, Value) {
    get_with_mode(fetcher, path, FetchMode::Sequential).await
}

async fn get_with_mode(fetcher: FixtureFetcher, path: &str, mode: FetchMode) -> (StatusCode, Value) {
    let app = server::router(AppState::new(Arc::new(fetcher), mode));
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_map(fetcher: FixtureFetcher) -> ServiceMap {
    let (status, body) = get(fetcher, SERVICE_MAP_PATH).await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_basic_cluster_graph() {
    let map = get_map(basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"})))).await;

    assert_eq!(map.nodes.len(), 6);
    let ids: Vec<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "service_ns-1_service-1",
            "pod_ns-1_pod-1",
            "deployment_ns-1_dep-1",
            "ingress_ns-1_ingress-1",
            "configmap_ns-1_cm-1",
            "secret_ns-1_secret-1",
        ]
    );

    assert_eq!(
        map.edges,
        vec![
            Edge::new(
                "deployment_ns-1_dep-1",
                "service_ns-1_service-1",
                EdgeType::Manages
            ),
            Edge::new(
                "ingress_ns-1_ingress-1",
                "service_ns-1_service-1",
                EdgeType::Route
            ),
            Edge::new("service_ns-1_service-1", "pod_ns-1_pod-1", EdgeType::Selector),
        ]
    );
}

#[tokio::test]
async fn test_basic_cluster_json_shape() {
    let (status, body) = get(
        basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"}))),
        SERVICE_MAP_PATH,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["nodes"][0],
        json!({
            "id": "service_ns-1_service-1",
            "type": "service",
            "name": "service-1",
            "namespace": "ns-1",
            "ports": [{"port": 80, "targetPort": 8080}],
            "selector": {"app": "app-1"}
        })
    );
    assert_eq!(body["nodes"][1]["status"], "Running");
    assert_eq!(body["nodes"][1]["containers"], json!(["app"]));
    assert_eq!(body["nodes"][2]["match_labels"], json!({"app": "app-1"}));
    assert_eq!(body["nodes"][2]["replicas"], 2);
    assert_eq!(
        body["edges"][0],
        json!({
            "from": "deployment_ns-1_dep-1",
            "to": "service_ns-1_service-1",
            "type": "manages"
        })
    );
}

#[tokio::test]
async fn test_pod_volumes_add_mount_edges() {
    let mut pod_item = pod("ns-1", "pod-1", json!({"app": "app-1"}));
    pod_item["spec"]["volumes"] = json!([
        {"name": "config", "configMap": {"name": "cm-1"}},
        {"name": "creds", "secret": {"secretName": "secret-1"}}
    ]);

    let map = get_map(basic_cluster(pod_item)).await;

    assert_eq!(map.nodes.len(), 6);
    assert_eq!(map.edges.len(), 5);
    assert!(map.edges.contains(&Edge::new(
        "pod_ns-1_pod-1",
        "configmap_ns-1_cm-1",
        EdgeType::Mount
    )));
    assert!(map.edges.contains(&Edge::new(
        "pod_ns-1_pod-1",
        "secret_ns-1_secret-1",
        EdgeType::Mount
    )));
}

#[tokio::test]
async fn test_empty_cluster() {
    let (status, body) = get(FixtureFetcher::default(), SERVICE_MAP_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"nodes": [], "edges": []}));
}

#[tokio::test]
async fn test_service_fetch_failure_propagates_status() {
    let fetcher = basic_cluster(pod("ns-1", "pod-1", json!({}))).failing(
        ResourceKind::Service,
        500,
        "Internal Server Error",
    );

    let (status, body) = get(fetcher, SERVICE_MAP_PATH).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Kubernetes API error"), "detail: {}", detail);
    assert_eq!(
        detail,
        "Kubernetes API error: Internal Server Error - service is unavailable"
    );
}

#[tokio::test]
async fn test_forbidden_secret_list_is_passed_through() {
    for mode in [FetchMode::Sequential, FetchMode::Concurrent] {
        let fetcher = basic_cluster(pod("ns-1", "pod-1", json!({}))).failing(
            ResourceKind::Secret,
            403,
            "Forbidden",
        );

        let (status, body) = get_with_mode(fetcher, SERVICE_MAP_PATH, mode).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({"detail": "Kubernetes API error: Forbidden - secret is unavailable"})
        );
    }
}

#[tokio::test]
async fn test_concurrent_mode_matches_sequential() {
    let sequential = get_with_mode(
        basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"}))),
        SERVICE_MAP_PATH,
        FetchMode::Sequential,
    )
    .await;
    let concurrent = get_with_mode(
        basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"}))),
        SERVICE_MAP_PATH,
        FetchMode::Concurrent,
    )
    .await;

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_service_without_ingress() {
    let fetcher = basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"})))
        .with_items(ResourceKind::Ingress, vec![]);

    let map = get_map(fetcher).await;

    assert_eq!(map.nodes.len(), 5);
    assert!(map.edges.iter().all(|e| e.edge_type != EdgeType::Route));
    assert_eq!(map.edges.len(), 2);
}

#[tokio::test]
async fn test_ingress_to_missing_service_leaves_dangling_edge() {
    let fetcher = FixtureFetcher::default().with_items(
        ResourceKind::Ingress,
        vec![ingress("web", "public", "frontend")],
    );

    let map = get_map(fetcher).await;

    assert_eq!(map.nodes.len(), 1);
    assert_eq!(
        map.edges,
        vec![Edge::new(
            "ingress_web_public",
            "service_web_frontend",
            EdgeType::Route
        )]
    );
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let first = get(
        basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"}))),
        SERVICE_MAP_PATH,
    )
    .await;
    let second = get(
        basic_cluster(pod("ns-1", "pod-1", json!({"app": "app-1"}))),
        SERVICE_MAP_PATH,
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_duplicate_edges_collapse() {
    // Two rules on one ingress route to the same service
    let mut item = ingress("ns-1", "ingress-1", "service-1");
    let rule = item["spec"]["rules"][0].clone();
    item["spec"]["rules"] = json!([rule.clone(), rule]);

    let fetcher = FixtureFetcher::default()
        .with_items(ResourceKind::Ingress, vec![item])
        .with_items(
            ResourceKind::Service,
            vec![
                service("ns-1", "web-a", json!({"app": "web"})),
                service("ns-1", "web-b", json!({"app": "web", "tier": "front"})),
            ],
        )
        .with_items(
            ResourceKind::Pod,
            vec![pod("ns-1", "web-0", json!({"app": "web", "tier": "front"}))],
        );

    let map = get_map(fetcher).await;

    let routes: Vec<&Edge> = map
        .edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::Route)
        .collect();
    assert_eq!(routes.len(), 1);

    let selectors: Vec<&Edge> = map
        .edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::Selector)
        .collect();
    assert_eq!(selectors.len(), 2);
}

#[tokio::test]
async fn test_malformed_items_still_produce_nodes() {
    let fetcher = FixtureFetcher::default()
        .with_items(
            ResourceKind::Pod,
            vec![json!({"metadata": {"name": "orphan"}}), json!({})],
        )
        .with_items(
            ResourceKind::Service,
            vec![json!({"metadata": {"name": "bare", "namespace": null}, "spec": null})],
        );

    let (status, body) = get(fetcher, SERVICE_MAP_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 3);

    let service = &body["nodes"][0];
    assert_eq!(service["id"], "service__bare");
    assert_eq!(service["namespace"], Value::Null);
    assert_eq!(service["ports"], json!([]));
    assert_eq!(service["selector"], json!({}));

    let orphan = &body["nodes"][1];
    assert_eq!(orphan["id"], "pod__orphan");
    assert_eq!(orphan["status"], Value::Null);
    assert_eq!(orphan["containers"], json!([]));

    assert_eq!(body["nodes"][2]["id"], "pod__");
    assert_eq!(body["edges"], json!([]));
}

#[tokio::test]
async fn test_list_without_items_is_empty() {
    let fetcher = FixtureFetcher::default()
        .with_list(ResourceKind::ConfigMap, json!({"kind": "ConfigMapList"}))
        .with_list(ResourceKind::Secret, json!({"items": null}));

    let map = get_map(fetcher).await;

    assert!(map.nodes.is_empty());
}

#[tokio::test]
async fn test_non_array_items_is_unexpected() {
    let fetcher = FixtureFetcher::default()
        .with_list(ResourceKind::Deployment, json!({"items": {"oops": true}}));

    let (status, body) = get(fetcher, SERVICE_MAP_PATH).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(
        detail.starts_with("An unexpected error occurred:"),
        "detail: {}",
        detail
    );
    assert!(detail.contains("deployment"));
}

#[tokio::test]
async fn test_cross_namespace_deployment_is_not_linked() {
    let fetcher = FixtureFetcher::default()
        .with_items(
            ResourceKind::Service,
            vec![service("y", "api", json!({"app": "api"}))],
        )
        .with_items(
            ResourceKind::Deployment,
            vec![deployment("x", "api", json!({"app": "api"}))],
        );

    let map = get_map(fetcher).await;

    assert_eq!(map.nodes.len(), 2);
    assert!(map.edges.is_empty());
}

#[tokio::test]
async fn test_deployment_without_service_is_disconnected() {
    let fetcher = FixtureFetcher::default()
        .with_items(
            ResourceKind::Pod,
            vec![pod("ns-1", "worker-0", json!({"app": "worker"}))],
        )
        .with_items(
            ResourceKind::Deployment,
            vec![deployment("ns-1", "worker", json!({"app": "worker"}))],
        );

    let map = get_map(fetcher).await;

    assert_eq!(map.nodes.len(), 2);
    assert!(map.edges.is_empty());
}

#[tokio::test]
async fn test_handler_panic_becomes_500() {
    let fetcher = FixtureFetcher {
        panic_on: Some(ResourceKind::Pod),
        ..FixtureFetcher::default()
    };

    let (status, body) = get(fetcher, SERVICE_MAP_PATH).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "An unexpected error occurred: fixture panic listing pod"})
    );
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(FixtureFetcher::default(), HEALTH_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
