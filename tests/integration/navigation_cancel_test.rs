//! Integration tests for navigation-driven request cancellation.
//!
//! A local TCP listener that accepts connections and never answers stands
//! in for a slow console API, so dispatches stay in flight until a hook
//! or a duplicate cancels them.

use opsdeck::http::{ApiClient, ApiError, Method, NavigationGuard, RequestRegistry};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Bind a listener that accepts and holds connections open forever.
async fn hanging_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Give a spawned dispatch time to connect and register itself.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(150)).await;
}

#[tokio::test]
async fn test_route_change_cancels_in_flight_dispatch() {
    let addr = hanging_server().await;
    let registry = Arc::new(RequestRegistry::new());
    let client = Arc::new(ApiClient::with_registry(
        format!("http://{}", addr),
        Arc::clone(&registry),
    ));
    let guard = NavigationGuard::new(Arc::clone(&registry));

    let dispatch = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.get::<Value>("/users", None).await })
    };

    settle().await;
    assert_eq!(registry.len(), 1);

    // Navigation away from the page fires the hook; navigation itself is
    // never blocked on the outcome.
    guard.before_navigate("/dashboard", "/users");

    let result = dispatch.await.expect("dispatch task");
    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_same_route_navigation_keeps_dispatch_tracked() {
    let addr = hanging_server().await;
    let registry = Arc::new(RequestRegistry::new());
    let client = Arc::new(ApiClient::with_registry(
        format!("http://{}", addr),
        Arc::clone(&registry),
    ));
    let guard = NavigationGuard::new(Arc::clone(&registry));

    let dispatch = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.get::<Value>("/users", None).await })
    };

    settle().await;
    guard.before_navigate("/users", "/users");
    assert_eq!(registry.len(), 1);

    guard.on_unload();
    let result = dispatch.await.expect("dispatch task");
    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_duplicate_dispatch_supersedes_predecessor() {
    let addr = hanging_server().await;
    let registry = Arc::new(RequestRegistry::new());
    let client = Arc::new(ApiClient::with_registry(
        format!("http://{}", addr),
        Arc::clone(&registry),
    ));

    let params = json!({"page": 1});

    let first = {
        let client = Arc::clone(&client);
        let params = params.clone();
        tokio::spawn(async move { client.get::<Value>("/users", Some(params)).await })
    };
    settle().await;

    let second = {
        let client = Arc::clone(&client);
        let params = params.clone();
        tokio::spawn(async move { client.get::<Value>("/users", Some(params)).await })
    };
    settle().await;

    // The first dispatch was superseded; only the second is tracked.
    let result = first.await.expect("first dispatch");
    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert_eq!(registry.len(), 1);

    client.cancel(Method::GET, "/users", Some(&params));
    let result = second.await.expect("second dispatch");
    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_page_hidden_cancels_everything() {
    let addr = hanging_server().await;
    let registry = Arc::new(RequestRegistry::new());
    let client = Arc::new(ApiClient::with_registry(
        format!("http://{}", addr),
        Arc::clone(&registry),
    ));
    let guard = NavigationGuard::new(Arc::clone(&registry));

    let dispatches: Vec<_> = ["/users", "/roles", "/audit"]
        .into_iter()
        .map(|path| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.get::<Value>(path, None).await })
        })
        .collect();

    settle().await;
    assert_eq!(registry.len(), 3);

    guard.on_page_hidden();
    assert!(registry.is_empty());

    for dispatch in dispatches {
        let result = dispatch.await.expect("dispatch task");
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
