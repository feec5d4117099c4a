#![allow(dead_code)]

use std::sync::Arc;
use wiremock::MockServer;
use yao_core::client::ServiceClient;
use yao_core::{AccessLevel, ConnectionPool, Service, Session};

pub fn client(base_url: &str) -> Arc<ServiceClient> {
    Arc::new(ServiceClient::new(base_url).unwrap())
}

pub fn session(server: &MockServer, entries: &[(Service, AccessLevel)]) -> Session {
    let mut pool = ConnectionPool::new();
    for (service, access) in entries {
        pool.insert(*service, *access, client(&server.uri()));
    }
    Session::new(pool)
}

pub fn fixture(name: &str) -> serde_json::Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let raw = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&raw).unwrap()
}
