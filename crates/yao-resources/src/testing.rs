//! Session fixtures backed by wiremock servers.

use std::sync::Arc;
use wiremock::MockServer;
use yao_core::client::ServiceClient;
use yao_core::{AccessLevel, ConnectionPool, Service, Session};

/// Session whose listed `(service, access)` pairs all reach `server`.
pub(crate) fn session_with(server: &MockServer, entries: &[(Service, AccessLevel)]) -> Session {
    session_at(&server.uri(), entries)
}

/// Like [`session_with`], with the clients rooted at `base_url`.
pub(crate) fn session_at(base_url: &str, entries: &[(Service, AccessLevel)]) -> Session {
    let mut pool = ConnectionPool::new();
    for (service, access) in entries {
        let client = ServiceClient::new(base_url).expect("mock server URL is valid");
        pool.insert(*service, *access, Arc::new(client));
    }
    Session::new(pool)
}
