mod common;

use common::fixture;
use yao_core::{ConnectionPool, SecurityGroupService, Session};
use yao_resources::{
    Hypervisor, LoadBalancerHealthMonitor, Resource, RestfullyAccessible, SecurityGroup, Server,
    Tenant,
};

fn decode_all<R: RestfullyAccessible>(session: &Session, name: &str) -> Vec<R> {
    R::metadata(session)
        .unwrap()
        .resources_from_json(&fixture(name))
        .unwrap()
        .into_iter()
        .map(R::from_base)
        .collect()
}

fn offline() -> Session {
    Session::new(ConnectionPool::new())
}

#[test]
fn tenants_fixture() {
    let tenants: Vec<Tenant> = decode_all(&offline(), "tenants.json");
    assert_eq!(tenants.len(), 2);
    assert_eq!(tenants[0].name(), Some("admin"));
    assert_eq!(tenants[0].enabled(), Some(true));
    assert_eq!(tenants[1].enabled(), Some(false));
    // null reads as absent
    assert!(tenants[1].description().is_none());
}

#[test]
fn servers_fixture() {
    let servers: Vec<Server> = decode_all(&offline(), "servers_detail.json");
    let web = &servers[0];
    assert_eq!(web.status(), Some("ACTIVE"));
    assert_eq!(web.availability_zone(), Some("nova"));
    assert_eq!(web.vm_state(), Some("active"));
    assert!(web.key_name().is_none());
    assert_eq!(
        web.metadata().and_then(|meta| meta.get("role")),
        Some(&serde_json::json!("frontend"))
    );
    assert!(web.addresses().is_some_and(|nets| nets.contains_key("private")));

    let created = web.created().unwrap().unwrap();
    let updated = web.updated().unwrap().unwrap();
    assert_eq!((updated - created).num_seconds(), 244);
}

#[test]
fn network_security_groups_fixture() {
    let session = offline().with_security_group_service(SecurityGroupService::Network);
    let groups: Vec<SecurityGroup> = decode_all(&session, "security_groups_network.json");
    assert_eq!(groups.len(), 1);

    let rules = groups[0].rules(&session);
    assert_eq!(rules.len(), 2);
    assert!(rules[0].protocol().is_none());
    assert_eq!(rules[1].port_range_min(), Some(22));
    assert_eq!(rules[1].remote_ip_prefix(), Some("0.0.0.0/0"));
    assert_eq!(rules[1].security_group_id(), groups[0].id().as_deref());
}

#[test]
fn hypervisors_fixture() {
    let hypervisors: Vec<Hypervisor> = decode_all(&offline(), "hypervisors_detail.json");
    let enabled: Vec<_> = hypervisors.iter().filter(|h| h.enabled()).collect();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].hypervisor_hostname(), Some("compute-01"));
    assert_eq!(enabled[0].memory_mb_used(), Some(32768));
    assert!(hypervisors[1].vcpus().is_none());
}

#[test]
fn health_monitor_fixture() {
    let meta = LoadBalancerHealthMonitor::metadata(&offline()).unwrap();
    let monitor =
        LoadBalancerHealthMonitor::from_base(meta.resource_from_json(&fixture("healthmonitor.json")).unwrap());
    assert_eq!(monitor.name(), Some("web-check"));
    assert_eq!(monitor.max_retries_down(), Some(3));
    assert_eq!(monitor.http_method(), Some("GET"));
    assert_eq!(monitor.operating_status(), Some("ONLINE"));
}
