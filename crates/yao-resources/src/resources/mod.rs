//! Concrete resource types.

mod hypervisor;
mod loadbalancer_healthmonitor;
mod loadbalancer_pool;
mod meter;
mod port;
mod project;
mod role;
mod security_group;
mod security_group_rule;
mod server;
mod tenant;
mod user;

pub use hypervisor::Hypervisor;
pub use loadbalancer_healthmonitor::LoadBalancerHealthMonitor;
pub use loadbalancer_pool::LoadBalancerPool;
pub use meter::Meter;
pub use port::Port;
pub use project::Project;
pub use role::Role;
pub use security_group::SecurityGroup;
pub use security_group_rule::SecurityGroupRule;
pub use server::Server;
pub use tenant::Tenant;
pub use user::User;
