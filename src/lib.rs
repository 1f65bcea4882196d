// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod docker_repo;
pub mod error;
pub mod kube_repo;
pub mod models;
pub mod power;
pub mod routes;
pub mod sysinfo_repo;
