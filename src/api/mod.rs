//! HTTP surface: public redirect, admin API, health probes, middleware

pub mod middleware;
pub mod response;
pub mod services;
