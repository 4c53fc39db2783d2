//! `jengamart-api` — the storefront's HTTP surface.

pub mod app;
pub mod context;
pub mod middleware;
