//! deskboard: a terminal client for a document and employee management API

pub mod api;
pub mod config;
pub mod metrics;
pub mod models;
pub mod session;
pub mod sync;
pub mod tui;
