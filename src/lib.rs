//! Gotolink - a short URL service for in-app paths
//!
//! This library provides the core functionality for the gotolink service:
//! opaque UIDs mapped to relative in-app paths, resolved through
//! `/goto/{uid}` with an HTTP 307 redirect.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `storage`: SeaORM storage backend and data access
//! - `cache`: Existence filter + object cache in front of storage
//! - `services`: Business logic shared by the HTTP and CLI front ends
//! - `usage`: Write-behind last-seen tracking
//! - `api`: HTTP services and middleware
//! - `cli`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and system utilities

#[cfg(feature = "server")]
pub mod api;
pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod usage;
pub mod utils;
