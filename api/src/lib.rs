//! Signet admin API service.
//!
//! Serves the administrative provisioner-management endpoints: enumeration,
//! creation, modification and removal of the provisioners the certificate
//! authority trusts.
//!
//! # Configuration
//!
//! See [`config::ApiConfig`] for CLI flags and their environment fallbacks.
//! Setting `STEPDEBUG=1` additionally captures backtraces into the log sink
//! for failed requests; traces never reach HTTP bodies.

pub mod config;
pub mod server;

pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod handlers;
