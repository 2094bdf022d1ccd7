//! Shared types for the Signet administrative API.
//!
//! This crate holds everything both sides of the admin surface need to
//! agree on: the provisioner record and its wire dialect, the cached view,
//! the problem-document error values, and the list cursor parsing.

pub mod claims;
pub mod codec;
pub mod error;
pub mod params;
pub mod provisioner;
pub mod views;

pub use claims::Claims;
pub use error::{AcmeProblem, AdminError, AdminErrorKind, ProblemDocument};
pub use provisioner::{Provisioner, ProvisionerDetails, ProvisionerType, ProvisionerView};
