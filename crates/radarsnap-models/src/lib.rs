#![deny(missing_docs)]

//! # Radarsnap Models
//!
//! Wire-level data types for the Radarsnap analytics API.
//!
//! Every type here is a plain serde DTO matching the JSON the backend
//! speaks; no behaviour beyond (de)serialisation and a few convenience
//! constructors. The SDK, the CLI and the mock backend all share these
//! definitions so the wire contract lives in exactly one place.
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`auth`] | Login / register / refresh / profile DTOs |
//! | [`project`] | Projects, members, invitations, roles |
//! | [`analytics`] | Dashboard, sessions, performance, error aggregates |
//! | [`pagination`] | Generic paginated list envelope |
//! | [`error_body`] | Error payload returned by the backend on failure |

pub mod analytics;
pub mod auth;
pub mod error_body;
pub mod pagination;
pub mod project;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `radarsnap_models::User` directly.
pub use analytics::*;
pub use auth::*;
pub use error_body::*;
pub use pagination::*;
pub use project::*;
