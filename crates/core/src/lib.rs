//! Domain core for the taskhub backend.
//!
//! Pure logic only: the error taxonomy, shared id/timestamp types, role
//! constants, and the authorization policy. Nothing here touches the
//! database or the HTTP layer.

pub mod error;
pub mod policy;
pub mod roles;
pub mod types;
