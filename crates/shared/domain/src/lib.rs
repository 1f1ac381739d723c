//! Domain layer - the user record shared by every crate in the workspace.
//!
//! This crate has no infrastructure dependencies. Storage backends convert
//! their row types into [`User`]; the HTTP layer serializes it as-is.

pub mod constants;
pub mod user;

pub use constants::*;
pub use user::User;
