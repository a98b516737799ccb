//! Identity module: profiles, registration and login
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases.

pub mod service;

pub use service::{AuthError, AuthToken, UserError, UserService};
