//! User profiles: own profile, lookup and listing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
