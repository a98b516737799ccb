//! HTTP REST API
//!
//! - `common`: response envelope, pagination query, validated JSON extractor
//! - `middleware`: bearer-token authentication
//! - `modules`: one handler module per resource
//! - `router`: route table, shared state and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
