pub mod service;

pub use service::{CommentError, CommentService};
