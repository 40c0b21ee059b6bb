//! HTTP surface: the filtered feed, help pages and health check.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::{FeedError, Xml};
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
