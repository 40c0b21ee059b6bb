//! RSS 2.0 output.

pub mod renderer;

pub use renderer::{
    render_error_feed, render_feed, render_feed_at, FeedChannel, DEFAULT_TTL_MINUTES,
    STATIC_ERROR_FEED,
};
