pub mod api;
pub mod config;
pub mod countdown;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod listing;
