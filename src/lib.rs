//! Client for a video metadata/transcoding service: resolve a URL into
//! downloadable renditions, stream one down with live progress, and keep a
//! capped history of completed transfers.

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod errors;
pub mod history;
pub mod models;
pub mod session;
pub mod validate;
