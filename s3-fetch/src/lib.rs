//! Serve objects stored in an S3 bucket through an API Gateway proxy integration.
//!
//! The object key comes from the `objectKey` path parameter. Found objects are
//! returned base64-encoded with their declared content type; missing objects
//! and storage failures return a fixed 403 HTML document instead.

pub mod config;
pub mod error;
pub mod handler;
pub mod s3;
pub mod store;

pub use crate::{
    config::FetchConfig,
    error::FetchError,
    handler::FetchHandler,
    s3::S3Store,
    store::{FetchOutcome, ObjectStore},
};
