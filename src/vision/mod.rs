//! Upload validation for incoming images.
//!
//! Every upload is checked here before any provider request is built:
//! size ceiling, declared MIME allow-list, and for pipelines that ask for it,
//! a full decode to catch truncated or mislabeled files.
//!
//! # Submodules
//!
//! - `models`: Upload, policy and format types.
//! - `validation`: The ordered checks and their user-facing messages.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod validation;

pub use models::{data_uri, normalize_mime, ImageFormat, UploadPolicy, UploadedImage};
pub use validation::{
    validate_upload, DECODE_MESSAGE, MAX_DECODE_ALLOC, MAX_DECODE_DIMENSION, MISSING_FILE_MESSAGE,
};
