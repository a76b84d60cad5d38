// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # lion-test-fixtures
//!
//! Fixture helpers shared by Lion unit tests.
//!
//! - **Filesystem**: [`create_directory`], [`rmdir_recursively`]
//! - **Images**: [`create_image`] writes a blank white PNG
//! - **Assertions**: [`assert_json_content`], [`assert_with_output`],
//!   [`assert_is_date`]
//! - **Text and API helpers**: [`get_response`], [`get_exception_from_api`]
//! - **Request context**: [`RequestContext`] and the key-absence assertions
//!
//! Every helper returns [`lion_test_core::TestError`] on failure instead of
//! panicking.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod context;
pub mod date;
pub mod fs;
pub mod image;
pub mod json;
pub mod output;
pub mod text;

pub use api::get_exception_from_api;
pub use context::{
    AmbientContext, RequestContext, Scope, assert_header_not_has_key,
    assert_http_body_not_has_key,
};
pub use date::{DEFAULT_DATE_FORMAT, assert_is_date};
pub use fs::{create_directory, rmdir_recursively};
pub use image::{ImageSpec, create_image, png_dimensions};
pub use json::assert_json_content;
pub use output::{OutputBuffer, assert_with_output};
pub use text::get_response;
