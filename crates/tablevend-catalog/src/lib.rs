#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for grant operations.
pub const TRACING_TARGET_GRANT: &str = "tablevend_catalog::grant";

/// Tracing target for credential vending.
pub const TRACING_TARGET_VEND: &str = "tablevend_catalog::vend";

mod authority;
mod aws;
mod flow;
mod request;

pub use authority::PermissionAuthority;
pub use aws::AwsPermissionAuthority;
pub use flow::grant_and_vend;
pub use request::{
    DEFAULT_DURATION_SECONDS, DEFAULT_PERMISSION, DEFAULT_PERMISSION_TYPE, DEFAULT_TAG_KEY,
    VendRequest,
};
