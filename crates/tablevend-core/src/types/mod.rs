//! Core data model shared by the vending and read flows.

pub mod access;
pub mod classification;
pub mod credentials;
pub mod location;
pub mod table_ref;

pub use access::TableAccess;
pub use classification::Classification;
pub use credentials::VendedCredentials;
pub use location::{StorageScheme, TableLocation};
pub use table_ref::TableRef;
