#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod connect;

pub use client::ObjectStoreClient;
pub use connect::{ConnectOptions, connect};
