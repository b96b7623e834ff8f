// NinjaRMM API module.
// Client, authentication, and tag-sorted documentation for the NinjaRMM REST API.

pub mod auth;
pub mod client;
pub mod docs;

pub use auth::{ClientConfig, Credential, Region, TokenResponse};
pub use client::{NinjaClient, RequestOptions, Verb};
pub use docs::{OperationDocs, SortedDocs, Tag, TagDocs};
