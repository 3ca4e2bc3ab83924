//! Core wire types for fetchpipe.
//!
//! This crate holds the pieces shared by the client (`fetchpipe-client`)
//! and by any service that speaks the same envelope format.
//!
//! ## Modules
//!
//! - `envelope`: Request and response packs exchanged with the remote service
//! - `store`: Read-only access to the persisted passport
//! - `error`: Envelope encoding and decoding errors

mod envelope;
mod error;
mod store;

pub use envelope::*;
pub use error::*;
pub use store::*;
