//! Request configuration.
//!
//! - [`RequestConfig`]: Per-call and default settings
//! - [`merge_config`]: Right-biased layering of two configs
//! - [`Transformer`]: Request/response payload transforms
//! - [`library_defaults`] and [`set_config`]: Where defaults come from

mod defaults;
mod merge;
mod request;
mod transform;

pub use defaults::{library_defaults, process_defaults, set_config};
pub use merge::merge_config;
pub use request::{Method, QueryParams, RequestConfig, ResponseType};
pub use transform::Transformer;
pub(crate) use transform::apply_transforms;
