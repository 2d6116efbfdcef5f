//! Kernel module - client infrastructure and dependencies.

pub mod backend;
pub mod deps;
pub mod traits;

pub use backend::{BackendClient, BackendError};
pub use deps::{AuthenticaAdapter, ClientDeps};
pub use traits::*;
