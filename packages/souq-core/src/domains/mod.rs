// Domain modules. Each domain owns its models, actions, and errors.

pub mod auth;
pub mod profile;
