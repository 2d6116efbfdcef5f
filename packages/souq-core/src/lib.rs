// Souq marketplace - client core
//
// This crate is the non-UI core of the mobile client: identifier
// normalization, account existence checks, OTP dispatch and verification,
// account mutations, and the flow orchestrator that sequences them for the
// signup and password-recovery workflows.
//
// External services (backend document store / auth / object storage, and the
// phone-OTP vendor) are reached through trait abstractions in kernel/ so the
// workflows can be exercised against mocks.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
