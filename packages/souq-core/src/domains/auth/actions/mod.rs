// Workflow actions - one network-bound step each, called by the orchestrator.

pub mod mutate_account;
pub mod send_otp;
pub mod verify_otp;

pub use mutate_account::{
    create_account, reset_password_authenticated, reset_password_recovered, update_phone_number,
};
pub use send_otp::{dispatch_code, identifier_exists};
pub use verify_otp::verify_code;
