//! Profile domain - updates to the signed-in user's profile.

pub mod actions;

pub use actions::{update_avatar, update_details};
