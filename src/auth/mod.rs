//! Logging in to the record store and guarding routes by session status.

mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod reset_password;
mod session;

pub use forgot_password::{get_forgot_password_page, post_forgot_password};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx, guest_guard};
pub use register::{get_register_page, post_register};
pub use reset_password::{get_reset_password_page, post_reset_password};
pub use session::{SessionGate, SessionStatus};
