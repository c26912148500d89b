//! Account registration, self-deletion and login access.

mod check_login_access;
mod delete_own_account;
mod register_account;

pub use check_login_access::{CheckLoginAccessHandler, CheckLoginAccessQuery, LoginAccess};
pub use delete_own_account::{DeleteOwnAccountCommand, DeleteOwnAccountHandler};
pub use register_account::{RegisterAccountCommand, RegisterAccountHandler};
