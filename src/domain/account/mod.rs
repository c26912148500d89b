//! Account module - askers, experts, admins and their violation history.

mod access;
mod aggregate;
mod expert_status;
mod flag;
mod ledger;

pub use access::AccessDecision;
pub use aggregate::{Account, ExpertDecision, ExpertProfile, Role, RoleProfile};
pub use expert_status::ExpertStatus;
pub use flag::{excerpt, FlagKind, FlagRecord};
pub use ledger::{FlagLedger, StrikeNotice, DEFAULT_EXCERPT_CHARS, FLAG_THRESHOLD};
