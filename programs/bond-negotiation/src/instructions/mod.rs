//! Instruction handlers for the bond negotiation program

pub mod chat_helpers;
pub mod lifecycle_helpers;
pub mod signoff_helpers;

pub mod add_message;
pub mod create_bond;
pub mod get_secure_details;
pub mod initialize_registry;
pub mod request_status_change;
pub mod set_holder;
pub mod sign_status;
pub mod update_terms;

#[allow(ambiguous_glob_reexports)]
pub use add_message::*;
#[allow(ambiguous_glob_reexports)]
pub use create_bond::*;
#[allow(ambiguous_glob_reexports)]
pub use get_secure_details::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize_registry::*;
#[allow(ambiguous_glob_reexports)]
pub use request_status_change::*;
#[allow(ambiguous_glob_reexports)]
pub use set_holder::*;
#[allow(ambiguous_glob_reexports)]
pub use sign_status::*;
#[allow(ambiguous_glob_reexports)]
pub use update_terms::*;
