//! Request-side domain types with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod account;
pub mod id;
pub mod validation;

pub use account::{Email, Username};
pub use id::{non_blank, IdInput, RecordId};
pub use validation::{non_empty, ValidationError};
