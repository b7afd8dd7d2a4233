//! Route handlers organized by resource
//!
//! # Trust model
//!
//! There is no authentication. Routes scoped to a user take the `userId` from
//! the path or body as given, so any caller can read or change any user's
//! favourites, learnings and profile. Deploy behind something that
//! authenticates callers, or on a network where that is acceptable.

pub mod auth;
pub mod books;
pub mod favourites;
pub mod health;
pub mod learnings;
pub mod users;
