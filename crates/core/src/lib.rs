//! Domain types shared by every adminrun crate.
//!
//! Holds the deployment [`Environment`](environment::Environment), the
//! script input schema and its validator, and the core error type. Nothing
//! in here touches a database or the filesystem.

pub mod environment;
pub mod error;
pub mod input;
