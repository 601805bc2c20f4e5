//! # hub-app
//!
//! Application layer for AfroTech Hub, shared by every front end.
//!
//! - [`session::AppSession`]: the context object holding the session bridge,
//!   the current account, and the forced auth step
//! - [`router`]: view-to-screen routing with the console guard
//! - [`console`]: the developer console over the project store
//! - [`catalogue`]: public listing queries

pub mod catalogue;
pub mod console;
pub mod error;
pub mod router;
pub mod session;

pub use console::Console;
pub use error::{AppError, ConsoleError};
pub use router::{Route, Screen, View, route};
pub use session::AppSession;
