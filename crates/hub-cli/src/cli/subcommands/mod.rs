pub mod auth;
pub mod console;
pub mod profile;

pub use auth::AuthCommands;
pub use console::ConsoleCommands;
pub use profile::ProfileCommands;
