//! Entity structs for the hub's stored documents.
//!
//! Each entity maps to a table in the libSQL document store (see `hub-store`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! output and the `hub schema` command.

mod chat;
mod profile;
mod project;

pub use chat::ChatMessage;
pub use profile::Profile;
pub use project::Project;
