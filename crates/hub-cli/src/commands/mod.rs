pub mod about;
pub mod apps;
pub mod auth;
pub mod chat;
pub mod console;
pub mod dispatch;
pub mod draft;
pub mod profile;
pub mod schema;
