//! Port implementations for [`HubDb`](crate::HubDb).

pub mod profile;
pub mod project;
