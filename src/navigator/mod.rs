// src/navigator/mod.rs
mod query;
mod session;

pub use query::PageQuery;
pub use session::{LiveCalendarPage, SiteSession};
