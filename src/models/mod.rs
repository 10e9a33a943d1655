//! Data models for the warehouse server

pub mod calendar;
pub mod equipment;
pub mod project;
pub mod project_item;
pub mod shortage;
pub mod user;

// Re-export commonly used types
pub use calendar::{CalendarView, LayoutEntry, Segment, ViewState};
pub use equipment::Equipment;
pub use project::{Project, ProjectStatus};
pub use project_item::ProjectItem;
pub use shortage::{ProjectShortage, ShortageDetail};
