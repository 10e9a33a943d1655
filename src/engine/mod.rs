//! Pure scheduling core: calendar arithmetic, shortage detection,
//! day segmentation and column layout. Nothing here performs I/O.

pub mod clock;
pub mod layout;
pub mod segment;
pub mod shortage;

pub use clock::{CalendarClock, DayKey, ViewMode, WeekStart};
pub use layout::layout_day;
pub use segment::split_into_days;
pub use shortage::{compute_shortages, Booking, EquipmentStock, ShortagePolicy};
