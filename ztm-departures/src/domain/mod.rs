//! Domain types for the departure board.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod departure;
mod line;
mod reading;
mod time;

pub use departure::ResolvedDeparture;
pub use line::{Line, StopRef, parse_line_list};
pub use reading::{DEFAULT_DIRECTION, DEFAULT_TIME, RawReading};
pub use time::{ScheduledTime, TimeFormatError, minutes_until, resolve_departure};
