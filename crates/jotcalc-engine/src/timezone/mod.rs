//! Time zone conversion across a fixed set of six zones.
//!
//! - [`ZoneId`], [`ALL_ZONES`] - the reference zones (PST, MST, CST, EST, UTC, IST)
//! - [`LocalZone`], [`resolve_local_zone`] - mapping the caller's zone onto the set
//! - [`convert_now`] - the current instant (optionally shifted) in every zone
//! - [`convert_specific`] - a typed wall-clock time converted to the other zones
//!
//! Offsets come from the IANA calendar rules in `chrono-tz`, so daylight
//! saving transitions are honored.

mod convert;
mod zones;

pub use convert::{
    SpecificTime, ZoneTime, convert_now, convert_specific, format_clock, is_night,
    parse_specific_time, parse_time_command, resolve_wall_clock,
};
pub use zones::{ALL_ZONES, LocalZone, ZoneId, resolve_local_zone};
