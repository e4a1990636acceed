use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::zones::{ALL_ZONES, LocalZone, ZoneId, resolve_local_zone};

/// One row of a time zone result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ZoneTime {
    pub label: ZoneId,
    /// `H:MM AM` / `H:MM PM`.
    pub time: String,
    pub hour24: u32,
    pub minute: u32,
    pub is_night: bool,
    /// The caller's zone in "now" mode, the typed zone in specific-time mode.
    pub is_local_or_source: bool,
}

/// Night is 18:00 up to 06:00.
pub fn is_night(hour24: u32) -> bool {
    !(6..18).contains(&hour24)
}

/// Render a 24-hour clock reading as `H:MM AM|PM`.
pub fn format_clock(hour24: u32, minute: u32) -> String {
    let meridiem = if hour24 < 12 { "AM" } else { "PM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, minute, meridiem)
}

fn time_command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^time(?:\s*([+-])\s*(\d{1,4}))?$").unwrap())
}

fn specific_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(1[0-2]|0?[1-9]):([0-5][0-9])\s*(AM|PM)\s+(PST|MST|CST|EST|UTC|IST)(?:\s*([+-])\s*(\d{1,4}))?$",
        )
        .unwrap()
    })
}

fn signed_offset(sign: Option<regex::Match<'_>>, amount: Option<regex::Match<'_>>) -> Option<i64> {
    let Some(amount) = amount else {
        return Some(0);
    };
    let hours: i64 = amount.as_str().parse().ok()?;
    match sign.map(|m| m.as_str()) {
        Some("-") => Some(-hours),
        _ => Some(hours),
    }
}

/// Recognize `time`, `time + N` or `time - N`; returns the hour offset.
pub fn parse_time_command(text: &str) -> Option<i64> {
    let caps = time_command_re().captures(text.trim())?;
    signed_offset(caps.get(1), caps.get(2))
}

/// A wall-clock time typed by the user, e.g. `10:30 PM MST + 2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecificTime {
    pub hour24: u32,
    pub minute: u32,
    pub zone: ZoneId,
    pub hour_offset: i64,
    /// The time as typed, shown unchanged on the source row.
    pub literal: String,
}

/// Recognize `H:MM AM|PM ZONE [+|- N]`.
pub fn parse_specific_time(text: &str) -> Option<SpecificTime> {
    let caps = specific_time_re().captures(text.trim())?;
    let hour12: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let meridiem = caps[3].to_ascii_uppercase();
    let zone = ZoneId::from_abbreviation(&caps[4])?;
    let hour_offset = signed_offset(caps.get(5), caps.get(6))?;

    let hour24 = match (hour12, meridiem.as_str()) {
        (12, "AM") => 0,
        (12, _) => 12,
        (h, "PM") => h + 12,
        (h, _) => h,
    };

    Some(SpecificTime {
        hour24,
        minute,
        zone,
        hour_offset,
        literal: format!("{}:{} {}", &caps[1], &caps[2], meridiem),
    })
}

fn zone_time(zone: ZoneId, instant: DateTime<Utc>, is_local_or_source: bool) -> ZoneTime {
    let local = instant.with_timezone(&zone.tz());
    let (hour24, minute) = (local.hour(), local.minute());
    ZoneTime {
        label: zone,
        time: format_clock(hour24, minute),
        hour24,
        minute,
        is_night: is_night(hour24),
        is_local_or_source,
    }
}

fn others(first: ZoneId) -> impl Iterator<Item = ZoneId> {
    ALL_ZONES.into_iter().filter(move |&zone| zone != first)
}

/// All six zones at `now` shifted by `hour_offset`, the caller's zone first.
pub fn convert_now(now: DateTime<Utc>, local: &LocalZone, hour_offset: i64) -> Vec<ZoneTime> {
    let local_zone = resolve_local_zone(local, now);
    let instant = now + Duration::hours(hour_offset);
    debug!(local = %local_zone, hour_offset, "converting current time");

    std::iter::once(zone_time(local_zone, instant, true))
        .chain(others(local_zone).map(|zone| zone_time(zone, instant, false)))
        .collect()
}

/// The UTC instant of a wall-clock time in `zone`, on the current date there.
///
/// Calendar rules are used first. A time that does not exist on that date
/// (skipped by a DST transition) falls back to the zone's standard offset,
/// which can be off by the DST amount.
pub fn resolve_wall_clock(zone: ZoneId, now: DateTime<Utc>, hour24: u32, minute: u32) -> DateTime<Utc> {
    let tz = zone.tz();
    let date = now.with_timezone(&tz).date_naive();
    let Some(naive) = date.and_hms_opt(hour24, minute, 0) else {
        warn!(zone = %zone, hour24, minute, "invalid wall-clock time, using current instant");
        return now;
    };

    if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
        return resolved.with_timezone(&Utc);
    }

    warn!(
        zone = %zone,
        %naive,
        "wall-clock time not representable in calendar, using fixed offset estimate"
    );
    let offset = Duration::minutes(i64::from(zone.standard_offset_minutes()));
    Utc.from_utc_datetime(&(naive - offset))
}

/// Convert a typed time to the other five zones. The source row keeps the
/// literal the user typed.
pub fn convert_specific(now: DateTime<Utc>, spec: &SpecificTime) -> Vec<ZoneTime> {
    let resolved = resolve_wall_clock(spec.zone, now, spec.hour24, spec.minute);
    let instant = resolved + Duration::hours(spec.hour_offset);
    debug!(source = %spec.zone, %resolved, hour_offset = spec.hour_offset, "converting specific time");

    let source = ZoneTime {
        label: spec.zone,
        time: spec.literal.clone(),
        hour24: spec.hour24,
        minute: spec.minute,
        is_night: is_night(spec.hour24),
        is_local_or_source: true,
    };

    std::iter::once(source)
        .chain(others(spec.zone).map(|zone| zone_time(zone, instant, false)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn row(rows: &[ZoneTime], zone: ZoneId) -> &ZoneTime {
        rows.iter().find(|r| r.label == zone).unwrap()
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0, 5), "12:05 AM");
        assert_eq!(format_clock(12, 0), "12:00 PM");
        assert_eq!(format_clock(23, 59), "11:59 PM");
        assert_eq!(format_clock(9, 30), "9:30 AM");
    }

    #[test]
    fn test_is_night_boundaries() {
        assert!(is_night(0));
        assert!(is_night(5));
        assert!(!is_night(6));
        assert!(!is_night(17));
        assert!(is_night(18));
        assert!(is_night(23));
    }

    #[test]
    fn test_parse_time_command() {
        assert_eq!(parse_time_command("time"), Some(0));
        assert_eq!(parse_time_command("TIME + 2"), Some(2));
        assert_eq!(parse_time_command("time-3"), Some(-3));
        assert_eq!(parse_time_command("time 2"), None);
        assert_eq!(parse_time_command("times"), None);
    }

    #[test]
    fn test_parse_specific_time() {
        let spec = parse_specific_time("10:30 PM MST").unwrap();
        assert_eq!(spec.hour24, 22);
        assert_eq!(spec.minute, 30);
        assert_eq!(spec.zone, ZoneId::Mst);
        assert_eq!(spec.hour_offset, 0);
        assert_eq!(spec.literal, "10:30 PM");

        let spec = parse_specific_time("12:15am ist - 4").unwrap();
        assert_eq!(spec.hour24, 0);
        assert_eq!(spec.zone, ZoneId::Ist);
        assert_eq!(spec.hour_offset, -4);
        assert_eq!(spec.literal, "12:15 AM");
    }

    #[test]
    fn test_parse_specific_time_rejects_malformed() {
        assert!(parse_specific_time("13:00 PM EST").is_none());
        assert!(parse_specific_time("10:75 AM EST").is_none());
        assert!(parse_specific_time("10:30 PM GMT").is_none());
        assert!(parse_specific_time("10:30 EST").is_none());
    }

    #[test]
    fn test_convert_now_local_first() {
        let now = at(2026, 1, 15, 17, 45);
        let rows = convert_now(now, &LocalZone::Named(Tz::America__New_York), 0);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].label, ZoneId::Est);
        assert!(rows[0].is_local_or_source);
        assert!(rows[1..].iter().all(|r| !r.is_local_or_source));
        assert_eq!(rows[0].time, "12:45 PM");
        assert_eq!(row(&rows, ZoneId::Utc).time, "5:45 PM");
        assert_eq!(row(&rows, ZoneId::Ist).time, "11:15 PM");
        assert!(row(&rows, ZoneId::Ist).is_night);
    }

    #[test]
    fn test_convert_now_with_offset() {
        let now = at(2026, 1, 15, 17, 45);
        let rows = convert_now(now, &LocalZone::Named(Tz::UTC), 2);
        assert_eq!(rows[0].label, ZoneId::Utc);
        assert_eq!(rows[0].time, "7:45 PM");
        assert_eq!(row(&rows, ZoneId::Pst).time, "11:45 AM");
    }

    #[test]
    fn test_resolve_wall_clock_respects_dst() {
        let winter = at(2026, 1, 15, 12, 0);
        let summer = at(2026, 7, 15, 12, 0);
        assert_eq!(
            resolve_wall_clock(ZoneId::Est, winter, 9, 0),
            at(2026, 1, 15, 14, 0)
        );
        assert_eq!(
            resolve_wall_clock(ZoneId::Est, summer, 9, 0),
            at(2026, 7, 15, 13, 0)
        );
    }

    #[test]
    fn test_resolve_wall_clock_in_dst_gap_uses_estimate() {
        // 2:30 AM does not exist in New York on 2026-03-08.
        let now = at(2026, 3, 8, 15, 0);
        assert_eq!(
            resolve_wall_clock(ZoneId::Est, now, 2, 30),
            at(2026, 3, 8, 7, 30)
        );
    }

    #[test]
    fn test_convert_specific_keeps_literal() {
        let now = at(2026, 7, 15, 12, 0);
        let spec = parse_specific_time("10:30 PM MST").unwrap();
        let rows = convert_specific(now, &spec);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].label, ZoneId::Mst);
        assert_eq!(rows[0].time, "10:30 PM");
        assert!(rows[0].is_local_or_source);
        // MDT is UTC-6 in July.
        assert_eq!(row(&rows, ZoneId::Utc).time, "4:30 AM");
        assert_eq!(row(&rows, ZoneId::Pst).time, "9:30 PM");
    }

    #[test]
    fn test_convert_specific_offset_leaves_source_row() {
        let now = at(2026, 1, 15, 12, 0);
        let spec = parse_specific_time("9:00 AM UTC + 3").unwrap();
        let rows = convert_specific(now, &spec);
        assert_eq!(rows[0].time, "9:00 AM");
        assert_eq!(row(&rows, ZoneId::Est).time, "7:00 AM");
    }
}
