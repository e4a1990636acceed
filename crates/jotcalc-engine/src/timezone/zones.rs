//! The fixed reference zones and local-zone matching.

use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six zones every time result is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoneId {
    Pst,
    Mst,
    Cst,
    Est,
    Utc,
    Ist,
}

/// Declaration order, used for every non-local row.
pub const ALL_ZONES: [ZoneId; 6] = [
    ZoneId::Pst,
    ZoneId::Mst,
    ZoneId::Cst,
    ZoneId::Est,
    ZoneId::Utc,
    ZoneId::Ist,
];

impl ZoneId {
    pub fn abbreviation(self) -> &'static str {
        match self {
            ZoneId::Pst => "PST",
            ZoneId::Mst => "MST",
            ZoneId::Cst => "CST",
            ZoneId::Est => "EST",
            ZoneId::Utc => "UTC",
            ZoneId::Ist => "IST",
        }
    }

    /// The civil time zone whose calendar rules (DST included) apply.
    pub fn tz(self) -> Tz {
        match self {
            ZoneId::Pst => Tz::America__Los_Angeles,
            ZoneId::Mst => Tz::America__Denver,
            ZoneId::Cst => Tz::America__Chicago,
            ZoneId::Est => Tz::America__New_York,
            ZoneId::Utc => Tz::UTC,
            ZoneId::Ist => Tz::Asia__Kolkata,
        }
    }

    /// Standard-time offset east of UTC in minutes. Only used when calendar
    /// resolution of a wall-clock time fails.
    pub fn standard_offset_minutes(self) -> i32 {
        match self {
            ZoneId::Pst => -8 * 60,
            ZoneId::Mst => -7 * 60,
            ZoneId::Cst => -6 * 60,
            ZoneId::Est => -5 * 60,
            ZoneId::Utc => 0,
            ZoneId::Ist => 5 * 60 + 30,
        }
    }

    /// Offset east of UTC in seconds at the given instant.
    pub fn offset_seconds_at(self, instant: DateTime<Utc>) -> i32 {
        offset_seconds(&self.tz(), instant)
    }

    pub fn from_abbreviation(s: &str) -> Option<ZoneId> {
        ALL_ZONES
            .into_iter()
            .find(|zone| zone.abbreviation().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for ZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneId::from_abbreviation(s).ok_or_else(|| format!("Unknown time zone abbreviation: {}", s))
    }
}

fn offset_seconds<Z: TimeZone>(tz: &Z, instant: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&instant.naive_utc())
        .fix()
        .local_minus_utc()
}

/// The caller's own time zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocalZone {
    /// A zone with calendar rules, e.g. from `TZ=Europe/London`.
    Named(Tz),
    /// Only the current offset is known.
    Offset(FixedOffset),
}

impl LocalZone {
    /// Parse a zone abbreviation from the fixed set or an IANA name.
    pub fn parse(s: &str) -> Option<LocalZone> {
        let s = s.trim();
        if let Some(zone) = ZoneId::from_abbreviation(s) {
            return Some(LocalZone::Named(zone.tz()));
        }
        s.parse::<Tz>().ok().map(LocalZone::Named)
    }

    /// Read the `TZ` environment variable, falling back to the system offset.
    pub fn from_env() -> LocalZone {
        if let Ok(value) = std::env::var("TZ")
            && let Some(zone) = LocalZone::parse(value.trim_start_matches(':'))
        {
            return zone;
        }
        LocalZone::Offset(*chrono::Local::now().offset())
    }

    pub fn offset_seconds_at(&self, instant: DateTime<Utc>) -> i32 {
        match self {
            LocalZone::Named(tz) => offset_seconds(tz, instant),
            LocalZone::Offset(fixed) => fixed.local_minus_utc(),
        }
    }
}

/// Instants at which a named zone must agree with a reference zone to count
/// as the same civil time: mid-winter, mid-summer and now.
fn equivalence_samples(now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let year = now.year();
    let mut samples: Vec<DateTime<Utc>> = [(1, 15), (7, 15)]
        .into_iter()
        .filter_map(|(month, day)| Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single())
        .collect();
    samples.push(now);
    samples
}

/// Map the caller's zone onto the fixed set.
///
/// An exact civil-time match wins; otherwise the zone whose current offset
/// is numerically closest (first in declaration order on ties).
pub fn resolve_local_zone(local: &LocalZone, now: DateTime<Utc>) -> ZoneId {
    let samples = match local {
        LocalZone::Named(_) => equivalence_samples(now),
        LocalZone::Offset(_) => vec![now],
    };

    if let Some(zone) = ALL_ZONES.into_iter().find(|zone| {
        samples
            .iter()
            .all(|&at| zone.offset_seconds_at(at) == local.offset_seconds_at(at))
    }) {
        return zone;
    }

    let local_now = local.offset_seconds_at(now);
    ALL_ZONES
        .into_iter()
        .min_by_key(|zone| (zone.offset_seconds_at(now) - local_now).abs())
        .unwrap_or(ZoneId::Utc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_abbreviation_round_trip() {
        for zone in ALL_ZONES {
            assert_eq!(ZoneId::from_abbreviation(zone.abbreviation()), Some(zone));
        }
        assert_eq!("est".parse::<ZoneId>(), Ok(ZoneId::Est));
        assert!("GMT".parse::<ZoneId>().is_err());
    }

    #[test]
    fn test_dst_aware_offsets() {
        assert_eq!(ZoneId::Pst.offset_seconds_at(at(2026, 1, 15, 12)), -8 * 3600);
        assert_eq!(ZoneId::Pst.offset_seconds_at(at(2026, 7, 15, 12)), -7 * 3600);
        assert_eq!(ZoneId::Ist.offset_seconds_at(at(2026, 7, 15, 12)), 19800);
    }

    #[test]
    fn test_named_zone_matches_exactly() {
        let now = at(2026, 3, 1, 12);
        let local = LocalZone::Named(Tz::America__Chicago);
        assert_eq!(resolve_local_zone(&local, now), ZoneId::Cst);
        let local = LocalZone::Named(Tz::Etc__UTC);
        assert_eq!(resolve_local_zone(&local, now), ZoneId::Utc);
    }

    #[test]
    fn test_phoenix_is_not_denver() {
        // Arizona shares MST in winter but skips DST.
        let winter = at(2026, 1, 20, 12);
        let local = LocalZone::Named(Tz::America__Phoenix);
        assert_eq!(resolve_local_zone(&local, winter), ZoneId::Mst);

        let summer = at(2026, 7, 20, 12);
        assert_eq!(resolve_local_zone(&local, summer), ZoneId::Pst);
    }

    #[test]
    fn test_unlisted_zone_picks_nearest_offset() {
        let now = at(2026, 1, 15, 12);
        let london = LocalZone::Named(Tz::Europe__London);
        assert_eq!(resolve_local_zone(&london, now), ZoneId::Utc);

        let tokyo = LocalZone::Named(Tz::Asia__Tokyo);
        assert_eq!(resolve_local_zone(&tokyo, now), ZoneId::Ist);
    }

    #[test]
    fn test_fixed_offset_matches_current_offset() {
        let now = at(2026, 1, 15, 12);
        let local = LocalZone::Offset(FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(resolve_local_zone(&local, now), ZoneId::Est);
    }

    #[test]
    fn test_parse_local_zone() {
        assert_eq!(
            LocalZone::parse("pst"),
            Some(LocalZone::Named(Tz::America__Los_Angeles))
        );
        assert_eq!(
            LocalZone::parse("Europe/Paris"),
            Some(LocalZone::Named(Tz::Europe__Paris))
        );
        assert_eq!(LocalZone::parse("Mars/Olympus"), None);
    }
}
