//! XSD temporal values
//!
//! dateTime, date and time keep their original timezone offset (if any) so the
//! canonical form can reproduce it. Values without a timezone are compared as
//! if they were UTC.

use chrono::{
    DateTime as ChronoDateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime,
    SecondsFormat, TimeZone, Timelike, Utc,
};
use std::cmp::Ordering;
use std::fmt;

/// Split a trailing `Z` or `±hh:mm` timezone off a lexical form
fn split_timezone(s: &str) -> Result<(&str, Option<FixedOffset>), String> {
    if let Some(rest) = s.strip_suffix('Z') {
        return Ok((rest, FixedOffset::east_opt(0)));
    }
    let bytes = s.as_bytes();
    if bytes.len() >= 6 {
        let sign_at = bytes.len() - 6;
        let sign = bytes[sign_at];
        if (sign == b'+' || sign == b'-') && bytes[bytes.len() - 3] == b':' {
            let (hours, mins) = s[sign_at + 1..]
                .split_once(':')
                .ok_or_else(|| format!("invalid timezone in {}", s))?;
            let hours: i32 = hours
                .parse()
                .map_err(|_| format!("invalid timezone in {}", s))?;
            let mins: i32 = mins
                .parse()
                .map_err(|_| format!("invalid timezone in {}", s))?;
            if hours > 14 || mins > 59 {
                return Err(format!("timezone out of range in {}", s));
            }
            let total = (hours * 3600 + mins * 60) * if sign == b'-' { -1 } else { 1 };
            let offset =
                FixedOffset::east_opt(total).ok_or_else(|| format!("invalid timezone in {}", s))?;
            return Ok((&s[..sign_at], Some(offset)));
        }
    }
    Ok((s, None))
}

fn format_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return "Z".to_string();
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
}

/// XSD dateTime
#[derive(Clone, Debug)]
pub struct DateTime {
    instant: ChronoDateTime<Utc>,
    tz_offset: Option<FixedOffset>,
}

impl DateTime {
    /// Parse an XSD dateTime lexical form (`2024-01-15T10:30:00.5+05:00`)
    pub fn parse(s: &str) -> Result<Self, String> {
        let (local, tz_offset) = split_timezone(s)?;
        if !local.contains('T') {
            return Err(format!("Cannot parse dateTime: {}", s));
        }
        let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
            .ok_or_else(|| format!("Cannot parse dateTime: {}", s))?;
        let instant = match tz_offset {
            Some(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| format!("Cannot parse dateTime: {}", s))?
                .with_timezone(&Utc),
            None => naive.and_utc(),
        };
        Ok(Self { instant, tz_offset })
    }

    /// Build from a chrono value, keeping its offset
    pub fn from_chrono(dt: ChronoDateTime<FixedOffset>) -> Self {
        Self {
            instant: dt.with_timezone(&Utc),
            tz_offset: Some(*dt.offset()),
        }
    }

    pub fn instant(&self) -> ChronoDateTime<Utc> {
        self.instant
    }

    pub fn tz_offset(&self) -> Option<FixedOffset> {
        self.tz_offset
    }

    /// Wall-clock time in the value's own timezone
    fn local(&self) -> NaiveDateTime {
        match self.tz_offset {
            Some(offset) => self.instant.with_timezone(&offset).naive_local(),
            None => self.instant.naive_utc(),
        }
    }

    pub fn year(&self) -> i32 {
        self.local().year()
    }

    pub fn month(&self) -> u32 {
        self.local().month()
    }

    pub fn day(&self) -> u32 {
        self.local().day()
    }

    pub fn hours(&self) -> u32 {
        self.local().hour()
    }

    pub fn minutes(&self) -> u32 {
        self.local().minute()
    }

    /// Whole seconds and the nanosecond remainder
    pub fn second_parts(&self) -> (u32, u32) {
        let local = self.local();
        (local.second(), local.nanosecond())
    }

    /// Seconds including the fractional part
    pub fn seconds(&self) -> f64 {
        let local = self.local();
        local.second() as f64 + local.nanosecond() as f64 / 1_000_000_000.0
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for DateTime {}

impl Ord for DateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tz_offset {
            Some(offset) => f.write_str(
                &self
                    .instant
                    .with_timezone(&offset)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            None => write!(f, "{}", self.instant.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// XSD date
#[derive(Clone, Debug)]
pub struct Date {
    date: NaiveDate,
    tz_offset: Option<FixedOffset>,
}

impl Date {
    /// Parse an XSD date lexical form (`2024-01-15`, `2024-01-15Z`, `2024-01-15-05:00`)
    pub fn parse(s: &str) -> Result<Self, String> {
        let (local, tz_offset) = split_timezone(s)?;
        let date = NaiveDate::parse_from_str(local, "%Y-%m-%d")
            .map_err(|_| format!("Cannot parse date: {}", s))?;
        Ok(Self { date, tz_offset })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tz_offset(&self) -> Option<FixedOffset> {
        self.tz_offset
    }
}

impl Date {
    /// Midnight of this date in its own timezone, as a UTC timestamp
    fn utc_midnight(&self) -> NaiveDateTime {
        let midnight = self.date.and_time(NaiveTime::MIN);
        let offset = self.tz_offset.map_or(0, |o| o.local_minus_utc());
        midnight
            .checked_sub_signed(chrono::Duration::seconds(offset.into()))
            .unwrap_or(midnight)
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Date {}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc_midnight().cmp(&other.utc_midnight())
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))?;
        if let Some(offset) = self.tz_offset {
            f.write_str(&format_offset(offset))?;
        }
        Ok(())
    }
}

/// XSD time
#[derive(Clone, Debug)]
pub struct Time {
    time: NaiveTime,
    tz_offset: Option<FixedOffset>,
}

impl Time {
    /// Parse an XSD time lexical form (`10:30:00`, `10:30:00.123Z`)
    pub fn parse(s: &str) -> Result<Self, String> {
        let (local, tz_offset) = split_timezone(s)?;
        let time = ["%H:%M:%S%.f", "%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(local, fmt).ok())
            .ok_or_else(|| format!("Cannot parse time: {}", s))?;
        Ok(Self { time, tz_offset })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn tz_offset(&self) -> Option<FixedOffset> {
        self.tz_offset
    }
}

impl Time {
    /// Time of day moved to UTC, wrapping around midnight
    fn utc_time(&self) -> NaiveTime {
        let Some(offset) = self.tz_offset else {
            return self.time;
        };
        let secs = (i64::from(self.time.num_seconds_from_midnight())
            - i64::from(offset.local_minus_utc()))
        .rem_euclid(86_400);
        NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, self.time.nanosecond())
            .unwrap_or(self.time)
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Time {}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc_time().cmp(&other.utc_time())
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M:%S%.f"))?;
        if let Some(offset) = self.tz_offset {
            f.write_str(&format_offset(offset))?;
        }
        Ok(())
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Unsigned decimal duration component
fn digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if all_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// XSD duration, reduced to a month count and a second count
#[derive(Clone, Debug, PartialEq)]
pub struct Duration {
    months: i64,
    seconds: f64,
}

impl Duration {
    /// Parse an XSD duration lexical form (`P1Y2M3DT4H5M6.5S`, `-PT30M`)
    pub fn parse(s: &str) -> Result<Self, String> {
        let err = || format!("Cannot parse duration: {}", s);
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let body = body.strip_prefix('P').ok_or_else(err)?;
        let (date_part, time_part) = match body.split_once('T') {
            Some((d, t)) if !t.is_empty() => (d, Some(t)),
            Some(_) => return Err(err()),
            None => (body, None),
        };
        if date_part.is_empty() && time_part.is_none() {
            return Err(err());
        }

        let mut months: i64 = 0;
        let mut seconds: f64 = 0.0;

        let mut rest = date_part;
        for (unit, factor) in [('Y', 12), ('M', 1)] {
            if let Some((num, tail)) = rest.split_once(unit) {
                let n: i64 = digits(num).ok_or_else(err)?;
                months = n
                    .checked_mul(factor)
                    .and_then(|m| months.checked_add(m))
                    .ok_or_else(err)?;
                rest = tail;
            }
        }
        if let Some((num, tail)) = rest.split_once('D') {
            let n: u64 = digits(num).ok_or_else(err)?;
            seconds += n as f64 * 86_400.0;
            rest = tail;
        }
        if !rest.is_empty() {
            return Err(err());
        }

        if let Some(mut rest) = time_part {
            for (unit, factor) in [('H', 3_600.0), ('M', 60.0)] {
                if let Some((num, tail)) = rest.split_once(unit) {
                    let n: u64 = digits(num).ok_or_else(err)?;
                    seconds += n as f64 * factor;
                    rest = tail;
                }
            }
            if let Some(num) = rest.strip_suffix('S') {
                let (whole, frac) = num.split_once('.').unwrap_or((num, "0"));
                if !all_digits(whole) || !all_digits(frac) {
                    return Err(err());
                }
                let n: f64 = num.parse().map_err(|_| err())?;
                seconds += n;
                rest = "";
            }
            if !rest.is_empty() {
                return Err(err());
            }
        }

        if negative {
            months = -months;
            seconds = -seconds;
        }
        Ok(Self { months, seconds })
    }

    pub fn months(&self) -> i64 {
        self.months
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months == 0 && self.seconds == 0.0 {
            return f.write_str("PT0S");
        }
        if self.months < 0 || self.seconds < 0.0 {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        let months = self.months.unsigned_abs();
        if months / 12 > 0 {
            write!(f, "{}Y", months / 12)?;
        }
        if months % 12 > 0 {
            write!(f, "{}M", months % 12)?;
        }
        let total = self.seconds.abs();
        let whole = total.trunc() as u64;
        let frac = total - whole as f64;
        let days = whole / 86_400;
        let hours = (whole % 86_400) / 3_600;
        let minutes = (whole % 3_600) / 60;
        let secs = (whole % 60) as f64 + frac;
        if days > 0 {
            write!(f, "{}D", days)?;
        }
        if hours > 0 || minutes > 0 || secs > 0.0 {
            f.write_str("T")?;
            if hours > 0 {
                write!(f, "{}H", hours)?;
            }
            if minutes > 0 {
                write!(f, "{}M", minutes)?;
            }
            if secs > 0.0 {
                write!(f, "{}S", secs)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_with_offset() {
        let dt = DateTime::parse("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(dt.hours(), 10);
        assert_eq!(dt.instant().hour(), 5);
        assert_eq!(dt.to_string(), "2024-01-15T10:30:00+05:00");
    }

    #[test]
    fn test_datetime_without_timezone() {
        let dt = DateTime::parse("2024-01-15T10:30:00.25").unwrap();
        assert!(dt.tz_offset().is_none());
        assert_eq!(dt.seconds(), 0.25);
        assert_eq!(dt.to_string(), "2024-01-15T10:30:00.250");
    }

    #[test]
    fn test_datetime_equality_uses_instant() {
        let a = DateTime::parse("2024-01-15T10:30:00Z").unwrap();
        let b = DateTime::parse("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_datetime_rejects_date_only() {
        assert!(DateTime::parse("2024-01-15").is_err());
    }

    #[test]
    fn test_date_and_time() {
        let d = Date::parse("2024-02-29-05:00").unwrap();
        assert_eq!(d.to_string(), "2024-02-29-05:00");
        assert!(Date::parse("2023-02-29").is_err());

        let t = Time::parse("23:59:59Z").unwrap();
        assert_eq!(t.to_string(), "23:59:59Z");
        assert!(Time::parse("25:00:00").is_err());
    }

    #[test]
    fn test_duration_parse() {
        let d = Duration::parse("P1Y2M3DT4H5M6.5S").unwrap();
        assert_eq!(d.months(), 14);
        assert_eq!(d.seconds(), 3.0 * 86_400.0 + 4.0 * 3_600.0 + 5.0 * 60.0 + 6.5);
        assert_eq!(d.to_string(), "P1Y2M3DT4H5M6.5S");

        let neg = Duration::parse("-PT30M").unwrap();
        assert_eq!(neg.seconds(), -1800.0);
        assert_eq!(neg.to_string(), "-PT30M");
    }

    #[test]
    fn test_duration_rejects_malformed() {
        for bad in ["P", "PT", "1Y", "P1S", "PT1.S", "P1DT", "PTS"] {
            assert!(Duration::parse(bad).is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_duration_rejects_signed_components() {
        for bad in ["P-1Y", "P+1Y", "P1Y-2M", "PT+5S", "PT-1H", "P1DT1E2S"] {
            assert!(Duration::parse(bad).is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_duration_overflow_is_an_error() {
        assert!(Duration::parse("P999999999999999999Y").is_err());
        assert!(Duration::parse("P768614336404564651Y").is_err());
        assert_eq!(Duration::parse("P1000Y").unwrap().months(), 12_000);
    }

    #[test]
    fn test_time_comparison_uses_offsets() {
        let utc = Time::parse("10:00:00Z").unwrap();
        let east = Time::parse("10:00:00+05:00").unwrap();
        assert_ne!(utc, east);
        assert!(east < utc);
        assert_eq!(Time::parse("05:00:00Z").unwrap(), east);
        // wraps around midnight
        assert_eq!(
            Time::parse("01:00:00+02:00").unwrap(),
            Time::parse("23:00:00Z").unwrap()
        );
        // no timezone compares as UTC
        assert_eq!(Time::parse("10:00:00").unwrap(), utc);
    }

    #[test]
    fn test_date_comparison_uses_offsets() {
        let utc = Date::parse("2024-01-15Z").unwrap();
        let east = Date::parse("2024-01-15+05:00").unwrap();
        assert_ne!(utc, east);
        assert!(east < utc);
        assert_eq!(Date::parse("2024-01-15").unwrap(), utc);
        assert!(Date::parse("2024-01-14Z").unwrap() < east);
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(Duration::parse("P0D").unwrap().to_string(), "PT0S");
    }
}
