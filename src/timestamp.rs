//! UUIDv6 timestamp and the instant types it can be built from

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::Error;

/// Number of 100-nanosecond ticks between 1582-10-15T00:00:00Z and 1970-01-01T00:00:00Z.
pub const GREGORIAN_OFFSET: u64 = 0x01B2_1DD2_1381_4000;

const NANOS_PER_SEC: i128 = 1_000_000_000;
const NANOS_PER_TICK: i128 = 100;

/// A 60-bit count of 100-nanosecond ticks since the Gregorian epoch (1582-10-15T00:00:00Z), as
/// stored in the time fields of a UUIDv6.
///
/// # Examples
///
/// ```rust
/// use uuid6::Timestamp;
///
/// let t = Timestamp::from_unix_nanos(1_496_854_535_812_946_000)?;
/// assert_eq!(t.ticks(), 0x1e74ba220616934);
/// assert_eq!(t.to_datetime().to_rfc3339(), "2017-06-07T16:55:35.812946+00:00");
/// # Ok::<(), uuid6::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The largest tick count representable in the 60-bit timestamp field.
    pub const MAX_TICKS: u64 = (1 << 60) - 1;

    /// Creates a timestamp from a raw tick count, returning `None` if it does not fit in 60 bits.
    pub const fn from_ticks(ticks: u64) -> Option<Self> {
        if ticks > Self::MAX_TICKS {
            None
        } else {
            Some(Self(ticks))
        }
    }

    /// Returns the raw tick count.
    pub const fn ticks(&self) -> u64 {
        self.0
    }

    /// Creates a timestamp from nanoseconds since the Unix epoch, truncating to whole ticks.
    pub fn from_unix_nanos(nanos: i128) -> Result<Self, Error> {
        let ticks = nanos.div_euclid(NANOS_PER_TICK) + GREGORIAN_OFFSET as i128;
        if (0..=Self::MAX_TICKS as i128).contains(&ticks) {
            Ok(Self(ticks as u64))
        } else {
            Err(Error::InvalidArgument(format!(
                "instant {nanos}ns from Unix epoch is outside the UUIDv6 timestamp range"
            )))
        }
    }

    /// Returns the number of nanoseconds since the Unix epoch.
    pub const fn to_unix_nanos(&self) -> i128 {
        (self.0 as i128 - GREGORIAN_OFFSET as i128) * NANOS_PER_TICK
    }

    /// Creates a timestamp from fractional seconds since the Unix epoch.
    pub fn from_unix_secs_f64(secs: f64) -> Result<Self, Error> {
        if !secs.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "non-finite Unix timestamp: {secs}"
            )));
        }
        let whole = secs.floor();
        let frac_nanos = ((secs - whole) * 1e9) as i128;
        // float-to-int casts saturate, so only the scaling can overflow
        (whole as i128)
            .checked_mul(NANOS_PER_SEC)
            .and_then(|nanos| nanos.checked_add(frac_nanos))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Unix timestamp {secs} is outside the UUIDv6 timestamp range"
                ))
            })
            .and_then(Self::from_unix_nanos)
    }

    /// Creates a timestamp from a time-zone-aware calendar time.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Result<Self, Error> {
        Self::from_unix_nanos(
            dt.timestamp() as i128 * NANOS_PER_SEC + dt.timestamp_subsec_nanos() as i128,
        )
    }

    /// Returns the UTC calendar time the timestamp denotes.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        let nanos = self.to_unix_nanos();
        DateTime::from_timestamp(
            nanos.div_euclid(NANOS_PER_SEC) as i64,
            nanos.rem_euclid(NANOS_PER_SEC) as u32,
        )
        .expect("60-bit timestamp must fit in calendar range")
    }

    /// Creates a timestamp from a [`SystemTime`].
    pub fn from_system_time(time: SystemTime) -> Result<Self, Error> {
        let nanos = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_nanos() as i128,
            Err(e) => -(e.duration().as_nanos() as i128),
        };
        Self::from_unix_nanos(nanos)
    }

    /// Returns the [`SystemTime`] the timestamp denotes, or `None` if the platform cannot
    /// represent it.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let nanos = self.to_unix_nanos();
        let d = Duration::new(
            (nanos.unsigned_abs() / NANOS_PER_SEC as u128) as u64,
            (nanos.unsigned_abs() % NANOS_PER_SEC as u128) as u32,
        );
        if nanos >= 0 {
            UNIX_EPOCH.checked_add(d)
        } else {
            UNIX_EPOCH.checked_sub(d)
        }
    }
}

/// The instant to embed in a generated UUID, in any of the accepted shapes.
///
/// Every variant is normalized to a [`Timestamp`] by [`AsOf::to_timestamp`] before the generator
/// runs.
#[derive(Clone, PartialEq, Debug)]
pub enum AsOf {
    /// Seconds since the Unix epoch, possibly fractional.
    Seconds(f64),

    /// Time-zone-aware calendar time.
    DateTime(DateTime<Utc>),

    /// Calendar time without a time zone, interpreted as UTC.
    Naive(NaiveDateTime),

    /// A [`SystemTime`] value.
    SystemTime(SystemTime),

    /// RFC 3339 text such as `2020-11-10T02:41:42.182162Z`.
    Rfc3339(String),
}

impl AsOf {
    /// Normalizes the instant into a UUIDv6 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the value is non-finite, unparseable, or outside the
    /// range representable by the 60-bit timestamp field.
    pub fn to_timestamp(&self) -> Result<Timestamp, Error> {
        match self {
            Self::Seconds(secs) => Timestamp::from_unix_secs_f64(*secs),
            Self::DateTime(dt) => Timestamp::from_datetime(dt),
            Self::Naive(naive) => Timestamp::from_datetime(&Utc.from_utc_datetime(naive)),
            Self::SystemTime(time) => Timestamp::from_system_time(*time),
            Self::Rfc3339(text) => DateTime::parse_from_rfc3339(text)
                .map_err(|err| {
                    Error::InvalidArgument(format!("unexpected value for as_of {text:?}: {err}"))
                })
                .and_then(|dt| Timestamp::from_datetime(&dt)),
        }
    }
}

impl From<f64> for AsOf {
    fn from(src: f64) -> Self {
        Self::Seconds(src)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for AsOf {
    fn from(src: DateTime<Tz>) -> Self {
        Self::DateTime(src.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for AsOf {
    fn from(src: NaiveDateTime) -> Self {
        Self::Naive(src)
    }
}

impl From<SystemTime> for AsOf {
    fn from(src: SystemTime) -> Self {
        Self::SystemTime(src)
    }
}

impl From<&str> for AsOf {
    fn from(src: &str) -> Self {
        Self::Rfc3339(src.to_owned())
    }
}

impl From<String> for AsOf {
    fn from(src: String) -> Self {
        Self::Rfc3339(src)
    }
}
