//! Capture timestamps for persisted records.
//!
//! Stamps are microseconds since the Unix epoch, rendered as a sortable
//! `YYYYMMDD_HHMMSS_UUUUUU` string in UTC. The clock hands them out
//! strictly increasing so document names stay unique under burst arrival.

use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wall-clock capture time at microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureStamp(i64);

impl CaptureStamp {
    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_micros())
    }

    pub fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn micros(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CaptureStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.div_euclid(1_000_000);
        let micros = self.0.rem_euclid(1_000_000);
        let dt = DateTime::<Utc>::from_timestamp(secs, (micros * 1_000) as u32)
            .unwrap_or(DateTime::UNIX_EPOCH);
        write!(f, "{}_{micros:06}", dt.format("%Y%m%d_%H%M%S"))
    }
}

impl FromStr for CaptureStamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // YYYYMMDD_HHMMSS_UUUUUU
        let invalid = || CoreError::InvalidStamp(s.to_string());
        let (datetime, micros) = s.rsplit_once('_').ok_or_else(invalid)?;
        let ndt =
            NaiveDateTime::parse_from_str(datetime, "%Y%m%d_%H%M%S").map_err(|_| invalid())?;
        let micros: i64 = micros.parse().map_err(|_| invalid())?;
        if !(0..1_000_000).contains(&micros) {
            return Err(invalid());
        }
        Ok(Self(ndt.and_utc().timestamp() * 1_000_000 + micros))
    }
}

impl Serialize for CaptureStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaptureStamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Hands out strictly increasing capture stamps.
///
/// Owned by the single dispatch context; if the wall clock has not
/// advanced past the previous stamp, the next microsecond is used.
#[derive(Debug, Default)]
pub struct CaptureClock {
    last: i64,
}

impl CaptureClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp, strictly greater than any previously returned.
    pub fn next(&mut self) -> CaptureStamp {
        let now = Utc::now().timestamp_micros();
        let stamp = if now > self.last { now } else { self.last + 1 };
        self.last = stamp;
        CaptureStamp::from_micros(stamp)
    }
}
