//! Transaction timestamps.
//!
//! The host assigns every transaction a `(seconds, nanos)` timestamp. The
//! registry stamps it onto mutated assets as `UpdatedAt`, serialized as an
//! RFC 3339 string.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// A host-assigned transaction time. Ordered by seconds, then nanos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl TxTimestamp {
    /// Create a timestamp, rejecting out-of-range nanos.
    pub fn new(seconds: i64, nanos: u32) -> Result<Self> {
        if nanos >= NANOS_PER_SECOND {
            return Err(CoreError::InvalidTimestamp { seconds, nanos });
        }
        Ok(Self { seconds, nanos })
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Convert to a UTC datetime.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos).ok_or(CoreError::InvalidTimestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        })
    }
}

impl From<DateTime<Utc>> for TxTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_overflowing_nanos() {
        assert!(TxTimestamp::new(10, NANOS_PER_SECOND).is_err());
        assert!(TxTimestamp::new(10, NANOS_PER_SECOND - 1).is_ok());
    }

    #[test]
    fn test_ordering() {
        let a = TxTimestamp::new(10, 500).unwrap();
        let b = TxTimestamp::new(10, 501).unwrap();
        let c = TxTimestamp::new(11, 0).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_datetime_conversion() {
        let ts = TxTimestamp::new(1_700_000_000, 250).unwrap();
        let dt = ts.to_datetime().unwrap();
        assert_eq!(TxTimestamp::from(dt), ts);
        assert_eq!(dt.to_rfc3339(), "2023-11-14T22:13:20.000000250+00:00");
    }
}
