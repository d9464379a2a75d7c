//! Market data rows and their response shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Values above this are read as epoch milliseconds, anything else as seconds.
pub const MILLISECONDS_THRESHOLD: f64 = 1e12;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// One candle as stored, numeric columns widened to `float8`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RawRow {
    pub open_time: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// One candle as returned by `/data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRecord {
    pub open_time: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl From<RawRow> for DataRecord {
    fn from(row: RawRow) -> Self {
        let open_time = row.open_time.and_then(|raw| {
            let converted = open_time_to_iso(raw);
            if converted.is_none() {
                tracing::warn!(open_time = raw, "open_time outside the representable range");
            }
            converted
        });

        Self {
            open_time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Convert an epoch timestamp of unknown unit to ISO-8601 UTC with a `Z` suffix.
///
/// The unit is guessed from magnitude (see [`MILLISECONDS_THRESHOLD`]), which
/// misreads millisecond values from before 2001-09-09 as seconds. Fractions
/// are kept to the microsecond and printed only when non-zero. Returns `None`
/// for non-finite or out-of-range input.
pub fn open_time_to_iso(raw: f64) -> Option<String> {
    if !raw.is_finite() {
        return None;
    }

    let micros = if raw > MILLISECONDS_THRESHOLD {
        raw * 1_000.0
    } else {
        raw * 1_000_000.0
    };
    // saturating cast; out-of-range values are rejected by from_timestamp
    let micros = micros.round() as i64;

    let secs = micros.div_euclid(MICROS_PER_SECOND);
    let frac = micros.rem_euclid(MICROS_PER_SECOND);
    let at = DateTime::<Utc>::from_timestamp(secs, (frac * 1_000) as u32)?;

    let base = at.format("%Y-%m-%dT%H:%M:%S");
    Some(if frac == 0 {
        format!("{base}Z")
    } else {
        format!("{base}.{frac:06}Z")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(open_time: Option<f64>) -> RawRow {
        RawRow {
            open_time,
            open: Some(37_000.5),
            high: Some(37_100.0),
            low: None,
            close: Some(37_050.25),
            volume: Some(12.75),
        }
    }

    #[test]
    fn test_seconds() {
        assert_eq!(open_time_to_iso(1_700_000_000.0).as_deref(), Some("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn test_milliseconds_same_instant() {
        assert_eq!(
            open_time_to_iso(1_700_000_000_000.0),
            open_time_to_iso(1_700_000_000.0)
        );
    }

    #[test]
    fn test_fractions() {
        assert_eq!(
            open_time_to_iso(1_700_000_000_500.0).as_deref(),
            Some("2023-11-14T22:13:20.500000Z")
        );
        assert_eq!(
            open_time_to_iso(1_700_000_000.25).as_deref(),
            Some("2023-11-14T22:13:20.250000Z")
        );
        assert_eq!(
            open_time_to_iso(-1.5).as_deref(),
            Some("1969-12-31T23:59:58.500000Z")
        );
    }

    #[test]
    fn test_threshold_boundary() {
        // Exactly 1e12 is not above the threshold: read as seconds, far future.
        let at_threshold = open_time_to_iso(1e12).unwrap();
        assert_ne!(at_threshold, "2001-09-09T01:46:40Z");
        assert!(!at_threshold.starts_with("2001"));

        // One past it flips to milliseconds.
        assert_eq!(
            open_time_to_iso(1e12 + 1.0).as_deref(),
            Some("2001-09-09T01:46:40.001000Z")
        );
    }

    #[test]
    fn test_mixed_units_are_not_reconciled() {
        // An early-2001 millisecond value sits below the threshold and is
        // misread as seconds; the heuristic is kept as is.
        let ms_in_2001 = 980_000_000_000.0;
        let converted = open_time_to_iso(ms_in_2001).unwrap();
        assert!(!converted.starts_with("2001"), "{converted}");

        let seconds_in_2001 = open_time_to_iso(980_000_000.0).unwrap();
        assert!(seconds_in_2001.starts_with("2001-01-20"), "{seconds_in_2001}");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(open_time_to_iso(f64::NAN), None);
        assert_eq!(open_time_to_iso(f64::INFINITY), None);
    }

    #[test]
    fn test_record_from_row() {
        let record = DataRecord::from(row(Some(1_700_000_000.0)));
        assert_eq!(
            record,
            DataRecord {
                open_time: Some("2023-11-14T22:13:20Z".into()),
                open: Some(37_000.5),
                high: Some(37_100.0),
                low: None,
                close: Some(37_050.25),
                volume: Some(12.75),
            }
        );
    }

    #[test]
    fn test_null_open_time() {
        let record = DataRecord::from(row(None));
        assert_eq!(record.open_time, None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["open_time"], serde_json::Value::Null);
        assert_eq!(json["low"], serde_json::Value::Null);
        assert_eq!(json["close"], serde_json::json!(37_050.25));
    }
}
