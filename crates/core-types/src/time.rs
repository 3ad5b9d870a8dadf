use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// The format every timestamp in a dump is written in, e.g. `2018-01-12T09:41:07.251234Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parses a dump timestamp into a UTC point in time.
///
/// The seconds must carry a fraction of one to six digits and the trailing
/// `Z` is matched literally; the value is taken as UTC. Any offset the
/// producer might have meant beyond that suffix is not interpreted.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CoreError> {
    let invalid = |source| CoreError::TimestampFormat {
        value: value.to_string(),
        expected: TIMESTAMP_FORMAT,
        source,
    };

    if !has_microsecond_fraction(value) {
        return Err(invalid(None));
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| invalid(Some(source)))
}

// chrono treats `%.f` as optional and accepts up to nine digits.
fn has_microsecond_fraction(value: &str) -> bool {
    let Some((_, fraction)) = value.strip_suffix('Z').and_then(|body| body.rsplit_once('.')) else {
        return false;
    };
    (1..=6).contains(&fraction.len()) && fraction.bytes().all(|b| b.is_ascii_digit())
}
