use chrono::{Datelike, NaiveDate};

/// Stable identity of one observation across renders.
///
/// `seq` is 0 for the first row of a given station/date pair and counts up for
/// duplicates, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationKey {
    pub station: String,
    pub date: Option<i64>,
    pub seq: u32,
}

/// One row of the station file. Numeric fields are NaN when the source cell
/// did not parse.
#[derive(Debug, Clone)]
pub struct Observation {
    pub key: ObservationKey,
    pub station: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    /// Raw `YYYYMMDD` date code.
    pub date: Option<i64>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_avg: f64,
    pub avg_wind: f64,
    pub snow: f64,
    pub precipitation: f64,
}

impl Observation {
    /// Build an observation with every measurement absent. Used by the loader
    /// and by tests that only care about a few fields.
    pub fn blank(station: &str, state: &str) -> Self {
        Self {
            key: ObservationKey {
                station: station.to_string(),
                date: None,
                seq: 0,
            },
            station: station.to_string(),
            state: state.to_string(),
            latitude: f64::NAN,
            longitude: f64::NAN,
            elevation: f64::NAN,
            date: None,
            month: None,
            year: None,
            temp_min: f64::NAN,
            temp_max: f64::NAN,
            temp_avg: f64::NAN,
            avg_wind: f64::NAN,
            snow: f64::NAN,
            precipitation: f64::NAN,
        }
    }

    /// Set the date code and the fields derived from it.
    pub fn with_date(mut self, code: Option<i64>) -> Self {
        let decoded = code.and_then(decode_date_code);
        self.date = code;
        self.key.date = code;
        self.month = decoded.map(|d| d.month());
        self.year = decoded.map(|d| d.year());
        self
    }
}

/// Decode a `YYYYMMDD` integer into a calendar date.
pub fn decode_date_code(code: i64) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&code.to_string(), "%Y%m%d").ok()
}
