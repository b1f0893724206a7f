use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use crate::data::observation::Observation;
use crate::error::LoadError;

/// Column headers the station file must carry.
const STATION: &str = "station";
const STATE: &str = "state";
const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";
const ELEVATION: &str = "elevation";
const DATE: &str = "date";
const TMIN: &str = "TMIN";
const TMAX: &str = "TMAX";
const TAVG: &str = "TAVG";
const AWND: &str = "AWND";
const SNOW: &str = "SNOW";
const PRCP: &str = "PRCP";

const REQUIRED_COLUMNS: [&str; 12] = [
    STATION, STATE, LATITUDE, LONGITUDE, ELEVATION, DATE, TMIN, TMAX, TAVG, AWND, SNOW, PRCP,
];

/// The loaded, immutable set of observations.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct state codes, sorted.
    pub fn states(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|o| o.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest and largest decodable year, if any row has one.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let mut years = self.observations.iter().filter_map(|o| o.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

/// Load a station file from disk.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let content = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Fall back to latin1 (each byte maps to the same code point).
    let text = String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    let dataset = load_from_reader(text.as_bytes())?;
    tracing::info!(
        "Loaded {} observations ({} states) from {:?}",
        dataset.len(),
        dataset.states().len(),
        path
    );
    Ok(dataset)
}

/// Parse station rows from any reader. The first record is the header.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let index: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();
    let mut columns: HashMap<&'static str, usize> = HashMap::new();
    for name in REQUIRED_COLUMNS {
        let idx = *index.get(name).ok_or(LoadError::MissingColumn(name))?;
        columns.insert(name, idx);
    }

    let mut seq_by_key: HashMap<(String, Option<i64>), u32> = HashMap::new();
    let mut observations = Vec::new();
    let mut bad_dates = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable record: {e}");
                continue;
            }
        };
        let get = |name: &str| cell(&record, &columns, name);
        let num = |name: &str| parse_number(get(name));

        let date = parse_date_code(get(DATE));
        let mut obs = Observation::blank(get(STATION), get(STATE)).with_date(date);
        if obs.month.is_none() {
            bad_dates += 1;
        }
        obs.latitude = num(LATITUDE);
        obs.longitude = num(LONGITUDE);
        obs.elevation = num(ELEVATION);
        obs.temp_min = num(TMIN);
        obs.temp_max = num(TMAX);
        obs.temp_avg = num(TAVG);
        obs.avg_wind = num(AWND);
        obs.snow = num(SNOW);
        obs.precipitation = num(PRCP);

        let seq = seq_by_key
            .entry((obs.station.clone(), obs.date))
            .or_insert(0);
        obs.key.seq = *seq;
        *seq += 1;

        observations.push(obs);
    }

    if bad_dates > 0 {
        tracing::debug!("{bad_dates} rows have no decodable date");
    }

    Ok(Dataset::new(observations))
}

fn cell<'r>(record: &'r csv::StringRecord, columns: &HashMap<&str, usize>, name: &str) -> &'r str {
    columns
        .get(name)
        .and_then(|&i| record.get(i))
        .unwrap_or("")
}

/// Lenient float parse: anything unparseable or non-finite is NaN.
pub fn parse_number(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

/// Parse a `YYYYMMDD` cell. Accepts integral floats such as `20170101.0`.
fn parse_date_code(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(code) = s.parse::<i64>() {
        return Some(code);
    }
    let v = s.parse::<f64>().ok()?;
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}
