use serde::{Deserialize, Serialize};

use crate::data::observation::Observation;

/// The closed set of numeric attributes that can be put on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Latitude,
    Longitude,
    Elevation,
    TempMin,
    TempMax,
    TempAvg,
    AvgWind,
    Snow,
    Precipitation,
}

impl Attribute {
    /// Every selectable attribute, in the order the selectors list them.
    pub const ALL: [Attribute; 9] = [
        Attribute::Latitude,
        Attribute::Longitude,
        Attribute::Elevation,
        Attribute::TempMin,
        Attribute::TempMax,
        Attribute::TempAvg,
        Attribute::AvgWind,
        Attribute::Snow,
        Attribute::Precipitation,
    ];

    /// Stable key, matching the serialized spelling.
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Latitude => "latitude",
            Attribute::Longitude => "longitude",
            Attribute::Elevation => "elevation",
            Attribute::TempMin => "tempMin",
            Attribute::TempMax => "tempMax",
            Attribute::TempAvg => "tempAvg",
            Attribute::AvgWind => "avgWind",
            Attribute::Snow => "snow",
            Attribute::Precipitation => "precipitation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Latitude => "Latitude",
            Attribute::Longitude => "Longitude",
            Attribute::Elevation => "Elevation",
            Attribute::TempMin => "Minimum Temperature",
            Attribute::TempMax => "Maximum Temperature",
            Attribute::TempAvg => "Average Temperature",
            Attribute::AvgWind => "Average Wind",
            Attribute::Snow => "Snow",
            Attribute::Precipitation => "Precipitation",
        }
    }

    /// Read this attribute from an observation. NaN means "absent".
    pub fn value_of(&self, obs: &Observation) -> f64 {
        match self {
            Attribute::Latitude => obs.latitude,
            Attribute::Longitude => obs.longitude,
            Attribute::Elevation => obs.elevation,
            Attribute::TempMin => obs.temp_min,
            Attribute::TempMax => obs.temp_max,
            Attribute::TempAvg => obs.temp_avg,
            Attribute::AvgWind => obs.avg_wind,
            Attribute::Snow => obs.snow,
            Attribute::Precipitation => obs.precipitation,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = Attribute::ALL.iter().map(|a| a.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Attribute::ALL.len());
    }

    #[test]
    fn serde_spelling_matches_key() {
        for attr in Attribute::ALL {
            let json = serde_json::to_string(&attr).unwrap();
            assert_eq!(json, format!("\"{}\"", attr.key()));
        }
    }
}
