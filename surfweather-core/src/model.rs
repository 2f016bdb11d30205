use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A geocoding candidate: one matching place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

/// Snapshot of the conditions at the time of the request.
///
/// Fields are optional because the service may omit single measurements;
/// rendering substitutes a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub time: DateTime<FixedOffset>,
    pub temperature: Option<f64>,
    pub weather_code: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_gusts: Option<f64>,
}

/// Hour-resolution series. All vectors have identical length; index `i`
/// across every field describes the same hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<DateTime<FixedOffset>>,
    pub temperature: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
}

impl HourlySeries {
    /// Build a series, rejecting length-mismatched columns.
    pub fn new(
        time: Vec<DateTime<FixedOffset>>,
        temperature: Vec<Option<f64>>,
        weather_code: Vec<Option<i32>>,
    ) -> Result<Self, WeatherError> {
        if temperature.len() != time.len() || weather_code.len() != time.len() {
            return Err(WeatherError::shape(format!(
                "hourly columns misaligned: time={}, temperature={}, weather_code={}",
                time.len(),
                temperature.len(),
                weather_code.len()
            )));
        }
        Ok(Self {
            time,
            temperature,
            weather_code,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Day-resolution series, same alignment contract as [`HourlySeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub time: Vec<DateTime<FixedOffset>>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_max: Vec<Option<f64>>,
    pub temperature_min: Vec<Option<f64>>,
    pub wind_speed_max: Vec<Option<f64>>,
    pub wind_gusts_max: Vec<Option<f64>>,
    pub wind_direction_dominant: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn new(
        time: Vec<DateTime<FixedOffset>>,
        weather_code: Vec<Option<i32>>,
        temperature_max: Vec<Option<f64>>,
        temperature_min: Vec<Option<f64>>,
        wind_speed_max: Vec<Option<f64>>,
        wind_gusts_max: Vec<Option<f64>>,
        wind_direction_dominant: Vec<Option<f64>>,
    ) -> Result<Self, WeatherError> {
        let len = time.len();
        let columns = [
            weather_code.len(),
            temperature_max.len(),
            temperature_min.len(),
            wind_speed_max.len(),
            wind_gusts_max.len(),
            wind_direction_dominant.len(),
        ];
        if columns.iter().any(|&l| l != len) {
            return Err(WeatherError::shape(format!(
                "daily columns misaligned: time={len}, columns={columns:?}"
            )));
        }
        Ok(Self {
            time,
            weather_code,
            temperature_max,
            temperature_min,
            wind_speed_max,
            wind_gusts_max,
            wind_direction_dominant,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Normalized forecast for one location: a single current snapshot plus
/// hourly and daily series in the location's local offset.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherModel {
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}
