//! Forecast fetching and normalization.
//!
//! The forecast collaborator returns a columnar payload: per granularity a
//! sampling window (`time`, `time_end`, `interval`, all seconds UTC) plus one
//! flat value array per requested variable, addressed positionally in request
//! order. Normalization reconstructs the sample count as
//! `(time_end - time) / interval`, generates the local timestamp of sample
//! `i` as `time + i * interval` shifted into the location's UTC offset, and
//! re-zips the columns into the [`WeatherModel`].

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;

use crate::error::{WeatherError, truncate_body};
use crate::model::{CurrentConditions, DailySeries, HourlySeries, Location, WeatherModel};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Forecast model selector sent with every request.
const FORECAST_MODEL: &str = "icon_seamless";

/// Variables requested for the current snapshot, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentVariable {
    Temperature,
    WeatherCode,
    WindSpeed,
    WindDirection,
    WindGusts,
}

impl CurrentVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature_2m",
            Self::WeatherCode => "weather_code",
            Self::WindSpeed => "wind_speed_10m",
            Self::WindDirection => "wind_direction_10m",
            Self::WindGusts => "wind_gusts_10m",
        }
    }

    pub const fn requested() -> &'static [Self] {
        &[
            Self::Temperature,
            Self::WeatherCode,
            Self::WindSpeed,
            Self::WindDirection,
            Self::WindGusts,
        ]
    }
}

/// Variables requested per hour, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourlyVariable {
    Temperature,
    WeatherCode,
}

impl HourlyVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature_2m",
            Self::WeatherCode => "weather_code",
        }
    }

    pub const fn requested() -> &'static [Self] {
        &[Self::Temperature, Self::WeatherCode]
    }
}

/// Variables requested per day, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyVariable {
    WeatherCode,
    TemperatureMax,
    TemperatureMin,
    WindSpeedMax,
    WindGustsMax,
    WindDirectionDominant,
}

impl DailyVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeatherCode => "weather_code",
            Self::TemperatureMax => "temperature_2m_max",
            Self::TemperatureMin => "temperature_2m_min",
            Self::WindSpeedMax => "wind_speed_10m_max",
            Self::WindGustsMax => "wind_gusts_10m_max",
            Self::WindDirectionDominant => "wind_direction_10m_dominant",
        }
    }

    pub const fn requested() -> &'static [Self] {
        &[
            Self::WeatherCode,
            Self::TemperatureMax,
            Self::TemperatureMin,
            Self::WindSpeedMax,
            Self::WindGustsMax,
            Self::WindDirectionDominant,
        ]
    }
}

/// The fixed request configuration for one coordinate pair.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl ForecastRequest {
    pub fn for_location(location: &Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        fn join<T>(vars: &[T], as_str: impl Fn(&T) -> &'static str) -> String {
            vars.iter().map(as_str).collect::<Vec<_>>().join(",")
        }

        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            (
                "current",
                join(CurrentVariable::requested(), CurrentVariable::as_str),
            ),
            (
                "hourly",
                join(HourlyVariable::requested(), HourlyVariable::as_str),
            ),
            (
                "daily",
                join(DailyVariable::requested(), DailyVariable::as_str),
            ),
            ("wind_speed_unit", "ms".to_string()),
            ("models", FORECAST_MODEL.to_string()),
            ("timeformat", "unixtime".to_string()),
        ]
    }
}

/// Wire payload. `variables` arrays are positional in request order.
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub utc_offset_seconds: i32,
    pub current: Option<CurrentBlock>,
    pub hourly: Option<SeriesBlock>,
    pub daily: Option<SeriesBlock>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentBlock {
    /// Unix seconds, UTC.
    pub time: i64,
    pub variables: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesBlock {
    /// Window start, unix seconds UTC.
    pub time: i64,
    /// Window end (exclusive), unix seconds UTC.
    pub time_end: i64,
    /// Sampling interval in seconds.
    pub interval: i64,
    pub variables: Vec<Vec<Option<f64>>>,
}

impl SeriesBlock {
    /// Number of samples in the window: `(time_end - time) / interval`.
    fn sample_count(&self, granularity: &str) -> Result<usize, WeatherError> {
        if self.interval <= 0 {
            return Err(WeatherError::shape(format!(
                "{granularity}: non-positive interval {}",
                self.interval
            )));
        }
        let window = self.time_end - self.time;
        if window < 0 || window % self.interval != 0 {
            return Err(WeatherError::shape(format!(
                "{granularity}: window {window}s not divisible by interval {}s",
                self.interval
            )));
        }
        usize::try_from(window / self.interval)
            .map_err(|_| WeatherError::shape(format!("{granularity}: window out of range")))
    }

    /// Positional column lookup, bounded to `count` values.
    fn column(
        &self,
        index: usize,
        count: usize,
        granularity: &str,
        name: &str,
    ) -> Result<Vec<Option<f64>>, WeatherError> {
        let values = self.variables.get(index).ok_or_else(|| {
            WeatherError::shape(format!("{granularity}: missing variable {name} at {index}"))
        })?;
        if values.len() < count {
            return Err(WeatherError::shape(format!(
                "{granularity}: variable {name} has {} values, expected {count}",
                values.len()
            )));
        }
        Ok(values[..count].to_vec())
    }
}

fn display_offset(utc_offset_seconds: i32) -> Result<FixedOffset, WeatherError> {
    FixedOffset::east_opt(utc_offset_seconds)
        .ok_or_else(|| WeatherError::shape(format!("bad UTC offset {utc_offset_seconds}s")))
}

fn local_time(unix: i64, offset: FixedOffset) -> Result<DateTime<FixedOffset>, WeatherError> {
    DateTime::from_timestamp(unix, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| WeatherError::shape(format!("timestamp {unix} out of range")))
}

fn local_timestamps(
    block: &SeriesBlock,
    count: usize,
    offset: FixedOffset,
) -> Result<Vec<DateTime<FixedOffset>>, WeatherError> {
    (0..count)
        .map(|i| local_time(block.time + i as i64 * block.interval, offset))
        .collect()
}

fn as_code(value: Option<f64>) -> Option<i32> {
    value.map(|v| v.round() as i32)
}

/// Reshape the columnar payload into the per-hour/per-day display model.
pub fn normalize(payload: ForecastPayload) -> Result<WeatherModel, WeatherError> {
    let offset = display_offset(payload.utc_offset_seconds)?;

    let current_block = payload
        .current
        .ok_or_else(|| WeatherError::shape("payload has no current block"))?;
    let hourly_block = payload
        .hourly
        .ok_or_else(|| WeatherError::shape("payload has no hourly block"))?;
    let daily_block = payload
        .daily
        .ok_or_else(|| WeatherError::shape("payload has no daily block"))?;

    let expected = CurrentVariable::requested().len();
    if current_block.variables.len() != expected {
        return Err(WeatherError::shape(format!(
            "current: got {} variables, requested {expected}",
            current_block.variables.len()
        )));
    }
    let current = CurrentConditions {
        time: local_time(current_block.time, offset)?,
        temperature: current_block.variables[0],
        weather_code: as_code(current_block.variables[1]),
        wind_speed: current_block.variables[2],
        wind_direction: current_block.variables[3],
        wind_gusts: current_block.variables[4],
    };

    let expected = HourlyVariable::requested().len();
    if hourly_block.variables.len() != expected {
        return Err(WeatherError::shape(format!(
            "hourly: got {} variables, requested {expected}",
            hourly_block.variables.len()
        )));
    }
    let count = hourly_block.sample_count("hourly")?;
    let hourly = HourlySeries::new(
        local_timestamps(&hourly_block, count, offset)?,
        hourly_block.column(0, count, "hourly", "temperature_2m")?,
        hourly_block
            .column(1, count, "hourly", "weather_code")?
            .into_iter()
            .map(as_code)
            .collect(),
    )?;

    let expected = DailyVariable::requested().len();
    if daily_block.variables.len() != expected {
        return Err(WeatherError::shape(format!(
            "daily: got {} variables, requested {expected}",
            daily_block.variables.len()
        )));
    }
    let count = daily_block.sample_count("daily")?;
    let daily = DailySeries::new(
        local_timestamps(&daily_block, count, offset)?,
        daily_block
            .column(0, count, "daily", "weather_code")?
            .into_iter()
            .map(as_code)
            .collect(),
        daily_block.column(1, count, "daily", "temperature_2m_max")?,
        daily_block.column(2, count, "daily", "temperature_2m_min")?,
        daily_block.column(3, count, "daily", "wind_speed_10m_max")?,
        daily_block.column(4, count, "daily", "wind_gusts_10m_max")?,
        daily_block.column(5, count, "daily", "wind_direction_10m_dominant")?,
    )?;

    Ok(WeatherModel {
        current,
        hourly,
        daily,
    })
}

/// Seam for the forecast collaborator, stubbed in controller tests.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<WeatherModel, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(FORECAST_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ForecastProvider for ForecastClient {
    async fn fetch(&self, location: &Location) -> Result<WeatherModel, WeatherError> {
        let request = ForecastRequest::for_location(location);

        let res = self
            .http
            .get(&self.base_url)
            .query(&request.query_params())
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "forecast request failed");
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let payload: ForecastPayload = serde_json::from_str(&body)
            .map_err(|e| WeatherError::decode(format!("forecast JSON: {e}")))?;

        let model = normalize(payload)?;
        tracing::debug!(
            city = %location.name,
            hours = model.hourly.len(),
            days = model.daily.len(),
            "forecast normalized"
        );
        Ok(model)
    }
}
