//! Derived display values for the forecast view.
//!
//! Everything here is a pure function of the [`WeatherModel`] and the
//! selected day index; rendering decides only layout. Numeric values are
//! rounded to whole units and absent measurements render as `--`.

use chrono::{Datelike, Weekday};

use crate::condition::WeatherCondition;
use crate::model::WeatherModel;

pub const HOURS_PER_DAY: usize = 24;

/// Placeholder for absent measurements.
pub const PLACEHOLDER: &str = "--";

/// Round to the nearest whole unit, or the placeholder when absent.
pub fn format_measure(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v.round() as i64),
        None => PLACEHOLDER.to_string(),
    }
}

/// True when the selected day's calendar date (display timezone) equals the
/// date of the current snapshot.
pub fn is_current_day(model: &WeatherModel, day: usize) -> bool {
    model
        .daily
        .time
        .get(day)
        .is_some_and(|t| t.date_naive() == model.current.time.date_naive())
}

/// One cell of the hourly strip.
#[derive(Debug, Clone, PartialEq)]
pub struct HourCell {
    /// Wall-clock label, e.g. "14:00".
    pub time: String,
    pub glyph: &'static str,
    pub temperature: String,
}

/// Hourly strip for the selected day: the 24-entry window starting at the
/// day's hour 0, bounded by the series length. The current day also starts
/// at hour 0, past hours are not trimmed.
pub fn hourly_strip(model: &WeatherModel, day: usize) -> Vec<HourCell> {
    let start = day * HOURS_PER_DAY;
    let end = (start + HOURS_PER_DAY).min(model.hourly.len());
    if start >= end {
        return Vec::new();
    }
    (start..end)
        .map(|i| HourCell {
            time: model.hourly.time[i].format("%H:%M").to_string(),
            glyph: condition_at(model.hourly.weather_code[i]).glyph(),
            temperature: format_measure(model.hourly.temperature[i]),
        })
        .collect()
}

/// One cell of the multi-day strip.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    /// "Heute" for the current day, otherwise e.g. "Sa 1.".
    pub label: String,
    pub glyph: &'static str,
    pub temperature_max: String,
    pub temperature_min: String,
    pub selected: bool,
}

pub fn day_strip(model: &WeatherModel, selected_day: usize) -> Vec<DayCell> {
    (0..model.daily.len())
        .map(|i| {
            let time = model.daily.time[i];
            let label = if is_current_day(model, i) {
                "Heute".to_string()
            } else {
                format!("{} {}.", weekday_short(time.weekday()), time.day())
            };
            DayCell {
                label,
                glyph: condition_at(model.daily.weather_code[i]).glyph(),
                temperature_max: format_measure(model.daily.temperature_max[i]),
                temperature_min: format_measure(model.daily.temperature_min[i]),
                selected: i == selected_day,
            }
        })
        .collect()
}

/// Detail panel for the selected day. On the current day the snapshot values
/// replace the daily aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// "Jetzt" on the current day, otherwise the long weekday name.
    pub label: String,
    pub is_current: bool,
    pub glyph: &'static str,
    pub condition: &'static str,
    pub temperature: String,
    /// Only shown for non-current days (daily minimum).
    pub temperature_min: Option<String>,
    pub wind_speed: String,
    pub wind_gusts: String,
    pub wind_direction: String,
}

pub fn day_summary(model: &WeatherModel, day: usize) -> Option<DaySummary> {
    if day >= model.daily.len() {
        return None;
    }
    let is_current = is_current_day(model, day);
    let condition = condition_at(model.daily.weather_code[day]);

    let summary = if is_current {
        DaySummary {
            label: "Jetzt".to_string(),
            is_current,
            glyph: condition.glyph(),
            condition: condition.label(),
            temperature: format_measure(model.current.temperature),
            temperature_min: None,
            wind_speed: format_measure(model.current.wind_speed),
            wind_gusts: format_measure(model.current.wind_gusts),
            wind_direction: format_measure(model.current.wind_direction),
        }
    } else {
        let time = model.daily.time[day];
        DaySummary {
            label: weekday_long(time.weekday()).to_string(),
            is_current,
            glyph: condition.glyph(),
            condition: condition.label(),
            temperature: format_measure(model.daily.temperature_max[day]),
            temperature_min: Some(format_measure(model.daily.temperature_min[day])),
            wind_speed: format_measure(model.daily.wind_speed_max[day]),
            wind_gusts: format_measure(model.daily.wind_gusts_max[day]),
            wind_direction: format_measure(model.daily.wind_direction_dominant[day]),
        }
    };
    Some(summary)
}

fn condition_at(code: Option<i32>) -> WeatherCondition {
    code.map(WeatherCondition::from_wmo_code).unwrap_or_default()
}

fn weekday_short(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Di",
        Weekday::Wed => "Mi",
        Weekday::Thu => "Do",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "So",
    }
}

fn weekday_long(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, DailySeries, HourlySeries};
    use chrono::{FixedOffset, TimeZone};

    // 2024-06-01 is a Saturday.
    fn model(days: usize, current_hour: u32) -> WeatherModel {
        let tz = FixedOffset::east_opt(7_200).unwrap();
        let day0 = tz.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let hours = days * HOURS_PER_DAY;
        WeatherModel {
            current: CurrentConditions {
                time: tz
                    .with_ymd_and_hms(2024, 6, 1, current_hour, 0, 0)
                    .unwrap(),
                temperature: Some(21.6),
                weather_code: Some(2),
                wind_speed: Some(4.2),
                wind_direction: Some(200.4),
                wind_gusts: Some(8.1),
            },
            hourly: HourlySeries::new(
                (0..hours)
                    .map(|i| day0 + chrono::Duration::hours(i as i64))
                    .collect(),
                (0..hours).map(|i| Some(10.0 + (i % 24) as f64)).collect(),
                vec![Some(0); hours],
            )
            .unwrap(),
            daily: DailySeries::new(
                (0..days)
                    .map(|i| day0 + chrono::Duration::days(i as i64))
                    .collect(),
                vec![Some(61); days],
                vec![Some(22.4); days],
                vec![Some(12.5); days],
                vec![Some(6.4); days],
                vec![Some(10.8); days],
                vec![Some(180.0); days],
            )
            .unwrap(),
        }
    }

    #[test]
    fn absent_measurements_render_as_placeholder() {
        assert_eq!(format_measure(None), "--");
    }

    #[test]
    fn measurements_round_to_whole_units() {
        assert_eq!(format_measure(Some(21.6)), "22");
        assert_eq!(format_measure(Some(21.4)), "21");
        assert_eq!(format_measure(Some(0.0)), "0");
        assert_eq!(format_measure(Some(-3.5)), "-4");
    }

    #[test]
    fn current_day_matches_on_calendar_date() {
        let m = model(7, 14);
        assert!(is_current_day(&m, 0));
        assert!(!is_current_day(&m, 1));
        assert!(!is_current_day(&m, 99));
    }

    #[test]
    fn hourly_strip_slices_the_selected_day() {
        let m = model(7, 14);
        let strip = hourly_strip(&m, 1);
        assert_eq!(strip.len(), 24);
        assert_eq!(strip[0].time, "00:00");
        assert_eq!(strip[23].time, "23:00");
        // Day 1 starts at index 24 in the hourly series.
        assert_eq!(strip[0].temperature, "10");
    }

    #[test]
    fn hourly_strip_shows_all_hours_on_the_current_day() {
        let m = model(7, 14);
        let strip = hourly_strip(&m, 0);
        assert_eq!(strip.len(), 24);
        assert_eq!(strip[0].time, "00:00");
    }

    #[test]
    fn hourly_strip_is_bounded_by_the_series() {
        let m = model(1, 14);
        assert!(hourly_strip(&m, 1).is_empty());
        assert!(hourly_strip(&m, 42).is_empty());
    }

    #[test]
    fn current_day_summary_shows_snapshot_values() {
        let m = model(7, 14);
        let summary = day_summary(&m, 0).unwrap();
        assert_eq!(summary.label, "Jetzt");
        assert!(summary.is_current);
        assert_eq!(summary.temperature, "22");
        assert_eq!(summary.temperature_min, None);
        assert_eq!(summary.wind_speed, "4");
        assert_eq!(summary.wind_gusts, "8");
        assert_eq!(summary.wind_direction, "200");
    }

    #[test]
    fn other_day_summary_shows_daily_aggregates() {
        let m = model(7, 14);
        let summary = day_summary(&m, 2).unwrap();
        // 2024-06-03 is a Monday.
        assert_eq!(summary.label, "Montag");
        assert!(!summary.is_current);
        assert_eq!(summary.temperature, "22");
        assert_eq!(summary.temperature_min.as_deref(), Some("13"));
        assert_eq!(summary.wind_speed, "6");
        assert_eq!(summary.wind_gusts, "11");
        assert_eq!(summary.wind_direction, "180");
    }

    #[test]
    fn day_summary_out_of_range_is_none() {
        let m = model(2, 14);
        assert!(day_summary(&m, 2).is_none());
    }

    #[test]
    fn day_strip_labels_today_and_weekdays() {
        let m = model(3, 14);
        let strip = day_strip(&m, 1);
        assert_eq!(strip[0].label, "Heute");
        assert_eq!(strip[1].label, "So 2.");
        assert_eq!(strip[2].label, "Mo 3.");
        assert!(strip[1].selected);
        assert!(!strip[0].selected);
        assert_eq!(strip[0].temperature_max, "22");
        assert_eq!(strip[0].temperature_min, "13");
    }
}
