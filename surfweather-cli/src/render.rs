//! Text rendering of the forecast view. All derived values come from
//! `surfweather_core::view`; this module only decides layout.

use surfweather_core::view::{self, DayCell, HourCell};
use surfweather_core::{AppState, Location, WeatherModel};

const HOURS_PER_ROW: usize = 6;

pub fn render_state(state: &AppState) {
    println!();
    if let Some(error) = &state.error {
        println!("!! {error}");
        println!();
    }
    if state.forecast_pending {
        println!("Lade Vorhersage für {} ...", state.city);
        return;
    }
    match &state.weather {
        Some(model) => render_forecast(&state.city, model, state.selected_day),
        None => println!("Keine Vorhersage verfügbar."),
    }
}

pub fn render_forecast(city: &Location, model: &WeatherModel, selected_day: usize) {
    println!("=== {city} ===");

    let strip = view::day_strip(model, selected_day);
    println!(
        "{}",
        strip
            .iter()
            .map(day_cell_text)
            .collect::<Vec<_>>()
            .join("  ")
    );
    println!();

    if let Some(summary) = view::day_summary(model, selected_day) {
        println!("{} — {} {}", summary.label, summary.glyph, summary.condition);
        match &summary.temperature_min {
            Some(min) => println!("  {}° / {}°", summary.temperature, min),
            None => println!("  {}°", summary.temperature),
        }
        println!("  Windgeschwindigkeit: {} m/s", summary.wind_speed);
        println!("  Windböen: {} m/s", summary.wind_gusts);
        println!("  Windrichtung: {}°", summary.wind_direction);
        println!();
    }

    for row in view::hourly_strip(model, selected_day).chunks(HOURS_PER_ROW) {
        println!(
            "{}",
            row.iter()
                .map(hour_cell_text)
                .collect::<Vec<_>>()
                .join(" | ")
        );
    }
}

fn day_cell_text(cell: &DayCell) -> String {
    let marker = if cell.selected { ">" } else { " " };
    format!(
        "{marker}{} {} {}°/{}°",
        cell.label, cell.glyph, cell.temperature_max, cell.temperature_min
    )
}

fn hour_cell_text(cell: &HourCell) -> String {
    format!("{} {} {:>3}°", cell.time, cell.glyph, cell.temperature)
}
