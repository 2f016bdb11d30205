//! Pure state transitions for the search/forecast pipeline.
//!
//! Every user or completion event goes through [`AppState::apply`], which
//! mutates the state and returns the side effects the runtime has to carry
//! out. Both fetch paths are tagged with a monotonically increasing
//! generation; a completion whose generation no longer matches the latest
//! issued one is discarded, so a stale late response never clobbers a newer
//! selection.

use crate::model::{Location, WeatherModel};

/// Search pipeline phase: `Idle -> Debouncing -> Fetching -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Fetching,
}

/// Inputs to the reducer. Completion events carry the generation of the
/// request that produced them; errors are carried as display messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    InputChanged(String),
    DebounceElapsed {
        generation: u64,
    },
    SearchCompleted {
        generation: u64,
        result: Result<Vec<Location>, String>,
    },
    CitySelected(Location),
    DaySelected(usize),
    ForecastCompleted {
        generation: u64,
        result: Result<WeatherModel, String>,
    },
}

/// Work the runtime must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start (or restart) the quiet-period timer for the current input.
    ScheduleDebounce { generation: u64 },
    /// Issue a geocoding request for the trimmed query.
    Search { query: String, generation: u64 },
    /// Issue a forecast request for the selected location.
    FetchForecast {
        location: Location,
        generation: u64,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub input: String,
    pub candidates: Vec<Location>,
    pub city: Location,
    pub selected_day: usize,
    pub weather: Option<WeatherModel>,
    pub error: Option<String>,
    pub phase: SearchPhase,
    pub forecast_pending: bool,
    search_generation: u64,
    forecast_generation: u64,
}

impl AppState {
    pub fn new(initial_city: Location) -> Self {
        Self {
            input: String::new(),
            candidates: Vec::new(),
            city: initial_city,
            selected_day: 0,
            weather: None,
            error: None,
            phase: SearchPhase::Idle,
            forecast_pending: false,
            search_generation: 0,
            forecast_generation: 0,
        }
    }

    /// Loading flag for the candidate search.
    pub fn is_searching(&self) -> bool {
        self.phase == SearchPhase::Fetching
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::InputChanged(text) => self.on_input(text),
            Event::DebounceElapsed { generation } => self.on_debounce(generation),
            Event::SearchCompleted { generation, result } => self.on_search(generation, result),
            Event::CitySelected(location) => self.on_city(location),
            Event::DaySelected(index) => self.on_day(index),
            Event::ForecastCompleted { generation, result } => {
                self.on_forecast(generation, result)
            }
        }
    }

    fn on_input(&mut self, text: String) -> Vec<Effect> {
        self.input = text;
        // Any new input invalidates whatever search is pending or in flight.
        self.search_generation += 1;
        if self.input.trim().is_empty() {
            self.candidates.clear();
            self.phase = SearchPhase::Idle;
            return Vec::new();
        }
        self.phase = SearchPhase::Debouncing;
        vec![Effect::ScheduleDebounce {
            generation: self.search_generation,
        }]
    }

    fn on_debounce(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.search_generation || self.phase != SearchPhase::Debouncing {
            return Vec::new();
        }
        self.phase = SearchPhase::Fetching;
        vec![Effect::Search {
            query: self.input.trim().to_string(),
            generation,
        }]
    }

    fn on_search(
        &mut self,
        generation: u64,
        result: Result<Vec<Location>, String>,
    ) -> Vec<Effect> {
        if generation != self.search_generation {
            return Vec::new();
        }
        self.phase = SearchPhase::Idle;
        match result {
            Ok(candidates) => self.candidates = candidates,
            Err(message) => self.error = Some(message),
        }
        Vec::new()
    }

    fn on_city(&mut self, location: Location) -> Vec<Effect> {
        self.city = location.clone();
        self.selected_day = 0;
        self.candidates.clear();
        self.input.clear();
        self.error = None;
        self.search_generation += 1;
        self.phase = SearchPhase::Idle;
        self.forecast_generation += 1;
        self.forecast_pending = true;
        vec![Effect::FetchForecast {
            location,
            generation: self.forecast_generation,
        }]
    }

    fn on_day(&mut self, index: usize) -> Vec<Effect> {
        self.selected_day = match &self.weather {
            Some(model) if !model.daily.is_empty() => index.min(model.daily.len() - 1),
            _ => 0,
        };
        Vec::new()
    }

    fn on_forecast(
        &mut self,
        generation: u64,
        result: Result<WeatherModel, String>,
    ) -> Vec<Effect> {
        if generation != self.forecast_generation {
            return Vec::new();
        }
        self.forecast_pending = false;
        match result {
            Ok(model) => {
                if self.selected_day >= model.daily.len() {
                    self.selected_day = 0;
                }
                self.weather = Some(model);
            }
            // Keep the last-known-good model, only surface the message.
            Err(message) => self.error = Some(message),
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, DailySeries, HourlySeries};
    use chrono::{FixedOffset, TimeZone};

    fn chemnitz() -> Location {
        Location {
            id: 2940132,
            name: "Chemnitz".into(),
            country: "Deutschland".into(),
            latitude: 50.8357,
            longitude: 12.92922,
        }
    }

    fn berlin() -> Location {
        Location {
            id: 2950159,
            name: "Berlin".into(),
            country: "Deutschland".into(),
            latitude: 52.52437,
            longitude: 13.41053,
        }
    }

    fn sample_model(days: usize) -> WeatherModel {
        let tz = FixedOffset::east_opt(0).unwrap();
        let day0 = tz.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let hours = days * 24;
        WeatherModel {
            current: CurrentConditions {
                time: day0,
                temperature: Some(20.0),
                weather_code: Some(0),
                wind_speed: Some(4.0),
                wind_direction: Some(180.0),
                wind_gusts: Some(7.0),
            },
            hourly: HourlySeries::new(
                (0..hours)
                    .map(|i| day0 + chrono::Duration::hours(i as i64))
                    .collect(),
                vec![Some(18.0); hours],
                vec![Some(0); hours],
            )
            .unwrap(),
            daily: DailySeries::new(
                (0..days)
                    .map(|i| day0 + chrono::Duration::days(i as i64))
                    .collect(),
                vec![Some(0); days],
                vec![Some(22.0); days],
                vec![Some(12.0); days],
                vec![Some(6.0); days],
                vec![Some(10.0); days],
                vec![Some(180.0); days],
            )
            .unwrap(),
        }
    }

    #[test]
    fn whitespace_input_clears_candidates_without_effects() {
        let mut state = AppState::new(chemnitz());
        state.candidates = vec![berlin()];
        let effects = state.apply(Event::InputChanged("   ".into()));
        assert!(effects.is_empty());
        assert!(state.candidates.is_empty());
        assert_eq!(state.phase, SearchPhase::Idle);
    }

    #[test]
    fn input_schedules_a_debounce() {
        let mut state = AppState::new(chemnitz());
        let effects = state.apply(Event::InputChanged("Ber".into()));
        assert!(matches!(effects[..], [Effect::ScheduleDebounce { .. }]));
        assert_eq!(state.phase, SearchPhase::Debouncing);
    }

    #[test]
    fn only_the_final_quiescent_text_is_searched() {
        let mut state = AppState::new(chemnitz());
        let first = state.apply(Event::InputChanged("Ber".into()));
        let Effect::ScheduleDebounce { generation: stale } = first[0].clone() else {
            panic!("expected debounce effect");
        };
        let second = state.apply(Event::InputChanged(" Berl ".into()));
        let Effect::ScheduleDebounce { generation: fresh } = second[0].clone() else {
            panic!("expected debounce effect");
        };
        assert!(fresh > stale);

        // The superseded timer firing does nothing.
        assert!(state.apply(Event::DebounceElapsed { generation: stale }).is_empty());

        // The current one issues exactly one search with the trimmed text.
        let effects = state.apply(Event::DebounceElapsed { generation: fresh });
        assert_eq!(
            effects,
            vec![Effect::Search {
                query: "Berl".into(),
                generation: fresh,
            }]
        );
        assert!(state.is_searching());
    }

    #[test]
    fn search_success_replaces_candidates() {
        let mut state = AppState::new(chemnitz());
        state.apply(Event::InputChanged("Berl".into()));
        let generation = current_search_generation(&mut state);
        state.apply(Event::SearchCompleted {
            generation,
            result: Ok(vec![berlin()]),
        });
        assert_eq!(state.candidates, vec![berlin()]);
        assert!(!state.is_searching());
    }

    #[test]
    fn stale_search_response_is_discarded() {
        let mut state = AppState::new(chemnitz());
        state.apply(Event::InputChanged("Berl".into()));
        let stale = current_search_generation(&mut state);
        state.apply(Event::InputChanged("Hamb".into()));
        state.apply(Event::SearchCompleted {
            generation: stale,
            result: Ok(vec![berlin()]),
        });
        assert!(state.candidates.is_empty());
    }

    #[test]
    fn search_failure_surfaces_a_message() {
        let mut state = AppState::new(chemnitz());
        state.apply(Event::InputChanged("Berl".into()));
        let generation = current_search_generation(&mut state);
        state.apply(Event::SearchCompleted {
            generation,
            result: Err("Response status: 500".into()),
        });
        assert_eq!(state.error.as_deref(), Some("Response status: 500"));
        assert!(state.candidates.is_empty());
    }

    #[test]
    fn selecting_a_city_resets_day_and_clears_search_state() {
        let mut state = AppState::new(chemnitz());
        state.weather = Some(sample_model(7));
        state.selected_day = 3;
        state.candidates = vec![berlin()];
        state.input = "Berl".into();
        state.error = Some("alter Fehler".into());

        let effects = state.apply(Event::CitySelected(berlin()));

        assert_eq!(state.city, berlin());
        assert_eq!(state.selected_day, 0);
        assert!(state.candidates.is_empty());
        assert!(state.input.is_empty());
        assert!(state.error.is_none());
        assert!(state.forecast_pending);
        assert!(matches!(
            effects[..],
            [Effect::FetchForecast { ref location, .. }] if *location == berlin()
        ));
    }

    #[test]
    fn day_selection_is_clamped_to_the_daily_series() {
        let mut state = AppState::new(chemnitz());
        state.weather = Some(sample_model(7));
        state.apply(Event::DaySelected(3));
        assert_eq!(state.selected_day, 3);
        state.apply(Event::DaySelected(99));
        assert_eq!(state.selected_day, 6);
    }

    #[test]
    fn day_selection_without_weather_stays_at_zero() {
        let mut state = AppState::new(chemnitz());
        state.apply(Event::DaySelected(4));
        assert_eq!(state.selected_day, 0);
    }

    #[test]
    fn stale_forecast_response_is_discarded() {
        let mut state = AppState::new(chemnitz());
        let first = state.apply(Event::CitySelected(berlin()));
        let Effect::FetchForecast { generation: stale, .. } = first[0].clone() else {
            panic!("expected fetch effect");
        };
        state.apply(Event::CitySelected(chemnitz()));
        state.apply(Event::ForecastCompleted {
            generation: stale,
            result: Ok(sample_model(7)),
        });
        assert!(state.weather.is_none());
        assert!(state.forecast_pending);
    }

    #[test]
    fn forecast_failure_retains_the_previous_model() {
        let mut state = AppState::new(chemnitz());
        state.weather = Some(sample_model(7));
        let effects = state.apply(Event::CitySelected(berlin()));
        let Effect::FetchForecast { generation, .. } = effects[0].clone() else {
            panic!("expected fetch effect");
        };
        state.apply(Event::ForecastCompleted {
            generation,
            result: Err("Vorhersage nicht erreichbar".into()),
        });
        assert!(state.weather.is_some());
        assert_eq!(state.error.as_deref(), Some("Vorhersage nicht erreichbar"));
        assert!(!state.forecast_pending);
    }

    #[test]
    fn forecast_success_clamps_the_selected_day() {
        let mut state = AppState::new(chemnitz());
        state.weather = Some(sample_model(7));
        let effects = state.apply(Event::CitySelected(berlin()));
        let Effect::FetchForecast { generation, .. } = effects[0].clone() else {
            panic!("expected fetch effect");
        };
        // While the fetch is outstanding the stale 7-day model is still
        // shown, so a late day click can land beyond the new series.
        state.apply(Event::DaySelected(6));
        assert_eq!(state.selected_day, 6);
        state.apply(Event::ForecastCompleted {
            generation,
            result: Ok(sample_model(3)),
        });
        assert_eq!(state.selected_day, 0);
        assert_eq!(state.weather.as_ref().unwrap().daily.len(), 3);
    }

    fn current_search_generation(state: &AppState) -> u64 {
        state.search_generation
    }
}
