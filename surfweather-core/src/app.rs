//! Async driver around the [`AppState`] reducer.
//!
//! The controller owns the event channel, the abortable debounce timer and
//! the two provider seams. Effects returned by the reducer are executed as
//! spawned tasks which report back as events; [`App::settle`] pumps the
//! channel until no timer or fetch is outstanding.

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::forecast::ForecastProvider;
use crate::geocode::CitySearch;
use crate::model::Location;
use crate::state::{AppState, Effect, Event};

/// Quiet period before a typed query is sent to the geocoder.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

pub struct App {
    pub state: AppState,
    geocode: Arc<dyn CitySearch>,
    forecast: Arc<dyn ForecastProvider>,
    debounce: Duration,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    debounce_task: Option<JoinHandle<()>>,
    fetches_in_flight: usize,
}

impl App {
    pub fn new(
        initial_city: Location,
        geocode: Arc<dyn CitySearch>,
        forecast: Arc<dyn ForecastProvider>,
    ) -> Self {
        Self::with_debounce(initial_city, geocode, forecast, DEBOUNCE)
    }

    pub fn with_debounce(
        initial_city: Location,
        geocode: Arc<dyn CitySearch>,
        forecast: Arc<dyn ForecastProvider>,
        debounce: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(initial_city),
            geocode,
            forecast,
            debounce,
            events_tx,
            events_rx,
            debounce_task: None,
            fetches_in_flight: 0,
        }
    }

    /// Apply an event and execute the resulting effects.
    pub fn dispatch(&mut self, event: Event) {
        let effects = self.state.apply(event);
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleDebounce { generation } => {
                if let Some(pending) = self.debounce_task.take() {
                    pending.abort();
                }
                let tx = self.events_tx.clone();
                let quiet = self.debounce;
                self.debounce_task = Some(tokio::spawn(async move {
                    tokio::time::sleep(quiet).await;
                    let _ = tx.send(Event::DebounceElapsed { generation });
                }));
            }
            Effect::Search { query, generation } => {
                let tx = self.events_tx.clone();
                let client = Arc::clone(&self.geocode);
                self.fetches_in_flight += 1;
                tokio::spawn(async move {
                    let result = client.search(&query).await.map_err(|e| e.to_string());
                    let _ = tx.send(Event::SearchCompleted { generation, result });
                });
            }
            Effect::FetchForecast {
                location,
                generation,
            } => {
                let tx = self.events_tx.clone();
                let client = Arc::clone(&self.forecast);
                self.fetches_in_flight += 1;
                tokio::spawn(async move {
                    let result = client.fetch(&location).await.map_err(|e| e.to_string());
                    let _ = tx.send(Event::ForecastCompleted { generation, result });
                });
            }
        }
    }

    fn work_outstanding(&self) -> bool {
        self.fetches_in_flight > 0 || self.debounce_task.is_some()
    }

    /// Pump completion events until the pipeline is quiescent.
    pub async fn settle(&mut self) {
        while self.work_outstanding() {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            match &event {
                Event::DebounceElapsed { .. } => self.debounce_task = None,
                Event::SearchCompleted { .. } | Event::ForecastCompleted { .. } => {
                    self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                }
                _ => {}
            }
            self.dispatch(event);
        }
    }
}
