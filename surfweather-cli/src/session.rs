//! Interactive forecast session: one view, a small action menu, and the
//! search/select flow driven through the core controller.

use std::sync::Arc;

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use surfweather_core::{App, Config, Event, ForecastClient, GeocodeClient, view};
use tokio::time::Duration;

use crate::render;

const MENU_SEARCH: &str = "Stadt suchen";
const MENU_DAY: &str = "Tag wählen";
const MENU_REFRESH: &str = "Aktualisieren";
const MENU_QUIT: &str = "Beenden";

pub async fn run(config: Config) -> Result<()> {
    let geocode = Arc::new(GeocodeClient::new(config.language())?);
    let forecast = Arc::new(ForecastClient::new()?);
    let mut app = App::with_debounce(
        config.default_city(),
        geocode,
        forecast,
        Duration::from_millis(config.debounce_ms()),
    );

    // Load the start-up city before showing anything.
    let initial = app.state.city.clone();
    app.dispatch(Event::CitySelected(initial));
    app.settle().await;

    loop {
        render::render_state(&app.state);
        app.state.error = None;

        let choice =
            Select::new("Aktion:", vec![MENU_SEARCH, MENU_DAY, MENU_REFRESH, MENU_QUIT]).prompt();
        match choice {
            Ok(MENU_SEARCH) => search(&mut app).await?,
            Ok(MENU_DAY) => choose_day(&mut app)?,
            Ok(MENU_REFRESH) => {
                let city = app.state.city.clone();
                app.dispatch(Event::CitySelected(city));
                app.settle().await;
            }
            Ok(MENU_QUIT)
            | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn search(app: &mut App) -> Result<()> {
    let query = match Text::new("Stadt in Deutschland eingeben:").prompt() {
        Ok(query) => query,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    app.dispatch(Event::InputChanged(query));
    app.settle().await;

    if app.state.candidates.is_empty() {
        println!("Keine Treffer.");
        return Ok(());
    }

    match Select::new("Stadt auswählen:", app.state.candidates.clone()).prompt() {
        Ok(city) => {
            app.dispatch(Event::CitySelected(city));
            app.settle().await;
        }
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn choose_day(app: &mut App) -> Result<()> {
    let Some(model) = &app.state.weather else {
        println!("Noch keine Vorhersage geladen.");
        return Ok(());
    };

    let labels: Vec<String> = view::day_strip(model, app.state.selected_day)
        .into_iter()
        .map(|cell| cell.label)
        .collect();

    match Select::new("Tag wählen:", labels.clone()).prompt() {
        Ok(choice) => {
            let index = labels.iter().position(|l| *l == choice).unwrap_or(0);
            app.dispatch(Event::DaySelected(index));
        }
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
