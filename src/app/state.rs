use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info, warn};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::{
    app::{
        events::{
            AppEvent, TimerHandle, start_frame_task, start_lightning_task, start_refresh_task,
        },
        settings::{RuntimeSettings, save_runtime_settings},
    },
    cli::Cli,
    data::{api::ApiClient, location},
    domain::{
        scenario::Scenario,
        weather::{Coordinates, CurrentWeather, LightRainMode, WeatherPayload},
    },
    ui::{
        effects::{StormTransition, WeatherEffects},
        surface::{DisplayList, Surface},
        theme::{ColorCapability, detect_color_capability},
        widgets::sky::surface_size,
    },
};

mod input;
mod methods_fetch;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    Error,
    Quit,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub loading_message: String,
    pub last_error: Option<String>,
    /// Last report as fetched.
    pub weather: Option<WeatherPayload>,
    /// Report on screen: the fetched one, or a forced scenario built from it.
    pub current: Option<CurrentWeather>,
    pub last_updated: Option<DateTime<Utc>>,
    pub location: Option<Coordinates>,
    pub location_resolved: bool,
    pub scenario: Option<Scenario>,
    pinned_scenario: Option<Scenario>,
    pub settings: RuntimeSettings,
    pub settings_path: Option<PathBuf>,
    pub effects: WeatherEffects,
    pub frame: DisplayList,
    pub fetch_in_flight: bool,
    pub last_frame_at: Instant,
    pub color_capability: ColorCapability,
    pub viewport: (u16, u16),
    client: ApiClient,
    frame_timer: Option<TimerHandle>,
    refresh_timer: Option<TimerHandle>,
    lightning_timer: Option<TimerHandle>,
}

impl AppState {
    /// State with settings taken from the command line only.
    pub fn new(cli: &Cli) -> Result<Self> {
        let settings = RuntimeSettings::from_cli_defaults(cli);
        let client = ApiClient::new(settings.api_url.clone())?;
        Ok(Self::with_client(cli, settings, None, client))
    }

    pub fn with_client(
        cli: &Cli,
        settings: RuntimeSettings,
        settings_path: Option<PathBuf>,
        client: ApiClient,
    ) -> Self {
        Self {
            mode: AppMode::Loading,
            running: true,
            loading_message: "Initializing...".to_string(),
            last_error: None,
            weather: None,
            current: None,
            last_updated: None,
            location: None,
            location_resolved: false,
            scenario: cli.scenario.map(Scenario::from),
            pinned_scenario: cli.scenario.map(Scenario::from),
            effects: WeatherEffects::new(settings.effects_config(), 0.0, 0.0),
            frame: DisplayList::new(0.0, 0.0),
            settings,
            settings_path,
            fetch_in_flight: false,
            last_frame_at: Instant::now(),
            color_capability: detect_color_capability(),
            viewport: (0, 0),
            client,
            frame_timer: None,
            refresh_timer: None,
            lightning_timer: None,
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                cli.validate()?;
                self.frame_timer = Some(start_frame_task(tx.clone(), self.settings.frame_rate()));
                self.refresh_timer = Some(start_refresh_task(
                    tx.clone(),
                    self.settings.refresh_interval_secs(),
                ));
                self.start_fetch(tx, cli).await?;
            }
            AppEvent::TickFrame => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_at);
                self.last_frame_at = now;
                if self.settings.animated() {
                    self.effects.render_frame(&mut self.frame, delta);
                } else {
                    self.frame.clear();
                }
            }
            AppEvent::TickRefresh => {
                if matches!(
                    self.mode,
                    AppMode::Ready | AppMode::Error | AppMode::Loading
                ) {
                    self.start_fetch(tx, cli).await?;
                }
            }
            AppEvent::TickLightning => {
                if self.effects.storm_active() {
                    self.effects.on_lightning_tick();
                } else {
                    self.disarm_lightning();
                }
            }
            AppEvent::Input(event) => self.handle_input(event, tx, cli).await?,
            AppEvent::FetchStarted => {
                self.fetch_in_flight = true;
                self.loading_message = "Fetching weather...".to_string();
                if self.weather.is_none() {
                    self.mode = AppMode::Loading;
                }
            }
            AppEvent::LocationResolved(coordinates) => {
                self.location = coordinates;
                self.location_resolved = true;
                match coordinates {
                    Some(c) => info!("using location {:.4}, {:.4}", c.lat, c.lon),
                    None => info!("no location available, the server will choose"),
                }
                self.fetch_weather(tx);
            }
            AppEvent::FetchSucceeded(payload) => {
                info!(
                    "weather updated for {}",
                    payload.current.display_location()
                );
                self.fetch_in_flight = false;
                self.weather = Some(*payload);
                self.last_updated = Some(Utc::now());
                self.last_error = None;
                self.mode = AppMode::Ready;
                self.scenario = self.pinned_scenario;
                self.refresh_effects(tx, Utc::now());
            }
            AppEvent::FetchFailed(err) => {
                warn!("weather fetch failed: {err}");
                self.fetch_in_flight = false;
                self.last_error = Some(err);
                self.mode = AppMode::Error;
            }
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
                self.disarm_lightning();
                self.frame_timer = None;
                self.refresh_timer = None;
            }
        }

        Ok(())
    }

    /// Rebuilds the on-screen report and hands it to the effects controller.
    pub(crate) fn refresh_effects(&mut self, tx: &mpsc::Sender<AppEvent>, now: DateTime<Utc>) {
        self.current = self.weather.as_ref().map(|payload| match self.scenario {
            Some(scenario) => scenario.apply(&payload.current, now),
            None => payload.current.clone(),
        });
        let transition = self.effects.apply_snapshot(self.current.as_ref(), now);
        self.apply_storm_transition(transition, tx);
    }

    fn apply_storm_transition(&mut self, transition: StormTransition, tx: &mpsc::Sender<AppEvent>) {
        match transition {
            StormTransition::Started(period) => {
                if self.settings.animated() {
                    self.lightning_timer = Some(start_lightning_task(tx.clone(), period));
                }
            }
            StormTransition::Stopped => self.disarm_lightning(),
            StormTransition::Unchanged => {}
        }
    }

    fn disarm_lightning(&mut self) {
        if let Some(timer) = self.lightning_timer.take() {
            timer.cancel();
        }
    }

    #[must_use]
    pub fn lightning_armed(&self) -> bool {
        self.lightning_timer.is_some()
    }

    /// Updates the drawing surface for a terminal of `cols` × `rows` cells.
    pub fn resize_viewport(&mut self, cols: u16, rows: u16) {
        self.viewport = (cols, rows);
        let (width, height) = surface_size(Rect::new(0, 0, cols, rows));
        self.effects.resize(width, height);
        self.frame.resize(width, height);
    }

    pub(crate) fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = save_runtime_settings(path, &self.settings) {
            warn!("saving settings failed: {err:#}");
        }
    }
}
