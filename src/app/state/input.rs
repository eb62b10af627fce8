use super::*;

pub(super) fn command_char(key: KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    if let KeyCode::Char(ch) = key.code {
        Some(ch.to_ascii_lowercase())
    } else {
        None
    }
}

impl AppState {
    pub(crate) async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.mode == AppMode::Error {
                    self.dismiss_error();
                    return Ok(());
                }
                if key.code == KeyCode::Esc {
                    tx.send(AppEvent::Quit).await?;
                    return Ok(());
                }
                match command_char(key) {
                    Some('q') => tx.send(AppEvent::Quit).await?,
                    Some('r') => self.start_fetch(tx, cli).await?,
                    Some(digit @ '1'..='6') => self.force_scenario(digit, tx),
                    Some('g') => self.toggle_light_rain(tx),
                    Some('f') => self.toggle_flash(),
                    _ => {}
                }
            }
            Event::Resize(cols, rows) => self.resize_viewport(cols, rows),
            _ => {}
        }

        Ok(())
    }

    fn dismiss_error(&mut self) {
        self.last_error = None;
        self.mode = if self.weather.is_some() {
            AppMode::Ready
        } else {
            self.loading_message = "No weather data. Press r to retry.".to_string();
            AppMode::Loading
        };
    }

    fn force_scenario(&mut self, key: char, tx: &mpsc::Sender<AppEvent>) {
        let Some(scenario) = Scenario::from_key(key) else {
            return;
        };
        if self.weather.is_none() {
            debug!("ignoring scenario {} without weather data", scenario.label());
            return;
        }
        info!("forcing scenario {}", scenario.label());
        self.scenario = Some(scenario);
        self.refresh_effects(tx, Utc::now());
    }

    fn toggle_light_rain(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.settings.light_rain = match self.settings.light_rain {
            LightRainMode::Uniform => LightRainMode::Gentle,
            LightRainMode::Gentle => LightRainMode::Uniform,
        };
        info!("light rain mode {:?}", self.settings.light_rain);
        self.effects.set_config(self.settings.effects_config());
        self.refresh_effects(tx, Utc::now());
        self.persist_settings();
    }

    fn toggle_flash(&mut self) {
        self.settings.no_flash = !self.settings.no_flash;
        info!("flash overlay {}", if self.settings.no_flash { "off" } else { "on" });
        self.effects.set_config(self.settings.effects_config());
        self.persist_settings();
    }
}
