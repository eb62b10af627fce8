use super::*;

impl AppState {
    pub(crate) async fn start_fetch(
        &mut self,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        if self.fetch_in_flight {
            return Ok(());
        }
        tx.send(AppEvent::FetchStarted).await?;
        if self.location_resolved {
            self.fetch_weather(tx);
        } else {
            self.start_location_lookup(tx, cli);
        }
        Ok(())
    }

    fn start_location_lookup(&mut self, tx: &mpsc::Sender<AppEvent>, cli: &Cli) {
        self.loading_message = "Detecting location...".to_string();
        let request = cli.location_request();
        let client = self.client.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let coordinates = location::resolve(&client, &request).await;
            let _ = tx2.send(AppEvent::LocationResolved(coordinates)).await;
        });
    }

    pub(crate) fn fetch_weather(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.loading_message = "Fetching weather...".to_string();
        let client = self.client.clone();
        let coordinates = self.location;
        let tx2 = tx.clone();
        info!("fetching weather from {}", client.base_url());
        tokio::spawn(async move {
            match client.weather(coordinates).await {
                Ok(payload) => {
                    let _ = tx2.send(AppEvent::FetchSucceeded(Box::new(payload))).await;
                }
                Err(err) => {
                    let _ = tx2.send(AppEvent::FetchFailed(err.to_string())).await;
                }
            }
        });
    }
}
