use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::{
    sync::mpsc::Sender,
    task::JoinHandle,
    time::{Instant, interval, interval_at, sleep},
};

use crate::domain::weather::{Coordinates, WeatherPayload};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickFrame,
    TickRefresh,
    TickLightning,
    Input(Event),
    FetchStarted,
    LocationResolved(Option<Coordinates>),
    FetchSucceeded(Box<WeatherPayload>),
    FetchFailed(String),
    Quit,
}

/// Owns a spawned timer task and aborts it on `cancel` or drop.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn cancel(self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn start_frame_task(tx: Sender<AppEvent>, fps: u8) -> TimerHandle {
    let fps = fps.max(15);
    TimerHandle::new(tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickFrame).await.is_err() {
                break;
            }
        }
    }))
}

pub fn start_refresh_task(tx: Sender<AppEvent>, refresh_secs: u64) -> TimerHandle {
    TimerHandle::new(tokio::spawn(async move {
        let base = refresh_secs.max(10);
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f32..0.1f32);
                ((base as f32) * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f32(wait_secs)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    }))
}

/// Periodic lightning ticks; the first one arrives a full `period` after start.
pub fn start_lightning_task(tx: Sender<AppEvent>, period: Duration) -> TimerHandle {
    let period = period.max(Duration::from_millis(1));
    TimerHandle::new(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickLightning).await.is_err() {
                break;
            }
        }
    }))
}
