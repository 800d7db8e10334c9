use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{GameEvent, GameEventHandler};

/// Key-value store for the "played today" flag, keyed by `YYYY-MM-DD`
#[async_trait]
pub trait PlayedStore: Send + Sync {
    /// The stored key if that day was played
    async fn get(&self, date_key: &str) -> Result<Option<String>>;
    async fn set(&self, date_key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayedStore {
    days: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryPlayedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayedStore for InMemoryPlayedStore {
    async fn get(&self, date_key: &str) -> Result<Option<String>> {
        let days = self
            .days
            .read()
            .map_err(|_| anyhow!("played-day store lock poisoned"))?;
        Ok(days.get(date_key).cloned())
    }

    async fn set(&self, date_key: &str) -> Result<()> {
        let mut days = self
            .days
            .write()
            .map_err(|_| anyhow!("played-day store lock poisoned"))?;
        days.insert(date_key.to_string());
        Ok(())
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's key in local time
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

/// Once-per-day play tracking over an injected store.
///
/// Storage failures never escape: they are logged and reads answer "not played".
pub struct DailyTracker<S: PlayedStore> {
    store: S,
}

impl<S: PlayedStore> DailyTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn has_played_on(&self, date_key: &str) -> bool {
        match self.store.get(date_key).await {
            Ok(stored) => stored.as_deref() == Some(date_key),
            Err(e) => {
                error!("Error checking if played on {}: {}", date_key, e);
                false
            }
        }
    }

    pub async fn has_played_today(&self) -> bool {
        self.has_played_on(&today_key()).await
    }

    pub async fn mark_played_on(&self, date_key: &str) {
        match self.store.set(date_key).await {
            Ok(()) => info!("Marked {} as played", date_key),
            Err(e) => error!("Error marking {} as played: {}", date_key, e),
        }
    }

    pub async fn mark_today_as_played(&self) {
        self.mark_played_on(&today_key()).await
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mark every date the receiver yields until all recorders are gone.
    /// Returns how many days were marked.
    pub async fn record_finished_rounds(&self, mut finished: mpsc::UnboundedReceiver<String>) -> usize {
        let mut marked = 0;
        while let Some(date_key) = finished.recv().await {
            self.mark_played_on(&date_key).await;
            marked += 1;
        }
        marked
    }
}

/// Round event handler that reports the puzzle date once the round is won or lost
pub struct PlayedDayRecorder {
    date: Option<String>,
    finished: mpsc::UnboundedSender<String>,
}

impl PlayedDayRecorder {
    pub fn new(finished: mpsc::UnboundedSender<String>) -> Self {
        Self {
            date: None,
            finished,
        }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl GameEventHandler for PlayedDayRecorder {
    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::RoundStarted { date, .. } => {
                self.date = Some(date);
            }
            GameEvent::RoundWon { .. } | GameEvent::RoundLost { .. } => {
                // Taken so a round reports its day at most once
                let Some(date) = self.date.take() else {
                    return;
                };
                debug!("Round finished, recording {} as played", date);
                if self.finished.send(date).is_err() {
                    warn!("Played-day receiver dropped, round end not recorded");
                }
            }
            _ => {}
        }
    }
}
