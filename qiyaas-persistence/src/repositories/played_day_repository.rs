use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use tracing::debug;

use crate::entities::{played_days, prelude::*};
use qiyaas_core::PlayedStore;

/// SQLite-backed "played today" store
#[derive(Clone)]
pub struct PlayedDayRepository {
    db: DatabaseConnection,
}

impl PlayedDayRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_date(&self, date_key: &str) -> Result<Option<played_days::Model>> {
        let model = PlayedDays::find_by_id(date_key.to_string())
            .one(&self.db)
            .await?;
        Ok(model)
    }

    /// Insert the day, or refresh its timestamp when already present
    pub async fn mark_played(&self, date_key: &str) -> Result<()> {
        let model = played_days::ActiveModel {
            date_key: ActiveValue::Set(date_key.to_string()),
            played_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        PlayedDays::insert(model)
            .on_conflict(
                OnConflict::column(played_days::Column::DateKey)
                    .update_column(played_days::Column::PlayedAt)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!("Stored played day {}", date_key);
        Ok(())
    }

    /// Most recent days first
    pub async fn recent_days(&self, limit: u64) -> Result<Vec<String>> {
        let days = PlayedDays::find()
            .order_by_desc(played_days::Column::DateKey)
            .paginate(&self.db, limit)
            .fetch_page(0)
            .await?;

        Ok(days.into_iter().map(|model| model.date_key).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(PlayedDays::find().count(&self.db).await?)
    }
}

#[async_trait]
impl PlayedStore for PlayedDayRepository {
    async fn get(&self, date_key: &str) -> Result<Option<String>> {
        Ok(self.find_by_date(date_key).await?.map(|model| model.date_key))
    }

    async fn set(&self, date_key: &str) -> Result<()> {
        self.mark_played(date_key).await
    }
}
