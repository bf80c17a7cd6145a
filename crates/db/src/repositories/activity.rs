//! Activity log repository.
//!
//! Fire-and-forget description records written after successful lifecycle
//! commands. Failures here never affect the primary operation; callers
//! log and move on.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};

use daftar_shared::types::{ActivityEntryId, PageRequest, PageResponse};

use crate::entities::activity_log;

/// Activity log repository.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    db: DatabaseConnection,
}

impl ActivityLogRepository {
    /// Creates a new activity log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an activity entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record(
        &self,
        action: &str,
        description: String,
    ) -> Result<activity_log::Model, DbErr> {
        let entry = activity_log::ActiveModel {
            id: Set(ActivityEntryId::new().into_inner()),
            action: Set(action.to_string()),
            description: Set(description),
            recorded_at: Set(Utc::now().into()),
        };
        entry.insert(&self.db).await
    }

    /// Lists activity entries, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<activity_log::Model>, DbErr> {
        let total = activity_log::Entity::find().count(&self.db).await?;

        let entries = activity_log::Entity::find()
            .order_by_desc(activity_log::Column::RecordedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }
}
