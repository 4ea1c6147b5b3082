//! Audit journal repository.
//!
//! Append and list only. Nothing in this module updates an existing row;
//! the single delete path lives in the retention repository.

use chrono::{Duration, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use kontor_core::audit::{AuditAction, AuditEntityType, AuditEntry, AuditError, AuditFilter};
use kontor_shared::actor::ActorContext;
use kontor_shared::types::{AuditEntryId, PageRequest, PageResponse, UserId};

use crate::entities::audit_log;

/// Error types for audit journal operations.
#[derive(Debug, thiserror::Error)]
pub enum AuditRepoError {
    /// A stored row carries an action outside the closed set.
    #[error("corrupt audit row: {0}")]
    CorruptRow(#[from] AuditError),

    /// A stored row carries an unknown entity type.
    #[error("corrupt audit row: unknown entity type '{0}'")]
    UnknownEntityType(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for the append-only audit journal.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one entry on the caller's connection.
    ///
    /// Callers pass their open transaction so the journal entry commits or
    /// rolls back together with the entity mutation it describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record<C: ConnectionTrait>(conn: &C, entry: &AuditEntry) -> Result<(), DbErr> {
        let model = audit_log::ActiveModel {
            id: Set(entry.id.into_inner()),
            entity_type: Set(entry.entity_type.as_str().to_string()),
            entity_id: Set(entry.entity_id),
            action: Set(entry.action.as_str().to_string()),
            old_values: Set(entry.old_values.clone()),
            new_values: Set(entry.new_values.clone()),
            recorded_at: Set(entry.recorded_at.into()),
            actor_user_id: Set(entry.actor.user_id.map(UserId::into_inner)),
            actor_ip: Set(entry.actor.ip_address.clone()),
        };
        model.insert(conn).await?;
        Ok(())
    }

    /// Lists journal entries matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be
    /// decoded.
    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<AuditEntry>, AuditRepoError> {
        let mut query = audit_log::Entity::find();

        if let Some(entity_type) = filter.entity_type {
            query = query.filter(audit_log::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(audit_log::Column::EntityId.eq(entity_id));
        }
        if let Some(action) = filter.action {
            query = query.filter(audit_log::Column::Action.eq(action.as_str()));
        }
        if let Some(from_date) = filter.from_date {
            query = query
                .filter(audit_log::Column::RecordedAt.gte(from_date.and_time(NaiveTime::MIN)));
        }
        if let Some(to_date) = filter.to_date {
            let end = to_date.and_time(NaiveTime::MIN) + Duration::days(1);
            query = query.filter(audit_log::Column::RecordedAt.lt(end));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(audit_log::Column::RecordedAt)
            .order_by_desc(audit_log::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let entries = rows
            .into_iter()
            .map(model_to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }

    /// Full trail of one entity, oldest first — the order mutations were
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be
    /// decoded.
    pub async fn trail(&self, entity_id: uuid::Uuid) -> Result<Vec<AuditEntry>, AuditRepoError> {
        let rows = audit_log::Entity::find()
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .order_by_asc(audit_log::Column::RecordedAt)
            .order_by_asc(audit_log::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter().map(model_to_entry).collect()
    }
}

pub(crate) fn model_to_entry(model: audit_log::Model) -> Result<AuditEntry, AuditRepoError> {
    let action = AuditAction::try_parse(&model.action)?;
    let entity_type = AuditEntityType::parse(&model.entity_type)
        .ok_or_else(|| AuditRepoError::UnknownEntityType(model.entity_type.clone()))?;

    Ok(AuditEntry {
        id: AuditEntryId::from_uuid(model.id),
        entity_type,
        entity_id: model.entity_id,
        action,
        old_values: model.old_values,
        new_values: model.new_values,
        recorded_at: model.recorded_at.into(),
        actor: ActorContext {
            user_id: model.actor_user_id.map(UserId::from_uuid),
            ip_address: model.actor_ip,
        },
    })
}
