//! Document registry repository.
//!
//! Stores the metadata rows for artifacts whose bytes live in object
//! storage. The registry is the source of truth for which artifacts exist
//! and what they were generated for; the checksum lets readers detect
//! storage-side corruption.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use kontor_core::storage::{DocumentRecord, EntityKind, EntityRef};
use kontor_shared::types::DocumentId;

use crate::entities::documents;

/// Error types for document registry operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentRepoError {
    /// Registry entry not found.
    #[error("document not found: {0}")]
    NotFound(Uuid),

    /// A stored row carries an unknown entity kind.
    #[error("corrupt document row: unknown entity kind '{0}'")]
    UnknownEntityKind(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for the document registry.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a registry record.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn insert(&self, record: &DocumentRecord) -> Result<(), DocumentRepoError> {
        let model = documents::ActiveModel {
            id: Set(record.id.into_inner()),
            title: Set(record.title.clone()),
            path: Set(record.path.clone()),
            checksum: Set(record.checksum.clone()),
            linked_entity_kind: Set(record.linked_entity.kind.as_str().to_string()),
            linked_entity_id: Set(record.linked_entity.id),
            created_at: Set(record.created_at.into()),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    /// Loads one registry record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database/decoding error.
    pub async fn find(&self, document_id: DocumentId) -> Result<DocumentRecord, DocumentRepoError> {
        let model = documents::Entity::find_by_id(document_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id.into_inner()))?;
        model_to_record(model)
    }

    /// All artifacts generated for one entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database/decoding error.
    pub async fn list_for_entity(
        &self,
        entity: EntityRef,
    ) -> Result<Vec<DocumentRecord>, DocumentRepoError> {
        let rows = documents::Entity::find()
            .filter(documents::Column::LinkedEntityKind.eq(entity.kind.as_str()))
            .filter(documents::Column::LinkedEntityId.eq(entity.id))
            .order_by_desc(documents::Column::CreatedAt)
            .all(&self.db)
            .await?;

        rows.into_iter().map(model_to_record).collect()
    }
}

fn model_to_record(model: documents::Model) -> Result<DocumentRecord, DocumentRepoError> {
    let kind = EntityKind::parse(&model.linked_entity_kind)
        .ok_or_else(|| DocumentRepoError::UnknownEntityKind(model.linked_entity_kind.clone()))?;

    Ok(DocumentRecord {
        id: DocumentId::from_uuid(model.id),
        title: model.title,
        path: model.path,
        checksum: model.checksum,
        linked_entity: EntityRef {
            kind,
            id: model.linked_entity_id,
        },
        created_at: model.created_at.into(),
    })
}
