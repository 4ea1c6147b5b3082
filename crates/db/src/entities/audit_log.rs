//! `SeaORM` Entity for the append-only audit log table.
//!
//! Rows are inserted and read, never updated. The only delete path is the
//! retention purge.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: String,
    pub old_values: Option<Json>,
    pub new_values: Option<Json>,
    pub recorded_at: DateTimeWithTimeZone,
    pub actor_user_id: Option<Uuid>,
    pub actor_ip: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
