//! `SeaORM` Entity for the number sequences table.
//!
//! One row per (doc_type, year); `current_number` is the sole source of
//! truth for the next document number in that year and is only ever moved
//! by the atomic allocation statement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "number_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub doc_type: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    pub current_number: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
