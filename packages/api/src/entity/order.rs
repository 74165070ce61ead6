//! `SeaORM` Entity for storefront and POS orders

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub order_number: Option<String>,
    /// Store code the order was placed at, the online shop has its own code
    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,
    /// Payment state, only `paid` orders count as sales
    #[sea_orm(column_type = "Text")]
    pub financial_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub customer_id: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub total_price: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItem,
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
