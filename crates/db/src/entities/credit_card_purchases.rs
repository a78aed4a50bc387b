//! `SeaORM` Entity for credit_card_purchases table.

use balanco_core::invoice::InvoiceLine;
use balanco_core::tenancy::OrgScoped;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_card_purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub credit_card_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub purchase_date: Date,
    pub category_id: Option<Uuid>,
    pub current_installment: Option<i32>,
    pub total_installments: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<Model> for InvoiceLine {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            amount: model.amount,
            purchase_date: model.purchase_date,
            category_id: model.category_id,
            current_installment: model.current_installment,
            total_installments: model.total_installments,
        }
    }
}

impl OrgScoped for Model {
    fn row_id(&self) -> Uuid {
        self.id
    }

    fn organization_id(&self) -> Uuid {
        self.organization_id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::credit_cards::Entity",
        from = "Column::CreditCardId",
        to = "super::credit_cards::Column::Id",
        on_delete = "Cascade"
    )]
    CreditCards,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "SetNull"
    )]
    Categories,
}

impl Related<super::credit_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditCards.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
