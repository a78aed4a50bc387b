//! `SeaORM` Entity for credit_cards table.

use balanco_core::tenancy::OrgScoped;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub card_brand: Option<String>,
    pub card_color: Option<String>,
    pub closing_day: i32,
    pub due_day: i32,
    pub created_at: DateTimeWithTimeZone,
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
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_delete = "Cascade"
    )]
    Organizations,
    #[sea_orm(has_many = "super::credit_card_purchases::Entity")]
    CreditCardPurchases,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::credit_card_purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditCardPurchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
