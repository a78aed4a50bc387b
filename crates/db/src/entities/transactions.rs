//! `SeaORM` Entity for transactions table.

use balanco_core::ledger::EffectiveStatus;
use balanco_core::tenancy::OrgScoped;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionStatus, TransactionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub category_id: Option<Uuid>,
    pub entry_date: Date,
    pub due_date: Option<Date>,
    pub payment_date: Option<Date>,
    pub recurring_transaction_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Status as shown to users: pending entries past due read as overdue.
    #[must_use]
    pub fn effective_status(&self, today: Date) -> EffectiveStatus {
        EffectiveStatus::of(self.status.into(), self.due_date, today)
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
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_delete = "Cascade"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "SetNull"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::recurring_transactions::Entity",
        from = "Column::RecurringTransactionId",
        to = "super::recurring_transactions::Column::Id",
        on_delete = "SetNull"
    )]
    RecurringTransactions,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::recurring_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
