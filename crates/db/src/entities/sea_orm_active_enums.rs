//! Text-backed enums stored in the database.

use balanco_core::ledger::{EntryKind, EntryStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Income.
    #[sea_orm(string_value = "receita")]
    Receita,
    /// Expense.
    #[sea_orm(string_value = "despesa")]
    Despesa,
}

/// Settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settled.
    #[sea_orm(string_value = "pago")]
    Pago,
    /// Awaiting settlement.
    #[sea_orm(string_value = "pendente")]
    Pendente,
}

/// Subscription state kept in sync with the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// No paid subscription yet.
    #[sea_orm(string_value = "trialing")]
    Trialing,
    /// Paying.
    #[sea_orm(string_value = "active")]
    Active,
    /// Paused at the provider.
    #[sea_orm(string_value = "paused")]
    Paused,
    /// Cancelled at the provider.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<EntryKind> for TransactionType {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Receita => Self::Receita,
            EntryKind::Despesa => Self::Despesa,
        }
    }
}

impl From<TransactionType> for EntryKind {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Receita => Self::Receita,
            TransactionType::Despesa => Self::Despesa,
        }
    }
}

impl From<EntryStatus> for TransactionStatus {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Pago => Self::Pago,
            EntryStatus::Pendente => Self::Pendente,
        }
    }
}

impl From<TransactionStatus> for EntryStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pago => Self::Pago,
            TransactionStatus::Pendente => Self::Pendente,
        }
    }
}
