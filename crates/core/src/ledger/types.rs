//! Entry kind and status.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Income.
    Receita,
    /// Expense.
    Despesa,
}

impl EntryKind {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Receita => "receita",
            Self::Despesa => "despesa",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receita" => Ok(Self::Receita),
            "despesa" => Ok(Self::Despesa),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

/// Stored settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Settled.
    Pago,
    /// Awaiting settlement.
    #[default]
    Pendente,
}

impl EntryStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pago => "pago",
            Self::Pendente => "pendente",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pago" => Ok(Self::Pago),
            "pendente" => Ok(Self::Pendente),
            other => Err(LedgerError::InvalidStatus(other.to_string())),
        }
    }
}

/// Status as shown to users: a pending entry past its due date is overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    /// Settled.
    Pago,
    /// Pending, not yet due.
    Pendente,
    /// Pending and overdue.
    Vencido,
}

impl EffectiveStatus {
    /// Derives the effective status on `today`.
    #[must_use]
    pub fn of(status: EntryStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match status {
            EntryStatus::Pago => Self::Pago,
            EntryStatus::Pendente if due_date.is_some_and(|due| due < today) => Self::Vencido,
            EntryStatus::Pendente => Self::Pendente,
        }
    }

    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pago => "pago",
            Self::Pendente => "pendente",
            Self::Vencido => "vencido",
        }
    }
}

impl FromStr for EffectiveStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pago" => Ok(Self::Pago),
            "pendente" => Ok(Self::Pendente),
            "vencido" => Ok(Self::Vencido),
            other => Err(LedgerError::InvalidStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_effective_status() {
        let today = d(2025, 5, 10);
        assert_eq!(
            EffectiveStatus::of(EntryStatus::Pago, Some(d(2025, 1, 1)), today),
            EffectiveStatus::Pago
        );
        assert_eq!(
            EffectiveStatus::of(EntryStatus::Pendente, Some(d(2025, 5, 9)), today),
            EffectiveStatus::Vencido
        );
        assert_eq!(
            EffectiveStatus::of(EntryStatus::Pendente, Some(today), today),
            EffectiveStatus::Pendente
        );
        assert_eq!(
            EffectiveStatus::of(EntryStatus::Pendente, None, today),
            EffectiveStatus::Pendente
        );
    }

    #[test]
    fn test_parse_kind_and_status() {
        assert_eq!("receita".parse::<EntryKind>().unwrap(), EntryKind::Receita);
        assert!(matches!(
            "income".parse::<EntryKind>(),
            Err(LedgerError::InvalidKind(_))
        ));
        assert_eq!("pago".parse::<EntryStatus>().unwrap(), EntryStatus::Pago);
        assert!("vencido".parse::<EntryStatus>().is_err());
        assert_eq!(
            "vencido".parse::<EffectiveStatus>().unwrap(),
            EffectiveStatus::Vencido
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&EntryKind::Despesa).unwrap(), "\"despesa\"");
        assert_eq!(serde_json::to_string(&EntryStatus::Pendente).unwrap(), "\"pendente\"");
    }
}
