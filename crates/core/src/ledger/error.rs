//! Ledger validation errors.

use thiserror::Error;

/// Errors raised while validating entries, rules, purchases and categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Description is blank.
    #[error("A descrição é obrigatória.")]
    EmptyDescription,

    /// Amount is zero or negative.
    #[error("O valor deve ser maior que zero.")]
    NonPositiveAmount,

    /// Amount does not fit `numeric(12,2)`.
    #[error("O valor excede o limite permitido.")]
    AmountTooLarge,

    /// Amount has more than two decimal places.
    #[error("O valor deve ter no máximo duas casas decimais.")]
    TooManyDecimals,

    /// Unknown entry kind.
    #[error("Tipo inválido: {0}")]
    InvalidKind(String),

    /// Unknown status.
    #[error("Status inválido: {0}")]
    InvalidStatus(String),

    /// Category name is blank.
    #[error("O nome da categoria é obrigatório.")]
    EmptyCategoryName,

    /// Color is not `#RRGGBB`.
    #[error("Cor inválida: {0}")]
    InvalidColor(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::TooManyDecimals => "TOO_MANY_DECIMALS",
            Self::InvalidKind(_) => "INVALID_KIND",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::EmptyCategoryName => "EMPTY_CATEGORY_NAME",
            Self::InvalidColor(_) => "INVALID_COLOR",
        }
    }
}
