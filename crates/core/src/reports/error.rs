//! Report error types.

use thiserror::Error;

/// Errors raised while parsing report filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Basis other than `caixa` or `competencia`.
    #[error("Base inválida: {0}. Use 'caixa' ou 'competencia'.")]
    InvalidBasis(String),

    /// Status other than `pago`, `pendente` or `vencido`.
    #[error("Status inválido: {0}")]
    InvalidStatus(String),

    /// Category that is neither a UUID nor `sem-categoria`.
    #[error("Categoria inválida: {0}")]
    InvalidCategory(String),

    /// `from` is after `to`.
    #[error("A data inicial deve ser anterior à data final.")]
    InvertedRange,
}
