use crate::{core::situation::Situation, quantity::distance::Kilometers};

/// Untyped parameter data that does not fit the typed parameter schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("the table has no columns")]
    NoColumns,

    #[error("the table has no `{0}` column")]
    MissingColumn(&'static str),

    #[error("row {row}, column `{column}`: missing value")]
    MissingValue { row: usize, column: String },

    #[error("row {row}, column `{column}`: `{value}` is not a valid non-negative amount")]
    InvalidAmount { row: usize, column: String, value: String },

    #[error("`{0}` is not a valid distance cutoff")]
    InvalidCutoff(String),

    #[error("cutoff {cutoff} is defined more than once (`{column}`)")]
    DuplicateCutoff { cutoff: Kilometers, column: String },

    #[error("city `{0}` is defined more than once")]
    DuplicateCity(String),

    #[error("`{situation}` multiplier must be a positive number, got `{value}`")]
    InvalidMultiplier { situation: Situation, value: String },

    #[error("`{0}` multiplier is defined more than once")]
    DuplicateMultiplier(Situation),

    #[error("no cities found")]
    NoCities,
}
