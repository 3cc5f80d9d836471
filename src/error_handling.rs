use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("empty expression")]
    empty_expression,

    #[error("invalid character, '{0}', encountered")]
    invalid_character(char),

    #[error("syntax error, {0}")]
    syntax(String),

    #[error("identifier, '{0}', is not defined")]
    unknown_identifier(String),

    #[error("division by zero")]
    division_by_zero,

    #[error("domain error, {0}")]
    domain(String),

    #[error("invalid value, {0}")]
    value(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
