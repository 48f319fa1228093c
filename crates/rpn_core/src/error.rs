use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("invalid operator '{op}': must be one of {valid}")]
    InvalidOperator { op: String, valid: String },
    #[error("not enough operands in the stack: need {needed}, found {found}")]
    InsufficientOperands { needed: usize, found: usize },
    #[error("division by zero is not allowed")]
    DivisionByZero,
    #[error("malformed input: '{0}' is not an integer")]
    MalformedInput(String),
    #[error("quotient is too large for a float")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, EvalError>;
