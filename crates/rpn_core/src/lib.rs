//! RPN core: token model, the stored-token filter and the binary-operator
//! evaluator. Everything here is pure; persistence lives in `rpn_store`.

pub mod error;
pub mod eval;
pub mod token;

pub use error::{EvalError, Result};
pub use eval::{apply, Applied};
pub use token::{decode, encode, filter_tokens, is_valid_token, operators, tokenize, Operator};
