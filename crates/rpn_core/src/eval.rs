//! Binary-operator application over a token stack.
//!
//! `apply` pops `b` then `a` from the top (end) of the stack, computes
//! `a <op> b` and pushes the rendered result back. Checks run in a fixed
//! order: operator, operand count, operand parsing, arithmetic.
//!
//! Operands are arbitrary-precision integers, so any digit-only token a read
//! can return is a valid operand. `+ - *` are exact; `/` is true division
//! rounded to the nearest `f64`.

use crate::error::{EvalError, Result};
use crate::token::Operator;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub result: String,
    pub updated_stack: Vec<String>,
}

pub fn apply(op: &str, mut stack: Vec<String>) -> Result<Applied> {
    let operator: Operator = op.parse()?;

    let split = stack
        .len()
        .checked_sub(2)
        .ok_or(EvalError::InsufficientOperands { needed: 2, found: stack.len() })?;
    let operands = stack.split_off(split);
    let a = parse_operand(&operands[0])?;
    let b = parse_operand(&operands[1])?;

    let result = compute(operator, a, b)?;
    stack.push(result.clone());
    Ok(Applied { result, updated_stack: stack })
}

fn parse_operand(token: &str) -> Result<BigInt> {
    token
        .trim()
        .parse::<BigInt>()
        .map_err(|_| EvalError::MalformedInput(token.to_string()))
}

fn compute(operator: Operator, a: BigInt, b: BigInt) -> Result<String> {
    let int = match operator {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => return divide(a, b).map(render_float),
    };
    Ok(int.to_string())
}

fn divide(a: BigInt, b: BigInt) -> Result<f64> {
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    if a.is_zero() {
        // zero keeps the divisor's sign: 0 / -5 is -0.0
        return Ok(if b.is_negative() { -0.0 } else { 0.0 });
    }
    // exact ratio first, so huge operands with a modest quotient still round correctly
    BigRational::new(a, b)
        .to_f64()
        .filter(|q| q.is_finite())
        .ok_or(EvalError::Overflow)
}

/// Render a quotient as a float literal: always with a fractional part or
/// an exponent (`4.0`, `2.5`, `-0.0`). Exponent form is used below `1e-4`
/// and from `1e16` up (`1.4285714285714285e-07`, `1e+16`). Digits are the
/// shortest that round-trip.
fn render_float(q: f64) -> String {
    let sign = if q.is_sign_negative() { "-" } else { "" };
    if q == 0.0 {
        return format!("{sign}0.0");
    }
    let sci = format!("{:e}", q.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if !(-4..16).contains(&exp) {
        let (lead, rest) = digits.split_at(1);
        let frac = if rest.is_empty() { String::new() } else { format!(".{rest}") };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{lead}{frac}e{exp_sign}{:02}", exp.abs())
    } else if exp >= 0 {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
        } else {
            let (int, frac) = digits.split_at(int_len);
            format!("{int}.{frac}")
        }
    } else {
        format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
    };
    format!("{sign}{body}")
}
