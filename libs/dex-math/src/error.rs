use thiserror::Error;

/// Domain errors reported by the price math.
///
/// Every variant is raised before any result is produced, so a rejected call
/// is always safe to discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("invalid tick")]
    InvalidTick,
    #[error("invalid sqrt ratio")]
    InvalidSqrtRatio,
    #[error("sqrt price less than zero")]
    SqrtPriceLessThanZero,
    #[error("liquidity less than zero")]
    LiquidityLessThanZero,
    #[error("invariant violation")]
    InvariantViolation,
    #[error("zero input value")]
    ZeroValue,
}

pub type MathResult<T> = Result<T, MathError>;
