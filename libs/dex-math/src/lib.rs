//! Fixed-point price math for concentrated-liquidity pools.
//!
//! Bit-exact with the on-chain reference: every intermediate is an
//! arbitrary-precision integer, and the places where the reference wraps a
//! 256-bit word are masked explicitly (see [`multiply_in_256`]).

pub mod bit_math;
pub mod error;
pub mod full_math;
pub mod sqrt_price_math;
pub mod tick_math;

pub use bit_math::*;
pub use error::*;
pub use full_math::*;
pub use sqrt_price_math::*;
pub use tick_math::*;

pub use dex_types::{
    MAX_SQRT_RATIO, MAX_TICK, MAX_UINT160, MAX_UINT256, MIN_SQRT_RATIO, MIN_TICK, Q128, Q32, Q96,
    RESOLUTION,
};
pub use num_bigint::{BigInt, BigUint};
