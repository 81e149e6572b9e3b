//! Shared constants for the concentrated-liquidity price math.
//!
//! Every big-integer constant is a process-wide immutable built once on first
//! use. The values must match the on-chain reference bit for bit.

use num_bigint::BigUint;
use num_traits::One;
use once_cell::sync::Lazy;

/// Minimum tick index, `log_1.0001(2^-128)` rounded toward zero.
pub const MIN_TICK: i32 = -887272;

/// Maximum tick index.
pub const MAX_TICK: i32 = -MIN_TICK;

/// Number of fractional bits in a Q64.96 sqrt price.
pub const RESOLUTION: u32 = 96;

/// Q96 constant (2^96) for fixed-point math
pub static Q96: Lazy<BigUint> = Lazy::new(|| BigUint::one() << RESOLUTION);

/// 2^32, the scale between a Q128.128 ratio and a Q64.96 sqrt price
pub static Q32: Lazy<BigUint> = Lazy::new(|| BigUint::one() << 32u32);

/// 2^128
pub static Q128: Lazy<BigUint> = Lazy::new(|| BigUint::one() << 128u32);

/// Minimum sqrt price, equal to `get_sqrt_ratio_at_tick(MIN_TICK)`
pub static MIN_SQRT_RATIO: Lazy<BigUint> = Lazy::new(|| BigUint::from(4295128739u64));

/// Maximum sqrt price, equal to `get_sqrt_ratio_at_tick(MAX_TICK)`.
/// Exclusive upper bound for tick lookup.
pub static MAX_SQRT_RATIO: Lazy<BigUint> = Lazy::new(|| {
    // 0xfffd8963efd1fc6a506488495d951d5263988d26
    BigUint::from_bytes_be(&[
        0xff, 0xfd, 0x89, 0x63, 0xef, 0xd1, 0xfc, 0x6a, 0x50, 0x64, 0x88, 0x49, 0x5d, 0x95, 0x1d,
        0x52, 0x63, 0x98, 0x8d, 0x26,
    ])
});

/// 2^160 - 1
pub static MAX_UINT160: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 160u32) - 1u32);

/// 2^256 - 1, also the mask applied by the 256-bit modular helpers
pub static MAX_UINT256: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 256u32) - 1u32);
