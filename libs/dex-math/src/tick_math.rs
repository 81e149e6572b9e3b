use crate::bit_math::most_significant_bit;
use crate::error::{MathError, MathResult};
use dex_types::{MAX_SQRT_RATIO, MAX_TICK, MAX_UINT256, MIN_SQRT_RATIO, MIN_TICK, Q128, Q32};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use tracing::debug;

// sqrt(1.0001)^-(2^i) in Q128.128, one per bit of the absolute tick
const SQRT_1_0001_1: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;
const SQRT_1_0001_2: u128 = 0xfff97272373d413259a46990580e213a;
const SQRT_1_0001_4: u128 = 0xfff2e50f5f656932ef12357cf3c7fdcc;
const SQRT_1_0001_8: u128 = 0xffe5caca7e10e4e61c3624eaa0941cd0;
const SQRT_1_0001_16: u128 = 0xffcb9843d60f6159c9db58835c926644;
const SQRT_1_0001_32: u128 = 0xff973b41fa98c081472e6896dfb254c0;
const SQRT_1_0001_64: u128 = 0xff2ea16466c96a3843ec78b326b52861;
const SQRT_1_0001_128: u128 = 0xfe5dee046a99a2a811c461f1969c3053;
const SQRT_1_0001_256: u128 = 0xfcbe86c7900a88aedcffc83b479aa3a4;
const SQRT_1_0001_512: u128 = 0xf987a7253ac413176f2b074cf7815e54;
const SQRT_1_0001_1024: u128 = 0xf3392b0822b70005940c7a398e4b70f3;
const SQRT_1_0001_2048: u128 = 0xe7159475a2c29b7443b29c7fa6e889d9;
const SQRT_1_0001_4096: u128 = 0xd097f3bdfd2022b8845ad8f792aa5825;
const SQRT_1_0001_8192: u128 = 0xa9f746462d870fdf8a65dc1f90e061e5;
const SQRT_1_0001_16384: u128 = 0x70d869a156d2a1b890bb3df62baf32f7;
const SQRT_1_0001_32768: u128 = 0x31be135f97d08fd981231505542fcfa6;
const SQRT_1_0001_65536: u128 = 0x9aa508b5b7a84e1c677de54f3e99bc9;
const SQRT_1_0001_131072: u128 = 0x5d6af8dedb81196699c329225ee604;
const SQRT_1_0001_262144: u128 = 0x2216e584f5fa1ea926041bedfe98;
const SQRT_1_0001_524288: u128 = 0x48a170391f7dc42444e8fa2;

/// Multipliers for bits 1 through 19; bit 0 picks the seed instead.
const SQRT_RATIO_MULTIPLIERS: [(u32, u128); 19] = [
    (0x2, SQRT_1_0001_2),
    (0x4, SQRT_1_0001_4),
    (0x8, SQRT_1_0001_8),
    (0x10, SQRT_1_0001_16),
    (0x20, SQRT_1_0001_32),
    (0x40, SQRT_1_0001_64),
    (0x80, SQRT_1_0001_128),
    (0x100, SQRT_1_0001_256),
    (0x200, SQRT_1_0001_512),
    (0x400, SQRT_1_0001_1024),
    (0x800, SQRT_1_0001_2048),
    (0x1000, SQRT_1_0001_4096),
    (0x2000, SQRT_1_0001_8192),
    (0x4000, SQRT_1_0001_16384),
    (0x8000, SQRT_1_0001_32768),
    (0x10000, SQRT_1_0001_65536),
    (0x20000, SQRT_1_0001_131072),
    (0x40000, SQRT_1_0001_262144),
    (0x80000, SQRT_1_0001_524288),
];

/// 2^64 / log2(sqrt(1.0001)), turns a Q64.64 log2 into a Q128.128 log_sqrt(1.0001)
const LOG_SQRT_10001_MULTIPLIER: u128 = 255738958999603826347141;

/// Error bounds of the log approximation, in Q128.128
const TICK_LOW_OFFSET: u128 = 3402992956809132418596140100660247210;
const TICK_HIGH_OFFSET: u128 = 291339464771989622907027621153398088495;

/// Calculate sqrt(1.0001^tick) * 2^96
///
/// Fails with [`MathError::InvalidTick`] if `tick` is outside
/// `[MIN_TICK, MAX_TICK]`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> MathResult<BigUint> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        debug!(tick, "tick out of bounds");
        return Err(MathError::InvalidTick);
    }

    let abs_tick = tick.unsigned_abs();

    // Q128.128 ratio for the negative of abs_tick
    let mut ratio = if abs_tick & 0x1 != 0 {
        BigUint::from(SQRT_1_0001_1)
    } else {
        Q128.clone()
    };

    for &(bit, multiplier) in SQRT_RATIO_MULTIPLIERS.iter() {
        if abs_tick & bit != 0 {
            ratio = mul_shift_128(&ratio, multiplier);
        }
    }

    if tick > 0 {
        ratio = &*MAX_UINT256 / ratio;
    }

    // Q128.128 -> Q64.96, rounding up
    let (quotient, remainder) = ratio.div_rem(&Q32);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + 1u32)
    }
}

/// Get the greatest tick whose sqrt ratio is less than or equal to
/// `sqrt_price_x96`, i.e. `get_sqrt_ratio_at_tick(tick) <= sqrt_price_x96 <
/// get_sqrt_ratio_at_tick(tick + 1)`.
///
/// Fails with [`MathError::InvalidSqrtRatio`] unless
/// `MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: &BigUint) -> MathResult<i32> {
    if *sqrt_price_x96 < *MIN_SQRT_RATIO || *sqrt_price_x96 >= *MAX_SQRT_RATIO {
        debug!(%sqrt_price_x96, "sqrt price out of bounds");
        return Err(MathError::InvalidSqrtRatio);
    }

    let sqrt_ratio_x128 = sqrt_price_x96 << 32u32;
    let msb = most_significant_bit(&sqrt_ratio_x128)?;

    // normalise into [2^127, 2^128)
    let mut r = if msb >= 128 {
        &sqrt_ratio_x128 >> (msb - 127)
    } else {
        &sqrt_ratio_x128 << (127 - msb)
    };

    // integer part of log2 in Q64.64, may be negative
    let mut log_2 = (BigInt::from(msb) - BigInt::from(128u32)) << 64u32;

    // fractional bits, one per squaring
    for i in 0..14u32 {
        r = (&r * &r) >> 127u32;
        if r.bit(128) {
            log_2 |= BigInt::one() << (63 - i);
            r >>= 1u32;
        }
    }

    let log_sqrt10001 = log_2 * BigInt::from(LOG_SQRT_10001_MULTIPLIER);

    let tick_low = to_tick((&log_sqrt10001 - BigInt::from(TICK_LOW_OFFSET)) >> 128u32)?;
    let tick_high = to_tick((&log_sqrt10001 + BigInt::from(TICK_HIGH_OFFSET)) >> 128u32)?;

    if tick_low == tick_high {
        return Ok(tick_low);
    }

    if get_sqrt_ratio_at_tick(tick_high)? <= *sqrt_price_x96 {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}

/// Helper: multiply by a Q128 constant and right shift by 128 bits
fn mul_shift_128(x: &BigUint, y: u128) -> BigUint {
    (x * BigUint::from(y)) >> 128u32
}

fn to_tick(value: BigInt) -> MathResult<i32> {
    value.to_i32().ok_or(MathError::InvariantViolation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_types::Q96;
    use proptest::prelude::*;

    fn dec(s: &str) -> BigUint {
        s.parse().unwrap()
    }

    fn sqrt_at(tick: i32) -> BigUint {
        get_sqrt_ratio_at_tick(tick).unwrap()
    }

    // === get_sqrt_ratio_at_tick tests ===

    #[test]
    fn test_get_sqrt_ratio_at_tick_zero() {
        assert_eq!(sqrt_at(0), *Q96);
    }

    #[test]
    fn test_get_sqrt_ratio_at_tick_bounds() {
        assert_eq!(sqrt_at(MIN_TICK), *MIN_SQRT_RATIO);
        assert_eq!(sqrt_at(MAX_TICK), *MAX_SQRT_RATIO);
    }

    #[test_log::test]
    fn test_get_sqrt_ratio_outside_tick_bounds() {
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK - 1), Err(MathError::InvalidTick));
        assert_eq!(get_sqrt_ratio_at_tick(MAX_TICK + 1), Err(MathError::InvalidTick));
        assert_eq!(get_sqrt_ratio_at_tick(i32::MIN), Err(MathError::InvalidTick));
        assert_eq!(get_sqrt_ratio_at_tick(i32::MAX), Err(MathError::InvalidTick));
    }

    #[test]
    fn test_get_sqrt_ratio_at_tick_known_values() {
        let cases = [
            (-500000, "1101692437043807371"),
            (-50, "79030349367926598376800521322"),
            (-1, "79224201403219477170569942574"),
            (1, "79232123823359799118286999568"),
            (50, "79426470787362580746886972461"),
            (100, "79625275426524748796330556128"),
            (1000, "83290069058676223003182343270"),
            (50000, "965075977353221155028623082916"),
            (150000, "143194173941309278083010301478497"),
            (500000, "5697689776495288729098254600827762987878"),
            (738203, "847134979253254120489401328389043031315994541"),
        ];
        for (tick, expected) in cases {
            assert_eq!(sqrt_at(tick), dec(expected), "tick {}", tick);
        }
    }

    #[test]
    fn test_get_sqrt_ratio_at_tick_positive_above_q96() {
        assert!(sqrt_at(100) > *Q96);
        assert!(sqrt_at(-100) < *Q96);
    }

    #[test]
    fn test_get_sqrt_ratio_at_tick_symmetric() {
        // sqrt(1.0001^n) * sqrt(1.0001^-n) = 1, to within one part per million
        let one = &*Q96 * &*Q96;
        for tick in [1, 100, 10000, 400000, MAX_TICK] {
            let product = sqrt_at(tick) * sqrt_at(-tick);
            let diff = if product > one { &product - &one } else { &one - &product };
            assert!(diff * 1_000_000u32 < one, "tick {}", tick);
        }
    }

    #[test]
    fn test_get_sqrt_ratio_at_tick_monotonic() {
        let mut prev = sqrt_at(MIN_TICK);
        for tick in (MIN_TICK + 1..=MAX_TICK).step_by(997) {
            let next = sqrt_at(tick);
            assert!(next > prev, "not increasing at tick {}", tick);
            prev = next;
        }
    }

    #[test]
    fn test_tick_spacing_price_change() {
        // 100 ticks is ~0.5% in sqrt price
        let ratio = sqrt_at(100) * &*Q96 / sqrt_at(0);
        let expected_min = &*Q96 + &*Q96 / 250u32;
        let expected_max = &*Q96 + &*Q96 / 150u32;
        assert!(ratio > expected_min && ratio < expected_max);
    }

    // === get_tick_at_sqrt_ratio tests ===

    #[test]
    fn test_get_tick_at_sqrt_ratio_q96() {
        assert_eq!(get_tick_at_sqrt_ratio(&Q96), Ok(0));
    }

    #[test]
    fn test_get_tick_at_sqrt_ratio_min() {
        assert_eq!(get_tick_at_sqrt_ratio(&MIN_SQRT_RATIO), Ok(MIN_TICK));
    }

    #[test]
    fn test_get_tick_at_sqrt_ratio_just_below_max() {
        let sqrt_price = &*MAX_SQRT_RATIO - 1u32;
        assert_eq!(get_tick_at_sqrt_ratio(&sqrt_price), Ok(MAX_TICK - 1));
    }

    #[test]
    fn test_get_tick_at_sqrt_ratio_below_min() {
        let sqrt_price = &*MIN_SQRT_RATIO - 1u32;
        assert_eq!(get_tick_at_sqrt_ratio(&sqrt_price), Err(MathError::InvalidSqrtRatio));
        assert_eq!(
            get_tick_at_sqrt_ratio(&BigUint::zero()),
            Err(MathError::InvalidSqrtRatio)
        );
    }

    #[test]
    fn test_get_tick_at_sqrt_ratio_at_max() {
        // MAX_SQRT_RATIO is exclusive
        assert_eq!(get_tick_at_sqrt_ratio(&MAX_SQRT_RATIO), Err(MathError::InvalidSqrtRatio));
    }

    #[test]
    fn test_get_tick_at_sqrt_ratio_one_below_tick_boundary() {
        for tick in [-887271, -100, -1, 1, 100, 887271] {
            let sqrt_price = sqrt_at(tick);
            assert_eq!(get_tick_at_sqrt_ratio(&(&sqrt_price - 1u32)), Ok(tick - 1));
            assert_eq!(get_tick_at_sqrt_ratio(&(&sqrt_price + 1u32)), Ok(tick));
        }
    }

    #[test]
    fn test_get_tick_at_sqrt_ratio_roundtrip_sweep() {
        for tick in (MIN_TICK..MAX_TICK).step_by(4409) {
            assert_eq!(get_tick_at_sqrt_ratio(&sqrt_at(tick)), Ok(tick));
        }
    }

    proptest! {
        #[test]
        fn prop_tick_roundtrip(tick in MIN_TICK..MAX_TICK) {
            prop_assert_eq!(get_tick_at_sqrt_ratio(&sqrt_at(tick)), Ok(tick));
        }

        #[test]
        fn prop_sqrt_ratio_strictly_increasing(tick in MIN_TICK..MAX_TICK) {
            prop_assert!(sqrt_at(tick) < sqrt_at(tick + 1));
        }

        #[test]
        fn prop_tick_brackets_sqrt_price(bytes in any::<[u8; 20]>()) {
            let span = &*MAX_SQRT_RATIO - &*MIN_SQRT_RATIO;
            let sqrt_price = BigUint::from_bytes_be(&bytes) % span + &*MIN_SQRT_RATIO;
            let tick = get_tick_at_sqrt_ratio(&sqrt_price).unwrap();
            prop_assert!(sqrt_at(tick) <= sqrt_price);
            prop_assert!(sqrt_at(tick + 1) > sqrt_price);
        }
    }
}
