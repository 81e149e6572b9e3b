use crate::error::{MathError, MathResult};
use crate::full_math::{div_rounding_up, mul_div_rounding_up};
use dex_types::{MAX_UINT160, MAX_UINT256, Q96, RESOLUTION};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, trace};

/// `(x * y) mod 2^256`, the product a 256-bit register would hold
pub fn multiply_in_256(x: &BigUint, y: &BigUint) -> BigUint {
    (x * y) & &*MAX_UINT256
}

/// `(x + y) mod 2^256`
pub fn add_in_256(x: &BigUint, y: &BigUint) -> BigUint {
    (x + y) & &*MAX_UINT256
}

fn sorted<'a>(a: &'a BigUint, b: &'a BigUint) -> (&'a BigUint, &'a BigUint) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Calculate amount0 delta for a price move from sqrt_ratio_a to sqrt_ratio_b
/// delta_x = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
///
/// The division is done in two steps, first by the upper and then by the
/// lower sqrt ratio, each rounded in the requested direction.
///
/// # Panics
/// Panics if the lower of the two sqrt ratios is zero.
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: &BigUint,
    sqrt_ratio_b_x96: &BigUint,
    liquidity: &BigUint,
    round_up: bool,
) -> BigUint {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_lower.is_zero() {
        panic!("sqrt_ratio_lower cannot be zero");
    }

    let numerator1 = liquidity << RESOLUTION;
    let numerator2 = sqrt_ratio_upper - sqrt_ratio_lower;

    if round_up {
        div_rounding_up(
            &mul_div_rounding_up(&numerator1, &numerator2, sqrt_ratio_upper),
            sqrt_ratio_lower,
        )
    } else {
        numerator1 * numerator2 / sqrt_ratio_upper / sqrt_ratio_lower
    }
}

/// Calculate amount1 delta for a price move from sqrt_ratio_a to sqrt_ratio_b
/// delta_y = L * (sqrt_pb - sqrt_pa)
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: &BigUint,
    sqrt_ratio_b_x96: &BigUint,
    liquidity: &BigUint,
    round_up: bool,
) -> BigUint {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let numerator = (sqrt_ratio_upper - sqrt_ratio_lower) * liquidity;

    if round_up {
        div_rounding_up(&numerator, &Q96)
    } else {
        numerator >> RESOLUTION
    }
}

/// Get next sqrt price from an input amount of token0 or token1
///
/// Selling token0 (`zero_for_one`) pushes the price down and rounds up;
/// selling token1 pushes it up and rounds down. Either way the price never
/// moves further than the input pays for.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: &BigUint,
    liquidity: &BigUint,
    amount_in: &BigUint,
    zero_for_one: bool,
) -> MathResult<BigUint> {
    check_price_and_liquidity(sqrt_price_x96, liquidity)?;

    if zero_for_one {
        next_sqrt_price_from_amount0(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        next_sqrt_price_from_amount1(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Get next sqrt price from an output amount
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: &BigUint,
    liquidity: &BigUint,
    amount_out: &BigUint,
    zero_for_one: bool,
) -> MathResult<BigUint> {
    check_price_and_liquidity(sqrt_price_x96, liquidity)?;

    if zero_for_one {
        next_sqrt_price_from_amount1(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        next_sqrt_price_from_amount0(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Calculate next sqrt price given a token0 amount, always rounding up
/// sqrt_price_next = sqrt_price * L / (L + amount * sqrt_price)  [if add]
/// sqrt_price_next = sqrt_price * L / (L - amount * sqrt_price)  [if remove]
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: &BigUint,
    liquidity: &BigUint,
    amount: &BigUint,
    add: bool,
) -> MathResult<BigUint> {
    check_price_and_liquidity(sqrt_price_x96, liquidity)?;
    next_sqrt_price_from_amount0(sqrt_price_x96, liquidity, amount, add)
}

/// Calculate next sqrt price given a token1 amount, always rounding down
/// sqrt_price_next = sqrt_price + amount / L  [if add]
/// sqrt_price_next = sqrt_price - amount / L  [if remove]
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: &BigUint,
    liquidity: &BigUint,
    amount: &BigUint,
    add: bool,
) -> MathResult<BigUint> {
    check_price_and_liquidity(sqrt_price_x96, liquidity)?;
    next_sqrt_price_from_amount1(sqrt_price_x96, liquidity, amount, add)
}

fn check_price_and_liquidity(sqrt_price_x96: &BigUint, liquidity: &BigUint) -> MathResult<()> {
    if sqrt_price_x96.is_zero() {
        debug!(%liquidity, "rejecting zero sqrt price");
        return Err(MathError::SqrtPriceLessThanZero);
    }
    if liquidity.is_zero() {
        debug!(%sqrt_price_x96, "rejecting zero liquidity");
        return Err(MathError::LiquidityLessThanZero);
    }
    Ok(())
}

fn next_sqrt_price_from_amount0(
    sqrt_price_x96: &BigUint,
    liquidity: &BigUint,
    amount: &BigUint,
    add: bool,
) -> MathResult<BigUint> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96.clone());
    }

    let numerator1 = liquidity << RESOLUTION;
    let product = multiply_in_256(amount, sqrt_price_x96);
    let product_fits = &product / amount == *sqrt_price_x96;

    if add {
        if product_fits {
            let denominator = add_in_256(&numerator1, &product);
            if denominator >= numerator1 {
                return Ok(mul_div_rounding_up(&numerator1, sqrt_price_x96, &denominator));
            }
        }
        trace!(%amount, %sqrt_price_x96, "amount0 fast path overflowed 256 bits");
        // L / (L / sqrt_price + amount)
        let denominator = &numerator1 / sqrt_price_x96 + amount;
        Ok(div_rounding_up(&numerator1, &denominator))
    } else {
        if !product_fits || numerator1 <= product {
            debug!(%amount, %sqrt_price_x96, %liquidity, "amount0 out exceeds virtual reserves");
            return Err(MathError::InvariantViolation);
        }
        let denominator = &numerator1 - &product;
        Ok(mul_div_rounding_up(&numerator1, sqrt_price_x96, &denominator))
    }
}

fn next_sqrt_price_from_amount1(
    sqrt_price_x96: &BigUint,
    liquidity: &BigUint,
    amount: &BigUint,
    add: bool,
) -> MathResult<BigUint> {
    if add {
        let quotient = if *amount <= *MAX_UINT160 {
            (amount << RESOLUTION) / liquidity
        } else {
            amount * &*Q96 / liquidity
        };
        Ok(sqrt_price_x96 + quotient)
    } else {
        let quotient = mul_div_rounding_up(amount, &Q96, liquidity);
        if *sqrt_price_x96 <= quotient {
            debug!(%amount, %sqrt_price_x96, %liquidity, "amount1 out exceeds virtual reserves");
            return Err(MathError::InvariantViolation);
        }
        Ok(sqrt_price_x96 - quotient)
    }
}
