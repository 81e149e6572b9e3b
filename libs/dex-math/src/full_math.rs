use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

/// Multiply and divide with full intermediate precision (rounds down)
/// Returns (a * b) / denominator
///
/// # Panics
/// Panics if `denominator` is zero.
pub fn mul_div(a: &BigUint, b: &BigUint, denominator: &BigUint) -> BigUint {
    if denominator.is_zero() {
        panic!("Division by zero");
    }
    (a * b) / denominator
}

/// Multiply and divide with full intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
///
/// # Panics
/// Panics if `denominator` is zero.
pub fn mul_div_rounding_up(a: &BigUint, b: &BigUint, denominator: &BigUint) -> BigUint {
    let mut result = a.clone();
    mul_div_rounding_up_in_place(&mut result, b, denominator);
    result
}

/// In-place form of [`mul_div_rounding_up`]: `a` is overwritten with
/// `ceil(a * b / denominator)`. `b` and `denominator` are left untouched.
///
/// # Panics
/// Panics if `denominator` is zero.
pub fn mul_div_rounding_up_in_place(a: &mut BigUint, b: &BigUint, denominator: &BigUint) {
    *a *= b;
    div_rounding_up_in_place(a, denominator);
}

/// Unsigned division with rounding up
///
/// # Panics
/// Panics if `denominator` is zero.
pub fn div_rounding_up(a: &BigUint, denominator: &BigUint) -> BigUint {
    let mut result = a.clone();
    div_rounding_up_in_place(&mut result, denominator);
    result
}

/// In-place form of [`div_rounding_up`]: `a` is overwritten with
/// `ceil(a / denominator)`.
///
/// # Panics
/// Panics if `denominator` is zero.
pub fn div_rounding_up_in_place(a: &mut BigUint, denominator: &BigUint) {
    if denominator.is_zero() {
        panic!("Division by zero");
    }
    let (quotient, remainder) = a.div_rem(denominator);
    *a = if remainder.is_zero() {
        quotient
    } else {
        quotient + 1u32
    };
}
