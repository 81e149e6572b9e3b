use crate::error::{MathError, MathResult};
use num_bigint::BigUint;
use num_traits::Zero;

/// Index (0-based) of the most significant set bit of `x`.
///
/// `x >= 2^msb` and `x < 2^(msb + 1)`. Zero has no set bit and is rejected.
pub fn most_significant_bit(x: &BigUint) -> MathResult<u64> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(x.bits() - 1)
}
