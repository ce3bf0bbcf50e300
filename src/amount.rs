//! Compact encoding for satoshi amounts.
//!
//! Most on-chain amounts are round numbers in the base unit, so the trailing
//! decimal zeros are folded into a small exponent instead of being carried in
//! the value itself. The mapping is a bijection: zero maps to zero and every
//! other amount maps to a strictly positive code.

/// Largest amount a well-formed record can carry, in satoshis.
pub const MAX_MONEY: u64 = 21_000_000 * 100_000_000;

/// `compress_amount` is defined for every `u64`, but callers are expected to
/// have range-checked amounts against [`MAX_MONEY`] upstream; values far
/// beyond it can exceed the code space of a `u64`.
pub fn compress_amount(mut n: u64) -> u64 {
    if n == 0 { return 0; }
    let mut e: u64 = 0;
    while n % 10 == 0 && e < 9 {
        n /= 10;
        e += 1;
    }
    if e < 9 {
        let d = n % 10;
        debug_assert!((1..=9).contains(&d));
        n /= 10;
        1 + (n * 9 + d - 1) * 10 + e
    } else {
        1 + (n - 1) * 10 + 9
    }
}

pub fn decompress_amount(x: u64) -> u64 {
    if x == 0 { return 0; }
    let mut x = x - 1;
    let mut e = x % 10;
    x /= 10;
    let mut n = if e < 9 {
        let d = (x % 9) + 1;
        x /= 9;
        x * 10 + d
    } else {
        x + 1
    };
    // Codes past the representable range wrap rather than abort; callers
    // validate decoded amounts against MAX_MONEY themselves.
    while e > 0 {
        n = n.wrapping_mul(10);
        e -= 1;
    }
    n
}
