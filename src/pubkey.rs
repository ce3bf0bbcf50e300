//! Recovery of full secp256k1 public keys from their 33 byte compressed form.
//!
//! The curve lives over the prime field `p = 2^256 - 2^32 - 977`. Because
//! `p % 4 == 3`, the square root of `x^3 + 7` is a single exponentiation by
//! `(p + 1) / 4`; no general Tonelli-Shanks machinery is needed. Everything
//! here is specific to that prime and must not be reused for other curves.

use crate::error::Error;

pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;
pub const PUBLIC_KEY_SIZE: usize = 65;

/// Field element in four little-endian 64-bit limbs.
type Fe = [u64; 4];

const FIELD_PRIME: Fe = [0xFFFF_FFFE_FFFF_FC2F, u64::MAX, u64::MAX, u64::MAX];
/// `(p + 1) / 4`, the square-root exponent for this prime.
const SQRT_EXPONENT: Fe = [0xFFFF_FFFF_BFFF_FF0C, u64::MAX, u64::MAX, 0x3FFF_FFFF_FFFF_FFFF];
/// `2^256 mod p`, i.e. `2^32 + 977`.
const FOLD: u64 = 0x1_0000_03D1;
const CURVE_B: u64 = 7;

fn fe_from_be_bytes(bytes: &[u8; 32]) -> Fe {
    let mut limbs = [0u64; 4];
    for i in 0..4 {
        let mut limb: u64 = 0;
        for j in 0..8 {
            limb = (limb << 8) | bytes[i * 8 + j] as u64;
        }
        limbs[3 - i] = limb;
    }
    if fe_geq(&limbs, &FIELD_PRIME) { fe_sub(&limbs, &FIELD_PRIME) } else { limbs }
}

fn fe_to_be_bytes(a: &Fe) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for i in 0..4 {
        bytes[i * 8..(i + 1) * 8].copy_from_slice(&a[3 - i].to_be_bytes());
    }
    bytes
}

fn fe_geq(a: &Fe, b: &Fe) -> bool {
    for i in (0..4).rev() {
        if a[i] != b[i] { return a[i] > b[i]; }
    }
    true
}

fn fe_sub(a: &Fe, b: &Fe) -> Fe {
    let mut out = [0u64; 4];
    let mut borrow: u64 = 0;
    for i in 0..4 {
        let (d, b1) = a[i].overflowing_sub(b[i]);
        let (d, b2) = d.overflowing_sub(borrow);
        out[i] = d;
        borrow = (b1 | b2) as u64;
    }
    debug_assert_eq!(borrow, 0);
    out
}

fn fe_mul(a: &Fe, b: &Fe) -> Fe {
    let mut wide = [0u64; 8];
    for i in 0..4 {
        let mut carry: u128 = 0;
        for j in 0..4 {
            let acc = a[i] as u128 * b[j] as u128 + wide[i + j] as u128 + carry;
            wide[i + j] = acc as u64;
            carry = acc >> 64;
        }
        wide[i + 4] = carry as u64;
    }
    fe_reduce(&wide)
}

/// Reduce a 512-bit product modulo p by folding the high half down twice,
/// using `2^256 ≡ FOLD (mod p)`.
fn fe_reduce(wide: &[u64; 8]) -> Fe {
    let mut folded = [0u64; 5];
    let mut carry: u128 = 0;
    for i in 0..4 {
        let acc = wide[i] as u128 + wide[i + 4] as u128 * FOLD as u128 + carry;
        folded[i] = acc as u64;
        carry = acc >> 64;
    }
    folded[4] = carry as u64;

    let mut out = [0u64; 4];
    let mut carry: u128 = folded[4] as u128 * FOLD as u128;
    for i in 0..4 {
        let acc = folded[i] as u128 + (carry as u64) as u128;
        out[i] = acc as u64;
        carry = (carry >> 64) + (acc >> 64);
    }
    if carry > 0 {
        out = fe_add_word(&out, FOLD);
        return out;
    }
    if fe_geq(&out, &FIELD_PRIME) { out = fe_sub(&out, &FIELD_PRIME); }
    out
}

fn fe_add_word(a: &Fe, word: u64) -> Fe {
    let mut out = *a;
    let mut carry: u128 = word as u128;
    for limb in out.iter_mut() {
        if carry == 0 { break; }
        let acc = *limb as u128 + carry;
        *limb = acc as u64;
        carry = acc >> 64;
    }
    if carry > 0 {
        // wrapped past 2^256, which folds to FOLD again
        out = fe_add_word(&out, FOLD);
        return out;
    }
    if fe_geq(&out, &FIELD_PRIME) { out = fe_sub(&out, &FIELD_PRIME); }
    out
}

fn fe_pow(base: &Fe, exp: &Fe) -> Fe {
    let mut out: Fe = [1, 0, 0, 0];
    for limb in exp.iter().rev() {
        for bit in (0..64).rev() {
            out = fe_mul(&out, &out);
            if (limb >> bit) & 1 == 1 {
                out = fe_mul(&out, base);
            }
        }
    }
    out
}

fn fe_neg(a: &Fe) -> Fe {
    if a.iter().all(|&limb| limb == 0) { return *a; }
    fe_sub(&FIELD_PRIME, a)
}

fn fe_is_odd(a: &Fe) -> bool {
    a[0] & 1 == 1
}

/// `y^2 = x^3 + 7` evaluated over the field.
fn lift_x(x: &Fe) -> Fe {
    fe_add_word(&fe_mul(&fe_mul(x, x), x), CURVE_B)
}

/// Recover the uncompressed 65 byte key from a parity tag and x-coordinate.
///
/// The input must already be structurally valid: exactly 33 bytes with a
/// leading 0x02 or 0x03, which holds for every compressed-script payload that
/// reaches this point. An x-coordinate with no square root of `x^3 + 7` is
/// not a point on the curve and fails with [`Error::NotOnCurve`].
pub fn decompress_pubkey(compressed: &[u8; COMPRESSED_PUBLIC_KEY_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE], Error> {
    let parity = compressed[0];
    debug_assert!(parity == 0x02 || parity == 0x03);

    let mut x_bytes = [0u8; 32];
    x_bytes.copy_from_slice(&compressed[1..]);
    let x = fe_from_be_bytes(&x_bytes);

    let rhs = lift_x(&x);
    let mut y = fe_pow(&rhs, &SQRT_EXPONENT);
    if fe_mul(&y, &y) != rhs {
        return Err(Error::NotOnCurve());
    }
    if fe_is_odd(&y) != (parity == 0x03) {
        y = fe_neg(&y);
    }

    let mut pubkey = [0u8; PUBLIC_KEY_SIZE];
    pubkey[0] = 0x04;
    pubkey[1..33].copy_from_slice(&compressed[1..]);
    pubkey[33..].copy_from_slice(&fe_to_be_bytes(&y));
    Ok(pubkey)
}

/// Compress a 65 byte key down to its parity tag and x-coordinate, refusing
/// coordinate pairs that do not satisfy the curve equation.
pub fn compress_pubkey(pubkey: &[u8; PUBLIC_KEY_SIZE]) -> Result<[u8; COMPRESSED_PUBLIC_KEY_SIZE], Error> {
    debug_assert!(pubkey[0] == 0x04);

    let mut x_bytes = [0u8; 32];
    let mut y_bytes = [0u8; 32];
    x_bytes.copy_from_slice(&pubkey[1..33]);
    y_bytes.copy_from_slice(&pubkey[33..]);
    let x = fe_from_be_bytes(&x_bytes);
    let y = fe_from_be_bytes(&y_bytes);

    if fe_mul(&y, &y) != lift_x(&x) {
        return Err(Error::NotOnCurve());
    }

    let mut out = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
    out[0] = 0x02 | (pubkey[64] & 1);
    out[1..].copy_from_slice(&pubkey[1..33]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{PublicKey, Secp256k1, SecretKey};

    const GX: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GY: &str = "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    fn generator_compressed(parity: u8) -> [u8; 33] {
        let mut compressed = [0u8; 33];
        compressed[0] = parity;
        compressed[1..].copy_from_slice(&hex::decode(GX).unwrap());
        compressed
    }

    #[test]
    fn field_identities() {
        let one: Fe = [1, 0, 0, 0];
        let minus_one = fe_sub(&FIELD_PRIME, &one);
        assert_eq!(fe_mul(&minus_one, &minus_one), one);

        let four: Fe = [4, 0, 0, 0];
        let root = fe_pow(&four, &SQRT_EXPONENT);
        assert_eq!(fe_mul(&root, &root), four);
    }

    #[test]
    fn generator_even_parity() {
        let uncompressed = decompress_pubkey(&generator_compressed(0x02)).unwrap();
        assert_eq!(uncompressed[0], 0x04);
        assert_eq!(hex::encode(&uncompressed[1..33]), GX);
        assert_eq!(hex::encode(&uncompressed[33..]), GY);
        assert_eq!(compress_pubkey(&uncompressed).unwrap(), generator_compressed(0x02));
    }

    #[test]
    fn generator_odd_parity() {
        let uncompressed = decompress_pubkey(&generator_compressed(0x03)).unwrap();
        assert_eq!(uncompressed[0], 0x04);
        assert!(uncompressed[64] & 1 == 1);
        // the negated y must agree with the reference implementation
        let reference = PublicKey::from_slice(&generator_compressed(0x03)).unwrap();
        assert_eq!(uncompressed, reference.serialize_uncompressed());
        assert_eq!(compress_pubkey(&uncompressed).unwrap(), generator_compressed(0x03));
    }

    #[test]
    fn matches_reference_over_derived_keys() {
        let ctx = Secp256k1::new();
        for i in 1u8..=40 {
            let mut seed = [0u8; 32];
            seed[31] = i;
            seed[0] = i.wrapping_mul(37);
            let sk = SecretKey::from_slice(&seed).unwrap();
            let pk = PublicKey::from_secret_key(&ctx, &sk);
            assert_eq!(decompress_pubkey(&pk.serialize()).unwrap(), pk.serialize_uncompressed());
            assert_eq!(compress_pubkey(&pk.serialize_uncompressed()).unwrap(), pk.serialize());
        }
    }

    #[test]
    fn rejects_x_without_square_root() {
        let mut rejected = 0;
        for i in 0u8..=255 {
            let mut candidate = [0u8; 33];
            candidate[0] = 0x02;
            candidate[32] = i;
            match PublicKey::from_slice(&candidate) {
                Ok(reference) => {
                    assert_eq!(decompress_pubkey(&candidate).unwrap(), reference.serialize_uncompressed());
                }
                Err(_) => {
                    rejected += 1;
                    assert!(matches!(decompress_pubkey(&candidate), Err(Error::NotOnCurve())));
                }
            }
        }
        // roughly half of all x-coordinates have no square root
        assert!(rejected > 0);
    }

    #[test]
    fn rejects_mismatched_coordinate_pair() {
        let mut uncompressed = decompress_pubkey(&generator_compressed(0x02)).unwrap();
        uncompressed[64] ^= 0x01;
        assert!(matches!(compress_pubkey(&uncompressed), Err(Error::NotOnCurve())));
    }
}
