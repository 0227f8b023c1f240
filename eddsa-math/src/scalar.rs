// eddsa, Ed25519 signatures over Curve25519
// Copyright (C) 2025 A. Russon
// 
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
// 
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Integers modulo the group order L = 2^252 + 27742317777372353535851937790883648493.
//!
//! Reduction is bit-serial: the accumulator is doubled, the next input bit is
//! shifted in and L is subtracted by selection. Every input bit costs the same
//! work, which keeps the nonce and the secret scalar off the timing channel.

use subtle::{
    Choice,
    ConditionallySelectable,
    ConstantTimeEq,
    CtOption
};
use zeroize::Zeroize;

// L, little-endian 64-bit limbs
const L: [u64; 4] = [
    0x5812_631a_5cf5_d3ed,
    0x14de_f9de_a2f7_9cd6,
    0x0000_0000_0000_0000,
    0x1000_0000_0000_0000
];

#[derive(Clone, Copy, Default, Zeroize)]
pub struct Scalar {
    limbs: [u64; 4]
}

fn limbs_from_le_bytes<const N: usize>(input: &[u8]) -> [u64; N] {
    let mut limbs = [0u64; N];
    for (limb, chunk) in limbs.iter_mut().zip(input.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }
    limbs
}

// returns (acc - L, borrow)
fn sub_l(acc: &[u64; 4]) -> ([u64; 4], u64) {
    let mut diff = [0u64; 4];
    let mut borrow = 0u64;
    for i in 0..4 {
        let (d1, b1) = acc[i].overflowing_sub(L[i]);
        let (d2, b2) = d1.overflowing_sub(borrow);
        diff[i] = d2;
        borrow = (b1 | b2) as u64;
    }
    (diff, borrow)
}

// reduces a little-endian multi-limb integer modulo L
fn reduce_limbs(input: &[u64]) -> [u64; 4] {
    let mut acc = [0u64; 4];
    for word in input.iter().rev() {
        for i in (0..64).rev() {
            // acc < L < 2^253, so 2*acc + 1 still fits in 256 bits
            let mut carry = (word >> i) & 1;
            for limb in acc.iter_mut() {
                let next = *limb >> 63;
                *limb = (*limb << 1) | carry;
                carry = next;
            }

            let (diff, borrow) = sub_l(&acc);
            let keep = Choice::from(borrow as u8);
            for (a, d) in acc.iter_mut().zip(diff.iter()) {
                *a = u64::conditional_select(d, a, keep);
            }
        }
    }
    acc
}

impl Scalar {
    pub const ZERO: Scalar = Scalar { limbs: [0; 4] };
    pub const ONE: Scalar = Scalar { limbs: [1, 0, 0, 0] };

    /// The group order itself, little-endian. Useful as an exponent: L*P is
    /// the neutral element for every P in the prime-order subgroup.
    pub const ORDER_BYTES: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
        0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10
    ];

    /// Reduces a 512-bit little-endian integer, typically a SHA-512 digest.
    pub fn from_bytes_mod_order_wide(input: &[u8; 64]) -> Scalar {
        let mut wide = limbs_from_le_bytes::<8>(input);
        let limbs = reduce_limbs(&wide);
        wide.zeroize();
        Scalar { limbs }
    }

    pub fn from_bytes_mod_order(input: &[u8; 32]) -> Scalar {
        Scalar { limbs: reduce_limbs(&limbs_from_le_bytes::<4>(input)) }
    }

    /// Only accepts encodings of integers strictly below L.
    pub fn from_canonical_bytes(input: &[u8; 32]) -> CtOption<Scalar> {
        let limbs = limbs_from_le_bytes::<4>(input);
        let (_, borrow) = sub_l(&limbs);
        CtOption::new(Scalar { limbs }, Choice::from(borrow as u8))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut output = [0u8; 32];
        for (chunk, limb) in output.chunks_exact_mut(8).zip(self.limbs.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        output
    }

    /// (a * b + c) mod L
    pub fn mul_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Scalar {
        let mut wide = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u128;
            for j in 0..4 {
                let t = wide[i + j] as u128 + (a.limbs[i] as u128) * (b.limbs[j] as u128) + carry;
                wide[i + j] = t as u64;
                carry = t >> 64;
            }
            wide[i + 4] = carry as u64;
        }

        // a*b < 2^512 - 2^257, adding c < 2^256 cannot overflow
        let mut carry = 0u128;
        for (i, w) in wide.iter_mut().enumerate() {
            let t = *w as u128 + c.limbs.get(i).copied().unwrap_or(0) as u128 + carry;
            *w = t as u64;
            carry = t >> 64;
        }

        let limbs = reduce_limbs(&wide);
        wide.zeroize();
        Scalar { limbs }
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Scalar) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scalar(0x")?;
        for byte in self.to_bytes().iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Clears the three low bits and bit 255, sets bit 254.
pub fn clamp(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes[0]  &= 248;
    bytes[31] &= 127;
    bytes[31] |= 64;
    bytes
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use super::{Scalar, clamp};

    #[test]
    fn test_order_reduces_to_zero() {
        assert_eq!(Scalar::from_bytes_mod_order(&Scalar::ORDER_BYTES), Scalar::ZERO);
        assert!(bool::from(Scalar::from_canonical_bytes(&Scalar::ORDER_BYTES).is_none()));

        let mut l_minus_one = Scalar::ORDER_BYTES;
        l_minus_one[0] -= 1;
        let s = Scalar::from_canonical_bytes(&l_minus_one).unwrap();
        assert_eq!(s.to_bytes(), l_minus_one);
        // (L-1) + 1 = 0
        assert_eq!(Scalar::mul_add(&s, &Scalar::ONE, &Scalar::ONE), Scalar::ZERO);
    }

    #[test]
    fn test_wide_reduction() {
        // 2^512 - 1 mod L
        let wide = [0xffu8; 64];
        let expected = hex!("000f9c44e31106a447938568a71b0ed065bef517d273ecce3d9a307c1b419903");
        assert_eq!(Scalar::from_bytes_mod_order_wide(&wide).to_bytes(), expected);

        let mut small = [0u8; 64];
        small[0] = 42;
        let mut expected = [0u8; 32];
        expected[0] = 42;
        assert_eq!(Scalar::from_bytes_mod_order_wide(&small).to_bytes(), expected);
    }

    #[test]
    fn test_mul_add() {
        let mut two = [0u8; 32];
        two[0] = 2;
        let mut three = [0u8; 32];
        three[0] = 3;
        let mut seven = [0u8; 32];
        seven[0] = 7;
        let a = Scalar::from_bytes_mod_order(&two);
        let b = Scalar::from_bytes_mod_order(&three);
        let c = Scalar::ONE;
        assert_eq!(Scalar::mul_add(&a, &b, &c).to_bytes(), seven);

        // (L-1)^2 = 1 mod L
        let mut l_minus_one = Scalar::ORDER_BYTES;
        l_minus_one[0] -= 1;
        let m = Scalar::from_bytes_mod_order(&l_minus_one);
        assert_eq!(Scalar::mul_add(&m, &m, &Scalar::ZERO), Scalar::ONE);
    }

    #[test]
    fn test_clamp() {
        let clamped = clamp([0xff; 32]);
        assert_eq!(clamped[0], 0xf8);
        assert_eq!(clamped[31], 0x7f);
        let clamped = clamp([0; 32]);
        assert_eq!(clamped[31], 0x40);
    }
}
