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

// the limb arithmetic is adapted from the C code of libsodium:
// https://github.com/jedisct1/libsodium/blob/master/src/libsodium/include/sodium/private/ed25519_ref10_fe_51.h

use std::ops::{
    Add, AddAssign,
    Mul, MulAssign,
    Neg,
    Sub, SubAssign,
};

use subtle::{
    Choice,
    ConditionallySelectable,
    ConstantTimeEq,
    CtOption
};

const LOW_51_BITS: u64 = (1 << 51) - 1;

/// An element of GF(2^255-19), stored as five 51-bit limbs.
///
/// Limbs are allowed to grow a few bits above 51 between reductions; every
/// value leaving the type through [`FieldElement::to_bytes`] is canonical.
#[derive(Clone, Copy)]
pub struct FieldElement {
    pub(crate) limbs: [u64; 5]
}

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement { limbs: [0; 5] };
    pub const ONE: FieldElement = FieldElement { limbs: [1, 0, 0, 0, 0] };

    // sqrt(-1)
    pub const SQRT_M1: FieldElement = FieldElement {
        limbs: [
            1718705420411056,
            234908883556509,
            2233514472574048,
            2117202627021982,
            765476049583133
        ]
    };

    // d = -121665/121666
    pub const EDWARDS_D: FieldElement = FieldElement {
        limbs: [
            929955233495203,
            466365720129213,
            1662059464998953,
            2033849074728123,
            1442794654840575
        ]
    };

    // 2 * d
    pub const EDWARDS_D2: FieldElement = FieldElement {
        limbs: [
            1859910466990425,
            932731440258426,
            1072319116312658,
            1815898335770999,
            633789495995903
        ]
    };

    pub(crate) const fn from_limbs(limbs: [u64; 5]) -> FieldElement {
        FieldElement { limbs }
    }
}

fn load_u64(input: &[u8; 32], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&input[at..at + 8]);
    u64::from_le_bytes(word)
}

// carries a wide product back into 51-bit limbs, folding the top carry with 2^255 = 19
fn carry_wide(r: [u128; 5]) -> FieldElement {
    let mut limbs = [0u64; 5];
    let mut carry = 0u128;
    for (limb, &wide) in limbs.iter_mut().zip(r.iter()) {
        let v = wide + carry;
        *limb = (v as u64) & LOW_51_BITS;
        carry = v >> 51;
    }
    limbs[0] += 19 * carry as u64;
    limbs[1] += limbs[0] >> 51;
    limbs[0] &= LOW_51_BITS;
    FieldElement { limbs }
}

impl FieldElement {
    // one carry pass: limbs end up below 2^51 + 2^18
    fn weak_reduce(&self) -> FieldElement {
        let l = &self.limbs;
        let c = [l[0] >> 51, l[1] >> 51, l[2] >> 51, l[3] >> 51, l[4] >> 51];
        FieldElement {
            limbs: [
                (l[0] & LOW_51_BITS) + 19 * c[4],
                (l[1] & LOW_51_BITS) + c[0],
                (l[2] & LOW_51_BITS) + c[1],
                (l[3] & LOW_51_BITS) + c[2],
                (l[4] & LOW_51_BITS) + c[3]
            ]
        }
    }

    /// Decodes 32 little-endian bytes. Bit 255 is ignored and values above
    /// the modulus are kept as they are, arithmetic reduces them.
    pub fn from_bytes(input: &[u8; 32]) -> FieldElement {
        FieldElement {
            limbs: [
                load_u64(input, 0) & LOW_51_BITS,
                (load_u64(input, 6) >> 3) & LOW_51_BITS,
                (load_u64(input, 12) >> 6) & LOW_51_BITS,
                (load_u64(input, 19) >> 1) & LOW_51_BITS,
                (load_u64(input, 24) >> 12) & LOW_51_BITS
            ]
        }
    }

    /// Canonical little-endian encoding, the value is fully reduced first.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut l = self.weak_reduce().limbs;

        // the value is now below 2*q, q_carry = 1 iff it is at least q
        let mut q_carry = (l[0] + 19) >> 51;
        q_carry = (l[1] + q_carry) >> 51;
        q_carry = (l[2] + q_carry) >> 51;
        q_carry = (l[3] + q_carry) >> 51;
        q_carry = (l[4] + q_carry) >> 51;

        l[0] += 19 * q_carry;
        l[1] += l[0] >> 51;
        l[0] &= LOW_51_BITS;
        l[2] += l[1] >> 51;
        l[1] &= LOW_51_BITS;
        l[3] += l[2] >> 51;
        l[2] &= LOW_51_BITS;
        l[4] += l[3] >> 51;
        l[3] &= LOW_51_BITS;
        // subtracting 2^255 completes the reduction
        l[4] &= LOW_51_BITS;

        let mut output = [0u8; 32];
        output[..8].copy_from_slice(&u64::to_le_bytes(l[0] | (l[1] << 51)));
        output[8..16].copy_from_slice(&u64::to_le_bytes((l[1] >> 13) | (l[2] << 38)));
        output[16..24].copy_from_slice(&u64::to_le_bytes((l[2] >> 26) | (l[3] << 25)));
        output[24..32].copy_from_slice(&u64::to_le_bytes((l[3] >> 39) | (l[4] << 12)));
        output
    }

    pub fn is_negative(&self) -> Choice {
        Choice::from(self.to_bytes()[0] & 1)
    }

    pub fn is_zero(&self) -> Choice {
        self.to_bytes().ct_eq(&[0u8; 32])
    }

    pub fn square(&self) -> FieldElement {
        let a = self.limbs.map(u128::from);

        let a0_2 = 2 * a[0];
        let a1_2 = 2 * a[1];

        let a1_38 = 38 * a[1];
        let a2_38 = 38 * a[2];
        let a3_38 = 38 * a[3];

        let a3_19 = 19 * a[3];
        let a4_19 = 19 * a[4];

        carry_wide([
            a[0] * a[0] + a1_38 * a[4] + a2_38 * a[3],
            a0_2 * a[1] + a2_38 * a[4] + a3_19 * a[3],
            a0_2 * a[2] +  a[1] * a[1] + a3_38 * a[4],
            a0_2 * a[3] +  a1_2 * a[2] + a4_19 * a[4],
            a0_2 * a[4] +  a1_2 * a[3] +  a[2] * a[2]
        ])
    }

    /// Squares `k` times in a row, `k` must be non-zero.
    pub fn pow2k(&self, k: u32) -> FieldElement {
        let mut output = self.square();
        for _ in 1..k {
            output = output.square();
        }
        output
    }

    // returns (z^(2^250-1), z^11), shared prefix of the inversion and square root chains
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        let t0 = self.square();                 // 2
        let t1 = t0.pow2k(2);                   // 8
        let t2 = self * &t1;                    // 9
        let t3 = &t0 * &t2;                     // 11
        let t4 = t3.square();                   // 22
        let t5 = &t2 * &t4;                     // 2^5 - 1
        let t6 = &t5.pow2k(5) * &t5;            // 2^10 - 1
        let t7 = &t6.pow2k(10) * &t6;           // 2^20 - 1
        let t8 = &t7.pow2k(20) * &t7;           // 2^40 - 1
        let t9 = &t8.pow2k(10) * &t6;           // 2^50 - 1
        let t10 = &t9.pow2k(50) * &t9;          // 2^100 - 1
        let t11 = &t10.pow2k(100) * &t10;       // 2^200 - 1
        let t12 = &t11.pow2k(50) * &t9;         // 2^250 - 1
        (t12, t3)
    }

    /// z^(q-2) = 1/z, and 0 for z = 0.
    pub fn invert(&self) -> FieldElement {
        let (t, z11) = self.pow22501();
        &t.pow2k(5) * &z11                      // 2^255 - 21
    }

    // returns z^((q-5)/8) = z^(2^252-3)
    // used to compute square roots since we have q = 5 (mod 8); see Cohen and Frey.
    pub fn pow_p58(&self) -> FieldElement {
        let (t, _) = self.pow22501();
        &t.pow2k(2) * self
    }

    /// Computes sqrt(u/v) without inverting v.
    ///
    /// The candidate is r = u*v^3*(u*v^7)^((q-5)/8). When v*r^2 = -u the root
    /// is r*sqrt(-1). The returned choice is false when u/v has no square
    /// root (including v = 0 with u != 0).
    pub fn sqrt_ratio(u: &FieldElement, v: &FieldElement) -> (Choice, FieldElement) {
        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let correct_sign = check.ct_eq(u);
        let flipped_sign = check.ct_eq(&-u);
        let r_prime = &r * &FieldElement::SQRT_M1;
        r.conditional_assign(&r_prime, flipped_sign);

        (correct_sign | flipped_sign, r)
    }

    pub fn sqrt(&self) -> CtOption<FieldElement> {
        let (was_square, r) = FieldElement::sqrt_ratio(self, &FieldElement::ONE);
        CtOption::new(r, was_square)
    }
}

impl AddAssign<&FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &FieldElement) {
        for (a, b) in self.limbs.iter_mut().zip(rhs.limbs.iter()) {
            *a += b;
        }
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &FieldElement) -> Self::Output {
        let mut out = *self;
        out += rhs;
        out
    }
}

impl SubAssign<&FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &FieldElement) {
        // adding 2*q keeps every limb non-negative
        let b = rhs.weak_reduce();
        self.limbs[0] = (self.limbs[0] + 0x000f_ffff_ffff_ffda) - b.limbs[0];
        self.limbs[1] = (self.limbs[1] + 0x000f_ffff_ffff_fffe) - b.limbs[1];
        self.limbs[2] = (self.limbs[2] + 0x000f_ffff_ffff_fffe) - b.limbs[2];
        self.limbs[3] = (self.limbs[3] + 0x000f_ffff_ffff_fffe) - b.limbs[3];
        self.limbs[4] = (self.limbs[4] + 0x000f_ffff_ffff_fffe) - b.limbs[4];
        *self = self.weak_reduce();
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &FieldElement) -> Self::Output {
        let mut out = *self;
        out -= rhs;
        out
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> Self::Output {
        &FieldElement::ZERO - self
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &FieldElement) -> Self::Output {
        let a = self.limbs.map(u128::from);
        let b = rhs.limbs.map(u128::from);

        let b1_19 = 19 * b[1];
        let b2_19 = 19 * b[2];
        let b3_19 = 19 * b[3];
        let b4_19 = 19 * b[4];

        carry_wide([
            a[0] * b[0] + a[1] * b4_19 + a[2] * b3_19 + a[3] * b2_19 + a[4] * b1_19,
            a[0] * b[1] + a[1] *  b[0] + a[2] * b4_19 + a[3] * b3_19 + a[4] * b2_19,
            a[0] * b[2] + a[1] *  b[1] + a[2] *  b[0] + a[3] * b4_19 + a[4] * b3_19,
            a[0] * b[3] + a[1] *  b[2] + a[2] *  b[1] + a[3] *  b[0] + a[4] * b4_19,
            a[0] * b[4] + a[1] *  b[3] + a[2] *  b[2] + a[3] *  b[1] + a[4] *  b[0]
        ])
    }
}

impl MulAssign<&FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &FieldElement) {
        *self = &*self * rhs;
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        FieldElement {
            limbs: [
                u64::conditional_select(&a.limbs[0], &b.limbs[0], choice),
                u64::conditional_select(&a.limbs[1], &b.limbs[1], choice),
                u64::conditional_select(&a.limbs[2], &b.limbs[2], choice),
                u64::conditional_select(&a.limbs[3], &b.limbs[3], choice),
                u64::conditional_select(&a.limbs[4], &b.limbs[4], choice)
            ]
        }
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement(0x")?;
        for byte in self.to_bytes().iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng, rngs::SmallRng};
    use subtle::ConditionallyNegatable;
    use super::FieldElement;
    use hex_literal::hex;

    fn random_element(rng: &mut SmallRng) -> FieldElement {
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf);
        FieldElement::from_bytes(&buf)
    }

    #[test]
    fn test_field25519_mul() {
        let a = hex!("b1dc286313d7299a176f9374958367d4a3d56d9608c0cad7678523c802eda07f");
        let expected = hex!("ce6a443014d9739f7fc518b426243183a09c4edb1a4686297c57a8e4da052c11");

        // square-and-multiply to compute base^exponent
        let base = FieldElement::from_bytes(&a);
        let mut acc = FieldElement::ONE;
        let exponent = hex!("2f837addb1f94760139aaecb986f16159a3ce78e1c2fb7f4dc56b98caf92be79");

        for b in exponent {
            for i in (0..8).rev() {
                acc = acc.square();
                if (b >> i) & 1 == 1 {
                    acc *= &base;
                }
            }
        }
        assert_eq!(acc.to_bytes(), expected);
    }

    #[test]
    fn test_invert() {
        let mut rng = SmallRng::seed_from_u64(0x1234);
        for _ in 0..32 {
            let a = random_element(&mut rng);
            let b = a.invert();
            assert_eq!(&a * &b, FieldElement::ONE);
        }
        assert_eq!(FieldElement::ZERO.invert(), FieldElement::ZERO);
    }

    #[test]
    fn test_add_sub() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut a = random_element(&mut rng);
        let b = random_element(&mut rng);

        let c = &a + &b;
        let d = &c - &b;
        assert_eq!(a.to_bytes(), d.to_bytes());

        a += &b;
        assert_eq!(a, c);
        a -= &b;
        assert_eq!(a, d);
        assert_eq!(&a + &(-&a), FieldElement::ZERO);
    }

    #[test]
    fn test_sqrt() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..32 {
            let a = random_element(&mut rng);
            let a2 = a.square();
            let root = a2.sqrt().unwrap();
            assert_eq!(root.square(), a2);
        }

        let minus_one = -&FieldElement::ONE;
        assert_eq!(minus_one.sqrt().unwrap().square(), minus_one);

        // 2 is not a square modulo 2^255-19
        let two = &FieldElement::ONE + &FieldElement::ONE;
        assert!(bool::from(two.sqrt().is_none()));
    }

    #[test]
    fn test_sqrt_ratio() {
        let mut rng = SmallRng::seed_from_u64(13);
        let x = random_element(&mut rng);
        let v = random_element(&mut rng);
        let u = &v * &x.square();
        let (ok, r) = FieldElement::sqrt_ratio(&u, &v);
        assert!(bool::from(ok));
        assert_eq!(&v * &r.square(), u);

        let (ok, _) = FieldElement::sqrt_ratio(&FieldElement::ONE, &FieldElement::ZERO);
        assert!(!bool::from(ok));
    }

    #[test]
    fn test_canonical_encoding() {
        // q + 1 decodes to a non-reduced value that must encode as 1
        let q_plus_one = hex!("eeffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        let one = FieldElement::from_bytes(&q_plus_one);
        assert_eq!(one.to_bytes(), FieldElement::ONE.to_bytes());
        assert!(!bool::from(one.is_negative()));

        let mut minus_one = FieldElement::ONE;
        minus_one.conditional_negate(1.into());
        assert_eq!(
            minus_one.to_bytes(),
            hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f")
        );
        assert!(bool::from(FieldElement::from_bytes(&[0u8; 32]).is_zero()));
    }

    #[test]
    fn test_sqrt_m1() {
        let minus_one = -&FieldElement::ONE;
        assert_eq!(FieldElement::SQRT_M1.square(), minus_one);
        assert_eq!(&FieldElement::EDWARDS_D + &FieldElement::EDWARDS_D, FieldElement::EDWARDS_D2);
    }
}
