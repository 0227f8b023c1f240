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

use subtle::{
    Choice,
    ConditionallySelectable,
    ConstantTimeEq,
    CtOption
};

use crate::field::{
    Encoding,
    FieldElement
};

/// What the curve layer needs from a prime field.
pub trait FieldArithmetic: Copy + ConstantTimeEq + ConditionallySelectable {
    const ZERO: Self;
    const ONE: Self;

    fn add(&self, rhs: &Self) -> Self;
    fn subtract(&self, rhs: &Self) -> Self;
    fn multiply(&self, rhs: &Self) -> Self;
    fn square(&self) -> Self;
    fn invert(&self) -> Self;
    fn sqrt(&self) -> CtOption<Self>;
    fn negate(&self) -> Self;
    fn is_negative(&self) -> Choice;
    fn is_zero(&self) -> Choice;
    fn to_bytes(&self) -> [u8; 32];
    fn from_bytes(input: &[u8; 32]) -> Self;
}

impl FieldArithmetic for FieldElement {
    const ZERO: Self = FieldElement::ZERO;
    const ONE: Self = FieldElement::ONE;

    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn subtract(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn multiply(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn square(&self) -> Self {
        FieldElement::square(self)
    }

    fn invert(&self) -> Self {
        FieldElement::invert(self)
    }

    fn sqrt(&self) -> CtOption<Self> {
        FieldElement::sqrt(self)
    }

    fn negate(&self) -> Self {
        -self
    }

    fn is_negative(&self) -> Choice {
        FieldElement::is_negative(self)
    }

    fn is_zero(&self) -> Choice {
        FieldElement::is_zero(self)
    }

    fn to_bytes(&self) -> [u8; 32] {
        FieldElement::to_bytes(self)
    }

    fn from_bytes(input: &[u8; 32]) -> Self {
        FieldElement::from_bytes(input)
    }
}

/// A prime field of characteristic q together with the constants the EdDSA
/// layer needs: small integers, q-2 for inversion and (q-5)/8 for square
/// roots.
#[derive(Clone, Debug)]
pub struct FiniteField<F: FieldArithmetic = FieldElement> {
    modulus: [u8; 32],
    encoding: Encoding,
    pub zero: F,
    pub one: F,
    pub two: F,
    pub four: F,
    pub five: F,
    pub eight: F,
    q_minus_2: F,
    q_minus_5_div_8: F,
}

impl FiniteField<FieldElement> {
    // 2^255 - 19
    const ED25519_MODULUS: [u8; 32] = [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f
    ];

    pub fn ed25519() -> Self {
        FiniteField::new(Self::ED25519_MODULUS, Encoding::ED25519)
    }
}

impl<F: FieldArithmetic> FiniteField<F> {
    /// `modulus` is q in little-endian; q - 5 must be divisible by 8.
    pub fn new(modulus: [u8; 32], encoding: Encoding) -> Self {
        let one = F::ONE;
        let two = one.add(&one);
        let four = two.add(&two);
        let five = four.add(&one);
        let eight = four.add(&four);

        // q = 0 in the field, so q - 2 = -2 and (q - 5)/8 = -5/8
        let q_minus_2 = F::ZERO.subtract(&two);
        let q_minus_5_div_8 = F::ZERO.subtract(&five).multiply(&eight.invert());

        Self {
            modulus,
            encoding,
            zero: F::ZERO,
            one,
            two,
            four,
            five,
            eight,
            q_minus_2,
            q_minus_5_div_8,
        }
    }

    pub fn bits(&self) -> usize {
        self.encoding.bits()
    }

    pub fn modulus(&self) -> &[u8; 32] {
        &self.modulus
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn q_minus_2(&self) -> &F {
        &self.q_minus_2
    }

    pub fn q_minus_5_div_8(&self) -> &F {
        &self.q_minus_5_div_8
    }

    pub fn from_bytes(&self, input: &[u8; 32]) -> F {
        self.encoding.decode(input)
    }

    /// base^exponent by square-and-multiply over the canonical encoding of
    /// `exponent`. Every step multiplies, the product is kept by selection.
    pub fn pow(&self, base: &F, exponent: &F) -> F {
        let e = exponent.to_bytes();
        let mut acc = self.one;
        for byte in e.iter().rev() {
            for i in (0..8).rev() {
                acc = acc.square();
                let product = acc.multiply(base);
                acc = F::conditional_select(&acc, &product, Choice::from((byte >> i) & 1));
            }
        }
        acc
    }
}
