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

use subtle::Choice;

use crate::field::FieldArithmetic;

/// Little-endian codec between `b`-bit strings and field elements.
///
/// The top bit of an encoded string is not part of the field value: point
/// encodings use it to carry the sign of x.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoding {
    bits: usize
}

impl Encoding {
    pub const ED25519: Encoding = Encoding { bits: 256 };

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn byte_len(&self) -> usize {
        self.bits / 8
    }

    /// Values at or above the modulus are accepted, arithmetic reduces them.
    pub fn decode<F: FieldArithmetic>(&self, input: &[u8; 32]) -> F {
        F::from_bytes(input)
    }

    pub fn encode<F: FieldArithmetic>(&self, element: &F) -> [u8; 32] {
        element.to_bytes()
    }

    /// Canonical encoding of `element` with `sign` stored in the top bit.
    pub fn encode_with_sign<F: FieldArithmetic>(&self, element: &F, sign: Choice) -> [u8; 32] {
        let mut output = self.encode(element);
        output[self.byte_len() - 1] |= sign.unwrap_u8() << 7;
        output
    }

    pub fn sign_bit(&self, input: &[u8; 32]) -> Choice {
        Choice::from(input[self.byte_len() - 1] >> 7)
    }

    pub fn is_negative<F: FieldArithmetic>(&self, element: &F) -> Choice {
        element.is_negative()
    }
}
