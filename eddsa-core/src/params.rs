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

use eddsa_math::Curve;

/// Curve, hash function and base point of an EdDSA instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdDsaParameterSpec {
    name: &'static str,
    curve: Curve,
    hash_algorithm: &'static str
}

impl EdDsaParameterSpec {
    pub(crate) fn new(name: &'static str, curve: Curve, hash_algorithm: &'static str) -> Self {
        EdDsaParameterSpec { name, curve, hash_algorithm }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn hash_algorithm(&self) -> &'static str {
        self.hash_algorithm
    }

    /// Length of seeds, public keys and scalars in bytes.
    pub fn key_len(&self) -> usize {
        self.curve.field().encoding().byte_len()
    }

    pub fn signature_len(&self) -> usize {
        2 * self.key_len()
    }
}
