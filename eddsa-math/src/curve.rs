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

use std::sync::OnceLock;

use crate::{
    field::{
        FieldElement,
        FiniteField
    },
    group::{
        self,
        BaseTables,
        DecodingError,
        GroupElement,
        P2,
        P3,
        Representation
    },
    scalar::Scalar
};

/// The curve -x^2 + y^2 = 1 + d x^2 y^2 over its field, with a base point.
///
/// The base point tables are built on first use and shared afterwards.
pub struct Curve {
    field: FiniteField,
    d: FieldElement,
    d2: FieldElement,
    base: P3,
    tables: OnceLock<BaseTables>
}

impl Curve {
    pub fn ed25519() -> Curve {
        Curve {
            field: FiniteField::ed25519(),
            d: FieldElement::EDWARDS_D,
            d2: FieldElement::EDWARDS_D2,
            base: P3::BASEPOINT,
            tables: OnceLock::new()
        }
    }

    pub fn field(&self) -> &FiniteField {
        &self.field
    }

    pub fn d(&self) -> &FieldElement {
        &self.d
    }

    pub fn d2(&self) -> &FieldElement {
        &self.d2
    }

    pub fn base_point(&self) -> GroupElement {
        GroupElement::P3(self.base)
    }

    pub fn zero(&self, repr: Representation) -> GroupElement {
        GroupElement::zero(repr)
    }

    pub fn decode_point(&self, bytes: &[u8; 32]) -> Result<GroupElement, DecodingError> {
        GroupElement::from_bytes(bytes)
    }

    pub fn base_tables(&self) -> &BaseTables {
        if let Some(tables) = self.tables.get() {
            return tables;
        }
        // computed outside the cell, a concurrent first use may build the
        // tables twice but only one copy is published
        let computed = BaseTables::compute(&self.base);
        self.tables.get_or_init(|| computed)
    }

    pub fn scalar_multiply_base(&self, a: &Scalar) -> P3 {
        group::scalar_multiply_base(self.base_tables(), &a.to_bytes())
    }

    /// a*A + b*B, variable time.
    pub fn double_scalar_multiply_base_vartime(&self, a: &Scalar, point: &P3, b: &Scalar) -> P2 {
        group::double_scalar_multiply_vartime(&a.to_bytes(), point, &b.to_bytes(), self.base_tables())
    }
}

impl Clone for Curve {
    fn clone(&self) -> Curve {
        Curve {
            field: self.field.clone(),
            d: self.d,
            d2: self.d2,
            base: self.base,
            tables: self.tables.clone()
        }
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Curve")
            .field("field", &self.field)
            .field("d", &self.d)
            .field("base", &self.base.to_bytes())
            .finish()
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Curve) -> bool {
        self.field.modulus() == other.field.modulus() && self.d == other.d && self.base_point() == other.base_point()
    }
}

impl Eq for Curve {}
