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

//! Arithmetic for Ed25519: the field of integers modulo 2^255-19, scalars
//! modulo the group order, and points of the twisted Edwards curve in the
//! coordinate systems of the ref10 formulas.

pub mod curve;
pub mod field;
pub mod group;
pub mod scalar;

pub use curve::Curve;
pub use field::{
    Encoding,
    FieldArithmetic,
    FieldElement,
    FiniteField
};
pub use group::{
    DecodingError,
    GroupElement,
    Representation
};
pub use scalar::Scalar;
