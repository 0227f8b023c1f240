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

//! Points of the twisted Edwards curve -x^2 + y^2 = 1 + d x^2 y^2 in the
//! five coordinate systems used by the multiplication routines.

mod points;
mod scalarmult;
mod tables;

use std::ops::{
    Add,
    Neg,
    Sub
};

use subtle::{
    Choice,
    ConstantTimeEq
};

pub use points::{
    Cached,
    DecodingError,
    P1P1,
    P2,
    P3,
    Precomp
};
pub use scalarmult::{
    double_scalar_multiply_vartime,
    scalar_multiply
};
pub(crate) use scalarmult::scalar_multiply_base;
pub use tables::BaseTables;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    P2,
    P3,
    P1P1,
    Cached,
    Precomp
}

/// A curve point tagged with its coordinate system.
#[derive(Clone, Copy, Debug)]
pub enum GroupElement {
    P2(P2),
    P3(P3),
    P1P1(P1P1),
    Cached(Cached),
    Precomp(Precomp)
}

impl GroupElement {
    /// The neutral element (0, 1).
    pub fn zero(repr: Representation) -> GroupElement {
        match repr {
            Representation::P2 => GroupElement::P2(P2::IDENTITY),
            Representation::P3 => GroupElement::P3(P3::IDENTITY),
            Representation::P1P1 => GroupElement::P1P1(P1P1::IDENTITY),
            Representation::Cached => GroupElement::Cached(Cached::IDENTITY),
            Representation::Precomp => GroupElement::Precomp(Precomp::IDENTITY)
        }
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<GroupElement, DecodingError> {
        Ok(GroupElement::P3(P3::try_from(bytes)?))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.to_p2().to_bytes()
    }

    pub fn representation(&self) -> Representation {
        match self {
            GroupElement::P2(_) => Representation::P2,
            GroupElement::P3(_) => Representation::P3,
            GroupElement::P1P1(_) => Representation::P1P1,
            GroupElement::Cached(_) => Representation::Cached,
            GroupElement::Precomp(_) => Representation::Precomp
        }
    }

    pub fn to_p2(&self) -> P2 {
        match self {
            GroupElement::P2(p) => *p,
            GroupElement::P3(p) => p.to_p2(),
            GroupElement::P1P1(p) => p.to_p2(),
            GroupElement::Cached(p) => p.to_p2(),
            GroupElement::Precomp(p) => p.to_p2()
        }
    }

    pub fn to_p3(&self) -> P3 {
        match self {
            GroupElement::P3(p) => *p,
            GroupElement::P1P1(p) => p.to_p3(),
            _ => self.to_p2().to_p3()
        }
    }

    pub fn to_p1p1(&self) -> P1P1 {
        match self {
            GroupElement::P1P1(p) => *p,
            _ => self.to_p3().to_p1p1()
        }
    }

    pub fn to_cached(&self) -> Cached {
        match self {
            GroupElement::Cached(p) => *p,
            _ => self.to_p3().to_cached()
        }
    }

    /// Goes through affine coordinates: one inversion.
    pub fn to_precomp(&self) -> Precomp {
        match self {
            GroupElement::Precomp(p) => *p,
            _ => self.to_p3().to_precomp()
        }
    }

    pub fn to_representation(&self, repr: Representation) -> GroupElement {
        match repr {
            Representation::P2 => GroupElement::P2(self.to_p2()),
            Representation::P3 => GroupElement::P3(self.to_p3()),
            Representation::P1P1 => GroupElement::P1P1(self.to_p1p1()),
            Representation::Cached => GroupElement::Cached(self.to_cached()),
            Representation::Precomp => GroupElement::Precomp(self.to_precomp())
        }
    }

    /// 2*self, in P3.
    pub fn double(&self) -> GroupElement {
        GroupElement::P3(self.to_p2().dbl().to_p3())
    }

    /// a*self, in P3. Constant time in `a`.
    pub fn scalar_multiply(&self, a: &[u8; 32]) -> GroupElement {
        GroupElement::P3(scalar_multiply(&self.to_p3(), a))
    }

    pub fn is_on_curve(&self) -> bool {
        self.to_p3().is_on_curve()
    }
}

impl Add<&GroupElement> for &GroupElement {
    type Output = GroupElement;

    fn add(self, rhs: &GroupElement) -> GroupElement {
        let lhs = self.to_p3();
        let sum = match rhs {
            GroupElement::Precomp(q) => &lhs + q,
            _ => &lhs + &rhs.to_cached()
        };
        GroupElement::P3(sum.to_p3())
    }
}

impl Sub<&GroupElement> for &GroupElement {
    type Output = GroupElement;

    fn sub(self, rhs: &GroupElement) -> GroupElement {
        let lhs = self.to_p3();
        let diff = match rhs {
            GroupElement::Precomp(q) => &lhs - q,
            _ => &lhs - &rhs.to_cached()
        };
        GroupElement::P3(diff.to_p3())
    }
}

impl Neg for &GroupElement {
    type Output = GroupElement;

    fn neg(self) -> GroupElement {
        match self {
            GroupElement::P2(p) => GroupElement::P2(-p),
            GroupElement::P3(p) => GroupElement::P3(-p),
            GroupElement::P1P1(p) => GroupElement::P1P1(-p),
            GroupElement::Cached(p) => GroupElement::Cached(-p),
            GroupElement::Precomp(p) => GroupElement::Precomp(-p)
        }
    }
}

impl ConstantTimeEq for GroupElement {
    fn ct_eq(&self, other: &GroupElement) -> Choice {
        self.to_p2().ct_eq(&other.to_p2())
    }
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &GroupElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for GroupElement {}
