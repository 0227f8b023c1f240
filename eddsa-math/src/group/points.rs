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

// formulas adapted from the C code of libsodium:
// https://github.com/jedisct1/libsodium/blob/master/src/libsodium/crypto_core/ed25519/ref10/ed25519_ref10.c

use std::ops::{
    Add,
    Neg,
    Sub
};

use subtle::{
    Choice,
    ConditionallyNegatable,
    ConditionallySelectable,
    ConstantTimeEq,
    CtOption
};

use crate::field::{
    Encoding,
    FieldElement
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodingError;

impl std::fmt::Display for DecodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519: invalid point encoding.")
    }
}

impl std::error::Error for DecodingError {}

/// Projective (X:Y:Z), x = X/Z, y = Y/Z.
#[derive(Clone, Copy, Debug)]
pub struct P2 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement
}

/// Extended (X:Y:Z:T), x = X/Z, y = Y/Z, x*y = T/Z.
#[derive(Clone, Copy, Debug)]
pub struct P3 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement
}

/// Completed ((X:Z),(Y:T)), x = X/Z, y = Y/T. Output of additions and doublings.
#[derive(Clone, Copy, Debug)]
pub struct P1P1 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement
}

/// (Y+X, Y-X, Z, 2dT), the right-hand operand of additions.
#[derive(Clone, Copy, Debug)]
pub struct Cached {
    pub(crate) y_plus_x: FieldElement,
    pub(crate) y_minus_x: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t2d: FieldElement
}

/// Affine (y+x, y-x, 2dxy), the operand of mixed additions.
#[derive(Clone, Copy, Debug)]
pub struct Precomp {
    pub(crate) y_plus_x: FieldElement,
    pub(crate) y_minus_x: FieldElement,
    pub(crate) xy2d: FieldElement
}

impl P2 {
    pub const IDENTITY: P2 = P2 {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE
    };

    pub fn to_bytes(&self) -> [u8; 32] {
        let recip = self.z.invert();
        let x = &self.x * &recip;
        let y = &self.y * &recip;
        Encoding::ED25519.encode_with_sign(&y, x.is_negative())
    }

    pub fn to_p3(&self) -> P3 {
        P3 {
            x: &self.x * &self.z,
            y: &self.y * &self.z,
            z: self.z.square(),
            t: &self.x * &self.y
        }
    }

    pub fn dbl(&self) -> P1P1 {
        // A = X1^2, B = Y1^2, C = 2*Z1^2
        let xx = self.x.square();
        let yy = self.y.square();
        let zz = self.z.square();
        let zz2 = &zz + &zz;

        // H = B+A, G = B-A
        let yy_plus_xx = &yy + &xx;
        let yy_minus_xx = &yy - &xx;

        // E = (X1+Y1)^2-H, F = C-G
        let x_plus_y = &self.x + &self.y;
        P1P1 {
            x: &x_plus_y.square() - &yy_plus_xx,
            y: yy_plus_xx,
            z: yy_minus_xx,
            t: &zz2 - &yy_minus_xx
        }
    }

    // (-x:y) is the inverse
    fn negate(&self) -> P2 {
        P2 { x: -&self.x, y: self.y, z: self.z }
    }
}

impl ConstantTimeEq for P2 {
    // x1/z1 = x2/z2 and y1/z1 = y2/z2 without inverting
    fn ct_eq(&self, other: &P2) -> Choice {
        let x1z2 = &self.x * &other.z;
        let x2z1 = &other.x * &self.z;
        let y1z2 = &self.y * &other.z;
        let y2z1 = &other.y * &self.z;
        x1z2.ct_eq(&x2z1) & y1z2.ct_eq(&y2z1)
    }
}

impl P3 {
    pub const IDENTITY: P3 = P3 {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO
    };

    // y = 4/5, x positive
    pub const BASEPOINT: P3 = P3 {
        x: FieldElement::from_limbs([
            1738742601995546,
            1146398526822698,
            2070867633025821,
            562264141797630,
            587772402128613
        ]),
        y: FieldElement::from_limbs([
            1801439850948184,
            1351079888211148,
            450359962737049,
            900719925474099,
            1801439850948198
        ]),
        z: FieldElement::ONE,
        t: FieldElement::from_limbs([
            1841354044333475,
            16398895984059,
            755974180946558,
            900171276175154,
            1821297809914039
        ])
    };

    /// Decodes a compressed point: y from the low 255 bits, the sign of x
    /// from the top bit.
    ///
    /// Fails when (y^2-1)/(dy^2+1) is not a square, or when x = 0 comes with
    /// the sign bit set. The work done does not depend on which case occurs.
    pub fn from_bytes(s: &[u8; 32]) -> CtOption<P3> {
        let encoding = Encoding::ED25519;
        let y: FieldElement = encoding.decode(s);
        let z = FieldElement::ONE;
        let yy = y.square();
        let u = &yy - &z;                                   // u = y^2-1
        let v = &(&yy * &FieldElement::EDWARDS_D) + &z;     // v = dy^2+1

        let (is_square, mut x) = FieldElement::sqrt_ratio(&u, &v);

        let sign = encoding.sign_bit(s);
        let parity_ok = !(x.is_zero() & sign);
        let flip = x.is_negative() ^ sign;
        x.conditional_negate(flip);

        let t = &x * &y;
        CtOption::new(P3 { x, y, z, t }, is_square & parity_ok)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.to_p2().to_bytes()
    }

    pub fn to_p2(&self) -> P2 {
        P2 { x: self.x, y: self.y, z: self.z }
    }

    pub fn to_p1p1(&self) -> P1P1 {
        P1P1 { x: self.x, y: self.y, z: self.z, t: self.z }
    }

    pub fn to_cached(&self) -> Cached {
        Cached {
            y_plus_x: &self.y + &self.x,
            y_minus_x: &self.y - &self.x,
            z: self.z,
            t2d: &self.t * &FieldElement::EDWARDS_D2
        }
    }

    pub fn to_precomp(&self) -> Precomp {
        let recip = self.z.invert();
        let x = &self.x * &recip;
        let y = &self.y * &recip;
        Precomp {
            y_plus_x: &y + &x,
            y_minus_x: &y - &x,
            xy2d: &(&x * &y) * &FieldElement::EDWARDS_D2
        }
    }

    pub fn dbl(&self) -> P1P1 {
        self.to_p2().dbl()
    }

    /// -x^2 + y^2 = 1 + d x^2 y^2 and xy = T/Z, checked projectively.
    pub fn is_on_curve(&self) -> bool {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz = self.z.square();
        let lhs = &(&yy - &xx) * &zz;
        let rhs = &zz.square() + &(&(&xx * &yy) * &FieldElement::EDWARDS_D);
        let xy = &self.x * &self.y;
        let tz = &self.t * &self.z;
        (lhs.ct_eq(&rhs) & xy.ct_eq(&tz)).into()
    }
}

impl TryFrom<&[u8; 32]> for P3 {
    type Error = DecodingError;

    fn try_from(value: &[u8; 32]) -> Result<Self, DecodingError> {
        Option::from(P3::from_bytes(value)).ok_or(DecodingError)
    }
}

impl P1P1 {
    pub const IDENTITY: P1P1 = P1P1 {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ONE
    };

    pub fn to_p2(&self) -> P2 {
        P2 {
            x: &self.x * &self.t,
            y: &self.y * &self.z,
            z: &self.z * &self.t
        }
    }

    pub fn to_p3(&self) -> P3 {
        P3 {
            x: &self.x * &self.t,
            y: &self.y * &self.z,
            z: &self.z * &self.t,
            t: &self.x * &self.y
        }
    }

    fn negate(&self) -> P1P1 {
        P1P1 { x: -&self.x, y: self.y, z: self.z, t: self.t }
    }
}

impl Cached {
    pub const IDENTITY: Cached = Cached {
        y_plus_x: FieldElement::ONE,
        y_minus_x: FieldElement::ONE,
        z: FieldElement::ONE,
        t2d: FieldElement::ZERO
    };

    pub fn to_p2(&self) -> P2 {
        let z = &self.z + &self.z;
        P2 {
            x: &self.y_plus_x - &self.y_minus_x,
            y: &self.y_plus_x + &self.y_minus_x,
            z
        }
    }
}

impl Precomp {
    pub const IDENTITY: Precomp = Precomp {
        y_plus_x: FieldElement::ONE,
        y_minus_x: FieldElement::ONE,
        xy2d: FieldElement::ZERO
    };

    pub fn to_p2(&self) -> P2 {
        P2 {
            x: &self.y_plus_x - &self.y_minus_x,
            y: &self.y_plus_x + &self.y_minus_x,
            z: &FieldElement::ONE + &FieldElement::ONE
        }
    }
}

impl Neg for &P2 {
    type Output = P2;
    fn neg(self) -> P2 {
        self.negate()
    }
}

impl Neg for &P3 {
    type Output = P3;
    fn neg(self) -> P3 {
        P3 { x: -&self.x, y: self.y, z: self.z, t: -&self.t }
    }
}

impl Neg for &P1P1 {
    type Output = P1P1;
    fn neg(self) -> P1P1 {
        self.negate()
    }
}

impl Neg for &Cached {
    type Output = Cached;
    fn neg(self) -> Cached {
        Cached {
            y_plus_x: self.y_minus_x,
            y_minus_x: self.y_plus_x,
            z: self.z,
            t2d: -&self.t2d
        }
    }
}

impl Neg for &Precomp {
    type Output = Precomp;
    fn neg(self) -> Precomp {
        Precomp {
            y_plus_x: self.y_minus_x,
            y_minus_x: self.y_plus_x,
            xy2d: -&self.xy2d
        }
    }
}

impl Add<&Cached> for &P3 {
    type Output = P1P1;
    fn add(self, rhs: &Cached) -> P1P1 {
        // A = (Y1-X1)*(Y2-X2), B = (Y1+X1)*(Y2+X2)
        let a = &(&self.y - &self.x) * &rhs.y_minus_x;
        let b = &(&self.y + &self.x) * &rhs.y_plus_x;

        // C = T1*2*d*T2, D = Z1*2*Z2
        let c = &self.t * &rhs.t2d;
        let zz = &self.z * &rhs.z;
        let d = &zz + &zz;

        // ((B-A):(D+C)), ((B+A):(D-C))
        P1P1 {
            x: &b - &a,
            y: &b + &a,
            z: &d + &c,
            t: &d - &c
        }
    }
}

impl Sub<&Cached> for &P3 {
    type Output = P1P1;
    fn sub(self, rhs: &Cached) -> P1P1 {
        let a = &(&self.y - &self.x) * &rhs.y_plus_x;
        let b = &(&self.y + &self.x) * &rhs.y_minus_x;
        let c = &self.t * &rhs.t2d;
        let zz = &self.z * &rhs.z;
        let d = &zz + &zz;

        P1P1 {
            x: &b - &a,
            y: &b + &a,
            z: &d - &c,
            t: &d + &c
        }
    }
}

impl Add<&Precomp> for &P3 {
    type Output = P1P1;
    fn add(self, rhs: &Precomp) -> P1P1 {
        // Z2 = 1
        let a = &(&self.y - &self.x) * &rhs.y_minus_x;
        let b = &(&self.y + &self.x) * &rhs.y_plus_x;
        let c = &self.t * &rhs.xy2d;
        let d = &self.z + &self.z;

        P1P1 {
            x: &b - &a,
            y: &b + &a,
            z: &d + &c,
            t: &d - &c
        }
    }
}

impl Sub<&Precomp> for &P3 {
    type Output = P1P1;
    fn sub(self, rhs: &Precomp) -> P1P1 {
        let a = &(&self.y - &self.x) * &rhs.y_plus_x;
        let b = &(&self.y + &self.x) * &rhs.y_minus_x;
        let c = &self.t * &rhs.xy2d;
        let d = &self.z + &self.z;

        P1P1 {
            x: &b - &a,
            y: &b + &a,
            z: &d - &c,
            t: &d + &c
        }
    }
}

impl ConditionallySelectable for P3 {
    fn conditional_select(a: &P3, b: &P3, choice: Choice) -> P3 {
        P3 {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            t: FieldElement::conditional_select(&a.t, &b.t, choice)
        }
    }
}

impl ConditionallySelectable for Precomp {
    fn conditional_select(a: &Precomp, b: &Precomp, choice: Choice) -> Precomp {
        Precomp {
            y_plus_x: FieldElement::conditional_select(&a.y_plus_x, &b.y_plus_x, choice),
            y_minus_x: FieldElement::conditional_select(&a.y_minus_x, &b.y_minus_x, choice),
            xy2d: FieldElement::conditional_select(&a.xy2d, &b.xy2d, choice)
        }
    }
}
