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
    ConditionallySelectable
};
use zeroize::Zeroize;

use crate::group::{
    points::{
        Cached,
        P2,
        P3
    },
    tables::BaseTables
};

/// a*P by double-and-add-always over the 256 bits of `a`, most significant
/// first. The sequence of field operations does not depend on `a`.
pub fn scalar_multiply(point: &P3, a: &[u8; 32]) -> P3 {
    let addend = point.to_cached();
    let mut acc = P3::IDENTITY;
    for pos in (0..256).rev() {
        let bit = Choice::from((a[pos / 8] >> (pos % 8)) & 1);
        acc = acc.dbl().to_p3();
        let sum = (&acc + &addend).to_p3();
        acc.conditional_assign(&sum, bit);
    }
    acc
}

/// a*B for the base point of `tables`.
///
/// `a[31]` must be at most 127, which holds for clamped and reduced scalars.
/// Outside the crate, reach it through `Curve::scalar_multiply_base`, which
/// only takes reduced scalars.
pub(crate) fn scalar_multiply_base(tables: &BaseTables, a: &[u8; 32]) -> P3 {
    debug_assert!(a[31] <= 127);
    let mut e = [0i8; 64];

    for (ee, &aa) in e.chunks_exact_mut(2).zip(a.iter()) {
        ee[0] = (aa & 15) as i8;
        ee[1] = ((aa >> 4) & 15) as i8;
    }

    // each e[i] is between 0 and 15
    // e[63] is between 0 and 7

    let mut carry = 0i8;
    for ee in e.iter_mut().take(63) {
        *ee += carry;
        carry = *ee + 8;
        carry >>= 4;
        *ee -= carry * (1i8 << 4);
    }
    e[63] += carry;
    // each e[i] is between -8 and 8

    // a*B = sum e[i]*16^i*B, odd digits first then scaled by 16
    let mut h = P3::IDENTITY;
    for i in (1..64).step_by(2) {
        let t = tables.select(i / 2, e[i]);
        h = (&h + &t).to_p3();
    }

    let mut r = h.dbl().to_p2();
    r = r.dbl().to_p2();
    r = r.dbl().to_p2();
    h = r.dbl().to_p3();

    for i in (0..64).step_by(2) {
        let t = tables.select(i / 2, e[i]);
        h = (&h + &t).to_p3();
    }
    e.zeroize();

    h
}

// signed odd digits in [-15, 15], at most one nonzero in any 5 consecutive
fn slide(a: &[u8; 32]) -> [i8; 256] {
    let mut r = [0i8; 256];
    for (i, ri) in r.iter_mut().enumerate() {
        *ri = ((a[i >> 3] >> (i & 7)) & 1) as i8;
    }

    for i in 0..256 {
        if r[i] == 0 {
            continue;
        }
        let mut b = 1;
        while b <= 6 && i + b < 256 {
            if r[i + b] != 0 {
                let shifted = (r[i + b] as i32) << b;
                if r[i] as i32 + shifted <= 15 {
                    r[i] += shifted as i8;
                    r[i + b] = 0;
                } else if r[i] as i32 - shifted >= -15 {
                    r[i] -= shifted as i8;
                    for rk in r.iter_mut().skip(i + b) {
                        if *rk == 0 {
                            *rk = 1;
                            break;
                        }
                        *rk = 0;
                    }
                } else {
                    break;
                }
            }
            b += 1;
        }
    }
    r
}

/// a*A + b*B with shared doublings.
///
/// Runs in variable time: only for public inputs such as a signature
/// check.
pub fn double_scalar_multiply_vartime(
    a: &[u8; 32],
    point: &P3,
    b: &[u8; 32],
    tables: &BaseTables
) -> P2 {
    let a_slide = slide(a);
    let b_slide = slide(b);

    // odd multiples A, 3A, ..., 15A
    let mut ai = [Cached::IDENTITY; 8];
    ai[0] = point.to_cached();
    let a2 = point.dbl().to_p3();
    for i in 0..7 {
        ai[i + 1] = (&a2 + &ai[i]).to_p3().to_cached();
    }

    let mut r = P2::IDENTITY;
    let top = match (0..256).rev().find(|&i| a_slide[i] != 0 || b_slide[i] != 0) {
        Some(top) => top,
        None => return r
    };

    for i in (0..=top).rev() {
        let mut t = r.dbl();

        let digit = a_slide[i];
        if digit > 0 {
            t = &t.to_p3() + &ai[(digit / 2) as usize];
        } else if digit < 0 {
            t = &t.to_p3() - &ai[(-digit / 2) as usize];
        }

        let digit = b_slide[i];
        if digit > 0 {
            t = &t.to_p3() + tables.odd_multiple((digit / 2) as usize);
        } else if digit < 0 {
            t = &t.to_p3() - tables.odd_multiple((-digit / 2) as usize);
        }

        r = t.to_p2();
    }
    r
}
