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
    ConstantTimeEq
};

use crate::group::points::{
    P3,
    Precomp
};

/// Precomputed multiples of a base point.
///
/// `groups[i][j]` holds (j+1)*256^i*B, for the signed radix-16 fixed-base
/// multiplication. `odd_multiples[k]` holds (2k+1)*B, for the sliding
/// window of the double multiplication.
#[derive(Clone)]
pub struct BaseTables {
    groups: Box<[[Precomp; 8]; 32]>,
    odd_multiples: [Precomp; 8]
}

impl BaseTables {
    pub fn compute(base: &P3) -> BaseTables {
        let mut groups = Box::new([[Precomp::IDENTITY; 8]; 32]);
        let mut group_base = *base;
        for group in groups.iter_mut() {
            let step = group_base.to_cached();
            let mut multiple = group_base;
            for entry in group.iter_mut() {
                *entry = multiple.to_precomp();
                multiple = (&multiple + &step).to_p3();
            }
            // 256 * group_base
            for _ in 0..8 {
                group_base = group_base.dbl().to_p3();
            }
        }

        let mut odd_multiples = [Precomp::IDENTITY; 8];
        let step = base.dbl().to_p3().to_cached();
        let mut multiple = *base;
        for entry in odd_multiples.iter_mut() {
            *entry = multiple.to_precomp();
            multiple = (&multiple + &step).to_p3();
        }

        BaseTables { groups, odd_multiples }
    }

    /// digit*256^group*B for a digit in [-8, 8], without branching or
    /// indexing on the digit.
    pub fn select(&self, group: usize, digit: i8) -> Precomp {
        // all ones when the digit is negative
        let mask = digit >> 7;
        let abs = ((digit ^ mask) - mask) as u8;

        let mut t = Precomp::IDENTITY;
        for (j, entry) in self.groups[group].iter().enumerate() {
            t.conditional_assign(entry, abs.ct_eq(&(j as u8 + 1)));
        }
        let minus_t = -&t;
        t.conditional_assign(&minus_t, Choice::from((mask & 1) as u8));
        t
    }

    /// (2*index+1)*B
    pub fn odd_multiple(&self, index: usize) -> &Precomp {
        &self.odd_multiples[index]
    }
}

#[cfg(test)]
mod tests {
    use super::BaseTables;
    use crate::group::points::P3;

    #[test]
    fn test_select_matches_repeated_addition() {
        let tables = BaseTables::compute(&P3::BASEPOINT);
        let b = P3::BASEPOINT.to_cached();
        let mut expected = P3::IDENTITY;
        for digit in 0..=8i8 {
            assert_eq!(tables.select(0, digit).to_p2().to_bytes(), expected.to_bytes());
            assert_eq!(tables.select(0, -digit).to_p2().to_bytes(), (-&expected).to_bytes());
            expected = (&expected + &b).to_p3();
        }
    }

    #[test]
    fn test_group_scaling() {
        let tables = BaseTables::compute(&P3::BASEPOINT);
        let mut expected = P3::BASEPOINT;
        for _ in 0..8 {
            expected = expected.dbl().to_p3();
        }
        assert_eq!(tables.select(1, 1).to_p2().to_bytes(), expected.to_bytes());
    }

    #[test]
    fn test_odd_multiples() {
        let tables = BaseTables::compute(&P3::BASEPOINT);
        let three = (&P3::BASEPOINT.dbl().to_p3() + &P3::BASEPOINT.to_cached()).to_p3();
        assert_eq!(tables.odd_multiple(1).to_p2().to_bytes(), three.to_bytes());
        assert_eq!(tables.odd_multiple(1).to_p2().to_bytes(), tables.select(0, 3).to_p2().to_bytes());
    }
}
