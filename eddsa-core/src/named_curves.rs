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

use std::sync::LazyLock;

use eddsa_math::Curve;

use crate::{
    errors::{
        Error,
        Result
    },
    params::EdDsaParameterSpec
};

pub const ED_25519: &str = "Ed25519";

pub const SHA_512: &str = "SHA-512";

static CURVES: LazyLock<[EdDsaParameterSpec; 1]> = LazyLock::new(|| {
    [EdDsaParameterSpec::new(ED_25519, Curve::ed25519(), SHA_512)]
});

/// Parameters registered under `name`, compared case-insensitively.
pub fn by_name(name: &str) -> Result<&'static EdDsaParameterSpec> {
    CURVES
        .iter()
        .find(|spec| spec.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownCurve(name.to_string()))
}

/// The Ed25519 parameters.
pub fn ed25519() -> &'static EdDsaParameterSpec {
    &CURVES[0]
}
