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

//! EdDSA over Ed25519: keys, a streaming sign/verify engine and byte-level
//! helpers.

pub mod engine;
pub mod errors;
pub mod keys;
pub mod named_curves;
pub mod params;

use sha2::{
    Digest,
    Sha512
};

pub use engine::{
    sign,
    verify,
    EdDsaEngine,
    Mode,
    State
};
pub use errors::{
    Error,
    ErrorKind,
    Result
};
pub use keys::{
    generate_private,
    generate_public,
    PrivateKey,
    PublicKey
};
pub use params::EdDsaParameterSpec;

pub const SIGNATURE_LEN: usize = 64;
pub const PUBLIC_KEY_LEN: usize = 32;
pub const SEED_LEN: usize = 32;

// SHA-512 of the concatenation of `parts`
pub(crate) fn sha512(parts: &[&[u8]]) -> [u8; 64] {
    let mut sha = Sha512::new();
    for part in parts {
        sha.update(part);
    }
    let mut output = [0u8; 64];
    output.copy_from_slice(&sha.finalize());
    output
}
