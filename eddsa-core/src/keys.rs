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

use eddsa_math::{
    group::P3,
    scalar::{
        clamp,
        Scalar
    },
    GroupElement
};
use rand::{
    CryptoRng,
    RngCore
};
use secrecy::{
    ExposeSecret,
    SecretBox
};
use zeroize::{
    Zeroize,
    ZeroizeOnDrop
};

use crate::{
    errors::{
        Error,
        Result
    },
    params::EdDsaParameterSpec,
    sha512
};

/// An EdDSA private key: the seed and the values derived from it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    seed: SecretBox<[u8; 32]>,
    hash_of_seed: [u8; 64],
    scalar: [u8; 32],
    #[zeroize(skip)]
    public: PublicKey
}

impl PrivateKey {
    fn from_seed(seed: &[u8; 32], params: &'static EdDsaParameterSpec) -> PrivateKey {
        let hash_of_seed = sha512(&[seed]);
        let mut lower = [0u8; 32];
        lower.copy_from_slice(&hash_of_seed[..32]);
        let scalar = clamp(lower);
        lower.zeroize();

        // s*B = (s mod L)*B, B has order L
        let mut s = Scalar::from_bytes_mod_order(&scalar);
        let point = params.curve().scalar_multiply_base(&s);
        s.zeroize();

        PrivateKey {
            seed: SecretBox::new(Box::new(*seed)),
            hash_of_seed,
            scalar,
            public: PublicKey::from_point(point, params)
        }
    }

    /// New key from the thread-local CSPRNG.
    pub fn generate(params: &'static EdDsaParameterSpec) -> PrivateKey {
        Self::generate_with(&mut rand::rng(), params)
    }

    pub fn generate_with<R: CryptoRng + ?Sized>(
        rng: &mut R,
        params: &'static EdDsaParameterSpec
    ) -> PrivateKey {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let key = Self::from_seed(&seed, params);
        seed.zeroize();
        key
    }

    pub fn seed(&self) -> &[u8; 32] {
        self.seed.expose_secret()
    }

    /// SHA-512 of the seed.
    pub fn hash_of_seed(&self) -> &[u8; 64] {
        &self.hash_of_seed
    }

    /// The clamped secret scalar s.
    pub fn scalar_bytes(&self) -> &[u8; 32] {
        &self.scalar
    }

    /// Upper half of the seed hash, mixed into every nonce.
    pub fn prefix(&self) -> &[u8] {
        &self.hash_of_seed[32..]
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn params(&self) -> &'static EdDsaParameterSpec {
        self.public.params
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// An EdDSA public key: the decoded point A and its encoding.
#[derive(Clone)]
pub struct PublicKey {
    point: P3,
    bytes: [u8; 32],
    negated: OnceLock<P3>,
    params: &'static EdDsaParameterSpec
}

impl PublicKey {
    pub(crate) fn from_point(point: P3, params: &'static EdDsaParameterSpec) -> PublicKey {
        PublicKey {
            point,
            bytes: point.to_bytes(),
            negated: OnceLock::new(),
            params
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn point(&self) -> GroupElement {
        GroupElement::P3(self.point)
    }

    /// -A, computed on first use.
    pub fn negated_point(&self) -> GroupElement {
        GroupElement::P3(*self.negated_p3())
    }

    pub(crate) fn negated_p3(&self) -> &P3 {
        if let Some(negated) = self.negated.get() {
            return negated;
        }
        let computed = -&self.point;
        self.negated.get_or_init(|| computed)
    }

    pub fn params(&self) -> &'static EdDsaParameterSpec {
        self.params
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({}, 0x", self.params.name())?;
        for byte in self.bytes.iter() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &PublicKey) -> bool {
        self.bytes == other.bytes && self.params == other.params
    }
}

impl Eq for PublicKey {}

/// Private key from a seed of `params.key_len()` bytes.
pub fn generate_private(seed: &[u8], params: &'static EdDsaParameterSpec) -> Result<PrivateKey> {
    if seed.len() != params.key_len() {
        return Err(Error::InvalidSeedLength(seed.len()));
    }
    let mut buf = [0u8; 32];
    buf.copy_from_slice(seed);
    let key = PrivateKey::from_seed(&buf, params);
    buf.zeroize();
    Ok(key)
}

/// Public key from its encoding. Fails on a wrong length, then on a point
/// that does not decode.
///
/// The key keeps the canonical encoding of the decoded point, so every
/// encoding of the same point hashes the same way.
pub fn generate_public(bytes: &[u8], params: &'static EdDsaParameterSpec) -> Result<PublicKey> {
    let bytes: &[u8; 32] = bytes
        .try_into()
        .map_err(|_| Error::InvalidKeyLength(bytes.len()))?;
    let point = P3::try_from(bytes)?;
    Ok(PublicKey::from_point(point, params))
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use crate::{
        errors::ErrorKind,
        named_curves
    };
    use super::{
        generate_private,
        generate_public,
        PrivateKey
    };

    #[test]
    fn test_zero_seed() {
        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        assert_eq!(
            key.public_key().as_bytes(),
            &hex!("3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29")
        );
        assert_eq!(
            key.scalar_bytes(),
            &hex!("5046adc1dba838867b2bbbfdd0c3423e58b57970b5267a90f57960924a87f156")
        );
        assert_eq!(key.seed(), &[0u8; 32]);
        assert_eq!(key.prefix(), &key.hash_of_seed()[32..]);
    }

    #[test]
    fn test_public_key_round_trip() {
        let key = generate_private(&[7u8; 32], named_curves::ed25519()).unwrap();
        let public = generate_public(key.public_key().as_bytes(), named_curves::ed25519()).unwrap();
        assert_eq!(&public, key.public_key());
        assert_eq!(public.point(), key.public_key().point());

        let sum = &public.point() + &public.negated_point();
        assert_eq!(sum.to_bytes(), hex!("0100000000000000000000000000000000000000000000000000000000000000"));
        // memoized value is stable
        assert_eq!(public.negated_point(), public.negated_point());
    }

    #[test]
    fn test_invalid_lengths() {
        let err = generate_private(&[0u8; 31], named_curves::ed25519()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = generate_public(&[0u8; 33], named_curves::ed25519()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_point() {
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        let err = generate_public(&bytes, named_curves::ed25519()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn test_generate() {
        let a = PrivateKey::generate(named_curves::ed25519());
        let b = PrivateKey::generate_with(&mut rand::rng(), named_curves::ed25519());
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.seed(), b.seed());
    }
}
