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

use eddsa_math::{
    group::P3,
    scalar::Scalar
};
use subtle::{
    Choice,
    ConstantTimeEq
};
use zeroize::Zeroize;

use crate::{
    errors::{
        Error,
        Result
    },
    keys::{
        generate_private,
        generate_public,
        PrivateKey,
        PublicKey
    },
    named_curves,
    sha512,
    SIGNATURE_LEN
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sign,
    Verify
}

/// Progress of the engine through one message.
///
/// `Done` only lasts until the engine resets itself after emitting a
/// result, so a caller observes it as `SignInit` or `VerifyInit` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    SignInit,
    VerifyInit,
    Updated(Mode),
    Done(Mode)
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Update,
    Finish(Mode),
    Reset
}

impl State {
    fn next(self, event: Event) -> Result<State> {
        match (self, event) {
            (State::Uninitialized, _) => Err(Error::NotInitialized),

            (State::SignInit | State::Updated(Mode::Sign), Event::Update) => Ok(State::Updated(Mode::Sign)),
            (State::VerifyInit | State::Updated(Mode::Verify), Event::Update) => Ok(State::Updated(Mode::Verify)),

            (State::SignInit | State::Updated(Mode::Sign), Event::Finish(Mode::Sign)) => Ok(State::Done(Mode::Sign)),
            (State::VerifyInit | State::Updated(Mode::Verify), Event::Finish(Mode::Verify)) => {
                Ok(State::Done(Mode::Verify))
            },
            (_, Event::Finish(Mode::Sign)) => Err(Error::NotInitializedForSigning),
            (_, Event::Finish(Mode::Verify)) => Err(Error::NotInitializedForVerifying),

            (State::SignInit | State::Updated(Mode::Sign) | State::Done(Mode::Sign), Event::Reset) => {
                Ok(State::SignInit)
            },
            (State::VerifyInit | State::Updated(Mode::Verify) | State::Done(Mode::Verify), Event::Reset) => {
                Ok(State::VerifyInit)
            },

            (State::Done(_), Event::Update) => Err(Error::NotInitialized)
        }
    }
}

#[derive(Clone, Copy)]
enum EngineKey<'k> {
    Signing(&'k PrivateKey),
    Verifying(&'k PublicKey)
}

/// Streaming EdDSA signer and verifier.
///
/// The message is buffered: the nonce of a signature depends on the whole
/// message before R can be computed. After `sign` or `verify` the engine
/// is ready for a new message with the same key.
pub struct EdDsaEngine<'k> {
    key: Option<EngineKey<'k>>,
    state: State,
    one_shot: bool,
    buffer: Vec<u8>
}

impl Default for EdDsaEngine<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k> EdDsaEngine<'k> {
    pub fn new() -> Self {
        EdDsaEngine {
            key: None,
            state: State::Uninitialized,
            one_shot: false,
            buffer: Vec::new()
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    /// Discards any pending data.
    pub fn init_sign(&mut self, key: &'k PrivateKey) {
        self.key = Some(EngineKey::Signing(key));
        self.clear();
        self.state = State::SignInit;
    }

    /// Discards any pending data.
    pub fn init_verify(&mut self, key: &'k PublicKey) {
        self.key = Some(EngineKey::Verifying(key));
        self.clear();
        self.state = State::VerifyInit;
    }

    /// Accepts exactly one `update` for the next message.
    pub fn set_one_shot(&mut self) -> Result<()> {
        match self.state {
            State::Uninitialized => Err(Error::NotInitialized),
            State::SignInit | State::VerifyInit => {
                self.one_shot = true;
                Ok(())
            },
            State::Updated(_) | State::Done(_) => Err(Error::OneShotAfterUpdate)
        }
    }

    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.one_shot && matches!(self.state, State::Updated(_)) {
            return Err(Error::UpdateAlreadyCalled);
        }
        self.state = self.state.next(Event::Update)?;
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    pub fn sign(&mut self) -> Result<[u8; SIGNATURE_LEN]> {
        let done = self.state.next(Event::Finish(Mode::Sign))?;
        let key = match self.key {
            Some(EngineKey::Signing(key)) => key,
            _ => return Err(Error::NotInitializedForSigning)
        };
        let signature = sign_message(key, &self.buffer);
        self.state = done;
        self.reset()?;
        Ok(signature)
    }

    /// Fails only on an engine in the wrong state or a signature of the
    /// wrong length. An invalid signature is `Ok(false)`.
    ///
    /// A signature of the wrong length also drops the pending message.
    pub fn verify(&mut self, signature: &[u8]) -> Result<bool> {
        let done = self.state.next(Event::Finish(Mode::Verify))?;
        let key = match self.key {
            Some(EngineKey::Verifying(key)) => key,
            _ => return Err(Error::NotInitializedForVerifying)
        };
        let signature: &[u8; SIGNATURE_LEN] = match signature.try_into() {
            Ok(signature) => signature,
            Err(_) => {
                self.reset()?;
                return Err(Error::InvalidSignatureLength(signature.len()));
            }
        };
        let valid = verify_message(key, &self.buffer, signature);
        self.state = done;
        self.reset()?;
        Ok(valid)
    }

    pub fn sign_one_shot(&mut self, message: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
        self.set_one_shot()?;
        self.update(message)?;
        self.sign()
    }

    pub fn verify_one_shot(&mut self, message: &[u8], signature: &[u8]) -> Result<bool> {
        self.set_one_shot()?;
        self.update(message)?;
        self.verify(signature)
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.one_shot = false;
    }

    fn reset(&mut self) -> Result<()> {
        self.clear();
        self.state = self.state.next(Event::Reset)?;
        Ok(())
    }
}

fn sign_message(key: &PrivateKey, message: &[u8]) -> [u8; SIGNATURE_LEN] {
    let curve = key.params().curve();

    // r = H(prefix || M) mod L, R = r*B
    let mut nonce_large = sha512(&[key.prefix(), message]);
    let mut nonce = Scalar::from_bytes_mod_order_wide(&nonce_large);
    nonce_large.zeroize();
    let sig_r = curve.scalar_multiply_base(&nonce).to_bytes();

    // k = H(R || A || M) mod L
    let hram = sha512(&[&sig_r, key.public_key().as_bytes(), message]);
    let k = Scalar::from_bytes_mod_order_wide(&hram);

    // S = (r + k*s) mod L
    let mut s = Scalar::from_bytes_mod_order(key.scalar_bytes());
    let sig_s = Scalar::mul_add(&k, &s, &nonce).to_bytes();
    s.zeroize();
    nonce.zeroize();

    let mut signature = [0u8; SIGNATURE_LEN];
    signature[..32].copy_from_slice(&sig_r);
    signature[32..].copy_from_slice(&sig_s);
    signature
}

fn verify_message(key: &PublicKey, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
    let curve = key.params().curve();
    let mut sig_r = [0u8; 32];
    let mut sig_s = [0u8; 32];
    sig_r.copy_from_slice(&signature[..32]);
    sig_s.copy_from_slice(&signature[32..]);

    // a bad R or an S >= L still goes through the full check
    let r_ok = P3::from_bytes(&sig_r).is_some();
    let s = Scalar::from_canonical_bytes(&sig_s);
    let s_ok: Choice = s.is_some();
    let s = Option::from(s).unwrap_or(Scalar::ZERO);

    let hram = sha512(&[&sig_r, key.as_bytes(), message]);
    let k = Scalar::from_bytes_mod_order_wide(&hram);

    // S*B - k*A = R
    let check = curve.double_scalar_multiply_base_vartime(&k, key.negated_p3(), &s);
    let matches = check.to_bytes().ct_eq(&sig_r);

    (r_ok & s_ok & matches).into()
}

/// Ed25519 signature of `message` under the key derived from `seed`.
pub fn sign(seed: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
    let key = generate_private(seed, named_curves::ed25519())?;
    let mut engine = EdDsaEngine::new();
    engine.init_sign(&key);
    engine.sign_one_shot(message)
}

/// Checks an Ed25519 signature. Wrong lengths and an undecodable public key
/// are errors; any other mismatch is `Ok(false)`.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
    if signature.len() != SIGNATURE_LEN {
        return Err(Error::InvalidSignatureLength(signature.len()));
    }
    let key = generate_public(public_key, named_curves::ed25519())?;
    let mut engine = EdDsaEngine::new();
    engine.init_verify(&key);
    engine.verify_one_shot(message, signature)
}

#[cfg(test)]
mod tests {
    use eddsa_math::Scalar;
    use hex_literal::hex;
    use rand::{
        rngs::SmallRng,
        Rng,
        RngCore,
        SeedableRng
    };
    use crate::{
        errors::{
            Error,
            ErrorKind
        },
        keys::{
            generate_private,
            generate_public
        },
        named_curves,
        sha512
    };
    use super::{
        sign,
        verify,
        EdDsaEngine,
        Mode,
        State
    };

    const ZERO_SEED_PK: [u8; 32] =
        hex!("3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29");
    const SECRET_MESSAGE_SIG: [u8; 64] = hex!(
        "94825896c7075c31bcb81f06dba2bdcd9dcf16e79288d4b9f87c248215c8468d"
        "475f429f3de3b4a2cf67fe17077ae19686020364d6d4fa7a0174bab4a123ba0f"
    );

    #[test]
    fn test_known_answer() {
        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        assert_eq!(key.public_key().as_bytes(), &ZERO_SEED_PK);

        let mut engine = EdDsaEngine::new();
        engine.init_sign(&key);
        engine.update(b"This is a secret message").unwrap();
        assert_eq!(engine.sign().unwrap(), SECRET_MESSAGE_SIG);

        let public = generate_public(&ZERO_SEED_PK, named_curves::ed25519()).unwrap();
        let mut engine = EdDsaEngine::new();
        engine.init_verify(&public);
        engine.update(b"This is a secret message").unwrap();
        assert!(engine.verify(&SECRET_MESSAGE_SIG).unwrap());
    }

    #[test]
    fn test_split_updates() {
        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        let mut engine = EdDsaEngine::new();
        engine.init_sign(&key);
        engine.update(b"This is ").unwrap();
        engine.update(b"a secret").unwrap();
        engine.update(b" message").unwrap();
        assert_eq!(engine.sign().unwrap(), SECRET_MESSAGE_SIG);
    }

    #[test]
    fn test_reuse_after_finish() {
        let key = generate_private(&[3u8; 32], named_curves::ed25519()).unwrap();
        let mut engine = EdDsaEngine::new();
        engine.init_sign(&key);
        let first = engine.sign_one_shot(b"first").unwrap();
        assert_eq!(engine.state(), State::SignInit);
        assert!(!engine.is_one_shot());
        engine.update(b"second").unwrap();
        let second = engine.sign().unwrap();

        let mut check = EdDsaEngine::new();
        check.init_sign(&key);
        assert_eq!(check.sign_one_shot(b"second").unwrap(), second);
        assert_ne!(first, second);

        let mut engine = EdDsaEngine::new();
        engine.init_verify(key.public_key());
        assert!(engine.verify_one_shot(b"first", &first).unwrap());
        assert_eq!(engine.state(), State::VerifyInit);
        engine.update(b"second").unwrap();
        assert!(engine.verify(&second).unwrap());
        engine.update(b"second").unwrap();
        assert!(!engine.verify(&first).unwrap());
    }

    #[test]
    fn test_one_shot_second_update() {
        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        let mut engine = EdDsaEngine::new();
        engine.init_sign(&key);
        engine.set_one_shot().unwrap();
        engine.update(b"This is a secret message").unwrap();
        let err = engine.update(b"more").unwrap_err();
        assert_eq!(err, Error::UpdateAlreadyCalled);
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(engine.sign().unwrap(), SECRET_MESSAGE_SIG);

        engine.update(b"data").unwrap();
        assert_eq!(engine.set_one_shot().unwrap_err().kind(), ErrorKind::State);
    }

    #[test]
    fn test_state_errors() {
        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        let mut engine = EdDsaEngine::new();
        assert_eq!(engine.update(b"x").unwrap_err(), Error::NotInitialized);
        assert_eq!(engine.sign().unwrap_err(), Error::NotInitialized);
        assert_eq!(engine.set_one_shot().unwrap_err(), Error::NotInitialized);

        engine.init_sign(&key);
        assert_eq!(engine.verify(&[0u8; 64]).unwrap_err(), Error::NotInitializedForVerifying);
        engine.update(b"x").unwrap();
        assert_eq!(engine.state(), State::Updated(Mode::Sign));

        // switching keys drops the pending data
        engine.init_verify(key.public_key());
        assert_eq!(engine.state(), State::VerifyInit);
        assert_eq!(engine.sign().unwrap_err(), Error::NotInitializedForSigning);
        assert!(engine.verify_one_shot(b"This is a secret message", &SECRET_MESSAGE_SIG).unwrap());
    }

    #[test]
    fn test_bit_flips() {
        let mut rng = SmallRng::seed_from_u64(0xf11b);
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let key = generate_private(&seed, named_curves::ed25519()).unwrap();
        let message = b"bit flips in R and S";

        let mut engine = EdDsaEngine::new();
        engine.init_sign(&key);
        let signature = engine.sign_one_shot(message).unwrap();

        let mut engine = EdDsaEngine::new();
        engine.init_verify(key.public_key());
        assert!(engine.verify_one_shot(message, &signature).unwrap());
        for _ in 0..64 {
            let bit = rng.random_range(0..512);
            let mut bad = signature;
            bad[bit / 8] ^= 1 << (bit % 8);
            assert!(!engine.verify_one_shot(message, &bad).unwrap());
        }
        assert!(!engine.verify_one_shot(b"another message", &signature).unwrap());
    }

    #[test]
    fn test_non_canonical_s() {
        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        let message = b"This is a secret message";

        // S + L verifies under a lax check, it must be rejected
        let mut bad = SECRET_MESSAGE_SIG;
        let order = eddsa_math::Scalar::ORDER_BYTES;
        let mut carry = 0u16;
        for i in 0..32 {
            let t = bad[32 + i] as u16 + order[i] as u16 + carry;
            bad[32 + i] = t as u8;
            carry = t >> 8;
        }
        let mut engine = EdDsaEngine::new();
        engine.init_verify(key.public_key());
        assert!(!engine.verify_one_shot(message, &bad).unwrap());
    }

    #[test]
    fn test_wrong_lengths() {
        let err = verify(&ZERO_SEED_PK, b"m", &[0u8; 63]).unwrap_err();
        assert_eq!(err, Error::InvalidSignatureLength(63));
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = verify(&ZERO_SEED_PK[..31], b"m", &SECRET_MESSAGE_SIG).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = sign(&[0u8; 33], b"m").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let key = generate_private(&[0u8; 32], named_curves::ed25519()).unwrap();
        let mut engine = EdDsaEngine::new();
        engine.init_verify(key.public_key());
        engine.update(b"stale").unwrap();
        assert_eq!(engine.verify(&[0u8; 65]).unwrap_err().kind(), ErrorKind::Validation);

        // the rejected call drops the pending message
        assert_eq!(engine.state(), State::VerifyInit);
        engine.update(b"This is a secret message").unwrap();
        assert!(engine.verify(&SECRET_MESSAGE_SIG).unwrap());
    }

    #[test]
    fn test_non_canonical_public_key() {
        let params = named_curves::ed25519();
        // y = q stands for y = 0, y = q + 1 for y = 1
        let encodings = [
            (
                hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"),
                hex!("0000000000000000000000000000000000000000000000000000000000000000")
            ),
            (
                hex!("eeffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"),
                hex!("0100000000000000000000000000000000000000000000000000000000000000")
            )
        ];

        let base = params.curve().base_point();
        let mut checked = 0;
        for (raw, canonical) in encodings {
            let loose = generate_public(&raw, params).unwrap();
            let strict = generate_public(&canonical, params).unwrap();
            assert_eq!(loose.as_bytes(), &canonical);
            assert_eq!(loose, strict);

            // A has order dividing 4, so R = S*B - g*A passes when k = g mod 4
            let a = loose.point();
            for i in 0..16u8 {
                let message = [i; 3];
                let s = Scalar::from_bytes_mod_order(&[i.wrapping_mul(37).wrapping_add(5); 32]);
                let s_b = base.scalar_multiply(&s.to_bytes());
                for g in 0..4u8 {
                    let mut g_bytes = [0u8; 32];
                    g_bytes[0] = g;
                    let r = (&s_b - &a.scalar_multiply(&g_bytes)).to_bytes();
                    let k = Scalar::from_bytes_mod_order_wide(&sha512(&[&r, &canonical, &message]));
                    if k.to_bytes()[0] & 3 != g {
                        continue;
                    }

                    let mut signature = [0u8; 64];
                    signature[..32].copy_from_slice(&r);
                    signature[32..].copy_from_slice(&s.to_bytes());
                    assert!(verify(&canonical, &message, &signature).unwrap());
                    assert!(verify(&raw, &message, &signature).unwrap());

                    let mut engine = EdDsaEngine::new();
                    engine.init_verify(&loose);
                    assert!(engine.verify_one_shot(&message, &signature).unwrap());
                    checked += 1;
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_byte_level_helpers() {
        let signature = sign(&[0u8; 32], b"This is a secret message").unwrap();
        assert_eq!(signature, SECRET_MESSAGE_SIG);
        assert!(verify(&ZERO_SEED_PK, b"This is a secret message", &signature).unwrap());
        assert!(!verify(&ZERO_SEED_PK, b"This is a secret messagf", &signature).unwrap());

        let mut bad_key = [0u8; 32];
        bad_key[0] = 2;
        assert_eq!(
            verify(&bad_key, b"m", &signature).unwrap_err().kind(),
            ErrorKind::Decoding
        );
    }
}
