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

use eddsa_math::DecodingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Decoding,
    State
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // validation errors
    InvalidSeedLength(usize),
    InvalidKeyLength(usize),
    InvalidSignatureLength(usize),
    UnknownCurve(String),

    // decoding errors
    InvalidPoint,

    // state errors
    NotInitialized,
    NotInitializedForSigning,
    NotInitializedForVerifying,
    UpdateAlreadyCalled,
    OneShotAfterUpdate
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSeedLength(_)
            | Self::InvalidKeyLength(_)
            | Self::InvalidSignatureLength(_)
            | Self::UnknownCurve(_) => ErrorKind::Validation,
            Self::InvalidPoint => ErrorKind::Decoding,
            Self::NotInitialized
            | Self::NotInitializedForSigning
            | Self::NotInitializedForVerifying
            | Self::UpdateAlreadyCalled
            | Self::OneShotAfterUpdate => ErrorKind::State
        }
    }
}

impl From<DecodingError> for Error {
    fn from(_: DecodingError) -> Self {
        Self::InvalidPoint
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSeedLength(l) => write!(f, "Key: invalid seed length ({l} bytes, expected 32)."),
            Self::InvalidKeyLength(l) => write!(f, "Key: invalid public key length ({l} bytes, expected 32)."),
            Self::InvalidSignatureLength(l) => write!(
                f,
                "Signature: invalid length ({l} bytes, expected 64)."
            ),
            Self::UnknownCurve(name) => write!(f, "Parameters: unknown curve \"{name}\"."),

            Self::InvalidPoint => write!(f, "Key: invalid point encoding."),

            Self::NotInitialized => write!(f, "Engine: not initialized."),
            Self::NotInitializedForSigning => write!(f, "Engine: not initialized for signing."),
            Self::NotInitializedForVerifying => write!(f, "Engine: not initialized for verifying."),
            Self::UpdateAlreadyCalled => write!(f, "Engine: update already called in one-shot mode."),
            Self::OneShotAfterUpdate => write!(f, "Engine: one-shot mode requested after data was supplied.")
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use eddsa_math::DecodingError;
    use super::{
        Error,
        ErrorKind
    };

    #[test]
    fn test_kinds() {
        assert_eq!(Error::InvalidSignatureLength(63).kind(), ErrorKind::Validation);
        assert_eq!(Error::from(DecodingError).kind(), ErrorKind::Decoding);
        assert_eq!(Error::UpdateAlreadyCalled.kind(), ErrorKind::State);
        assert_eq!(
            Error::InvalidKeyLength(31).to_string(),
            "Key: invalid public key length (31 bytes, expected 32)."
        );
    }
}
