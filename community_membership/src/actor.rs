use std::fmt;
use std::hash::{Hash, Hasher};

use ed25519::{Keypair, PublicKey, SecretKey, Signature, SignatureError, Signer, Verifier};
use serde::{Deserialize, Serialize};

/// An account on the community ledger.
///
/// Accounts held by people are the bytes of an ed25519 public key. System
/// accounts (the treasury and the coordinator) are plain identifiers that
/// nobody holds a key for.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The null address. Never a valid recipient.
    pub fn zero() -> Self {
        Address([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Builds a keyless system address from a short label, e.g. `b"treasury"`.
    pub fn system(label: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xff;
        for (slot, b) in bytes[1..].iter_mut().zip(label.iter()) {
            *slot = *b;
        }
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Checks that `sig` over `msg` was produced by the key behind this address.
    /// Keyless addresses never verify.
    pub fn verify(&self, msg: &[u8], sig: &Sig) -> Result<(), SignatureError> {
        let public = PublicKey::from_bytes(&self.0)?;
        public.verify(msg, &sig.0)
    }
}

impl From<PublicKey> for Address {
    fn from(public: PublicKey) -> Self {
        Address(public.to_bytes())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a:{}", hex::encode(&self.0[..3]))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

#[derive(Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Sig(pub Signature);

impl PartialEq for Sig {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Hash for Sig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bytes().hash(state);
    }
}

impl fmt::Display for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_bytes();
        write!(f, "sig:{}..", hex::encode(&bytes[..2]))
    }
}

impl fmt::Debug for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

/// The key material behind a member's address.
#[derive(Debug)]
pub struct SigningAccount(Keypair);

impl Default for SigningAccount {
    fn default() -> Self {
        Self::random()
    }
}

impl SigningAccount {
    pub fn random() -> Self {
        Self::from_seed(rand::random())
            .expect("any 32 byte seed is a valid ed25519 secret key")
    }

    pub fn from_seed(seed: [u8; 32]) -> Result<Self, SignatureError> {
        let secret = SecretKey::from_bytes(&seed)?;
        let public = PublicKey::from(&secret);
        Ok(SigningAccount(Keypair { secret, public }))
    }

    pub fn address(&self) -> Address {
        Address::from(self.0.public)
    }

    pub fn sign(&self, msg: &[u8]) -> Sig {
        Sig(self.0.sign(msg))
    }
}
