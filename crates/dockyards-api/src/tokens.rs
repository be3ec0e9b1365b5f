// crates/dockyards-api/src/tokens.rs
// ============================================================================
// Module: Dockyards Token Service
// Description: Ed25519-signed access and refresh tokens.
// Purpose: Mint and verify bearer credentials with distinct signing keys.
// Dependencies: base64, ed25519-dalek, jsonwebtoken, serde, dockyards-core
// ============================================================================

//! ## Overview
//! Two Ed25519 keypairs sign two token kinds. A token carries only `sub`
//! (the user name) and `exp`; the signing key alone decides whether it is an
//! access or a refresh token, so an access token never verifies where a
//! refresh token is required and vice versa.
//!
//! Keys live in the global namespace as `Secret` objects holding base64
//! seeds. [`TokenService::bootstrap`] reads them and generates any that are
//! missing; a concurrent creator winning the race causes a re-read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dockyards_core::Client;
use dockyards_core::ObjectMeta;
use dockyards_core::SECRET_JWT_ACCESS;
use dockyards_core::SECRET_JWT_REFRESH;
use dockyards_core::Secret;
use dockyards_core::SecretSpec;
use dockyards_core::StoreError;
use ed25519_dalek::SigningKey;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use jsonwebtoken::errors::ErrorKind;
use rand::rngs::OsRng;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Secret data key holding the base64 seed.
const SEED_KEY: &str = "ed25519.seed";
/// Ed25519 seed length in bytes.
pub const SEED_LENGTH: usize = 32;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Token kind, bound to its signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived credential for API calls.
    Access,
    /// Long-lived credential accepted only by the refresh endpoint.
    Refresh,
}

impl TokenKind {
    /// Returns the audit label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Returns the name of the secret holding this kind's key.
    #[must_use]
    pub const fn secret_name(self) -> &'static str {
        match self {
            Self::Access => SECRET_JWT_ACCESS,
            Self::Refresh => SECRET_JWT_REFRESH,
        }
    }
}

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User name.
    pub sub: String,
    /// Expiry (unix seconds).
    pub exp: u64,
}

/// Access and refresh token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
}

/// Token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token is past its expiry.
    #[error("token expired")]
    Expired,
    /// Token failed signature or claim validation.
    #[error("token invalid: {0}")]
    Invalid(String),
    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
    /// Stored key material is unusable.
    #[error("signing key invalid: {0}")]
    Key(String),
    /// Key bootstrap failed in the object store.
    #[error("signing key store error: {0}")]
    Store(#[from] StoreError),
}

/// Encoding and decoding halves of one signing key.
struct KeyPair {
    /// Private key in jsonwebtoken form.
    encoding: EncodingKey,
    /// Public key in jsonwebtoken form.
    decoding: DecodingKey,
}

impl KeyPair {
    /// Builds both halves from an Ed25519 seed.
    ///
    /// The private half is PKCS#8 DER; the public half is the raw 32-byte
    /// verifying key.
    fn from_seed(seed: &[u8; SEED_LENGTH]) -> Result<Self, TokenError> {
        let signing = SigningKey::from_bytes(seed);
        let der = signing.to_pkcs8_der().map_err(|err| TokenError::Key(err.to_string()))?;
        Ok(Self {
            encoding: EncodingKey::from_ed_der(der.as_bytes()),
            decoding: DecodingKey::from_ed_der(signing.verifying_key().as_bytes()),
        })
    }
}

// ============================================================================
// SECTION: Token Service
// ============================================================================

/// Mints and verifies bearer tokens.
pub struct TokenService {
    /// Access token key.
    access: KeyPair,
    /// Refresh token key.
    refresh: KeyPair,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
}

impl TokenService {
    /// Builds a service from explicit seeds.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Key`] when a seed cannot be encoded as PKCS#8.
    pub fn from_seeds(
        access_seed: &[u8; SEED_LENGTH],
        refresh_seed: &[u8; SEED_LENGTH],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            access: KeyPair::from_seed(access_seed)?,
            refresh: KeyPair::from_seed(refresh_seed)?,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Loads both keys from the global namespace, generating missing ones.
    ///
    /// Returns the service and the kinds whose keys were generated.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] when the store fails or a stored seed is
    /// malformed.
    pub async fn bootstrap(
        client: &Client,
        namespace: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<(Self, Vec<TokenKind>), TokenError> {
        let mut generated = Vec::new();
        let (access_seed, access_new) = load_or_create_seed(client, namespace, TokenKind::Access).await?;
        if access_new {
            generated.push(TokenKind::Access);
        }
        let (refresh_seed, refresh_new) =
            load_or_create_seed(client, namespace, TokenKind::Refresh).await?;
        if refresh_new {
            generated.push(TokenKind::Refresh);
        }
        Ok((Self::from_seeds(&access_seed, &refresh_seed, access_ttl, refresh_ttl)?, generated))
    }

    /// Mints a token of `kind` for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when encoding fails.
    pub fn mint(&self, kind: TokenKind, subject: &str) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: subject.to_string(),
            exp: unix_now().saturating_add(ttl.as_secs()),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), &claims, &self.key(kind).encoding)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }

    /// Mints a fresh access and refresh pair.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when encoding fails.
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.mint(TokenKind::Access, subject)?,
            refresh_token: self.mint(TokenKind::Refresh, subject)?,
        })
    }

    /// Verifies a token against the key of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] or [`TokenError::Invalid`].
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = jsonwebtoken::decode::<Claims>(token, &self.key(kind).decoding, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err.to_string()),
            })?;
        if data.claims.sub.is_empty() {
            return Err(TokenError::Invalid("empty subject".to_string()));
        }
        Ok(data.claims)
    }

    /// Returns the key pair for `kind`.
    const fn key(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

// ============================================================================
// SECTION: Key Storage
// ============================================================================

/// Reads the seed for `kind`, creating the secret when absent.
///
/// Returns the seed and whether this call created it.
async fn load_or_create_seed(
    client: &Client,
    namespace: &str,
    kind: TokenKind,
) -> Result<([u8; SEED_LENGTH], bool), TokenError> {
    let name = kind.secret_name();
    if let Some(secret) = client.get::<SecretSpec>(Some(namespace), name).await? {
        return decode_seed(&secret).map(|seed| (seed, false));
    }
    let seed = SigningKey::generate(&mut OsRng).to_bytes();
    let secret = Secret::new(ObjectMeta::namespaced(namespace, name), SecretSpec {
        data: BTreeMap::from([(SEED_KEY.to_string(), STANDARD.encode(seed))]),
    });
    match client.create(&secret).await {
        Ok(_) => Ok((seed, true)),
        Err(StoreError::AlreadyExists(_)) => {
            let stored = client
                .get::<SecretSpec>(Some(namespace), name)
                .await?
                .ok_or_else(|| TokenError::Key(format!("{name} vanished during bootstrap")))?;
            decode_seed(&stored).map(|seed| (seed, false))
        }
        Err(err) => Err(err.into()),
    }
}

/// Decodes a stored seed.
fn decode_seed(secret: &Secret) -> Result<[u8; SEED_LENGTH], TokenError> {
    let encoded = secret
        .spec
        .data
        .get(SEED_KEY)
        .ok_or_else(|| TokenError::Key(format!("{} has no seed", secret.name())))?;
    let bytes = STANDARD.decode(encoded).map_err(|err| TokenError::Key(err.to_string()))?;
    <[u8; SEED_LENGTH]>::try_from(bytes.as_slice())
        .map_err(|_| TokenError::Key(format!("{} seed has wrong length", secret.name())))
}

/// Current unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
