//! JWT token generation and validation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token kind for distinguishing access vs refresh tokens.
///
/// The two kinds are signed with independent secrets, so a token of one kind
/// can never verify as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived access token (15 minutes), sent on every request.
    Access,
    /// Long-lived refresh token (7 days), scoped to the auth endpoints.
    Refresh,
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Access token duration: 15 minutes
pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Refresh token duration: 7 days
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Configuration for JWT operations. Holds one key pair per token kind.
pub struct JwtConfig {
    access: KeyPair,
    refresh: KeyPair,
}

/// Result of issuing a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// Token lifetime in seconds, also used as the cookie Max-Age
    pub max_age: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with independent access and refresh secrets.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: KeyPair::new(access_secret),
            refresh: KeyPair::new(refresh_secret),
        }
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn ttl(kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => ACCESS_TOKEN_TTL_SECS,
            TokenKind::Refresh => REFRESH_TOKEN_TTL_SECS,
        }
    }

    /// Issue a token of the given kind for a subject.
    pub fn issue(&self, subject: &str, kind: TokenKind) -> Result<IssuedToken, IssueError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| IssueError::TimeError)?
            .as_secs();

        let max_age = Self::ttl(kind);
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + max_age,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.keys(kind).encoding)
            .map_err(IssueError::Encoding)?;

        Ok(IssuedToken { token, max_age })
    }

    /// Validate and decode a token of the given kind.
    ///
    /// Verification failure is an expected outcome, not a fault: callers get
    /// an explicit reason and decide what to do with it.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.keys(kind).decoding, &validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::ExpiredSignature => VerifyError::Expired,
                    ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
                    _ => VerifyError::Malformed,
                })?;

        Ok(token_data.claims)
    }
}

/// Errors that can occur when issuing a token.
#[derive(Debug)]
pub enum IssueError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for IssueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            IssueError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for IssueError {}

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Signature does not match the secret for this kind
    InvalidSignature,
    /// Current time is at or past the claimed expiry
    Expired,
    /// Not a decodable JWT at all
    Malformed,
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::InvalidSignature => write!(f, "Invalid token signature"),
            VerifyError::Expired => write!(f, "Token expired"),
            VerifyError::Malformed => write!(f, "Malformed token"),
        }
    }
}

impl std::error::Error for VerifyError {}
