//! Preview tokens.
//!
//! A preview token is an HS256-signed JWT binding a content item to an
//! expiry time:
//!
//! ```json
//! {
//!   "sub": 123,              // post id, or slug when the path template uses %slug%
//!   "iss": "wack-preview",
//!   "iat": 1630000000,
//!   "exp": 1630003600        // iat + preview_token.expiry_time
//! }
//! ```
//!
//! Verification is a yes/no decision. Every failure (bad signature, wrong
//! key, expired, malformed) collapses to `false`; the reason is only logged.

use crate::config::PreviewTokenSettings;
use crate::content::ContentItem;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Value of the `iss` claim.
pub const ISSUER: &str = "wack-preview";

// ============================================================================
// claims
// ============================================================================

/// Token subject: a numeric post id or a post slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenSubject {
    Id(u64),
    Slug(String),
}

impl fmt::Display for TokenSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug(slug) => f.write_str(slug),
        }
    }
}

/// Which identifier the token subject should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    Id,
    Slug,
}

/// Claims carried by a preview token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewClaims {
    pub sub: TokenSubject,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}

impl PreviewClaims {
    /// Build claims for `item` issued at `issued_at` (unix seconds).
    ///
    /// A slug subject falls back to the id when the item has no slug.
    pub fn new(item: &ContentItem, kind: SubjectKind, issued_at: u64, expiry_time: u64) -> Self {
        let sub = match kind {
            SubjectKind::Slug if !item.slug.is_empty() => TokenSubject::Slug(item.slug.clone()),
            _ => TokenSubject::Id(item.id),
        };

        Self {
            sub,
            iss: ISSUER.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(expiry_time),
        }
    }
}

// ============================================================================
// errors
// ============================================================================

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding or decoding failed")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token issued in the future (iat {iat}, now {now})")]
    IssuedInFuture { iat: u64, now: u64 },

    #[error("token expired (exp {exp}, now {now})")]
    Expired { exp: u64, now: u64 },
}

// ============================================================================
// codec
// ============================================================================

/// Issues and verifies preview tokens with the configured secret.
#[derive(Debug, Clone, Copy)]
pub struct TokenCodec<'a> {
    settings: &'a PreviewTokenSettings,
}

impl<'a> TokenCodec<'a> {
    pub fn new(settings: &'a PreviewTokenSettings) -> Self {
        Self { settings }
    }

    /// Issue a token for `item`, valid from now for `expiry_time` seconds.
    pub fn generate_token(
        &self,
        item: &ContentItem,
        kind: SubjectKind,
    ) -> Result<String, TokenError> {
        self.generate_token_at(item, kind, now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn generate_token_at(
        &self,
        item: &ContentItem,
        kind: SubjectKind,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let claims = PreviewClaims::new(item, kind, issued_at, self.settings.expiry_time);
        self.encode(&claims)
    }

    /// Sign arbitrary claims with the configured key.
    pub fn encode(&self, claims: &PreviewClaims) -> Result<String, TokenError> {
        let key = EncodingKey::from_secret(self.settings.secret_key.as_bytes());
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &key)?)
    }

    /// `true` only for a well-formed, correctly signed, unexpired token.
    pub fn verify_token(&self, token: &str) -> bool {
        self.decode_claims(token).is_some()
    }

    /// Verified claims of `token`, or `None` if it does not verify.
    pub fn decode_claims(&self, token: &str) -> Option<PreviewClaims> {
        match self.decode(token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                tracing::debug!(error = %err, "preview token rejected");
                None
            }
        }
    }

    fn decode(&self, token: &str) -> Result<PreviewClaims, TokenError> {
        let key = DecodingKey::from_secret(self.settings.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        let claims = jsonwebtoken::decode::<PreviewClaims>(token, &key, &validation)?.claims;

        // A token is dead from its `exp` second on
        let now = now();
        if claims.exp <= now {
            return Err(TokenError::Expired {
                exp: claims.exp,
                now,
            });
        }
        if claims.iat > now {
            return Err(TokenError::IssuedInFuture {
                iat: claims.iat,
                now,
            });
        }

        Ok(claims)
    }
}

#[inline]
fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}
