//! JWT Token Handler
//! Mission: Issue and verify signed, time-bounded identity tokens

use crate::auth::{errors::TokenError, models::Claims};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, warn};

/// Token operations the request pipeline and login flow depend on
pub trait TokenCodec: Send + Sync {
    /// Signed token for `subject`, expiring after the configured TTL.
    fn issue(&self, subject: &str) -> Result<String, TokenError>;

    /// True only for a well-formed token with a valid signature that has not
    /// expired. Never fails.
    fn validate(&self, token: &str) -> bool;

    /// Subject embedded in a signed token. Expiry is not checked.
    fn parse_subject(&self, token: &str) -> Result<String, TokenError>;
}

/// HS512 JWT handler
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_ms: i64,
}

impl JwtHandler {
    /// `expiration_ms` may be negative, producing tokens that are already expired.
    pub fn new(secret: &str, expiration_ms: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_ms,
        }
    }

    pub fn expiration_ms(&self) -> i64 {
        self.expiration_ms
    }

    // Expiry is checked by `verify` with no leeway, not by jsonwebtoken.
    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }

    /// Decode and check the signature only
    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }

    /// Decode, check the signature, then reject when `now >= exp`
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Malformed("empty token".to_string()));
        }

        let claims = self.decode_claims(token)?;
        if Utc::now().timestamp_millis() >= claims.exp.saturating_mul(1000) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl TokenCodec for JwtHandler {
    fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now_ms = Utc::now().timestamp_millis();
        let exp_ms = now_ms.saturating_add(self.expiration_ms);

        let claims = Claims {
            sub: subject.to_string(),
            iat: now_ms.div_euclid(1000),
            exp: exp_ms.div_euclid(1000),
        };

        debug!(
            "Issuing JWT for {}, expires in {}ms",
            subject, self.expiration_ms
        );

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn validate(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(claims) => {
                debug!("Validated JWT for {}", claims.sub);
                true
            }
            Err(TokenError::InvalidSignature) => {
                warn!("Invalid JWT signature");
                false
            }
            Err(TokenError::Expired) => {
                warn!("JWT token is expired");
                false
            }
            Err(e) => {
                warn!("Rejected JWT: {e}");
                false
            }
        }
    }

    fn parse_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }
}
