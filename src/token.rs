use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use sha1::{Digest, Sha1};

/// Token decode failures. All of these surface as 403 at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("bad token signature")]
    BadSignature,
}

/// What a redeemed token grants: resolving one specific episode's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub title: String,
    pub link: String,
}

/// Stateless capability tokens binding a title and a target link to an
/// issue time. The payload is `title|link|issued_at|sig` in url-safe
/// base64, where sig is a keyed sha1 over the first three fields.
pub struct TokenCodec {
    secret: String,
    ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: ttl_secs as i64,
        }
    }

    pub fn issue(&self, title: &str, link: &str) -> String {
        self.issue_at(title, link, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(&self, title: &str, link: &str, issued_at: i64) -> String {
        let sig = self.sign(title, link, issued_at);
        URL_SAFE_NO_PAD.encode(format!("{title}|{link}|{issued_at}|{sig}"))
    }

    /// Decode and verify. Fails closed: anything structurally off is
    /// Malformed, a stale timestamp is Expired, and a wrong signature never
    /// yields partial claims.
    pub fn redeem(&self, token: &str) -> Result<Claims, TokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::Malformed)?;
        let raw = String::from_utf8(raw).map_err(|_| TokenError::Malformed)?;

        let fields: Vec<&str> = raw.split('|').collect();
        let &[title, link, ts, sig] = fields.as_slice() else {
            return Err(TokenError::Malformed);
        };
        let issued_at: i64 = ts.parse().map_err(|_| TokenError::Malformed)?;

        if self.sign(title, link, issued_at) != sig {
            return Err(TokenError::BadSignature);
        }
        if Utc::now().timestamp() - issued_at > self.ttl_secs {
            return Err(TokenError::Expired);
        }

        Ok(Claims {
            title: title.to_string(),
            link: link.to_string(),
        })
    }

    fn sign(&self, title: &str, link: &str, issued_at: i64) -> String {
        let digest = Sha1::digest(format!("{}|{title}|{link}|{issued_at}", self.secret));
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", 600)
    }

    #[test]
    fn round_trip_within_ttl() {
        let codec = codec();
        let token = codec.issue("Alpha", "https://site/animes/alpha/1");

        let claims = codec.redeem(&token).unwrap();
        assert_eq!(claims.title, "Alpha");
        assert_eq!(claims.link, "https://site/animes/alpha/1");
    }

    #[test]
    fn just_inside_ttl_still_valid() {
        let codec = codec();
        let token = codec.issue_at("Alpha", "https://x/1", Utc::now().timestamp() - 599);

        assert!(codec.redeem(&token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let token = codec.issue_at("Alpha", "https://x/1", Utc::now().timestamp() - 601);

        assert_eq!(codec.redeem(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(codec().redeem("not base64 at all!!"), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let token = URL_SAFE_NO_PAD.encode("only|two");
        assert_eq!(codec().redeem(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn non_numeric_timestamp_is_malformed() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let token = URL_SAFE_NO_PAD.encode("a|b|soon|deadbeef");
        assert_eq!(codec().redeem(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn foreign_secret_fails_signature_check() {
        let token = codec().issue("Alpha", "https://x/1");
        let other = TokenCodec::new("other-secret", 600);

        assert_eq!(other.redeem(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_link_fails_signature_check() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let codec = codec();
        let token = codec.issue("Alpha", "https://x/1");
        let raw = String::from_utf8(URL_SAFE_NO_PAD.decode(&token).unwrap()).unwrap();
        let forged = URL_SAFE_NO_PAD.encode(raw.replace("https://x/1", "https://evil/1"));

        assert_eq!(codec.redeem(&forged), Err(TokenError::BadSignature));
    }
}
