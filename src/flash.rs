//! One-shot status messages carried across a redirect.
//!
//! A flash is stored client-side in the `folio_flash` cookie as
//! `<payload>.<signature>`: the payload is the base64url JSON list of
//! messages, the signature its HMAC-SHA256 under the site's secret key. The
//! next page render reads the cookie, shows the messages, and clears it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::Error;
use crate::request::Request;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE: &str = "folio_flash";
const COOKIE_ATTRS: &str = "Path=/; HttpOnly; SameSite=Lax";
const MAX_TOKEN_LEN: usize = 4096;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Warning,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Flash {
    pub category: Category,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { category: Category::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { category: Category::Warning, message: message.into() }
    }
}

/// Signs and verifies flash cookies with the site's secret key.
#[derive(Clone)]
pub struct FlashSigner {
    key: Vec<u8>,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self { key: secret.as_bytes().to_vec() }
    }

    pub fn encode(&self, flashes: &[Flash]) -> Result<String, Error> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(flashes)?);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{sig}"))
    }

    /// Returns the messages in `token`, or `None` if it was not signed with
    /// this key or does not decode.
    pub fn decode(&self, token: &str) -> Option<Vec<Flash>> {
        if token.len() > MAX_TOKEN_LEN {
            return None;
        }
        let (payload, sig) = token.split_once('.')?;
        let expected = URL_SAFE_NO_PAD.decode(sig).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).ok()?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// `set-cookie` value that stores `flashes` for the next request.
    pub fn set_cookie(&self, flashes: &[Flash]) -> Result<String, Error> {
        Ok(format!("{COOKIE}={}; {COOKIE_ATTRS}", self.encode(flashes)?))
    }

    /// `set-cookie` value that deletes the flash cookie.
    pub fn clear_cookie() -> String {
        format!("{COOKIE}=; Max-Age=0; {COOKIE_ATTRS}")
    }

    /// Messages pending for this request. `None` when the request carries no
    /// flash cookie at all; an invalid cookie yields an empty list so the
    /// caller still clears it.
    pub fn pending(&self, req: &Request) -> Option<Vec<Flash>> {
        let token = req.cookie(COOKIE)?;
        Some(self.decode(token).unwrap_or_default())
    }

    fn mac(&self) -> Result<HmacSha256, Error> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| Error::Signing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::request::tests::request;

    #[test]
    fn signed_token_verifies_under_same_key() {
        let signer = FlashSigner::new("k1");
        let token = signer.encode(&[Flash::success("sent")]).unwrap();
        assert_eq!(signer.decode(&token), Some(vec![Flash::success("sent")]));
    }

    #[test]
    fn other_key_is_rejected() {
        let token = FlashSigner::new("k1").encode(&[Flash::warning("x")]).unwrap();
        assert_eq!(FlashSigner::new("k2").decode(&token), None);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = FlashSigner::new("k1");
        let token = signer.encode(&[Flash::warning("fill everything in")]).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = URL_SAFE_NO_PAD.encode(br#"[{"category":"success","message":"pwned"}]"#);
        assert_eq!(signer.decode(&format!("{forged}.{sig}")), None);
        assert_eq!(signer.decode("garbage"), None);
    }

    #[test]
    fn pending_reads_cookie() {
        let signer = FlashSigner::new("k1");
        let token = signer.encode(&[Flash::success("hi")]).unwrap();
        let cookie = format!("{COOKIE}={token}");

        let with = request(Method::Get, "/", &[("cookie", cookie.as_str())], "");
        assert_eq!(signer.pending(&with), Some(vec![Flash::success("hi")]));

        let bad = request(Method::Get, "/", &[("cookie", "folio_flash=nope.nope")], "");
        assert_eq!(signer.pending(&bad), Some(vec![]));

        let without = request(Method::Get, "/", &[], "");
        assert_eq!(signer.pending(&without), None);
    }

    #[test]
    fn cookie_attributes() {
        let set = FlashSigner::new("k").set_cookie(&[Flash::success("a")]).unwrap();
        assert!(set.starts_with("folio_flash="));
        assert!(set.ends_with("Path=/; HttpOnly; SameSite=Lax"));
        assert!(FlashSigner::clear_cookie().contains("Max-Age=0"));
    }
}
