//! OAuth 1.0a request signing (HMAC-SHA1).

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Environment variables holding the posting credentials.
pub const CONSUMER_KEY_VAR: &str = "F8_TWITTER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "F8_TWITTER_SECRET_KEY";
pub const TOKEN_VAR: &str = "F8_TWITTER_TOKEN";
pub const TOKEN_SECRET_VAR: &str = "F8_TWITTER_SECRET_TOKEN";

/// User-context credentials of the posting account.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("token", &self.token)
            .field("token_secret", &"***")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through a lookup function; missing or blank values fail.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::MissingEnv(name.to_string()))
        };

        Ok(Self {
            consumer_key: var(CONSUMER_KEY_VAR)?,
            consumer_secret: var(CONSUMER_SECRET_VAR)?,
            token: var(TOKEN_VAR)?,
            token_secret: var(TOKEN_SECRET_VAR)?,
        })
    }
}

/// RFC 3986 percent encoding, as OAuth requires.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Compute the base64 HMAC-SHA1 signature of a request.
///
/// `params` holds every oauth and request parameter, unencoded.
pub fn signature(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| AppError::publish(format!("invalid signing key: {e}")))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Derive a request nonce from the current instant and the payload.
pub fn nonce(timestamp_nanos: i64, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp_nanos.to_be_bytes());
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())[..32].to_string()
}

/// Build the `Authorization` header value for a request without body params.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: i64,
) -> Result<String> {
    let mut oauth_params = vec![
        ("oauth_consumer_key".to_string(), credentials.consumer_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let sig = signature(
        method,
        url,
        &oauth_params,
        &credentials.consumer_secret,
        &credentials.token_secret,
    )?;
    oauth_params.push(("oauth_signature".to_string(), sig));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    fn credentials() -> Credentials {
        Credentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".into(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into(),
            token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
        }
    }

    #[test]
    fn signature_matches_reference_request() {
        let params = vec![
            pair("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            pair("include_entities", "true"),
            pair("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            pair("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            pair("oauth_signature_method", "HMAC-SHA1"),
            pair("oauth_timestamp", "1318622958"),
            pair(
                "oauth_token",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            ),
            pair("oauth_version", "1.0"),
        ];
        let creds = credentials();

        let sig = signature(
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &params,
            &creds.consumer_secret,
            &creds.token_secret,
        )
        .unwrap();

        assert_eq!(sig, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn authorization_header_lists_oauth_fields() {
        let header = authorization_header(
            &credentials(),
            "POST",
            "https://api.twitter.com/2/tweets",
            "abc123",
            1318622958,
        )
        .unwrap();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_nonce=\"abc123\""));
        assert!(header.contains("oauth_signature=\""));
        assert!(header.contains("oauth_timestamp=\"1318622958\""));
        assert!(header.ends_with("oauth_version=\"1.0\""));
    }

    #[test]
    fn nonce_is_stable_and_distinct() {
        assert_eq!(nonce(1, "a"), nonce(1, "a"));
        assert_ne!(nonce(1, "a"), nonce(2, "a"));
        assert_eq!(nonce(1, "a").len(), 32);
    }

    #[test]
    fn from_lookup_reads_all_vars() {
        let env: HashMap<&str, &str> = [
            (CONSUMER_KEY_VAR, "ck"),
            (CONSUMER_SECRET_VAR, "super-secret"),
            (TOKEN_VAR, "t"),
            (TOKEN_SECRET_VAR, "ts"),
        ]
        .into_iter()
        .collect();

        let creds = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.consumer_key, "ck");
        assert_eq!(creds.token_secret, "ts");
        assert!(!format!("{creds:?}").contains("super-secret"));
    }

    #[test]
    fn from_lookup_reports_missing_var() {
        let env: HashMap<&str, &str> = [
            (CONSUMER_KEY_VAR, "ck"),
            (CONSUMER_SECRET_VAR, "cs"),
            (TOKEN_VAR, " "),
        ]
        .into_iter()
        .collect();

        let err = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        match err {
            AppError::MissingEnv(name) => assert_eq!(name, TOKEN_VAR),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
