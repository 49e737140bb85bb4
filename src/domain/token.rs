// Bearer-token pair returned by the login endpoint. Validation here is
// purely structural: three base64url segments, JSON header with `alg`/`typ`,
// JSON payload with `token_type` and an integer `exp`, non-empty decodable
// signature. No signature verification happens client-side; the server is
// the authority and rejects bad tokens on its own.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    access: String,
    refresh: String,
}

fn decode_base64url(name: &str, part: &str) -> Result<Vec<u8>> {
    // Tokens normally arrive unpadded; strip any padding so both forms pass.
    URL_SAFE_NO_PAD
        .decode(part.trim_end_matches('='))
        .map_err(|_| Error::Token(format!("{name}: invalid base64url segment")))
}

fn decode_json_object(name: &str, part: &str) -> Result<Value> {
    let bytes = decode_base64url(name, part)?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|_| Error::Token(format!("{name} is not valid JSON")))?;
    if !value.is_object() {
        return Err(Error::Token(format!("{name} is not a JSON object")));
    }
    Ok(value)
}

fn validate_compact_token(name: &str, token: &str) -> Result<()> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(Error::Token(format!(
            "{name} must have 3 segments, got {}",
            parts.len()
        )));
    }
    let (header_b64, payload_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    let header = decode_json_object(&format!("{name} header"), header_b64)?;
    if !header.get("alg").map_or(false, Value::is_string) {
        return Err(Error::Token(format!("{name} header is missing string `alg`")));
    }
    if !header.get("typ").map_or(false, Value::is_string) {
        return Err(Error::Token(format!("{name} header is missing string `typ`")));
    }

    let payload = decode_json_object(&format!("{name} payload"), payload_b64)?;
    if !payload.get("token_type").map_or(false, Value::is_string) {
        return Err(Error::Token(format!(
            "{name} payload is missing string `token_type`"
        )));
    }
    if !payload.get("exp").map_or(false, Value::is_i64) {
        return Err(Error::Token(format!(
            "{name} payload is missing integer `exp`"
        )));
    }

    if signature_b64.is_empty() {
        return Err(Error::Token(format!("{name} signature is empty")));
    }
    decode_base64url(&format!("{name} signature"), signature_b64)?;
    Ok(())
}

impl Token {
    /// The only way to build a `Token`: both compact tokens must pass the
    /// structural checks or nothing is constructed.
    pub fn from_parts(access: impl Into<String>, refresh: impl Into<String>) -> Result<Self> {
        let access = access.into();
        let refresh = refresh.into();
        validate_compact_token("access token", &access)?;
        validate_compact_token("refresh token", &refresh)?;
        Ok(Token { access, refresh })
    }

    /// Extract `access` / `refresh` from the login response body.
    pub fn from_response(body: &Value) -> Result<Self> {
        let access = body
            .get("access")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Token("response has no `access` token".into()))?;
        let refresh = body
            .get("refresh")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Token("response has no `refresh` token".into()))?;
        Token::from_parts(access, refresh)
    }

    pub fn access(&self) -> &str {
        &self.access
    }

    pub fn refresh(&self) -> &str {
        &self.refresh
    }

    fn access_payload(&self) -> Option<Value> {
        let payload_b64 = self.access.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload_b64.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Reads the `is_staff` claim from the access payload. Defaults to
    /// false and never fails, whatever the payload looks like.
    pub fn is_staff(&self) -> bool {
        self.access_payload()
            .and_then(|p| p.get("is_staff").and_then(Value::as_bool))
            .unwrap_or(false)
    }

    /// Access-token expiry as an epoch second, when the claim decodes.
    pub fn expires_at(&self) -> Option<i64> {
        self.access_payload()
            .and_then(|p| p.get("exp").and_then(Value::as_i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segment(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn compact(token_type: &str, extra: Value) -> String {
        let header = json!({"alg": "HS256", "typ": "JWT"});
        let mut payload = json!({"token_type": token_type, "exp": 1999999999_i64});
        if let (Some(obj), Some(more)) = (payload.as_object_mut(), extra.as_object()) {
            for (k, v) in more {
                obj.insert(k.clone(), v.clone());
            }
        }
        format!("{}.{}.{}", segment(&header), segment(&payload), "c2ln")
    }

    fn valid_pair(extra: Value) -> (String, String) {
        (compact("access", extra), compact("refresh", json!({})))
    }

    #[test]
    fn well_formed_pair_is_accepted() {
        let (access, refresh) = valid_pair(json!({}));
        let token = Token::from_parts(access.clone(), refresh.clone()).unwrap();
        assert_eq!(token.access(), access);
        assert_eq!(token.refresh(), refresh);
        assert_eq!(token.expires_at(), Some(1999999999));
    }

    #[test]
    fn wrong_segment_count_is_rejected() {
        let (_, refresh) = valid_pair(json!({}));
        assert!(Token::from_parts("only.two", refresh).is_err());
    }

    #[test]
    fn non_json_header_is_rejected() {
        let (access, refresh) = valid_pair(json!({}));
        let mut parts: Vec<&str> = access.split('.').collect();
        let bad = URL_SAFE_NO_PAD.encode(b"not json");
        parts[0] = &bad;
        assert!(Token::from_parts(parts.join("."), refresh).is_err());
    }

    #[test]
    fn missing_claims_are_rejected() {
        let header = segment(&json!({"alg": "HS256", "typ": "JWT"}));
        let payload_no_exp = segment(&json!({"token_type": "access"}));
        let bad = format!("{header}.{payload_no_exp}.c2ln");
        let (_, refresh) = valid_pair(json!({}));
        assert!(Token::from_parts(bad, refresh).is_err());
    }

    #[test]
    fn empty_signature_is_rejected() {
        let (access, refresh) = valid_pair(json!({}));
        let without_sig = access.rsplit_once('.').unwrap().0;
        assert!(Token::from_parts(format!("{without_sig}."), refresh).is_err());
    }

    #[test]
    fn from_response_requires_both_tokens() {
        let (access, refresh) = valid_pair(json!({}));
        let token = Token::from_response(&json!({"access": access, "refresh": refresh}));
        assert!(token.is_ok());
        assert!(Token::from_response(&json!({"access": access})).is_err());
        assert!(Token::from_response(&json!({})).is_err());
    }

    #[test]
    fn is_staff_reads_claim_and_defaults_false() {
        let (staff_access, refresh) = valid_pair(json!({"is_staff": true}));
        let staff = Token::from_parts(staff_access, refresh.clone()).unwrap();
        assert!(staff.is_staff());

        let (plain_access, _) = valid_pair(json!({}));
        let plain = Token::from_parts(plain_access, refresh).unwrap();
        assert!(!plain.is_staff());
    }
}
