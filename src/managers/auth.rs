// Login and logout. Login fails closed: any transport, credential or
// token-structure problem leaves the client unauthenticated with no mirror
// data loaded, and the menu keeps running. The prompting half is separated
// from `finish_login`, which applies the server's response and can be
// exercised with a fabricated one.

use std::io::Write;

use dialoguer::Input;
use serde_json::json;

use crate::api::{error_detail, ApiClient, ApiResponse};
use crate::domain::token::Token;
use crate::managers::loader;
use crate::mirror::Mirror;
use crate::ui;

/// Prompt for credentials, authenticate and load the full mirror.
/// Returns the remote user id when login succeeded.
pub fn login(
    api: &mut ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<Option<u64>> {
    if api.has_token() {
        writeln!(out, "You are already logged in")?;
        return Ok(None);
    }

    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = ui::read_password("Password")?;

    // Fresh session per login attempt.
    api.reset_session()?;

    let response = match api.post(
        "auth/login/",
        &json!({"username": username, "password": password}),
    ) {
        Ok(response) => response,
        Err(e) => {
            writeln!(out, "Login error: {e}")?;
            api.reset_session()?;
            return Ok(None);
        }
    };

    finish_login(api, mirror, response, out)
}

/// Apply a login response. A non-200 status, a structurally invalid token
/// pair or a failed initial load all leave the client unauthenticated and
/// the mirror empty.
pub fn finish_login(
    api: &mut ApiClient,
    mirror: &mut Mirror,
    response: ApiResponse,
    out: &mut impl Write,
) -> anyhow::Result<Option<u64>> {
    if response.status != 200 {
        writeln!(out, "Login failed: {}", error_detail(&response.body))?;
        api.reset_session()?;
        return Ok(None);
    }

    let token = match Token::from_response(&response.body) {
        Ok(token) => token,
        Err(e) => {
            writeln!(out, "Token validation error: {e}")?;
            api.reset_session()?;
            return Ok(None);
        }
    };
    api.set_token(token);

    let bar = ui::spinner("Loading data...");
    let loaded = loader::load_all(api, mirror, out);
    bar.finish_and_clear();

    let user_id = match loaded {
        Ok(user_id) => user_id,
        Err(e) => {
            writeln!(out, "Failed to load data: {e}")?;
            api.reset_session()?;
            mirror.clear();
            return Ok(None);
        }
    };

    writeln!(out, "Login successful!")?;
    Ok(user_id)
}

/// Log out of the current session. On the server's acknowledgement the
/// token is dropped and the caller's mirror is cleared.
pub fn logout(
    api: &mut ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    if !api.has_token() {
        writeln!(out, "You are not logged in")?;
        return Ok(false);
    }

    let response = api.post_empty("auth/logout/")?;
    if response.status != 200 {
        writeln!(out, "Logout failed (status code: {})", response.status)?;
        return Ok(false);
    }

    api.clear_token();
    mirror.clear();
    writeln!(out, "Logout successful")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_api() -> ApiClient {
        ApiClient::new("http://localhost:1/api/v1/").unwrap()
    }

    #[test]
    fn malformed_access_token_fails_closed() {
        let mut api = test_api();
        let mut mirror = Mirror::new();
        let mut out = Vec::new();
        // 200 with a two-segment access token: validation must reject it
        // before anything is stored or loaded.
        let response = ApiResponse {
            status: 200,
            body: json!({"access": "only.two", "refresh": "only.two"}),
        };

        let user_id = finish_login(&mut api, &mut mirror, response, &mut out).unwrap();

        assert_eq!(user_id, None);
        assert!(!api.has_token());
        assert_eq!(mirror.store.number_of_groups(), 0);
        assert_eq!(mirror.store.number_of_goals(), 0);
        assert!(String::from_utf8(out).unwrap().contains("Token validation error"));
    }

    #[test]
    fn rejected_credentials_fail_closed() {
        let mut api = test_api();
        let mut mirror = Mirror::new();
        let mut out = Vec::new();
        let response = ApiResponse {
            status: 401,
            body: json!({"detail": "No active account found with the given credentials"}),
        };

        let user_id = finish_login(&mut api, &mut mirror, response, &mut out).unwrap();

        assert_eq!(user_id, None);
        assert!(!api.has_token());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Login failed"));
        assert!(text.contains("No active account"));
    }

    #[test]
    fn logout_without_token_is_a_no_op() {
        let mut api = test_api();
        let mut mirror = Mirror::new();
        let mut out = Vec::new();
        assert!(!logout(&mut api, &mut mirror, &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("You are not logged in"));
    }
}
