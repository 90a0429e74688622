use serde::{Deserialize, Deserializer, Serialize};

/// Messages the server uses to acknowledge a registration without a token.
pub const REGISTERED_MESSAGES: [&str; 2] = ["registered", "User registered successfully"];

/// Request payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// An account as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// Name to greet the user with: display name when set, else username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Answer of both login and register. Every field is optional because the
/// two endpoints fill different subsets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "error_text")]
    pub error: Option<String>,
}

impl AuthResponse {
    /// Whether this response establishes a session.
    ///
    /// A non-empty `error` always fails. Otherwise login succeeds with a
    /// token plus a user, and registration succeeds with one of
    /// `REGISTERED_MESSAGES` plus a user.
    pub fn success(&self) -> bool {
        if self.error.as_deref().is_some_and(|e| !e.is_empty()) {
            return false;
        }
        if self.access_token.is_some() && self.user.is_some() {
            return true;
        }
        self.user.is_some()
            && self
                .message
                .as_deref()
                .is_some_and(|m| REGISTERED_MESSAGES.contains(&m))
    }

    /// Best message to show when `success()` is false.
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .or(self.message.as_deref())
    }
}

/// Accept `"text"`, `{"message": "text", ...}` or `null` for the error field.
fn error_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Object(map)) => Some(
            map.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| serde_json::Value::Object(map.clone()).to_string()),
        ),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user() -> User {
        User {
            id: 1,
            username: "daejeon_user".to_string(),
            email: "user@daejeon.kr".to_string(),
            created_at: None,
            name: None,
            phone: None,
        }
    }

    fn response(token: bool, message: Option<&str>, with_user: bool, error: Option<&str>) -> AuthResponse {
        AuthResponse {
            access_token: token.then(|| "t".to_string()),
            message: message.map(str::to_string),
            user: with_user.then(user),
            email: None,
            error: error.map(str::to_string),
        }
    }

    #[rstest]
    #[case::login(true, None, true, None, true)]
    #[case::token_without_user(true, None, false, None, false)]
    #[case::registered(false, Some("registered"), true, None, true)]
    #[case::registered_long(false, Some("User registered successfully"), true, None, true)]
    #[case::registered_without_user(false, Some("registered"), false, None, false)]
    #[case::other_message(false, Some("welcome"), true, None, false)]
    #[case::empty_error_is_ignored(true, None, true, Some(""), true)]
    #[case::error_wins_over_token(true, None, true, Some("locked"), false)]
    #[case::error_wins_over_message(false, Some("registered"), true, Some("dup"), false)]
    #[case::nothing(false, None, false, None, false)]
    fn success_rule(
        #[case] token: bool,
        #[case] message: Option<&str>,
        #[case] with_user: bool,
        #[case] error: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(response(token, message, with_user, error).success(), expected);
    }

    #[test]
    fn user_decodes_with_only_required_fields() {
        let u: User =
            serde_json::from_str(r#"{"id":7,"username":"a","email":"a@b.co"}"#).unwrap();
        assert_eq!(u.id, 7);
        assert!(u.name.is_none());
        assert_eq!(u.display_name(), "a");
    }

    #[test]
    fn user_ignores_unknown_profile_fields() {
        let u: User = serde_json::from_str(
            r#"{"id":1,"username":"a","email":"a@b.co","name":"홍길동","userType":"ENTREPRENEUR"}"#,
        )
        .unwrap();
        assert_eq!(u.display_name(), "홍길동");
    }

    #[test]
    fn error_accepts_server_error_object() {
        let r: AuthResponse = serde_json::from_str(
            r#"{"success":false,"error":{"code":"UNAUTHORIZED","message":"bad credentials"}}"#,
        )
        .unwrap();
        assert_eq!(r.error.as_deref(), Some("bad credentials"));
        assert!(!r.success());
        assert_eq!(r.failure_message(), Some("bad credentials"));
    }

    #[test]
    fn error_accepts_null_and_absence() {
        let r: AuthResponse = serde_json::from_str(r#"{"error":null}"#).unwrap();
        assert!(r.error.is_none());
        let r: AuthResponse = serde_json::from_str("{}").unwrap();
        assert!(r.error.is_none());
    }

    #[test]
    fn failure_message_falls_back_to_message() {
        let r = response(false, Some("가입 대기 중"), false, Some(""));
        assert_eq!(r.failure_message(), Some("가입 대기 중"));
    }

    #[test]
    fn login_request_serializes_snake_case() {
        let body = serde_json::to_value(LoginRequest {
            username: "u".to_string(),
            password: "p".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"username": "u", "password": "p"}));
    }
}
