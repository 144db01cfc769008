use std::fmt;

/// Opaque credential identifying the signed-in user.
///
/// `Debug` and `Display` are redacted so the token can travel through
/// instrumented functions without reaching the logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw credential, for handing to a transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// The authenticated user supplied by the session store.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub token: SessionToken,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            token: SessionToken::new(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_redacted_in_debug_and_display() {
        let user = CurrentUser::new("u1", "Asha", "secret-token");
        assert!(!format!("{:?}", user).contains("secret-token"));
        assert_eq!(user.token.to_string(), "***");
        assert_eq!(user.token.expose(), "secret-token");
    }
}
