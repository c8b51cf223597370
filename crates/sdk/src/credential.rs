use std::fmt;
use std::str::FromStr;

use crate::scope::Scope;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("expected 4 or 5 dot-separated segments, got {0}")]
    SegmentCount(usize),
    #[error("scope segment is not a base-10 integer: {0:?}")]
    InvalidScope(String),
}

/// Parsed API key.
///
/// The raw form is `applicationId.scope.subjectId.secret[.transportToken]`.
/// Parsing is pure and deterministic; a key that does not decompose into
/// the expected fields is rejected outright so a garbled scope can never
/// masquerade as the admin scope.
#[derive(Clone)]
pub struct ApiKey {
    raw: String,
    application_id: String,
    scope: Scope,
    subject_id: String,
    secret: String,
    transport_token: Option<String>,
}

impl ApiKey {
    /// The raw token, sent verbatim as the bearer credential and the
    /// realtime auth payload.
    pub fn token(&self) -> &str {
        &self.raw
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn transport_token(&self) -> Option<&str> {
        self.transport_token.as_deref()
    }
}

impl FromStr for ApiKey {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if !(4..=5).contains(&segments.len()) {
            return Err(CredentialError::SegmentCount(segments.len()));
        }

        let raw_scope: u32 = segments[1]
            .parse()
            .map_err(|_| CredentialError::InvalidScope(segments[1].to_string()))?;

        Ok(ApiKey {
            raw: s.to_string(),
            application_id: segments[0].to_string(),
            // retain unassigned bits so they can never collapse to admin
            scope: Scope::from_bits_retain(raw_scope),
            subject_id: segments[2].to_string(),
            secret: segments[3].to_string(),
            transport_token: segments.get(4).map(|t| t.to_string()),
        })
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("application_id", &self.application_id)
            .field("scope", &self.scope)
            .field("subject_id", &self.subject_id)
            .field("secret", &"<redacted>")
            .field("transport_token", &self.transport_token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_segment_key() {
        let key: ApiKey = "app.3.user.secret".parse().unwrap();
        assert_eq!(key.application_id(), "app");
        assert_eq!(key.scope(), Scope::READ_FILE | Scope::UPLOAD_FILE);
        assert_eq!(key.subject_id(), "user");
        assert_eq!(key.transport_token(), None);
        assert_eq!(key.token(), "app.3.user.secret");
    }

    #[test]
    fn parses_transport_token() {
        let key: ApiKey = "app.0.user.secret.ws-token".parse().unwrap();
        assert_eq!(key.transport_token(), Some("ws-token"));
    }

    #[test]
    fn zero_scope_is_admin() {
        let key: ApiKey = "app.0.user.secret".parse().unwrap();
        assert!(key.scope().is_admin());
        assert!(key.scope().allows(Scope::DELETE_DIRECTORY));
    }

    #[test]
    fn rejects_short_keys() {
        assert_eq!(
            "app.3.user".parse::<ApiKey>().unwrap_err(),
            CredentialError::SegmentCount(3)
        );
        assert!("".parse::<ApiKey>().is_err());
    }

    #[test]
    fn rejects_unparsable_scope() {
        assert_eq!(
            "app.banana.user.secret".parse::<ApiKey>().unwrap_err(),
            CredentialError::InvalidScope("banana".into())
        );
        // negative values are not valid scopes either
        assert!("app.-1.user.secret".parse::<ApiKey>().is_err());
    }

    #[test]
    fn debug_redacts_the_secret() {
        let key: ApiKey = "app.3.user.super-secret".parse().unwrap();
        let printed = format!("{key:?}");
        assert!(!printed.contains("super-secret"));
    }
}
