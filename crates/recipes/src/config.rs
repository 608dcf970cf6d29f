use crate::prelude::*;

/// Reddit application credentials.
///
/// Built once at startup from CLI flags (falling back to `REDDIT_*`
/// environment variables) and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditConfig {
    /// Validate raw values. Client id and secret are required; empty counts as missing.
    pub fn from_parts(
        client_id: Option<String>,
        client_secret: Option<String>,
        user_agent: Option<String>,
    ) -> std::result::Result<Self, Error> {
        let client_id = required(client_id, "REDDIT_CLIENT_ID")?;
        let client_secret = required(client_secret, "REDDIT_CLIENT_SECRET")?;

        Ok(Self {
            client_id,
            client_secret,
            user_agent: user_agent
                .filter(|ua| !ua.trim().is_empty())
                .unwrap_or_else(default_user_agent),
        })
    }
}

pub fn default_user_agent() -> String {
    format!(
        "{}/{} (topic recipe finder)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

fn required(value: Option<String>, name: &str) -> std::result::Result<String, Error> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::MissingCredential(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_complete() {
        let config = RedditConfig::from_parts(
            Some("id".to_string()),
            Some("secret".to_string()),
            Some("my-agent/1.0".to_string()),
        )
        .unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.user_agent, "my-agent/1.0");
    }

    #[test]
    fn test_from_parts_default_user_agent() {
        let config =
            RedditConfig::from_parts(Some("id".to_string()), Some("secret".to_string()), None)
                .unwrap();

        assert!(config.user_agent.starts_with("recipes/"));
    }

    #[test]
    fn test_from_parts_missing_client_id() {
        let err = RedditConfig::from_parts(None, Some("secret".to_string()), None).unwrap_err();

        assert!(matches!(err, Error::MissingCredential(_)));
        assert!(err.to_string().contains("REDDIT_CLIENT_ID"));
    }

    #[test]
    fn test_from_parts_blank_secret_is_missing() {
        let err =
            RedditConfig::from_parts(Some("id".to_string()), Some("  ".to_string()), None)
                .unwrap_err();

        assert!(err.to_string().contains("REDDIT_CLIENT_SECRET"));
    }
}
