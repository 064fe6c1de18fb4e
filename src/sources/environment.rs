use serde::{Deserialize, Serialize};

const PRELIVE_AUTH_URL: &str = "https://prelive-oauth2.quran.foundation";
const PRELIVE_API_URL: &str = "https://apis-prelive.quran.foundation/content/api/v4";
const PRODUCTION_AUTH_URL: &str = "https://oauth2.quran.foundation";
const PRODUCTION_API_URL: &str = "https://apis.quran.foundation/content/api/v4";

const TOKEN_PATH: &str = "/oauth2/token";

/// Upstream deployment the gateway talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuranEnvironment {
    #[default]
    Prelive,
    Production,
}

impl QuranEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuranEnvironment::Prelive => "prelive",
            QuranEnvironment::Production => "production",
        }
    }

    pub fn endpoints(&self) -> UpstreamEndpoints {
        match self {
            QuranEnvironment::Prelive => UpstreamEndpoints::new(PRELIVE_AUTH_URL, PRELIVE_API_URL),
            QuranEnvironment::Production => UpstreamEndpoints::new(PRODUCTION_AUTH_URL, PRODUCTION_API_URL),
        }
    }
}

/// Authorization server and content API base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    pub auth_base_url: String,
    pub api_base_url: String,
}

impl UpstreamEndpoints {
    pub fn new(auth_base_url: &str, api_base_url: &str) -> Self {
        Self {
            auth_base_url: auth_base_url.trim_end_matches('/').to_owned(),
            api_base_url: api_base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.auth_base_url, TOKEN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environments_select_distinct_endpoint_pairs() {
        let prelive = QuranEnvironment::Prelive.endpoints();
        let production = QuranEnvironment::Production.endpoints();
        assert_ne!(prelive, production);
        assert_eq!(prelive.token_url(), "https://prelive-oauth2.quran.foundation/oauth2/token");
        assert!(production.api_base_url.starts_with("https://apis.quran.foundation"));
    }

    #[test]
    fn only_two_environment_tags_are_accepted() {
        let parsed: QuranEnvironment = serde_yaml::from_str("production").unwrap();
        assert_eq!(parsed, QuranEnvironment::Production);
        assert!(serde_yaml::from_str::<QuranEnvironment>("staging").is_err());
        assert_eq!(QuranEnvironment::default(), QuranEnvironment::Prelive);
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let endpoints = UpstreamEndpoints::new("http://127.0.0.1:9000/", "http://127.0.0.1:9001/api/");
        assert_eq!(endpoints.token_url(), "http://127.0.0.1:9000/oauth2/token");
        assert_eq!(endpoints.api_base_url, "http://127.0.0.1:9001/api");
    }
}
