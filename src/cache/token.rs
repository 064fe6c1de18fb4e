use std::fmt;

/// Bearer token paired with its absolute expiry.
///
/// The pair is replaced as a whole; nothing hands out the value without its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub exp_unix_ts: i64, // UNIX TIMESTAMP
}

impl Token {
    pub fn new(value: String, exp_unix_ts: i64) -> Self {
        Self { value, exp_unix_ts }
    }

    /// Token is usable only while more than `safety_margin_seconds` remain before expiry.
    pub fn is_valid_at(&self, now_unix_ts: i64, safety_margin_seconds: u64) -> bool {
        self.exp_unix_ts - now_unix_ts > safety_margin_seconds as i64
    }

    /// Moment the token stops being handed out.
    pub fn refresh_at(&self, safety_margin_seconds: u64) -> i64 {
        self.exp_unix_ts - safety_margin_seconds as i64
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("exp_unix_ts", &self.exp_unix_ts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Token;

    const MARGIN: u64 = 30;
    const NOW: i64 = 1_750_000_000;

    fn token_expiring_in(seconds: i64) -> Token {
        Token::new("opaque".to_owned(), NOW + seconds)
    }

    #[test]
    fn token_inside_safety_margin_is_not_valid() {
        assert!(!token_expiring_in(1).is_valid_at(NOW, MARGIN));
        assert!(!token_expiring_in(15).is_valid_at(NOW, MARGIN));
        assert!(!token_expiring_in(30).is_valid_at(NOW, MARGIN));
    }

    #[test]
    fn token_beyond_safety_margin_is_valid() {
        assert!(token_expiring_in(31).is_valid_at(NOW, MARGIN));
        assert!(token_expiring_in(3600).is_valid_at(NOW, MARGIN));
    }

    #[test]
    fn expired_token_is_not_valid() {
        assert!(!token_expiring_in(0).is_valid_at(NOW, MARGIN));
        assert!(!token_expiring_in(-10).is_valid_at(NOW, MARGIN));
    }

    #[test]
    fn debug_output_hides_value() {
        let rendered = format!("{:?}", Token::new("secret-bearer".to_owned(), NOW));
        assert!(!rendered.contains("secret-bearer"));
        assert!(rendered.contains("redacted"));
    }
}
