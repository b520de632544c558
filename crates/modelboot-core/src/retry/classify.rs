//! Classify fetch failures from the remote's error message.

use crate::fetch::FetchError;

/// Classification of a failed fetch attempt.
///
/// Both classes are retried with the same backoff; the distinction only
/// changes the log wording, matching the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchClass {
    /// The remote is throttling us (rate-limit message or a 403 response).
    RateLimited,
    /// Any other failure: network error, checksum mismatch, corrupt archive.
    Other,
}

/// Classify a fetch error by inspecting its human-readable message.
pub fn classify(err: &FetchError) -> FetchClass {
    let msg = err.message().to_ascii_lowercase();
    if msg.contains("rate limit") || msg.contains("403") {
        FetchClass::RateLimited
    } else {
        FetchClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_message_is_rate_limited() {
        let err = FetchError::new("API rate limit exceeded for 10.0.0.1");
        assert_eq!(classify(&err), FetchClass::RateLimited);
    }

    #[test]
    fn http_403_is_rate_limited() {
        let err = FetchError::new("request failed: HTTP 403 Forbidden");
        assert_eq!(classify(&err), FetchClass::RateLimited);
    }

    #[test]
    fn case_is_ignored() {
        let err = FetchError::new("Rate Limit reached, try again later");
        assert_eq!(classify(&err), FetchClass::RateLimited);
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(
            classify(&FetchError::new("connection reset by peer")),
            FetchClass::Other
        );
        assert_eq!(
            classify(&FetchError::new("checksum mismatch for silero_vad.onnx")),
            FetchClass::Other
        );
        assert_eq!(
            classify(&FetchError::new("HTTP 404 Not Found")),
            FetchClass::Other
        );
    }
}
