/// Verification outcome
use serde::Serialize;
use serde_json::Value;

/// Outcome of verifying one event.
///
/// Every failure mode ends up as `Rejected` with a human-readable reason;
/// nothing is raised to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum VerificationResult {
    /// The `purchase` (license path) or `sale` (sale path) object from the API
    Verified(Value),
    Rejected(String),
}

impl VerificationResult {
    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Verified(data) => Some(data),
            Self::Rejected(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Verified(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }

    /// Boolean outcome plus diagnostic payload. A rejection's payload is its
    /// reason as a JSON string.
    pub fn into_parts(self) -> (bool, Value) {
        match self {
            Self::Verified(data) => (true, data),
            Self::Rejected(reason) => (false, Value::String(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let ok = VerificationResult::Verified(json!({"id": "s1"}));
        assert!(ok.is_verified());
        assert_eq!(ok.data(), Some(&json!({"id": "s1"})));
        assert_eq!(ok.reason(), None);

        let no = VerificationResult::rejected("Invalid webhook secret.");
        assert!(!no.is_verified());
        assert_eq!(no.reason(), Some("Invalid webhook secret."));
        assert_eq!(no.into_parts(), (false, json!("Invalid webhook secret.")));
    }

    #[test]
    fn test_serialization() {
        let ok = VerificationResult::Verified(json!({"id": "s1"}));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "verified", "detail": {"id": "s1"}})
        );

        let no = VerificationResult::rejected("Sale refunded or chargebacked.");
        assert_eq!(
            serde_json::to_value(&no).unwrap(),
            json!({"status": "rejected", "detail": "Sale refunded or chargebacked."})
        );
    }
}
