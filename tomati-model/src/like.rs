//! Like accounting and promotion outcome types.

use serde::{Deserialize, Serialize};

/// Distinct-like count at which a product is promoted, permanently.
pub const PROMOTION_THRESHOLD: i64 = 3;

/// Result of an accepted like.
///
/// `was_promoted` is true only for the single call that carried the
/// product across the promotion threshold; callers use it to show a
/// one-time celebratory notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub new_like_count: i64,
    pub was_promoted: bool,
}

/// Wire shape of `POST /api/products/{id}/like`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub new_like_count: i64,
    pub was_promoted: bool,
}

impl LikeResponse {
    pub fn from_outcome(message: impl Into<String>, outcome: LikeOutcome) -> Self {
        Self {
            message: message.into(),
            new_like_count: outcome.new_like_count,
            was_promoted: outcome.was_promoted,
        }
    }
}

/// Wire shape of `GET /api/products/{id}/liked`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikedResponse {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_response_serializes_camel_case() {
        let body = LikeResponse::from_outcome(
            "Produit aimé !",
            LikeOutcome {
                new_like_count: 3,
                was_promoted: true,
            },
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["newLikeCount"], 3);
        assert_eq!(json["wasPromoted"], true);
        assert!(json.get("new_like_count").is_none());
    }
}
