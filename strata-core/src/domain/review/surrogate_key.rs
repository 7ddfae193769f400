// strata-core/src/domain/review/surrogate_key.rs

use sha2::{Digest, Sha256};

use super::record::RawReview;

/// Marker written in place of a NULL field. Cannot collide with a present
/// value because present values are always length-prefixed.
const NULL_MARKER: &[u8] = b"~;";

/// Deterministic content-derived identifiers.
///
/// Each field is encoded as `<byte length>:<utf8 bytes>;` (or [`NULL_MARKER`]),
/// the encodings are concatenated in order and hashed with SHA-256. Integers
/// are written in decimal and dates in ISO-8601, so the key only depends on the
/// values themselves, never on the platform or the process that computed it.
pub struct SurrogateKey;

impl SurrogateKey {
    pub fn generate<'a, I>(fields: I) -> String
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut hasher = Sha256::new();
        for field in fields {
            match field {
                Some(value) => {
                    hasher.update(value.len().to_string().as_bytes());
                    hasher.update(b":");
                    hasher.update(value.as_bytes());
                    hasher.update(b";");
                }
                None => hasher.update(NULL_MARKER),
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Key over (`listing_id`, `review_date`, `reviewer_name`, `review_text`).
    pub fn for_review(review: &RawReview) -> String {
        let listing_id = review.listing_id.to_string();
        let review_date = review.review_date.format("%Y-%m-%d").to_string();

        Self::generate([
            Some(listing_id.as_str()),
            Some(review_date.as_str()),
            review.reviewer_name.as_deref(),
            review.review_text.as_deref(),
        ])
    }
}
