// Helpers for generating document-style identifiers.
//
// The hosted backend uses opaque alphanumeric ids: 20 characters for
// auto-keyed documents and 28 characters for account uids. Records created
// by this service (seeded content, memory-backend accounts) use the same shape.

use rand::distr::Alphanumeric;
use rand::{Rng, rng};

/// Length of an auto-generated document id.
pub const DOCUMENT_ID_LEN: usize = 20;

/// Length of an account uid.
pub const UID_LEN: usize = 28;

/// Generate a random alphanumeric id of the given length.
pub fn random_id(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate an auto document id (20 alphanumeric chars).
pub fn document_id() -> String {
    random_id(DOCUMENT_ID_LEN)
}

/// Generate an account uid (28 alphanumeric chars).
pub fn uid() -> String {
    random_id(UID_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_has_expected_shape() {
        let id = document_id();
        assert_eq!(id.len(), DOCUMENT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(uid(), uid());
    }
}
