//! Dataset fingerprinting.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of the dataset text.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "a,b\n1,2\n";
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum("a,b\n1,2\n"), calculate_checksum("a,b\n1,3\n"));
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let sum = calculate_checksum("");
        assert_eq!(sum.len(), 64);
        assert_eq!(
            sum,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
