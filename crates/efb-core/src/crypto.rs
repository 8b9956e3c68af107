//! Random tokens for registration links and SSO state.

use rand::{rngs::OsRng, RngCore};

/// Entropy of a registration verification code (256 bits).
pub const VERIFICATION_CODE_BYTES: usize = 32;

/// Lowercase hex of `len` bytes from the OS CSPRNG.
pub fn random_hex(len: usize) -> String {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Generate a single-use registration verification code.
pub fn generate_verification_code() -> String {
    random_hex(VERIFICATION_CODE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_code_format() {
        let code = generate_verification_code();
        assert_eq!(code.len(), VERIFICATION_CODE_BYTES * 2);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn verification_codes_are_unique() {
        let a = generate_verification_code();
        let b = generate_verification_code();
        assert_ne!(a, b);
    }
}
