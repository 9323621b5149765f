/// Compare two secrets in constant time
///
/// The running time depends only on the lengths of the inputs, never on the
/// position of the first differing byte.
pub fn constant_time_eq(provided: &str, expected: &str) -> bool {
    provided.as_bytes().len() == expected.as_bytes().len()
        && provided
            .as_bytes()
            .iter()
            .zip(expected.as_bytes().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq_valid() {
        assert!(constant_time_eq("s3cret-pass", "s3cret-pass"));
    }

    #[test]
    fn test_constant_time_eq_invalid() {
        assert!(!constant_time_eq("wrong-pass", "s3cret-pass"));
    }

    #[test]
    fn test_constant_time_eq_different_length() {
        assert!(!constant_time_eq("short", "much-longer-password"));
    }

    #[test]
    fn test_constant_time_eq_case_sensitive() {
        assert!(!constant_time_eq("Password", "password"));
    }

    #[test]
    fn test_constant_time_eq_unicode() {
        assert!(constant_time_eq("пароль-1", "пароль-1"));
        assert!(!constant_time_eq("пароль-1", "пароль-2"));
    }
}
