use crate::error::{FuzzyError, Result};

/// Reserved words of the rule language
pub const KEYWORDS: [&str; 12] = [
    "if", "then", "is", "and", "or", "not", "(", ")", "slightly", "somewhat", "very", "extremely",
];

/// Something that can be referred to by name in a textual rule
pub trait Named {
    fn name(&self) -> &str;
}

/// Names must be non empty, made of letters, digits and `_`, and must not be a
/// keyword.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&name)
}

pub(crate) fn validate_name(name: impl Into<String>) -> Result<String> {
    let name = name.into();

    if is_valid_name(&name) {
        Ok(name)
    } else {
        Err(FuzzyError::InvalidName(name))
    }
}

#[test]
fn test_valid_names() {
    for name in ["service", "SpeedError", "x1", "very_good", "_"] {
        assert!(is_valid_name(name), "{name}");
    }

    for name in ["", "very", "if", "then", "(", "two words", "a-b", "tips)"] {
        assert!(!is_valid_name(name), "{name}");
    }

    assert_eq!(validate_name("is"), Err(FuzzyError::InvalidName("is".into())));
}
