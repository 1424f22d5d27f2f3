use std::fmt;

/// What the AI path hands back as `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerToken {
    Word(String),
    /// Upstream answered, but with nothing usable.
    Unknown,
    /// Upstream call failed.
    Error,
}

impl fmt::Display for AnswerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerToken::Word(word) => f.write_str(word),
            AnswerToken::Unknown => f.write_str("Unknown"),
            AnswerToken::Error => f.write_str("Error"),
        }
    }
}

/// First whitespace-delimited word of `text` once everything but letters
/// and whitespace has been stripped.
pub fn extract_answer_token(text: &str) -> AnswerToken {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .next()
        .map(|word| AnswerToken::Word(word.to_string()))
        .unwrap_or(AnswerToken::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> AnswerToken {
        AnswerToken::Word(s.to_string())
    }

    #[test]
    fn test_first_word() {
        assert_eq!(extract_answer_token("Paris is the capital."), word("Paris"));
        assert_eq!(extract_answer_token("Mumbai"), word("Mumbai"));
    }

    #[test]
    fn test_strips_punctuation_and_markup() {
        assert_eq!(extract_answer_token("**Paris**."), word("Paris"));
        assert_eq!(extract_answer_token("\"Delhi\"\n"), word("Delhi"));
        assert_eq!(extract_answer_token("  \n\tTokyo, Japan"), word("Tokyo"));
    }

    #[test]
    fn test_numeric_only_words_are_skipped() {
        assert_eq!(extract_answer_token("42 is the answer"), word("is"));
    }

    #[test]
    fn test_unicode_letters_survive() {
        assert_eq!(extract_answer_token("Zürich!"), word("Zürich"));
    }

    #[test]
    fn test_unknown_when_nothing_alphabetic() {
        assert_eq!(extract_answer_token(""), AnswerToken::Unknown);
        assert_eq!(extract_answer_token("   "), AnswerToken::Unknown);
        assert_eq!(extract_answer_token("1234 !!"), AnswerToken::Unknown);
    }

    #[test]
    fn test_display_sentinels() {
        assert_eq!(AnswerToken::Unknown.to_string(), "Unknown");
        assert_eq!(AnswerToken::Error.to_string(), "Error");
        assert_eq!(word("Paris").to_string(), "Paris");
    }
}
