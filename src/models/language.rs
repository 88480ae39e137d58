use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages accepted by the code judge, with their Judge0 language ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
    C,
    Cpp,
    Csharp,
    Go,
    Ruby,
    Rust,
    Typescript,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::Python,
        Language::Javascript,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Csharp,
        Language::Go,
        Language::Ruby,
        Language::Rust,
        Language::Typescript,
    ];

    pub fn judge_id(self) -> u32 {
        match self {
            Language::Python => 71,
            Language::Javascript => 63,
            Language::Java => 62,
            Language::C => 50,
            Language::Cpp => 54,
            Language::Csharp => 51,
            Language::Go => 60,
            Language::Ruby => 72,
            Language::Rust => 73,
            Language::Typescript => 74,
        }
    }

    pub fn from_judge_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.judge_id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Csharp => "csharp",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::Typescript => "typescript",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == wanted)
            .ok_or_else(|| Error::UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_ids_map_both_ways() {
        for lang in Language::ALL {
            assert_eq!(Language::from_judge_id(lang.judge_id()), Some(lang));
        }
        assert_eq!(Language::Python.judge_id(), 71);
        assert_eq!(Language::from_judge_id(999), None);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!(" CPP ".parse::<Language>().unwrap(), Language::Cpp);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ref l) if l == "cobol"));
    }
}
