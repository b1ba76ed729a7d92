//! Post identifier shared by the remote URL, the record file, and the asset folder
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Opaque key addressing one remote post
///
/// Identifiers are numeric on every platform we know of, but they are kept as
/// strings so that leading zeros and platform-specific formats survive. Because
/// an identifier names files and directories, it may not contain path
/// separators or be a dot segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value, when the identifier is numeric
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl FromStr for PostId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("post identifier cannot be empty".to_string());
        }
        if s == "." || s == ".." || s.contains(['/', '\\']) || s.chars().any(char::is_whitespace) {
            return Err(format!("post identifier '{}' is not a valid path segment", s));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric identifiers sort numerically and before non-numeric ones
impl Ord for PostId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for PostId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ordering() {
        let mut ids: Vec<PostId> = ["10", "9", "100", "1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(PostId::as_str).collect();
        assert_eq!(sorted, vec!["1", "9", "10", "100"]);
    }

    #[test]
    fn test_numeric_before_text() {
        let a: PostId = "223".parse().unwrap();
        let b: PostId = "draft".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_rejects_path_like_identifiers() {
        assert!("".parse::<PostId>().is_err());
        assert!("..".parse::<PostId>().is_err());
        assert!("a/b".parse::<PostId>().is_err());
        assert!("a b".parse::<PostId>().is_err());
        assert!(" 42 ".parse::<PostId>().is_ok());
    }

    #[test]
    fn test_from_number() {
        assert_eq!(PostId::from(223).as_str(), "223");
        assert_eq!(PostId::from(223).as_number(), Some(223));
    }
}
