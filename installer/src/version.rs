//! Lenient dotted version parsing and comparison.
//!
//! Versions are compared component by component after zero-padding, so
//! `1.2` equals `1.2.0`. Parsing never fails: a component without leading
//! digits counts as `0`, which means `abc` is version `0`. Pre-release and
//! build metadata are not understood.

use std::cmp::Ordering;
use std::fmt;

/// A dotted version made of non-negative integer components.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use zork_termux_installer::version::SemanticVersion;
///
/// let short = SemanticVersion::parse("1.2");
/// let long = SemanticVersion::parse("1.2.0");
/// assert_eq!(short.compare(&long), Ordering::Equal);
/// assert_eq!(short, long);
/// ```
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    components: Vec<u64>,
}

impl SemanticVersion {
    /// Parse a dot-delimited version string.
    ///
    /// Each component contributes its leading decimal digits; anything else
    /// parses as `0`. Components too large for `u64` saturate.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            components: raw.trim().split('.').map(parse_component).collect(),
        }
    }

    /// Return the parsed components in order.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Compare two versions after padding the shorter one with zeros.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| (self.component(i), other.component(i)))
            .map(|(a, b)| a.cmp(&b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other).is_eq()
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

/// Compare two raw version strings, returning `-1`, `0`, or `1`.
///
/// # Examples
///
/// ```
/// use zork_termux_installer::version::compare;
///
/// assert_eq!(compare("2.0.0", "1.9.9"), 1);
/// assert_eq!(compare("1.0", "1.0.1"), -1);
/// assert_eq!(compare("abc", "0.0.1"), -1);
/// ```
#[must_use]
pub fn compare(a: &str, b: &str) -> i8 {
    match SemanticVersion::parse(a).compare(&SemanticVersion::parse(b)) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn parse_component(raw: &str) -> u64 {
    raw.trim()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_u64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(u64::from(digit - b'0'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::padding_equal("1.2", "1.2.0", 0)]
    #[case::major_wins("2.0.0", "1.9.9", 1)]
    #[case::patch_missing("1.0", "1.0.1", -1)]
    #[case::non_numeric_is_zero("abc", "0.0.1", -1)]
    #[case::non_numeric_equals_zero("abc", "0", 0)]
    #[case::multi_digit("1.10.0", "1.9.0", 1)]
    #[case::leading_digits("1.3rc1", "1.3", 0)]
    #[case::empty_string("", "0.0.0", 0)]
    #[case::trailing_dot("1.2.", "1.2", 0)]
    fn compare_cases(#[case] a: &str, #[case] b: &str, #[case] expected: i8) {
        assert_eq!(compare(a, b), expected, "compare({a:?}, {b:?})");
    }

    #[rstest]
    #[case("1.2.3", "1.2.4")]
    #[case("0.4", "0.4.0.1")]
    #[case("abc", "1")]
    #[case("9.9.9", "10.0")]
    #[case("1.0.0", "1")]
    fn compare_is_antisymmetric(#[case] a: &str, #[case] b: &str) {
        assert_eq!(compare(a, b), -compare(b, a));
        assert_eq!(compare(a, a), 0);
        assert_eq!(compare(b, b), 0);
    }

    #[test]
    fn oversized_component_saturates() {
        let version = SemanticVersion::parse("99999999999999999999999.1");
        assert_eq!(version.components(), &[u64::MAX, 1]);
    }

    #[test]
    fn display_joins_components() {
        assert_eq!(SemanticVersion::parse("1.x.3").to_string(), "1.0.3");
    }

    #[test]
    fn ordering_sorts_versions() {
        let mut versions: Vec<SemanticVersion> = ["1.10", "1.2", "1.9.9", "0.1"]
            .into_iter()
            .map(SemanticVersion::parse)
            .collect();
        versions.sort();
        let sorted: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, ["0.1", "1.2", "1.9.9", "1.10"]);
    }
}
