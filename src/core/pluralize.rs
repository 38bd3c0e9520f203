//! Count labels for summaries such as "3 employees" or "1 shift selected"

/// Utility for turning counts and nouns into display text
pub struct Pluralizer;

impl Pluralizer {
    /// Convert a singular noun to its plural form
    ///
    /// Covers the regular English rules used by dashboard labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftdesk::core::pluralize::Pluralizer;
    ///
    /// assert_eq!(Pluralizer::pluralize("employee"), "employees");
    /// assert_eq!(Pluralizer::pluralize("entry"), "entries");
    /// assert_eq!(Pluralizer::pluralize("batch"), "batches");
    /// ```
    pub fn pluralize(singular: &str) -> String {
        if singular.is_empty() {
            return singular.to_string();
        }

        match singular {
            s if s.len() > 1
                && s.ends_with('y')
                && !matches!(s.as_bytes()[s.len() - 2], b'a' | b'e' | b'i' | b'o' | b'u') =>
            {
                format!("{}ies", &s[..s.len() - 1])
            }

            s if s.ends_with('s')
                || s.ends_with("sh")
                || s.ends_with("ch")
                || s.ends_with('x')
                || s.ends_with('z') =>
            {
                format!("{}es", s)
            }

            s => format!("{}s", s),
        }
    }

    /// Noun form for a count: singular for exactly one, plural otherwise
    pub fn noun_for(count: usize, singular: &str) -> String {
        if count == 1 {
            singular.to_string()
        } else {
            Self::pluralize(singular)
        }
    }

    /// "1 employee", "0 shifts", "12 employees"
    pub fn count_label(count: usize, singular: &str) -> String {
        format!("{} {}", count, Self::noun_for(count, singular))
    }
}
