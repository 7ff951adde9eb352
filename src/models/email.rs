use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

/// A normalized email address: trimmed and lower-cased.
///
/// Two records are equal exactly when their normalized strings are equal, so
/// `"A@x.com"` and `" a@x.com "` collapse into the same record. Blank input
/// never produces a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailRecord(String);

impl EmailRecord {
    /// Normalizes a raw cell value. Returns `None` for blank values.
    ///
    /// # Examples
    /// ```
    /// use email_list_checker::models::email::EmailRecord;
    ///
    /// let record = EmailRecord::normalize("  User@Example.COM ").unwrap();
    /// assert_eq!(record.as_str(), "user@example.com");
    /// assert!(EmailRecord::normalize("   ").is_none());
    /// ```
    pub fn normalize(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain portion: everything after the last `@`, if non-empty.
    pub fn domain(&self) -> Option<&str> {
        extract_domain(&self.0)
    }
}

impl fmt::Display for EmailRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmailRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the substring after the last `@`, or `None` when there is no `@`
/// or nothing follows it.
pub fn extract_domain(email: &str) -> Option<&str> {
    match email.rsplit_once('@') {
        Some((_, domain)) if !domain.is_empty() => Some(domain),
        _ => None,
    }
}

/// A duplicate-free collection of [`EmailRecord`]s.
///
/// Set semantics only; iteration happens to be sorted, which keeps downloads
/// and JSON output stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSet(BTreeSet<EmailRecord>);

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning `false` if it was already present.
    pub fn insert(&mut self, email: EmailRecord) -> bool {
        self.0.insert(email)
    }

    pub fn contains(&self, email: &EmailRecord) -> bool {
        self.0.contains(email)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, EmailRecord> {
        self.0.iter()
    }

    pub fn intersection(&self, other: &EmailSet) -> EmailSet {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn union(&self, other: &EmailSet) -> EmailSet {
        self.0.union(&other.0).cloned().collect()
    }

    pub fn difference(&self, other: &EmailSet) -> EmailSet {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Plain strings, in iteration order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|email| email.as_str().to_owned()).collect()
    }
}

impl FromIterator<EmailRecord> for EmailSet {
    fn from_iter<I: IntoIterator<Item = EmailRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EmailSet {
    type Item = &'a EmailRecord;
    type IntoIter = btree_set::Iter<'a, EmailRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for EmailSet {
    type Item = EmailRecord;
    type IntoIter = btree_set::IntoIter<EmailRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Every non-blank value of one file's email column, normalized, in row order.
///
/// Repeats are kept so that within-file duplicates stay observable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailColumn(Vec<EmailRecord>);

impl EmailColumn {
    pub fn new(values: Vec<EmailRecord>) -> Self {
        Self(values)
    }

    /// Normalizes raw values, dropping blanks.
    pub fn from_raw<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            values
                .into_iter()
                .filter_map(|value| EmailRecord::normalize(value.as_ref()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EmailRecord> {
        self.0.iter()
    }

    pub fn to_set(&self) -> EmailSet {
        self.0.iter().cloned().collect()
    }
}
