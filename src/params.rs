//! Panel parameters
//!
//! Named captures (`:id`) and matrix parameters (`;key=value`) collected while
//! matching a panel's URL slice. Parameters are kept in a sorted map so two
//! parses of the same URL compare and hash equal.

use std::collections::BTreeMap;

/// Parameters of a single panel
///
/// # Example
///
/// ```
/// use panel_navigator::PanelParams;
///
/// // Rule pattern: user/:id
/// // Matched slice: user/123;tab=2
/// let mut params = PanelParams::new();
/// params.insert("id".to_string(), "123".to_string());
/// params.insert("tab".to_string(), "2".to_string());
///
/// assert_eq!(params.get("id"), Some(&"123".to_string()));
/// assert_eq!(params.get_as::<u64>("tab"), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PanelParams {
    params: BTreeMap<String, String>,
}

impl PanelParams {
    /// Create new empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a map
    pub fn from_map(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value as a string
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert a parameter, replacing any previous value
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Remove a parameter
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Merge `other` into `self`; values from `other` win
    pub fn merge(&mut self, other: &PanelParams) {
        for (key, value) in other.iter() {
            self.params.insert(key.clone(), value.clone());
        }
    }

    /// Check if parameter exists
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get all parameters
    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Iterate over all parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl FromIterator<(String, String)> for PanelParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_basic() {
        let mut params = PanelParams::new();
        params.insert("id".to_string(), "123".to_string());

        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
    }

    #[test]
    fn test_params_get_as() {
        let params = PanelParams::new().with("id", "123").with("flag", "true");

        assert_eq!(params.get_as::<u64>("id"), Some(123));
        assert_eq!(params.get_as::<bool>("flag"), Some(true));
        assert_eq!(params.get_as::<u64>("flag"), None);
        assert_eq!(params.get_as::<u64>("missing"), None);
    }

    #[test]
    fn test_params_merge_later_wins() {
        let mut params = PanelParams::new().with("a", "1").with("b", "1");
        params.merge(&PanelParams::new().with("b", "2").with("c", "3"));

        assert_eq!(params.get("a"), Some(&"1".to_string()));
        assert_eq!(params.get("b"), Some(&"2".to_string()));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_params_equality_ignores_insert_order() {
        let left = PanelParams::new().with("x", "1").with("y", "2");
        let right = PanelParams::new().with("y", "2").with("x", "1");
        assert_eq!(left, right);
    }

    #[test]
    fn test_params_empty() {
        let mut params = PanelParams::new();
        assert!(params.is_empty());

        params.insert("k".to_string(), "v".to_string());
        assert_eq!(params.len(), 1);
        assert_eq!(params.remove("k"), Some("v".to_string()));
        assert!(params.is_empty());
    }
}
