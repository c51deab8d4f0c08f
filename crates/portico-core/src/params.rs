use indexmap::IndexMap;

/// Name of the request parameter carrying the session token
const TOKEN_PARAMETER: &str = "token";

/// Request parameters keyed by name, in first-seen order
///
/// Each name maps to every value supplied for it, in the order they
/// appeared in the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    inner: IndexMap<String, Vec<String>>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for `name`, after any values already present
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(name.into()).or_default().push(value.into());
    }

    /// Register `name` with an explicit list of values
    ///
    /// Values are appended to any already present for `name`, so an empty
    /// list only registers the name.
    #[cfg(test)]
    fn insert_all(&mut self, name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) {
        self.inner
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// All values for `name`; names match exactly and case-sensitively
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner.get(name).map(Vec::as_slice)
    }

    /// First value of `name`, when present and non-empty
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(<[String]>::first)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Session token supplied with the request, if any
    pub fn token(&self) -> Option<&str> {
        self.first(TOKEN_PARAMETER)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl<K, V> Extend<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        parameters.extend(iter);
        parameters
    }
}
