use crate::{ParamValue, SpatialError};

/// Ordered query-string parameters for a single request.
///
/// Parameters without a meaningful value (absent, or blank text) are never
/// stored, so they never reach the outgoing URL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(String, ParamValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, skipping blank text values.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let value = value.into();
        if !value.is_blank() {
            self.0.push((name.into(), value));
        }
        self
    }

    /// Adds a parameter only when a value is present and not blank.
    pub fn push_opt<V>(&mut self, name: impl Into<String>, value: Option<V>) -> &mut Self
    where
        V: Into<ParamValue>,
    {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Builder-style variant of [`QueryParams::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Renders every parameter to its query-string form.
    pub(crate) fn encode(&self) -> Result<Vec<(String, String)>, SpatialError> {
        self.0
            .iter()
            .map(|(name, value)| {
                let rendered = value.render().ok_or_else(|| {
                    SpatialError::InvalidInput(format!(
                        "parameter '{name}' has a non-finite value {value:?}"
                    ))
                })?;
                Ok((name.clone(), rendered))
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<()> for QueryParams {
    fn from(_: ()) -> Self {
        Self::default()
    }
}
