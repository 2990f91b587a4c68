use std::fmt;

use serde_json::Value;

/// A field selector, rendered in LinkedIn's compact projection syntax by its `Display`
/// implementation.
///
/// - `Field("id")` renders as `id`
/// - `Fields([a, b])` renders as `a,b`
/// - `Nested([("positions", Fields([title, company]))])` renders as `positions:(title,company)`
///
/// Nested entries are rendered in the order they were given.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Selector {
    Field(Box<str>),
    Fields(Vec<Selector>),
    Nested(Vec<(Box<str>, Selector)>),
}

impl Selector {
    pub fn field<S: Into<Box<str>>>(name: S) -> Self {
        Self::Field(name.into())
    }

    pub fn fields<I, T>(selectors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Selector>,
    {
        Self::Fields(selectors.into_iter().map(Into::into).collect())
    }

    pub fn nested<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<Box<str>>,
        T: Into<Selector>,
    {
        Self::Nested(
            entries
                .into_iter()
                .map(|(key, val)| (key.into(), val.into()))
                .collect(),
        )
    }

    /// Converts a JSON value into a selector. Objects become nested selectors in the iteration
    /// order of `serde_json`'s map, which is sorted by key unless its `preserve_order` feature
    /// is enabled.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Nested(
                map.iter()
                    .map(|(key, val)| (Box::from(key.as_str()), Self::from_json(val)))
                    .collect(),
            ),
            Value::Array(items) => Self::Fields(items.iter().map(Self::from_json).collect()),
            Value::String(s) => Self::Field(Box::from(s.as_str())),
            other => Self::Field(other.to_string().into_boxed_str()),
        }
    }

    /// Returns true if `name` is this field, one of the fields in this list, or one of the keys
    /// of this nested selector.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Field(field) => &**field == name,
            Self::Fields(selectors) => selectors
                .iter()
                .any(|selector| matches!(selector, Self::Field(field) if &**field == name)),
            Self::Nested(entries) => entries.iter().any(|(key, _)| &**key == name),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.write_str(field),
            Self::Fields(selectors) => {
                let mut selectors = selectors.iter();
                if let Some(first) = selectors.next() {
                    fmt::Display::fmt(first, f)?;
                    for selector in selectors {
                        f.write_str(",")?;
                        fmt::Display::fmt(selector, f)?;
                    }
                }
                Ok(())
            }
            Self::Nested(entries) => {
                for (key, val) in entries {
                    write!(f, "{}:({})", key, val)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::Field(name.into())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self::Field(name.into_boxed_str())
    }
}

impl<T: Into<Selector>> From<Vec<T>> for Selector {
    fn from(selectors: Vec<T>) -> Self {
        Self::fields(selectors)
    }
}
