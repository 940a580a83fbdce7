//! Query-string construction for list endpoints

use std::fmt;

/// Ordered filter name → value mapping
///
/// Entries keep their insertion order. Setting an existing name replaces its
/// value in place. Entries whose value is absent or empty are never
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the key's original position if present
    pub fn set<K, V>(&mut self, key: K, value: Option<V>) -> &mut Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key = key.into();
        let value = value.map(|v| v.to_string());
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder form of [`QueryParams::set`]
    pub fn with<K, V>(mut self, key: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.set(key, value);
        self
    }

    /// Append every entry of `other`, in order
    pub fn extend(&mut self, other: &QueryParams) {
        for (key, value) in &other.entries {
            self.set(key.clone(), value.as_deref());
        }
    }

    /// Entries that will be serialized
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(key, value)| match value.as_deref() {
            Some(value) if !value.is_empty() => Some((key.as_str(), value)),
            _ => None,
        })
    }

    /// True when nothing would be serialized
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for QueryParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Serialize `params` as `key=value` pairs joined by `&`
///
/// Names and values are percent-encoded. Absent and empty values are left
/// out entirely.
pub fn build_query_params(params: &QueryParams) -> String {
    params
        .present()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the query string for `params` to `path`, if there is one
pub fn with_query(path: &str, params: &QueryParams) -> String {
    let query = build_query_params(params);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Sort direction accepted by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

/// Paging, sorting and resource-specific filters for a list call
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    /// Resource-specific filters, serialized after the paging parameters
    pub extra: QueryParams,
}

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// First page of `size` entries, newest first
    pub fn recent_first(size: u32) -> Self {
        Self::new()
            .page(1)
            .size(size)
            .sort("createdAt", SortOrder::Desc)
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(by.into());
        self.sort_order = Some(order);
        self
    }

    pub fn filter<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.extra.set(key, value);
        self
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("page", self.page)
            .with("size", self.size)
            .with("sortBy", self.sort_by.as_deref())
            .with("sortOrder", self.sort_order);
        params.extend(&self.extra);
        params
    }
}
