use serde_json::Value;

/// Default cache lifetime when a query does not ask for one.
pub const DEFAULT_REVALIDATE_SECONDS: u64 = 60;

/// Query options for the CMS item API.
///
/// Mirrors the wire parameters of the Directus REST endpoint: `fields` is a
/// comma-joined list of field paths (dot notation for relations), `filter` and
/// `deep` are JSON-encoded nested comparison objects passed through verbatim,
/// `sort` is a comma-joined field list with an optional `-` prefix for
/// descending order. `revalidate` controls how long a response may be served
/// from the client cache; 0 disables caching for the request.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    fields: Vec<String>,
    filter: Option<Value>,
    sort: Vec<String>,
    limit: Option<u32>,
    deep: Option<Value>,
    revalidate: Option<u64>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn deep(mut self, deep: Value) -> Self {
        self.deep = Some(deep);
        self
    }

    pub fn revalidate(mut self, seconds: u64) -> Self {
        self.revalidate = Some(seconds);
        self
    }

    pub fn cache_ttl_seconds(&self) -> u64 {
        self.cache_ttl_or(DEFAULT_REVALIDATE_SECONDS)
    }

    /// TTL for this request, deferring to the given default when the query
    /// does not carry its own `revalidate`.
    pub fn cache_ttl_or(&self, default_seconds: u64) -> u64 {
        self.revalidate.unwrap_or(default_seconds)
    }

    /// Build the query-string pairs in a stable order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }
        if !self.sort.is_empty() {
            params.push(("sort".to_string(), self.sort.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.to_string()));
        }
        if let Some(deep) = &self.deep {
            params.push(("deep".to_string(), deep.to_string()));
        }

        params
    }
}
