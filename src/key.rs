//! Cache key construction.

/// Builds the final key both tiers see.
///
/// With a namespace configured, keys take the form `"{namespace}:{key}"`;
/// without one they pass through untouched. The same built key is always
/// used for both tiers, so one logical entry maps to one key everywhere.
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    namespace: Option<String>,
}

impl KeyBuilder {
    pub fn new() -> Self {
        KeyBuilder { namespace: None }
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        KeyBuilder {
            namespace: Some(namespace.into()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn build(&self, key: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}:{}", namespace, key),
            None => key.to_string(),
        }
    }
}
