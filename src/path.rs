use crate::error::EvaluationError;

/// A parsed provider address of the form `source.<name>.<dot.separated.path>`.
///
/// The path part may be empty, `/`, or `$`, all of which address the source
/// root itself. Numeric segments index into arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPath {
    pub source: String,
    pub segments: Vec<String>,
}

impl ProviderPath {
    /// Parses a raw provider path. The `source.` prefix and a non-empty
    /// source name are mandatory; everything after the name is the data path.
    pub fn parse(raw: &str) -> Result<Self, EvaluationError> {
        let malformed = |message: &str| EvaluationError::MalformedPath {
            path: raw.to_string(),
            message: message.to_string(),
        };

        let rest = raw
            .strip_prefix("source.")
            .ok_or_else(|| malformed("must start with 'source.'"))?;

        let (source, path) = match rest.split_once('.') {
            Some((name, path)) => (name, path),
            None => (rest, ""),
        };
        if source.is_empty() {
            return Err(malformed("source name is empty"));
        }

        let segments = if path.is_empty() || path == "/" || path == "$" {
            Vec::new()
        } else {
            let segments: Vec<String> = path.split('.').map(str::to_string).collect();
            if segments.iter().any(String::is_empty) {
                return Err(malformed("path contains an empty segment"));
            }
            segments
        };

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Walks the dot path into `root`. Returns `None` when any segment is
    /// absent; the caller decides whether that is an error or a null value.
    pub fn resolve<'a>(&self, root: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                serde_json::Value::Object(entries) => entries.get(segment)?,
                serde_json::Value::Array(items) => {
                    let index: usize = segment.parse().ok()?;
                    items.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }
}
