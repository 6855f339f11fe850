//! Content extraction from raw document bytes.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{FerretError, Result};
use crate::models::DocId;

/// A callable that turns raw document bytes into an id and the text to
/// index. Runs inside shard workers, so it must be shareable and
/// thread-safe.
pub type ContentExtractor = Arc<dyn Fn(&[u8]) -> Result<(DocId, String)> + Send + Sync>;

/// Build an extractor for JSON object documents.
///
/// The id attribute may be an integer, a float (truncated), or a numeric
/// string; it must be strictly positive. Content attributes contribute
/// their value when present: strings as-is, integers stringified; other
/// types and absent attributes are skipped. The root must be an object.
pub fn json_extractor(id_field: &str, content_fields: &[String]) -> ContentExtractor {
    let id_field = id_field.to_owned();
    let content_fields = content_fields.to_vec();

    Arc::new(move |raw: &[u8]| {
        let datum: Value = serde_json::from_slice(raw)
            .map_err(|e| FerretError::Extraction(format!("invalid JSON document: {e}")))?;

        let object = datum.as_object().ok_or_else(|| {
            FerretError::Extraction("document root is not an object".to_owned())
        })?;

        let id_value = object.get(&id_field).ok_or_else(|| {
            FerretError::Extraction(format!("document has no id attribute '{id_field}'"))
        })?;
        let id = parse_id(id_value)?;

        let mut parts: Vec<String> = Vec::new();
        for field in &content_fields {
            match object.get(field) {
                Some(Value::String(s)) => parts.push(s.clone()),
                Some(Value::Number(n)) if n.is_i64() || n.is_u64() => parts.push(n.to_string()),
                _ => {}
            }
        }

        Ok((id, parts.join(" ")))
    })
}

fn parse_id(value: &Value) -> Result<DocId> {
    let id: i64 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                f as i64
            } else {
                return Err(FerretError::Extraction(format!("unsupported id value {n}")));
            }
        }
        Value::String(s) => s
            .parse()
            .map_err(|_| FerretError::Extraction(format!("non-numeric id value '{s}'")))?,
        other => {
            return Err(FerretError::Extraction(format!(
                "unsupported id value {other}"
            )))
        }
    };

    if id <= 0 {
        return Err(FerretError::InvalidDocumentId(id));
    }
    Ok(id as DocId)
}
