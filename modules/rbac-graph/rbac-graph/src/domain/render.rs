//! YAML rendering of binding objects for the `raw` column.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
enum RenderError {
    #[error("failed to encode object: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to emit YAML: {0}")]
    Emit(#[from] serde_yaml::Error),

    #[error("encoded object is not a mapping")]
    NotAMapping,
}

/// Render `object` as YAML headed by explicit `kind` and `apiVersion` lines.
///
/// Keys below the header are sorted at every level, so equal inputs always
/// give byte-identical output. Rendering never fails: on error the returned
/// text is the error message.
#[must_use]
pub fn render<T>(object: &T, kind: &str, api_version: &str) -> String
where
    T: Serialize + ?Sized,
{
    match try_render(object, kind, api_version) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(kind, error = %e, "rendering failed, using error text as raw");
            e.to_string()
        }
    }
}

fn try_render<T>(object: &T, kind: &str, api_version: &str) -> Result<String, RenderError>
where
    T: Serialize + ?Sized,
{
    let serde_json::Value::Object(fields) = serde_json::to_value(object)? else {
        return Err(RenderError::NotAMapping);
    };

    let mut doc = serde_yaml::Mapping::new();
    doc.insert("kind".into(), kind.into());
    doc.insert("apiVersion".into(), api_version.into());

    let mut body: Vec<_> = fields
        .into_iter()
        .filter(|(key, _)| key != "kind" && key != "apiVersion")
        .collect();
    body.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, value) in body {
        doc.insert(key.into(), to_sorted_yaml(value));
    }

    Ok(serde_yaml::to_string(&serde_yaml::Value::Mapping(doc))?)
}

fn to_sorted_yaml(value: serde_json::Value) -> serde_yaml::Value {
    use serde_json::Value as Json;
    use serde_yaml::Value as Yaml;

    match value {
        Json::Null => Yaml::Null,
        Json::Bool(b) => Yaml::Bool(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Yaml::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Yaml::Number(u.into())
            } else {
                Yaml::Number(n.as_f64().unwrap_or_default().into())
            }
        }
        Json::String(s) => Yaml::String(s),
        Json::Array(items) => Yaml::Sequence(items.into_iter().map(to_sorted_yaml).collect()),
        Json::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Yaml::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Yaml::String(k), to_sorted_yaml(v)))
                    .collect(),
            )
        }
    }
}
