use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::compiler::Compilation;

/// Create a JSON summary of a compilation pass.
///
/// The summary documents what was compiled and what was left out, so a
/// reviewer can tell whether a collection is narrower than the definitions
/// it came from.
///
/// # Arguments
///
/// * `source` - Definitions or filter file the pass read
/// * `store_key` - Knowledge store key the collection was published under
/// * `compilation` - Result of the pass
///
/// # Example Output
///
/// ```json
/// {
///   "compilation_id": "550e8400-e29b-41d4-a716-446655440000",
///   "compilation_time": "2024-01-15T14:30:52+00:00",
///   "source": "artifacts/windows.yaml",
///   "store_key": "ARTIFACTS_FILTER_FILE",
///   "definitions_compiled": 12,
///   "find_spec_count": 40,
///   "buckets": {"FILE": 31, "REGISTRY_KEY": 9},
///   "skipped": 3,
///   "diagnostics": [...]
/// }
/// ```
pub fn create_compilation_summary(
    source: &str,
    store_key: &str,
    compilation: &Compilation,
) -> Result<String> {
    let mut buckets = Map::new();
    for (type_indicator, specs) in compilation.find_specs.iter() {
        buckets.insert(type_indicator.to_string(), json!(specs.len()));
    }

    let diagnostics = serde_json::to_value(&compilation.diagnostics)
        .context("Failed to serialize compilation diagnostics")?;

    let summary = json!({
        "compilation_id": Uuid::new_v4().to_string(),
        "compilation_time": Utc::now().to_rfc3339(),
        "compiler_version": env!("CARGO_PKG_VERSION"),
        "source": source,
        "store_key": store_key,
        "definitions_compiled": compilation.definitions_compiled,
        "find_spec_count": compilation.find_specs.len(),
        "buckets": Value::Object(buckets),
        "skipped": compilation.skipped(),
        "diagnostics": diagnostics,
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize compilation summary")
}
