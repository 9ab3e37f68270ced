//! CLI presentation: text and json formatters for check and inspect.

use crate::compat::CompatibilityResult;
use crate::snapshot::SnapshotMetadata;
use serde::Serialize;
use serde_json::json;

/// What `inspect` reports about a snapshot image.
#[derive(Debug, Clone, Serialize)]
pub struct InspectView {
    /// Artifact path, or `embedded`.
    pub source: String,
    pub metadata: SnapshotMetadata,
    /// Hex checksum of the artifact payload; the embedded image has none.
    pub checksum: Option<String>,
}

pub fn format_check(result: &CompatibilityResult, format: &str) -> String {
    match format {
        "json" => {
            let out = json!({
                "reuse": result.is_compatible(),
                "check": result,
            });
            serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
        }
        _ => match result {
            CompatibilityResult::Compatible => "reuse: pre-initialized context is compatible".to_string(),
            CompatibilityResult::Incompatible(reason) => format!("recreate: {}", reason),
        },
    }
}

pub fn format_inspect(view: &InspectView, format: &str) -> String {
    if format == "json" {
        return serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string());
    }
    let meta = &view.metadata;
    let disabled: Vec<&str> = meta
        .built_disabled_features
        .iter()
        .map(|f| f.as_str())
        .collect();
    let active: Vec<String> = meta
        .active_features()
        .iter()
        .map(|f| f.to_string())
        .collect();
    let mut output = format!("Snapshot: {}\n", view.source);
    output.push_str(&format!("  native backend:    {}\n", meta.built_with_native_backend));
    output.push_str(&format!("  polyglot stdio:    {}\n", meta.built_with_polyglot_stdio));
    output.push_str(&format!("  sync stdio:        {}\n", meta.built_with_sync_stdio));
    output.push_str(&format!(
        "  disabled features: {}\n",
        if disabled.is_empty() { "none".to_string() } else { disabled.join(", ") }
    ));
    output.push_str(&format!("  active features:   {}\n", active.join(", ")));
    output.push_str(&format!(
        "  checksum:          {}",
        view.checksum.as_deref().unwrap_or("n/a")
    ));
    output
}
