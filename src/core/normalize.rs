use serde_json::Value;

/// Normalize a free-text label for comparison: trimmed and lower-cased
#[inline]
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Normalize a whole label list, keeping order and duplicates
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    labels.iter().map(|l| normalize_label(l)).collect()
}

/// Interpret a raw budget value
///
/// Accepts JSON numbers and numeric strings. Returns `None` for anything
/// non-numeric, non-finite or zero.
pub fn parse_budget(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if amount.is_finite() && amount != 0.0 {
        Some(amount)
    } else {
        None
    }
}
