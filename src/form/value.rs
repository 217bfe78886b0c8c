use serde_json::Value;

/// Structural equality over JSON-shaped values.
///
/// Absent values and `null` are interchangeable. Numbers compare numerically,
/// arrays element-wise in order, objects by key set regardless of key order.
pub fn values_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        (None | Some(Value::Null), Some(_)) | (Some(_), None | Some(Value::Null)) => false,
        (Some(a), Some(b)) => value_eq(a, b),
    }
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(left, right)| values_equal(Some(left), Some(right)))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, left)| b.contains_key(key) && values_equal(Some(left), b.get(key)))
        }
        _ => false,
    }
}
