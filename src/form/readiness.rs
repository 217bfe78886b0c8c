use serde::Serialize;
use serde_json::Value;

use crate::domain::{Platform, mapping};

use super::field::{Draft, DraftField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformReadiness {
    pub platform: Platform,
    pub ready: bool,
    pub missing_fields: Vec<DraftField>,
}

/// Which of the platform's required fields the draft still lacks.
///
/// Vinted lists `size` as required, but it only applies to categories that
/// actually have sizes.
pub fn readiness(draft: &Draft, platform: Platform) -> PlatformReadiness {
    let mut missing_fields = Vec::new();

    for name in mapping::platform_required_fields(platform) {
        let Some(field) = DraftField::from_name(name) else {
            continue;
        };

        if field == DraftField::Size && platform == Platform::Vinted {
            let sized = draft.category.is_some_and(mapping::requires_size);
            if sized && draft.size.is_empty() {
                missing_fields.push(field);
            }
            continue;
        }

        if !is_present(&draft.value_of(field)) {
            missing_fields.push(field);
        }
    }

    PlatformReadiness {
        platform,
        ready: missing_fields.is_empty(),
        missing_fields,
    }
}

pub fn readiness_all(draft: &Draft) -> Vec<PlatformReadiness> {
    Platform::ALL
        .iter()
        .map(|platform| readiness(draft, *platform))
        .collect()
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
