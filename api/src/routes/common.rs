use services::checkin::RotationPolicy;
use services::scoring::ScoringPolicy;
use util::config;
use validator::ValidationErrors;

/// Scoring policy from the runtime configuration.
pub fn scoring_policy() -> ScoringPolicy {
    ScoringPolicy {
        late_penalty_group_size: config::late_penalty_group_size(),
    }
}

/// Rotation policy from the runtime configuration.
pub fn rotation_policy() -> RotationPolicy {
    RotationPolicy {
        interval_seconds: config::token_rotation_seconds(),
    }
}

/// Flattens validator errors into a single human-readable line.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let msg = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            parts.push(msg);
        }
    }
    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}
