pub mod factory;
pub mod location;
pub mod worker;

use validator::ValidationErrors;

/// Surface the first violated field's message as the 400 body. Violations
/// are reported in the schema's declared field order, not hash order, so
/// the same bad body always yields the same message.
pub(crate) fn first_violation(errors: ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.field_errors();
    field_order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request body".to_string())
}
