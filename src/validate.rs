//! Structural validation of a single record against a `FieldSchema`.

use crate::error::{ImportError, ImportResult};
use crate::i18n::strings::keys;
use crate::i18n::{fill, Translator};
use crate::record::Record;
use crate::schema::{Constraint, FieldDef, FieldSchema, Rule};

/// Check `record` field by field, in schema order.
///
/// Returns `Ok(None)` when every constraint holds, or `Ok(Some(message))`
/// describing the first failing constraint. Empty cells only fail
/// `Required`; every other rule skips them.
///
/// # Errors
///
/// `ImportError::SchemaMismatch` if the record's shape lacks a schema field.
/// That is a wiring mistake between decoder and schema, not a bad row.
pub fn validate_record<R>(
    schema: &FieldSchema,
    record: &R,
    messages: &dyn Translator,
) -> ImportResult<Option<String>>
where
    R: Record + ?Sized,
{
    for field in schema.fields() {
        if !record.has_field(field.name()) {
            return Err(ImportError::schema_mismatch(
                field.name(),
                format!("record has no field '{}'", field.name()),
            ));
        }

        let value = record.value(field.name());
        for constraint in field.constraints() {
            if let Some(message) = check(field, constraint, value, messages) {
                return Ok(Some(message));
            }
        }
    }

    Ok(None)
}

fn check(
    field: &FieldDef,
    constraint: &Constraint,
    value: Option<&str>,
    messages: &dyn Translator,
) -> Option<String> {
    let label = field.header();
    // Whitespace-only cells are empty.
    let value = value.filter(|v| !v.trim().is_empty());

    match (&constraint.rule, value) {
        (Rule::Required, None) => Some(message(
            messages,
            constraint,
            keys::FIELD_REQUIRED,
            &[("field", label)],
        )),
        (Rule::Required, Some(_)) => None,
        (_, None) => None,
        (Rule::Pattern(regex), Some(v)) => (!regex.is_match(v)).then(|| {
            message(messages, constraint, keys::FIELD_PATTERN_MISMATCH, &[("field", label)])
        }),
        (Rule::MaxLength(max), Some(v)) => (v.chars().count() > *max).then(|| {
            message(
                messages,
                constraint,
                keys::FIELD_TOO_LONG,
                &[("field", label), ("max", &max.to_string())],
            )
        }),
        (Rule::Range { min, max }, Some(v)) => match v.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => (n < *min || n > *max).then(|| {
                message(
                    messages,
                    constraint,
                    keys::FIELD_OUT_OF_RANGE,
                    &[
                        ("field", label),
                        ("min", &min.to_string()),
                        ("max", &max.to_string()),
                    ],
                )
            }),
            _ => Some(message(
                messages,
                constraint,
                keys::FIELD_NOT_NUMBER,
                &[("field", label)],
            )),
        },
    }
}

fn message(
    messages: &dyn Translator,
    constraint: &Constraint,
    default_key: &str,
    args: &[(&str, &str)],
) -> String {
    let key = constraint.message_key.as_deref().unwrap_or(default_key);
    fill(&messages.translate(key), args)
}
