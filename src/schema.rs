//! Field schema: the expected columns of a sheet and their constraints.
//!
//! A schema is built once, either in code through the `FieldDef` builder or
//! from a JSON schema file, and never changes afterwards. Field order is
//! significant: the header check and row validation both walk fields in
//! declaration order and stop at the first failure.

use regex::Regex;
use serde::Deserialize;

use crate::error::{ImportError, ImportResult};

/// A single check applied to one cell.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The cell must be non-empty.
    Required,
    /// The whole cell must match the expression.
    Pattern(Regex),
    /// At most this many characters.
    MaxLength(usize),
    /// Numeric value within `[min, max]`.
    Range { min: f64, max: f64 },
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub rule: Rule,
    /// Catalog key that replaces the rule's default message.
    pub message_key: Option<String>,
}

impl Constraint {
    fn new(rule: Rule) -> Self {
        Self {
            rule,
            message_key: None,
        }
    }
}

/// One expected column.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    header: String,
    constraints: Vec<Constraint>,
}

impl FieldDef {
    /// `name` is the record field, `header` the column title in the sheet.
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::new(Rule::Required));
        self
    }

    /// Require the whole cell to match `pattern`.
    pub fn pattern(mut self, pattern: &str) -> ImportResult<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|e| {
            ImportError::InvalidSchema(format!("field '{}': bad pattern: {}", self.name, e))
        })?;
        self.constraints.push(Constraint::new(Rule::Pattern(regex)));
        Ok(self)
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.push(Constraint::new(Rule::MaxLength(max)));
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> ImportResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ImportError::InvalidSchema(format!(
                "field '{}': invalid range [{}, {}]",
                self.name, min, max
            )));
        }
        self.constraints.push(Constraint::new(Rule::Range { min, max }));
        Ok(self)
    }

    /// Override the message of the most recently added constraint.
    pub fn with_message(mut self, key: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.message_key = Some(key.into());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// Ordered set of expected fields.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    fields: Vec<FieldDef>,
}

impl FieldSchema {
    /// Build a schema; field names must be unique.
    pub fn new(fields: Vec<FieldDef>) -> ImportResult<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|other| other.name == field.name) {
                return Err(ImportError::InvalidSchema(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// A schema with no fields; every header passes and rows are only
    /// checked by the custom hook.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Header titles in declaration order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.header.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Load a schema file.
    ///
    /// ```json
    /// { "fields": [ { "name": "age", "header": "Age", "min": 0, "max": 120 } ] }
    /// ```
    ///
    /// `header` defaults to `name`. Per field, constraints are applied in
    /// the order required, max_length, pattern, range. `min` and `max` must
    /// be given together. `message` overrides the message key of every
    /// constraint on the field.
    pub fn from_json_str(json: &str) -> ImportResult<Self> {
        let file: SchemaFile = serde_json::from_str(json)
            .map_err(|e| ImportError::InvalidSchema(format!("unreadable schema file: {}", e)))?;

        let fields = file
            .fields
            .into_iter()
            .map(FieldEntry::into_def)
            .collect::<ImportResult<Vec<_>>>()?;

        Self::new(fields)
    }
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    header: Option<String>,
    #[serde(default)]
    required: bool,
    pattern: Option<String>,
    max_length: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    message: Option<String>,
}

impl FieldEntry {
    fn into_def(self) -> ImportResult<FieldDef> {
        let header = self.header.unwrap_or_else(|| self.name.clone());
        let mut def = FieldDef::new(self.name, header);

        if self.required {
            def = def.required();
        }
        if let Some(max) = self.max_length {
            def = def.max_length(max);
        }
        if let Some(pattern) = &self.pattern {
            def = def.pattern(pattern)?;
        }
        match (self.min, self.max) {
            (Some(min), Some(max)) => def = def.range(min, max)?,
            (None, None) => {}
            _ => {
                return Err(ImportError::InvalidSchema(format!(
                    "field '{}': min and max must be given together",
                    def.name
                )))
            }
        }
        if let Some(key) = self.message {
            for constraint in &mut def.constraints {
                constraint.message_key = Some(key.clone());
            }
        }

        Ok(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_constraint_order() {
        let field = FieldDef::new("code", "Code")
            .required()
            .max_length(8)
            .pattern("[A-Z]+")
            .unwrap();

        let rules = field.constraints();
        assert_eq!(rules.len(), 3);
        assert!(matches!(rules[0].rule, Rule::Required));
        assert!(matches!(rules[1].rule, Rule::MaxLength(8)));
        assert!(matches!(rules[2].rule, Rule::Pattern(_)));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let field = FieldDef::new("code", "Code").pattern("[A-Z]+").unwrap();
        let Rule::Pattern(regex) = &field.constraints()[0].rule else {
            panic!("expected pattern rule");
        };
        assert!(regex.is_match("ABC"));
        assert!(!regex.is_match("xABCx"));
    }

    #[test]
    fn test_bad_pattern_is_invalid_schema() {
        let result = FieldDef::new("code", "Code").pattern("(unclosed");
        assert!(matches!(result, Err(ImportError::InvalidSchema(_))));
    }

    #[test]
    fn test_inverted_range_is_invalid_schema() {
        assert!(FieldDef::new("age", "Age").range(10.0, 1.0).is_err());
        assert!(FieldDef::new("age", "Age").range(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_with_message_targets_last_constraint() {
        let field = FieldDef::new("age", "Age")
            .required()
            .range(0.0, 120.0)
            .unwrap()
            .with_message("age_invalid");
        assert_eq!(field.constraints()[0].message_key, None);
        assert_eq!(field.constraints()[1].message_key.as_deref(), Some("age_invalid"));
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let result = FieldSchema::new(vec![FieldDef::new("a", "A"), FieldDef::new("a", "B")]);
        assert!(matches!(result, Err(ImportError::InvalidSchema(_))));
    }

    #[test]
    fn test_empty_schema() {
        let schema = FieldSchema::empty();
        assert!(schema.is_empty());
        assert_eq!(schema.headers().count(), 0);
    }

    #[test]
    fn test_from_json_str() {
        let schema = FieldSchema::from_json_str(
            r#"{
                "fields": [
                    { "name": "name", "header": "Name", "required": true, "max_length": 50 },
                    { "name": "age", "min": 0, "max": 120, "message": "age_invalid" }
                ]
            }"#,
        )
        .expect("schema should load");

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.headers().collect::<Vec<_>>(), vec!["Name", "age"]);

        let age = schema.field("age").unwrap();
        assert!(matches!(age.constraints()[0].rule, Rule::Range { min, max } if min == 0.0 && max == 120.0));
        assert_eq!(age.constraints()[0].message_key.as_deref(), Some("age_invalid"));
    }

    #[test]
    fn test_from_json_str_half_range() {
        let result = FieldSchema::from_json_str(r#"{ "fields": [ { "name": "age", "min": 0 } ] }"#);
        assert!(matches!(result, Err(ImportError::InvalidSchema(msg)) if msg.contains("together")));
    }

    #[test]
    fn test_from_json_str_malformed() {
        let result = FieldSchema::from_json_str("{ not json");
        assert!(matches!(result, Err(ImportError::InvalidSchema(_))));
    }
}
