/// Message catalog for one language.
///
/// Templates use `{name}` placeholders that callers fill with `str::replace`.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Row Reporting ====================
    /// Prefix wrapped around every per-row failure.
    /// Placeholders: {row}, {message}
    pub row_error: &'static str,

    /// Header check failure, followed by `:` and the missing header text
    pub missing_header_information: &'static str,

    // ==================== Constraint Messages ====================
    /// Placeholders: {field}
    pub field_required: &'static str,

    /// Placeholders: {field}, {max}
    pub field_too_long: &'static str,

    /// Placeholders: {field}
    pub field_pattern_mismatch: &'static str,

    /// Placeholders: {field}, {min}, {max}
    pub field_out_of_range: &'static str,

    /// Placeholders: {field}
    pub field_not_number: &'static str,
}

impl LanguageStrings {
    /// Look up a template by its catalog key.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let value = match key {
            keys::ROW_ERROR => self.row_error,
            keys::MISSING_HEADER_INFORMATION => self.missing_header_information,
            keys::FIELD_REQUIRED => self.field_required,
            keys::FIELD_TOO_LONG => self.field_too_long,
            keys::FIELD_PATTERN_MISMATCH => self.field_pattern_mismatch,
            keys::FIELD_OUT_OF_RANGE => self.field_out_of_range,
            keys::FIELD_NOT_NUMBER => self.field_not_number,
            _ => return None,
        };
        Some(value)
    }
}

/// Catalog keys understood by the built-in catalogs.
pub mod keys {
    pub const ROW_ERROR: &str = "row_error";
    pub const MISSING_HEADER_INFORMATION: &str = "missing_header_information";
    pub const FIELD_REQUIRED: &str = "field_required";
    pub const FIELD_TOO_LONG: &str = "field_too_long";
    pub const FIELD_PATTERN_MISMATCH: &str = "field_pattern_mismatch";
    pub const FIELD_OUT_OF_RANGE: &str = "field_out_of_range";
    pub const FIELD_NOT_NUMBER: &str = "field_not_number";

    pub const ALL: [&str; 7] = [
        ROW_ERROR,
        MISSING_HEADER_INFORMATION,
        FIELD_REQUIRED,
        FIELD_TOO_LONG,
        FIELD_PATTERN_MISMATCH,
        FIELD_OUT_OF_RANGE,
        FIELD_NOT_NUMBER,
    ];
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    row_error: "Row {row} error: {message}",
    missing_header_information: "Missing header information",

    field_required: "{field} is required",
    field_too_long: "{field} must be at most {max} characters",
    field_pattern_mismatch: "{field} has an invalid format",
    field_out_of_range: "{field} must be between {min} and {max}",
    field_not_number: "{field} must be a number",
};

// ==================== Chinese Strings ====================

pub const CHINESE_STRINGS: LanguageStrings = LanguageStrings {
    row_error: "第{row}行错误：{message}",
    missing_header_information: "缺少头部信息",

    field_required: "{field}不能为空",
    field_too_long: "{field}长度不能超过{max}个字符",
    field_pattern_mismatch: "{field}格式不正确",
    field_out_of_range: "{field}必须在{min}到{max}之间",
    field_not_number: "{field}必须是数字",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_resolves_in_every_catalog() {
        for key in keys::ALL {
            assert!(ENGLISH_STRINGS.get(key).is_some(), "en missing {key}");
            assert!(CHINESE_STRINGS.get(key).is_some(), "zh missing {key}");
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(ENGLISH_STRINGS.get("no_such_key"), None);
    }

    #[test]
    fn test_row_error_placeholders() {
        for strings in [&ENGLISH_STRINGS, &CHINESE_STRINGS] {
            assert!(strings.row_error.contains("{row}"));
            assert!(strings.row_error.contains("{message}"));
        }
    }

    #[test]
    fn test_range_placeholders() {
        assert!(ENGLISH_STRINGS.field_out_of_range.contains("{min}"));
        assert!(ENGLISH_STRINGS.field_out_of_range.contains("{max}"));
        assert!(CHINESE_STRINGS.field_out_of_range.contains("{min}"));
        assert!(CHINESE_STRINGS.field_out_of_range.contains("{max}"));
    }

    #[test]
    fn test_field_placeholder_in_constraint_messages() {
        for key in [
            keys::FIELD_REQUIRED,
            keys::FIELD_TOO_LONG,
            keys::FIELD_PATTERN_MISMATCH,
            keys::FIELD_OUT_OF_RANGE,
            keys::FIELD_NOT_NUMBER,
        ] {
            assert!(ENGLISH_STRINGS.get(key).unwrap().contains("{field}"));
        }
    }
}
