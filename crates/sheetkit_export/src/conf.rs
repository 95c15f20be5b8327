//! Export constants and default style presets.

use crate::spec::{EnumColumnType, SpecCellFormat};

/// Records fetched per batch when the data source supports cursor iteration.
pub const N_SIZE_BATCH_DEFAULT: usize = 500;

/// Namespace used when i18n is enabled without an explicit namespace.
pub const C_I18N_NAMESPACE_CONVENTIONAL: &str = "records.attributes";
/// Sub-namespace holding the localized yes/no tokens.
pub const C_I18N_GENERIC_SCOPE: &str = "generic";

/// Token written for values in the boolean false-set.
pub const C_BOOLEAN_TOKEN_FALSE: &str = "no";
/// Token written for every other boolean column value.
pub const C_BOOLEAN_TOKEN_TRUE: &str = "yes";

/// Segment separator inside a column path.
pub const C_PATH_SEPARATOR: char = '.';
/// Escape marker that turns the following separator into a literal.
pub const C_PATH_ESCAPE: char = '\\';

/// Number format for `time` columns.
pub const C_NUM_FORMAT_DATETIME: &str = "dd-mm-yyyy hh:mm:ss";
/// Number format for `date` columns.
pub const C_NUM_FORMAT_DATE: &str = "dd-mm-yyyy";

/// Accepted layouts when coercing text into a date.
pub const TUP_DATE_PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];
/// Accepted layouts when coercing text with a time-of-day into a date.
pub const TUP_DATETIME_PARSE_FORMATS: [&str; 2] =
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Build the default data-cell format for one declared column type.
pub fn derive_default_type_format(rule_type: EnumColumnType) -> SpecCellFormat {
    match rule_type {
        EnumColumnType::Time => SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_DATETIME.to_string()),
            ..Default::default()
        },
        EnumColumnType::Date => SpecCellFormat {
            num_format: Some(C_NUM_FORMAT_DATE.to_string()),
            ..Default::default()
        },
        EnumColumnType::Boolean | EnumColumnType::String | EnumColumnType::None => {
            SpecCellFormat {
                text_wrap: Some(true),
                ..Default::default()
            }
        }
    }
}
