//! Per-column value coercion: boolean tokens and date truncation.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::conf::{
    C_BOOLEAN_TOKEN_FALSE, C_BOOLEAN_TOKEN_TRUE, C_I18N_GENERIC_SCOPE, TUP_DATE_PARSE_FORMATS,
    TUP_DATETIME_PARSE_FORMATS,
};
use crate::i18n::Translate;
use crate::label::titleize;
use crate::record::EnumRecordValue;
use crate::spec::EnumColumnType;

/// Whether `value` belongs to the boolean false-set
/// `{0, false, "", "0", "false", Null}`.
pub fn is_false_value(value: &EnumRecordValue) -> bool {
    match value {
        EnumRecordValue::Null => true,
        EnumRecordValue::Boolean(val) => !val,
        EnumRecordValue::Integer(val) => *val == 0,
        EnumRecordValue::Number(val) => *val == 0.0,
        EnumRecordValue::String(val) => matches!(val.as_str(), "" | "0" | "false"),
        _ => false,
    }
}

/// Render a boolean column value as a (localized) yes/no string.
///
/// With a namespace the token is looked up as `"{namespace}.generic.{token}"`
/// and defaults to the title-cased token; without one the bare token is used.
pub fn convert_boolean_value(
    value: &EnumRecordValue,
    namespace: Option<&str>,
    translator: &dyn Translate,
) -> String {
    let c_token = if is_false_value(value) {
        C_BOOLEAN_TOKEN_FALSE
    } else {
        C_BOOLEAN_TOKEN_TRUE
    };

    match namespace {
        Some(namespace) => translator.translate(
            &format!("{namespace}.{C_I18N_GENERIC_SCOPE}.{c_token}"),
            &titleize(c_token),
        ),
        None => c_token.to_string(),
    }
}

/// Drop the time-of-day from date-like values; other values pass through.
pub fn convert_date_value(value: EnumRecordValue) -> EnumRecordValue {
    match value {
        EnumRecordValue::DateTime(val) => EnumRecordValue::Date(val.date()),
        EnumRecordValue::String(text) => match parse_date_text(&text) {
            Some(date) => EnumRecordValue::Date(date),
            None => EnumRecordValue::String(text),
        },
        _ => value,
    }
}

/// Coerce one resolved value for its column.
///
/// Boolean columns arrive already rewritten to `String`, so `if_is_boolean_col`
/// carries the declared type.
pub fn coerce_value(
    value: EnumRecordValue,
    rule_type: EnumColumnType,
    if_is_boolean_col: bool,
    namespace: Option<&str>,
    translator: &dyn Translate,
) -> EnumRecordValue {
    if if_is_boolean_col || rule_type == EnumColumnType::Boolean {
        return EnumRecordValue::String(convert_boolean_value(&value, namespace, translator));
    }

    match rule_type {
        EnumColumnType::Date => convert_date_value(value),
        _ => value,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let c_text = text.trim();
    if c_text.is_empty() {
        return None;
    }

    for c_fmt in TUP_DATE_PARSE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(c_text, c_fmt) {
            return Some(date);
        }
    }
    for c_fmt in TUP_DATETIME_PARSE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(c_text, c_fmt) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(c_text)
        .ok()
        .map(|datetime| datetime.date_naive())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::i18n::{NoTranslate, SpecI18nCatalog};

    #[test]
    fn test_false_set_maps_to_no() {
        let l_values = [
            EnumRecordValue::Integer(0),
            EnumRecordValue::Boolean(false),
            EnumRecordValue::Null,
            EnumRecordValue::from("0"),
            EnumRecordValue::from("false"),
            EnumRecordValue::from(""),
        ];
        for value in &l_values {
            assert_eq!(convert_boolean_value(value, None, &NoTranslate), "no", "{value:?}");
        }
    }

    #[test]
    fn test_other_values_map_to_yes() {
        let l_values = [
            EnumRecordValue::Integer(1),
            EnumRecordValue::Boolean(true),
            EnumRecordValue::from("x"),
            EnumRecordValue::from("no"),
            EnumRecordValue::Number(0.5),
        ];
        for value in &l_values {
            assert_eq!(convert_boolean_value(value, None, &NoTranslate), "yes", "{value:?}");
        }
    }

    #[test]
    fn test_boolean_token_localization() {
        let mut catalog = SpecI18nCatalog::new();
        catalog.insert("records.attributes.generic.yes", "Ja");

        let value_true = EnumRecordValue::Boolean(true);
        let value_false = EnumRecordValue::Boolean(false);
        assert_eq!(
            convert_boolean_value(&value_true, Some("records.attributes"), &catalog),
            "Ja"
        );
        assert_eq!(
            convert_boolean_value(&value_false, Some("records.attributes"), &catalog),
            "No"
        );
        assert_eq!(convert_boolean_value(&value_true, None, &catalog), "yes");
    }

    #[test]
    fn test_datetime_truncates_to_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        let datetime = date.and_time(NaiveTime::from_hms_opt(17, 45, 3).expect("time"));

        assert_eq!(
            convert_date_value(EnumRecordValue::DateTime(datetime)),
            EnumRecordValue::Date(date)
        );
        assert_eq!(
            convert_date_value(EnumRecordValue::Date(date)),
            EnumRecordValue::Date(date)
        );
    }

    #[test]
    fn test_date_text_is_parsed_or_kept() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        assert_eq!(
            convert_date_value(EnumRecordValue::from("2024-03-09 10:11:12")),
            EnumRecordValue::Date(date)
        );
        assert_eq!(
            convert_date_value(EnumRecordValue::from("2024-03-09T10:11:12+02:00")),
            EnumRecordValue::Date(date)
        );
        assert_eq!(
            convert_date_value(EnumRecordValue::from("2024-03-09")),
            EnumRecordValue::Date(date)
        );
        assert_eq!(
            convert_date_value(EnumRecordValue::from("soon")),
            EnumRecordValue::from("soon")
        );
        assert_eq!(convert_date_value(EnumRecordValue::Null), EnumRecordValue::Null);
    }

    #[test]
    fn test_coerce_passes_through_untyped_values() {
        let value = EnumRecordValue::from("2024-03-09");
        assert_eq!(
            coerce_value(value.clone(), EnumColumnType::Time, false, None, &NoTranslate),
            value
        );
        assert_eq!(
            coerce_value(value.clone(), EnumColumnType::None, false, None, &NoTranslate),
            value
        );
        let value_flag = EnumRecordValue::Integer(2);
        assert_eq!(
            coerce_value(value_flag, EnumColumnType::String, true, None, &NoTranslate),
            EnumRecordValue::from("yes")
        );
    }
}
