//! Header labels, sheet names and the text inflections behind them.

use crate::conf::{C_I18N_NAMESPACE_CONVENTIONAL, C_PATH_SEPARATOR};
use crate::i18n::Translate;
use crate::spec::EnumI18n;

////////////////////////////////////////////////////////////////////////////////
// #region Inflections

/// Human-readable form of a snake-case identifier.
///
/// Leading underscores and a trailing `_id` are dropped, underscores become
/// spaces and only the first character is upper-cased: `created_at` becomes
/// `Created at`, `author_id` becomes `Author`.
pub fn humanize(text: &str) -> String {
    let c_trimmed = text.trim_start_matches('_');
    let c_base = c_trimmed.strip_suffix("_id").unwrap_or(c_trimmed);
    let c_spaced = c_base.replace('_', " ").to_lowercase();
    capitalize_first(&c_spaced)
}

/// Capitalize every word of the humanized form: `not_sure` becomes `Not Sure`.
pub fn titleize(text: &str) -> String {
    humanize(&derive_snake_case(text))
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert `CamelCase` identifiers to `snake_case`; snake-case input is kept.
pub fn derive_snake_case(text: &str) -> String {
    let l_chars: Vec<char> = text.chars().collect();
    let mut c_out = String::with_capacity(text.len() + 4);

    for (n_idx, chr) in l_chars.iter().enumerate() {
        if chr.is_uppercase() {
            let chr_prev = n_idx.checked_sub(1).map(|n_prev| l_chars[n_prev]);
            let chr_next = l_chars.get(n_idx + 1);
            let if_word_start = match chr_prev {
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => {
                    chr_next.is_some_and(|next| next.is_lowercase())
                }
                _ => false,
            };
            if if_word_start {
                c_out.push('_');
            }
            c_out.extend(chr.to_lowercase());
        } else if *chr == '-' || *chr == ' ' {
            c_out.push('_');
        } else {
            c_out.push(*chr);
        }
    }

    c_out
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(chr) => chr.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LabelResolution

/// Concrete namespace for an i18n setting, or `None` when disabled.
pub fn resolve_namespace(i18n: &EnumI18n) -> Option<String> {
    match i18n {
        EnumI18n::Disabled => None,
        EnumI18n::Conventional => Some(C_I18N_NAMESPACE_CONVENTIONAL.to_string()),
        EnumI18n::Namespace(namespace) => Some(namespace.clone()),
    }
}

/// Default header for a column path: separators become underscores, then humanized.
pub fn derive_default_label(column: &str) -> String {
    humanize(&column.replace(C_PATH_SEPARATOR, "_"))
}

/// Header text for one column.
///
/// Explicit label wins; otherwise `"{namespace}.{type_key}.{column}"` is looked
/// up with the humanized default; without a namespace the default is used.
pub fn resolve_label(
    column: &str,
    label: Option<&str>,
    namespace: Option<&str>,
    type_key: &str,
    translator: &dyn Translate,
) -> String {
    if let Some(label) = label {
        return label.to_string();
    }

    let c_default = derive_default_label(column);
    match namespace {
        Some(namespace) => {
            translator.translate(&format!("{namespace}.{type_key}.{column}"), &c_default)
        }
        None => c_default,
    }
}

/// Sheet name used when the caller did not pass one.
///
/// With a namespace the name is looked up as `"{namespace}.{table_name}"`.
pub fn resolve_sheet_name(
    table_name: &str,
    namespace: Option<&str>,
    translator: &dyn Translate,
) -> String {
    let c_table = derive_snake_case(table_name);
    let c_default = humanize(&c_table);
    match namespace {
        Some(namespace) => translator.translate(&format!("{namespace}.{c_table}"), &c_default),
        None => c_default,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
