//! Suffix resolver
//!
//! Ago identifiers carry their type in a trailing suffix: `xa` is an int,
//! `xes` a string, `xarum` a float list. The table is matched
//! longest-suffix-first so that `arum` wins over `a` for a name ending
//! `...arum`. The stem is what remains after stripping the suffix.

use crate::types::SemType;

/// Suffix table, ordered longest-first. Matching walks this in order and
/// takes the first hit.
pub const SUFFIXES: &[(&str, SemType)] = &[
    ("arum", SemType::FloatList),
    ("erum", SemType::StrList),
    ("aem", SemType::IntList),
    ("ium", SemType::Any),
    ("uum", SemType::ListAny),
    ("ae", SemType::Float),
    ("am", SemType::Bool),
    ("as", SemType::BoolList),
    ("es", SemType::Str),
    ("a", SemType::Int),
    ("e", SemType::Range),
    ("i", SemType::Null),
    ("o", SemType::Function),
    ("u", SemType::Struct),
];

/// The type encoded by a bare suffix string, if it is one
pub fn type_of_suffix(suffix: &str) -> Option<SemType> {
    SUFFIXES
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|&(_, ty)| ty)
}

/// Infer a type from a name's suffix. `None` if no suffix matches.
pub fn suffix_type(name: &str) -> Option<SemType> {
    SUFFIXES
        .iter()
        .find(|(s, _)| name.ends_with(s))
        .map(|&(_, ty)| ty)
}

/// Split a name into (stem, suffix text, suffix type). The stem must be
/// non-empty: a name that *is* a suffix has nothing to refer to.
pub fn split(name: &str) -> Option<(&str, &str, SemType)> {
    SUFFIXES
        .iter()
        .find(|(s, _)| name.ends_with(s) && name.len() > s.len())
        .map(|&(s, ty)| (&name[..name.len() - s.len()], s, ty))
}

/// As [`split`], without the suffix text
pub fn split_stem(name: &str) -> Option<(&str, SemType)> {
    split(name).map(|(st, _, ty)| (st, ty))
}

/// The stem alone, for retirement bookkeeping
pub fn stem(name: &str) -> Option<&str> {
    split_stem(name).map(|(st, _)| st)
}

/// Comma-separated suffix list for diagnostics
pub fn suffix_list() -> String {
    SUFFIXES
        .iter()
        .map(|(s, _)| *s)
        .collect::<Vec<_>>()
        .join(", ")
}
