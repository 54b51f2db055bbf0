//! Semantic type lattice for Ago
//!
//! The closed set of semantic types and the two compatibility relations
//! between them: implicit compatibility (assignment, parameters, returns)
//! and explicit castability (alternate-suffix identifiers).

use std::fmt;

/// Semantic types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemType {
    Int,
    Float,
    Bool,
    Str,
    IntList,
    FloatList,
    BoolList,
    StrList,
    /// A list whose elements are not pinned to one concrete type
    ListAny,
    Struct,
    Range,
    Function,
    Null,
    /// Wildcard: compatible with everything
    Any,
    /// Error-recovery sentinel: never cascades further diagnostics
    Unknown,
}

/// All semantic types, for exhaustive property checks
pub const ALL_TYPES: &[SemType] = &[
    SemType::Int,
    SemType::Float,
    SemType::Bool,
    SemType::Str,
    SemType::IntList,
    SemType::FloatList,
    SemType::BoolList,
    SemType::StrList,
    SemType::ListAny,
    SemType::Struct,
    SemType::Range,
    SemType::Function,
    SemType::Null,
    SemType::Any,
    SemType::Unknown,
];

impl SemType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Check if this is any list type (including `list_any`)
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::IntList | Self::FloatList | Self::BoolList | Self::StrList | Self::ListAny
        )
    }

    /// Check if this is the wildcard or the error sentinel
    pub fn is_wild(&self) -> bool {
        matches!(self, Self::Any | Self::Unknown)
    }

    /// Element type of a list type. Indexing `Any` yields `Any`.
    pub fn element_type(&self) -> SemType {
        match self {
            Self::IntList => Self::Int,
            Self::FloatList => Self::Float,
            Self::BoolList => Self::Bool,
            Self::StrList => Self::Str,
            Self::ListAny | Self::Any => Self::Any,
            _ => Self::Unknown,
        }
    }

    /// The list type whose elements are `self`. Lists of lists collapse
    /// to `list_any`.
    pub fn list_of(elem: SemType) -> SemType {
        match elem {
            Self::Int => Self::IntList,
            Self::Float => Self::FloatList,
            Self::Bool => Self::BoolList,
            Self::Str => Self::StrList,
            _ => Self::ListAny,
        }
    }

    /// The surface name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::IntList => "int_list",
            Self::FloatList => "float_list",
            Self::BoolList => "bool_list",
            Self::StrList => "string_list",
            Self::ListAny => "list_any",
            Self::Struct => "struct",
            Self::Range => "range",
            Self::Function => "function",
            Self::Null => "null",
            Self::Any => "Any",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check if `from` can be used where `to` is expected.
///
/// Ago typing is strict - a program casts by changing a name's suffix, so
/// the only implicit conversions are int -> float widening, range as an
/// int_list, and list_any against concrete list types.
pub fn compatible(from: SemType, to: SemType) -> bool {
    if from == to {
        return true;
    }
    if from.is_wild() || to.is_wild() {
        return true;
    }
    if from == SemType::Int && to == SemType::Float {
        return true;
    }
    // A range is interchangeable with the int list it produces
    if from == SemType::Range && to == SemType::IntList {
        return true;
    }
    if from == SemType::IntList && to == SemType::Range {
        return true;
    }
    if from == SemType::ListAny && to.is_list() {
        return true;
    }
    if from.is_list() && to == SemType::ListAny {
        return true;
    }
    false
}

/// Check if an explicit cast via an alternate name suffix is allowed.
///
/// More permissive than [`compatible`] since the user is asking for a
/// conversion. Mirrors the runtime casting rules.
pub fn castable(from: SemType, to: SemType) -> bool {
    if compatible(from, to) {
        return true;
    }
    // Numeric types cast between each other
    if from.is_numeric() && to.is_numeric() {
        return true;
    }
    // Bool casts to/from numeric (bool -> 0/1, number -> != 0)
    if from == SemType::Bool && to.is_numeric() {
        return true;
    }
    if from.is_numeric() && to == SemType::Bool {
        return true;
    }
    // Anything stringifies
    if to == SemType::Str {
        return true;
    }
    // String parses to numeric, bool (non-empty), or its characters
    if from == SemType::Str && (to.is_numeric() || to == SemType::Bool || to == SemType::StrList) {
        return true;
    }
    // Range materializes or tests non-emptiness
    if from == SemType::Range && matches!(to, SemType::IntList | SemType::Bool) {
        return true;
    }
    // Lists cast to int (length), bool (non-empty), or range
    if from.is_list() && matches!(to, SemType::Int | SemType::Bool | SemType::Range) {
        return true;
    }
    // Struct tests non-emptiness
    if from == SemType::Struct && to == SemType::Bool {
        return true;
    }
    // Lists cast to each other iff their elements do
    if from.is_list() && to.is_list() {
        return castable(from.element_type(), to.element_type());
    }
    false
}

/// Result type for arithmetic operations
pub fn arithmetic_result(left: SemType, right: SemType) -> SemType {
    if left == SemType::Float || right == SemType::Float {
        SemType::Float
    } else {
        SemType::Int
    }
}
