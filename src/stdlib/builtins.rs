//! Built-in Functions Registry
//!
//! Defines the standard-library signatures seeded into the checker's global
//! scope, and the Python runtime names the backend emits for them.

use crate::types::SemType;

/// Built-in function signature
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunc {
    pub name: &'static str,
    pub params: &'static [SemType],
    pub ret: SemType,
    /// Runtime function name the Python backend generates
    pub py_name: &'static str,
}

/// All built-in functions
pub const BUILTINS: &[BuiltinFunc] = &[
    // Output
    BuiltinFunc {
        name: "dici",
        params: &[SemType::Str],
        ret: SemType::Null,
        py_name: "ago_dici",
    },
    // Type inspection
    BuiltinFunc {
        name: "species",
        params: &[SemType::Any],
        ret: SemType::Str,
        py_name: "ago_species",
    },
    // File operations
    BuiltinFunc {
        name: "apertu",
        params: &[SemType::Str],
        ret: SemType::Struct,
        py_name: "ago_apertu",
    },
    // Program control
    BuiltinFunc {
        name: "exei",
        params: &[SemType::Int],
        ret: SemType::Null,
        py_name: "ago_exei",
    },
    // Comparison
    BuiltinFunc {
        name: "aequalam",
        params: &[SemType::Any, SemType::Any],
        ret: SemType::Bool,
        py_name: "ago_aequalam",
    },
    // Struct keys
    BuiltinFunc {
        name: "claverum",
        params: &[SemType::Struct],
        ret: SemType::StrList,
        py_name: "ago_claverum",
    },
    // Collection access / mutation
    BuiltinFunc {
        name: "get",
        params: &[SemType::Any, SemType::Any],
        ret: SemType::Any,
        py_name: "ago_get",
    },
    BuiltinFunc {
        name: "set",
        params: &[SemType::Any, SemType::Any, SemType::Any],
        ret: SemType::Null,
        py_name: "ago_set",
    },
    BuiltinFunc {
        name: "insero",
        params: &[SemType::Any, SemType::Any, SemType::Any],
        ret: SemType::Null,
        py_name: "ago_insero",
    },
    BuiltinFunc {
        name: "removeo",
        params: &[SemType::Any, SemType::Any],
        ret: SemType::Any,
        py_name: "ago_removeo",
    },
    // Iteration
    BuiltinFunc {
        name: "into_iter",
        params: &[SemType::Any],
        ret: SemType::ListAny,
        py_name: "ago_into_iter",
    },
];

/// Look up a builtin by its Ago name
pub fn find(name: &str) -> Option<&'static BuiltinFunc> {
    BUILTINS.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, a) in BUILTINS.iter().enumerate() {
            for b in &BUILTINS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn find_resolves_dici() {
        let dici = find("dici").expect("dici should exist");
        assert_eq!(dici.params, &[SemType::Str]);
        assert_eq!(dici.ret, SemType::Null);
    }
}
