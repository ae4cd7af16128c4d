//! The fixed reserved-identifier table consulted before any rename.
//!
//! Covers Lua 5.1: language keywords, the basic library, the standard
//! library modules and their members, metamethod names, and the implicit
//! identifiers (`self`, `arg`). The table is versioned and not extensible
//! at runtime.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Version tag of the reserved-identifier table.
pub const TABLE_VERSION: &str = "lua-5.1";

/// Every identifier a rename may neither target nor produce.
pub const RESERVED_IDENTIFIERS: &[&str] = &[
    // Keywords
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function",
    "if", "in", "local", "nil", "not", "or", "repeat", "return", "then",
    "true", "until", "while",
    // Basic library
    "_G", "_VERSION", "assert", "collectgarbage", "dofile", "error", "gcinfo",
    "getfenv", "getmetatable", "ipairs", "load", "loadfile", "loadstring",
    "module", "newproxy", "next", "pairs", "pcall", "print", "rawequal",
    "rawget", "rawset", "require", "select", "setfenv", "setmetatable",
    "tonumber", "tostring", "type", "unpack", "xpcall",
    // Standard library modules
    "coroutine", "string", "table", "math", "io", "os", "package", "debug",
    // coroutine
    "create", "resume", "running", "status", "wrap", "yield",
    // string
    "byte", "char", "dump", "find", "format", "gmatch", "gsub", "len",
    "lower", "match", "rep", "reverse", "sub", "upper",
    // table
    "concat", "foreach", "foreachi", "getn", "insert", "maxn", "remove",
    "setn", "sort",
    // math
    "abs", "acos", "asin", "atan", "atan2", "ceil", "cos", "cosh", "deg",
    "exp", "floor", "fmod", "frexp", "huge", "ldexp", "log", "log10", "max",
    "min", "modf", "pi", "pow", "rad", "random", "randomseed", "sin", "sinh",
    "sqrt", "tan", "tanh",
    // io and file methods
    "close", "flush", "input", "lines", "open", "output", "popen", "read",
    "seek", "setvbuf", "stderr", "stdin", "stdout", "tmpfile", "write",
    // os
    "clock", "date", "difftime", "execute", "exit", "getenv", "rename",
    "setlocale", "time", "tmpname",
    // package
    "cpath", "loaded", "loaders", "loadlib", "path", "preload", "seeall",
    // debug
    "gethook", "getinfo", "getlocal", "getregistry", "getupvalue", "sethook",
    "setlocal", "setupvalue", "traceback",
    // Metamethod names
    "__add", "__call", "__concat", "__div", "__eq", "__gc", "__index",
    "__le", "__len", "__lt", "__metatable", "__mod", "__mode", "__mul",
    "__newindex", "__pow", "__sub", "__tostring", "__unm",
    // Implicit identifiers
    "self", "arg",
];

static RESERVED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_IDENTIFIERS.iter().copied().collect());

/// Whether `name` collides with a built-in identifier.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_SET.contains(name)
}

/// Whether `name` is a language keyword (a subset of the reserved table).
pub fn is_keyword(name: &str) -> bool {
    matches!(
        name,
        "and" | "break" | "do" | "else" | "elseif" | "end" | "false" | "for"
            | "function" | "if" | "in" | "local" | "nil" | "not" | "or"
            | "repeat" | "return" | "then" | "true" | "until" | "while"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_builtins_are_reserved() {
        assert!(is_reserved("local"));
        assert!(is_reserved("print"));
        assert!(is_reserved("gsub"));
        assert!(is_reserved("__index"));
    }

    #[test]
    fn ordinary_names_are_not_reserved() {
        assert!(!is_reserved("counter"));
        assert!(!is_reserved("myTable"));
        assert!(!is_reserved("printx"));
    }

    #[test]
    fn keywords_are_a_subset_of_reserved() {
        assert!(is_keyword("while"));
        assert!(is_reserved("while"));
        assert!(!is_keyword("print"));
    }

    #[test]
    fn table_has_no_duplicates() {
        let set: HashSet<_> = RESERVED_IDENTIFIERS.iter().collect();
        assert_eq!(set.len(), RESERVED_IDENTIFIERS.len());
    }
}
