//! Stable diagnostic error codes for the Groovy incremental compilation core.
//!
//! Every [`CompilationError`](../groovy_compilation_result/struct.CompilationError.html)
//! carries an [`ErrorKind`] plus an optional [`ErrorCode`] assigned by pattern
//! matching against the driver's raw message text. Codes are stable across
//! releases so callers (diagnostics, quick fixes) can key behavior off them.
//!
//! # Code ranges
//!
//! | Range       | Kind     |
//! |-------------|----------|
//! | 1000-1999   | syntax   |
//! | 2000-2999   | semantic |
//! | 3000-3999   | type     |
//! | 4000-4999   | warning  |

use std::fmt;

/// The four error kinds a compilation diagnostic can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    Syntax,
    Semantic,
    Type,
    Warning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Semantic => "semantic",
            ErrorKind::Type => "type",
            ErrorKind::Warning => "warning",
        };
        f.write_str(name)
    }
}

/// Stable diagnostic code, one per recognized sub-pattern plus a "general"
/// fallback for each range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    // Syntax: 1000-1999
    SyntaxGeneral,
    UnexpectedToken,
    MissingParenthesis,
    UnclosedString,
    InvalidIdentifier,
    UnexpectedEof,
    InvalidExpression,

    // Semantic: 2000-2999
    SemanticGeneral,
    UndefinedVariable,
    DuplicateMethod,
    InvalidImport,
    MissingReturn,
    UnreachableCode,

    // Type: 3000-3999
    TypeGeneral,
    Mismatch,
    CannotResolve,
    IncompatibleCast,
    InvalidAssignment,
    UndefinedMethod,

    // Warning: 4000-4999
    WarningGeneral,
    UnusedVariable,
    DeprecatedMethod,
    DeadCode,
    UnnecessaryCast,
}

impl ErrorCode {
    /// The stable numeric code, within the range belonging to `self.kind()`.
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::SyntaxGeneral => 1000,
            ErrorCode::UnexpectedToken => 1001,
            ErrorCode::MissingParenthesis => 1002,
            ErrorCode::UnclosedString => 1003,
            ErrorCode::InvalidIdentifier => 1004,
            ErrorCode::UnexpectedEof => 1005,
            ErrorCode::InvalidExpression => 1006,

            ErrorCode::SemanticGeneral => 2000,
            ErrorCode::UndefinedVariable => 2001,
            ErrorCode::DuplicateMethod => 2002,
            ErrorCode::InvalidImport => 2003,
            ErrorCode::MissingReturn => 2004,
            ErrorCode::UnreachableCode => 2005,

            ErrorCode::TypeGeneral => 3000,
            ErrorCode::Mismatch => 3001,
            ErrorCode::CannotResolve => 3002,
            ErrorCode::IncompatibleCast => 3003,
            ErrorCode::InvalidAssignment => 3004,
            ErrorCode::UndefinedMethod => 3005,

            ErrorCode::WarningGeneral => 4000,
            ErrorCode::UnusedVariable => 4001,
            ErrorCode::DeprecatedMethod => 4002,
            ErrorCode::DeadCode => 4003,
            ErrorCode::UnnecessaryCast => 4004,
        }
    }

    /// The error kind this code belongs to, derived from its range.
    pub fn kind(self) -> ErrorKind {
        match self.code() {
            1000..=1999 => ErrorKind::Syntax,
            2000..=2999 => ErrorKind::Semantic,
            3000..=3999 => ErrorKind::Type,
            _ => ErrorKind::Warning,
        }
    }

    /// The "general" fallback code for a given kind's range.
    pub fn general_for(kind: ErrorKind) -> ErrorCode {
        match kind {
            ErrorKind::Syntax => ErrorCode::SyntaxGeneral,
            ErrorKind::Semantic => ErrorCode::SemanticGeneral,
            ErrorKind::Type => ErrorCode::TypeGeneral,
            ErrorKind::Warning => ErrorCode::WarningGeneral,
        }
    }

    /// Infer an [`ErrorCode`] from a raw compiler message, matching
    /// sub-patterns (case-insensitive) in priority order and falling back to
    /// the caller-supplied kind's general code when nothing matches.
    ///
    /// The patterns and their order are part of the stable mapping contract;
    /// changing the order can change which code a message receives when more
    /// than one substring matches.
    pub fn from_message(msg: &str, fallback_kind: ErrorKind) -> ErrorCode {
        let lower = msg.to_lowercase();

        if lower.contains("unexpected token") {
            return ErrorCode::UnexpectedToken;
        }
        if lower.contains("unable to resolve") || lower.contains("cannot resolve") {
            return ErrorCode::CannotResolve;
        }
        if lower.contains("cannot assign value of type") {
            return ErrorCode::InvalidAssignment;
        }
        if lower.contains("incompatible types") {
            return ErrorCode::Mismatch;
        }
        if lower.contains("no such property") {
            return ErrorCode::UndefinedVariable;
        }
        if lower.contains("is undeclared") {
            return ErrorCode::UndefinedVariable;
        }
        if lower.contains("already defined") {
            return ErrorCode::DuplicateMethod;
        }
        if lower.contains("missing return statement") {
            return ErrorCode::MissingReturn;
        }
        if lower.contains("unclosed string") {
            return ErrorCode::UnclosedString;
        }
        if lower.contains("unexpected end of file") {
            return ErrorCode::UnexpectedEof;
        }
        if lower.contains("unused variable") {
            return ErrorCode::UnusedVariable;
        }
        if lower.contains("deprecated") {
            return ErrorCode::DeprecatedMethod;
        }

        ErrorCode::general_for(fallback_kind)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_fall_in_documented_ranges() {
        assert_eq!(ErrorCode::SyntaxGeneral.kind(), ErrorKind::Syntax);
        assert_eq!(ErrorCode::SemanticGeneral.kind(), ErrorKind::Semantic);
        assert_eq!(ErrorCode::TypeGeneral.kind(), ErrorKind::Type);
        assert_eq!(ErrorCode::WarningGeneral.kind(), ErrorKind::Warning);
        assert_eq!(ErrorCode::UnexpectedToken.code(), 1001);
        assert_eq!(ErrorCode::UndefinedVariable.code(), 2001);
        assert_eq!(ErrorCode::CannotResolve.code(), 3002);
        assert_eq!(ErrorCode::UnusedVariable.code(), 4001);
    }

    #[test]
    fn from_message_matches_each_documented_pattern() {
        assert_eq!(
            ErrorCode::from_message("Unexpected token: ','", ErrorKind::Syntax),
            ErrorCode::UnexpectedToken
        );
        assert_eq!(
            ErrorCode::from_message("Unable to resolve class Foo", ErrorKind::Type),
            ErrorCode::CannotResolve
        );
        assert_eq!(
            ErrorCode::from_message("Cannot resolve symbol Bar", ErrorKind::Type),
            ErrorCode::CannotResolve
        );
        assert_eq!(
            ErrorCode::from_message("Cannot assign value of type String to int", ErrorKind::Type),
            ErrorCode::InvalidAssignment
        );
        assert_eq!(
            ErrorCode::from_message("incompatible types: found String", ErrorKind::Type),
            ErrorCode::Mismatch
        );
        assert_eq!(
            ErrorCode::from_message("No such property: foo", ErrorKind::Semantic),
            ErrorCode::UndefinedVariable
        );
        assert_eq!(
            ErrorCode::from_message("The variable x is undeclared", ErrorKind::Semantic),
            ErrorCode::UndefinedVariable
        );
        assert_eq!(
            ErrorCode::from_message("Method foo already defined", ErrorKind::Semantic),
            ErrorCode::DuplicateMethod
        );
        assert_eq!(
            ErrorCode::from_message("Missing return statement", ErrorKind::Semantic),
            ErrorCode::MissingReturn
        );
        assert_eq!(
            ErrorCode::from_message("Unclosed string literal", ErrorKind::Syntax),
            ErrorCode::UnclosedString
        );
        assert_eq!(
            ErrorCode::from_message("Unexpected end of file", ErrorKind::Syntax),
            ErrorCode::UnexpectedEof
        );
        assert_eq!(
            ErrorCode::from_message("Unused variable x", ErrorKind::Warning),
            ErrorCode::UnusedVariable
        );
        assert_eq!(
            ErrorCode::from_message("Method foo is deprecated", ErrorKind::Warning),
            ErrorCode::DeprecatedMethod
        );
    }

    #[test]
    fn from_message_falls_back_to_general() {
        assert_eq!(
            ErrorCode::from_message("something entirely unrecognized", ErrorKind::Syntax),
            ErrorCode::SyntaxGeneral
        );
        assert_eq!(
            ErrorCode::from_message("something entirely unrecognized", ErrorKind::Type),
            ErrorCode::TypeGeneral
        );
    }

    #[test]
    fn unexpected_token_takes_priority_over_later_patterns() {
        // "unexpected token" is checked before any later pattern even if both
        // substrings happen to appear in one message.
        let msg = "Unexpected token, deprecated syntax";
        assert_eq!(ErrorCode::from_message(msg, ErrorKind::Syntax), ErrorCode::UnexpectedToken);
    }
}
