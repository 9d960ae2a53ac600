//! Error codes for all compiler diagnostics.
//!
//! Each code is a unique identifier (e.g., `E2001`) with the first digit
//! indicating the compiler phase. Warnings use a `W` prefix so that the
//! severity is visible in the code itself.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Binder / type errors
/// - E4xxx / W4xxx: Flow analysis errors and warnings
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0005,
    /// Unterminated block comment
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type
    E1005,

    // Binder Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Invalid type in this position (e.g., `void` local)
    E2002,
    /// Unknown identifier or function
    E2003,
    /// Argument count mismatch
    E2004,
    /// Cannot infer type
    E2005,
    /// Duplicate definition
    E2006,
    /// Operator not defined for operand types
    E2007,
    /// Assignment target is not assignable
    E2008,
    /// Coalesce operand is not optional
    E2009,
    /// No common type for conditional arms
    E2010,
    /// Invalid cast
    E2011,
    /// `break` outside of a loop
    E2012,
    /// `continue` outside of a loop
    E2013,
    /// Constant division by zero
    E2014,
    /// `void` value used where a value is required
    E2015,
    /// Value returned from a `void` function
    E2016,
    /// Missing return value
    E2017,
    /// Condition is not `bool`
    E2018,
    /// Function name used as a value
    E2019,

    // Flow Analysis Errors (E4xxx)
    /// Not all paths return a value
    E4001,
    /// Use of a possibly unassigned local
    E4002,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,

    // Flow Analysis Warnings (W4xxx)
    /// Unreachable code
    W4003,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// Kept in sync with `as_str()` which is exhaustive (Rust match enforces it).
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    /// The `all_variants_classified` test catches any omission.
    pub const ALL: &[ErrorCode] = &[
        // Lexer
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0005,
        ErrorCode::E0006,
        // Parser
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        // Binder
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E2017,
        ErrorCode::E2018,
        ErrorCode::E2019,
        // Flow
        ErrorCode::E4001,
        ErrorCode::E4002,
        // Internal
        ErrorCode::E9001,
        ErrorCode::E9002,
        // Warnings
        ErrorCode::W4003,
    ];

    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            // Binder
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            // Flow
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            // Internal
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            // Warnings
            ErrorCode::W4003 => "W4003",
        }
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E0001
                | ErrorCode::E0002
                | ErrorCode::E0003
                | ErrorCode::E0005
                | ErrorCode::E0006
        )
    }

    /// Check if this is a parser/syntax error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
        )
    }

    /// Check if this is a binder error (E2xxx range).
    pub fn is_binder_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
                | ErrorCode::E2008
                | ErrorCode::E2009
                | ErrorCode::E2010
                | ErrorCode::E2011
                | ErrorCode::E2012
                | ErrorCode::E2013
                | ErrorCode::E2014
                | ErrorCode::E2015
                | ErrorCode::E2016
                | ErrorCode::E2017
                | ErrorCode::E2018
                | ErrorCode::E2019
        )
    }

    /// Check if this is a flow analysis error (E4xxx range).
    pub fn is_flow_error(&self) -> bool {
        matches!(self, ErrorCode::E4001 | ErrorCode::E4002)
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W4003)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
