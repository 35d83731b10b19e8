//! Lexical front end for the Lox scripting language.
//!
//! ```
//! use lox::{Scanner, TokenKind};
//!
//! let tokens = Scanner::new("print 1 + 2;").scan().unwrap();
//! assert_eq!(TokenKind::Print, tokens[0].kind());
//! assert_eq!(TokenKind::Eof, tokens.last().unwrap().kind());
//! ```

pub mod error;
pub mod lang;
pub mod scanner;

pub use error::{ConsoleReporter, LexicalError, LoxError, Reporter};
pub use lang::{Literal, Token, TokenKind};
pub use scanner::Scanner;
