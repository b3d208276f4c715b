//! Pre-binary ASCII command lines and the heuristic classifier used for
//! frames whose type byte is not recognized.

pub mod grammar;
pub mod heuristic;

pub use grammar::{parse_token, tokenize_line, GrammarError, LegacyToken};
pub use heuristic::{classify_payload, is_printable_text, PayloadClass};
