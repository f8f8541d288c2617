//! Text module: tokenization and word classification
//!
//! Everything here is pure. Given raw page or anchor text, the tokenizer
//! produces the words to index together with their native-script
//! classification and their position within the text.

mod script;
mod tokenizer;

pub use script::ScriptRange;
pub use tokenizer::{is_punctuation, tokenize, tokenize_with, Token, Tokens};
