/// Tokenizers for the languages wpsec analyzes.
///
/// Each language lives in its own module exposing a `parse_<language>`
/// function that produces the token IR consumed by the engine.
pub mod php;
pub use php::{parse_php, tokenize_php};
