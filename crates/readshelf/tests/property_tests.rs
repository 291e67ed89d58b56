//! Property-based tests for the Goodreads scanner.
//!
//! These verify the tokenizer's documented invariants under random input:
//! field counts are driven only by unquoted commas, content survives
//! tokenization, and nothing panics on arbitrary text.

use proptest::prelude::*;

use readshelf::{parse_export, split_fields};

/// Field content with no commas or quotes.
fn plain_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .;:!-]{0,20}"
}

proptest! {
    #[test]
    fn field_count_matches_unquoted_commas(fields in prop::collection::vec(plain_field(), 1..10)) {
        let line = fields.join(",");
        prop_assert_eq!(split_fields(&line).len(), fields.len());
    }

    #[test]
    fn quoting_a_comma_does_not_change_field_count(
        before in plain_field(),
        inner_a in plain_field(),
        inner_b in plain_field(),
        after in plain_field(),
    ) {
        // One quoted field containing a comma still reads as one field.
        let line = format!("{},\"{},{}\",{}", before, inner_a, inner_b, after);
        prop_assert_eq!(split_fields(&line).len(), 3);
    }

    #[test]
    fn split_then_join_is_lossless_without_quotes(fields in prop::collection::vec(plain_field(), 1..10)) {
        let line = fields.join(",");
        prop_assert_eq!(split_fields(&line).join(","), line);
    }

    #[test]
    fn tokenizer_never_panics(line in "\\PC{0,200}") {
        let _ = split_fields(&line);
    }

    #[test]
    fn parser_never_panics(text in "\\PC{0,400}") {
        // Arbitrary text either parses or returns an error; never a panic.
        let _ = parse_export(&text);
    }
}
