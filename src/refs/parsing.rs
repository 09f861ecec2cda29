//! Splits reference text into its segments using Pest.
use crate::identifiers::un_escape_identifier;
use pest::Parser;
use pest_derive::Parser;

/// Pest parser
///
/// Pest generates the `Rule` enum from the rule names in reference.pest.
#[derive(Parser)]
#[grammar = "refs/reference.pest"]
struct ReferenceParser;

/// Returns the un-escaped segments of a dotted reference, in order.
///
/// Dots inside quoted segments don't split: `"a.b".c` has two segments, `a.b` and `c`.
pub fn parse_segments(input: &str) -> Result<Vec<String>, crate::Error> {
    let pairs = ReferenceParser::parse(Rule::reference, input)?;

    let segments = pairs
        .flat_map(|reference| reference.into_inner())
        .filter_map(|segment| match segment.as_rule() {
            Rule::quoted_segment => Some(un_escape_identifier(segment.as_str())),
            Rule::bare_segment => Some(segment.as_str().to_owned()),
            // EOI
            _ => None,
        })
        .collect();

    Ok(segments)
}
