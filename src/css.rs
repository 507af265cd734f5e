//! Policy scanner for the stylesheets inside `<style>` elements.
//!
//! We don't parse stylesheets into rules here; we just run them through the
//! `cssparser` tokenizer and look at each token, descending into `{}`, `()` and `[]`
//! blocks.  Three kinds of token are rejected:
//!
//! * `url(...)` with a `//` in it, which could fetch a remote resource.  Local
//!   references like `fill: url(#gradient)` are fine.
//!
//! * The `@import` at-rule, which fetches another stylesheet.
//!
//! * Any function call, like `expression(...)` in old versions of Internet Explorer.
//!   Note that `cssparser` tokenizes a quoted `url("...")` as a function call, so
//!   that form is rejected as well.
//!
//! Everything else goes through without inspection.

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::error::ValidationError;
use crate::limits;
use crate::registry::ContentValidator;

/// Content validator for `<style>` elements.
#[derive(Debug, Copy, Clone)]
pub struct StyleValidator {
    max_nesting: usize,
}

impl Default for StyleValidator {
    fn default() -> StyleValidator {
        StyleValidator {
            max_nesting: limits::MAX_CSS_NESTING,
        }
    }
}

impl StyleValidator {
    /// Creates a validator that rejects stylesheets with blocks nested deeper than
    /// `max_nesting`.
    pub fn with_max_nesting(max_nesting: usize) -> StyleValidator {
        StyleValidator { max_nesting }
    }
}

impl ContentValidator for StyleValidator {
    fn validate(&self, content: &str) -> Result<(), ValidationError> {
        scan_stylesheet(content, self.max_nesting)
    }
}

/// Checks a stylesheet with the default nesting limit.
///
/// ```
/// use safesvg::validate_style;
///
/// assert!(validate_style(".a { fill: url(#grad); }").is_ok());
/// assert!(validate_style("@import 'evil.css';").is_err());
/// ```
pub fn validate_style(css: &str) -> Result<(), ValidationError> {
    StyleValidator::default().validate(css)
}

fn scan_stylesheet(css: &str, max_nesting: usize) -> Result<(), ValidationError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    scan_tokens(&mut parser, 0, max_nesting).map_err(|e| match e.kind {
        ParseErrorKind::Custom(err) => err,

        // We consume every block to the end, so cssparser has nothing to complain
        // about; if it ever does, refuse the stylesheet.
        ParseErrorKind::Basic(_) => {
            ValidationError::UnallowedCssAttributeValue("unparseable stylesheet".to_string())
        }
    })
}

fn scan_tokens<'i>(
    parser: &mut Parser<'i, '_>,
    depth: usize,
    max_nesting: usize,
) -> Result<(), ParseError<'i, ValidationError>> {
    loop {
        // The only error from the tokenizer is end of input.
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };

        match token {
            Token::UnquotedUrl(ref url) if url.contains("//") => {
                return Err(parser.new_custom_error(ValidationError::UnallowedCssAttributeValue(
                    format!("url({})", &**url),
                )));
            }

            Token::BadUrl(ref url) => {
                return Err(parser.new_custom_error(ValidationError::UnallowedCssAttributeValue(
                    format!("url({})", &**url),
                )));
            }

            Token::AtKeyword(ref name) if name.eq_ignore_ascii_case("import") => {
                return Err(parser.new_custom_error(ValidationError::UnallowedCssAttribute(
                    format!("@{}", &**name),
                )));
            }

            Token::Function(ref name) => {
                return Err(parser.new_custom_error(ValidationError::UnallowedCssAttributeValue(
                    format!("{}(", &**name),
                )));
            }

            Token::CurlyBracketBlock | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                if depth >= max_nesting {
                    return Err(parser.new_custom_error(
                        ValidationError::UnallowedCssAttributeValue(format!(
                            "blocks nested more than {} levels deep",
                            max_nesting
                        )),
                    ));
                }

                parser.parse_nested_block(|p| scan_tokens(p, depth + 1, max_nesting))?;
            }

            _ => (),
        }
    }
}
