use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SedError {
    /// Missing `s/` prefix or replacement field.
    #[error("invalid sed expression: {0}")]
    InvalidExpression(&'static str),
    /// The pattern field is not a valid regex.
    #[error("invalid regex pattern: {0}")]
    InvalidPattern(String),
}

/// A single `s/PATTERN/REPLACEMENT/FLAGS` substitution.
///
/// Fields are split on a fixed `/` with no escaping, so a `/` inside the
/// pattern or the replacement shifts every later field.
#[derive(Debug, Clone)]
pub struct SedExpression {
    pub pattern: Regex,
    pub replacement: String,
    pub global: bool,
    template: String,
}

impl SedExpression {
    /// Applies the substitution to a file name.
    ///
    /// Capture references in the replacement expand in both modes. Without the
    /// `g` flag only the first match is touched.
    pub fn apply(&self, name: &str) -> String {
        let template = self.template.as_str();
        if self.global {
            self.pattern.replace_all(name, template).into_owned()
        } else {
            self.pattern.replace(name, template).into_owned()
        }
    }
}

pub fn parse_sed_expression(expr: &str) -> Result<SedExpression, SedError> {
    let Some(rest) = expr.strip_prefix("s/") else {
        return Err(SedError::InvalidExpression("must start with 's/'"));
    };

    let fields: Vec<&str> = rest.split('/').collect();
    // An empty replacement is rejected even though it would mean "delete".
    if fields.len() < 2 || fields[1].is_empty() {
        return Err(SedError::InvalidExpression("missing replacement"));
    }

    let global = fields.get(2).is_some_and(|flags| flags.contains('g'));
    let pattern = Regex::new(fields[0]).map_err(|err| SedError::InvalidPattern(err.to_string()))?;
    let replacement = fields[1].to_string();

    Ok(SedExpression {
        pattern,
        template: expand_sed_references(&replacement),
        replacement,
        global,
    })
}

/// Rewrites sed-style references into regex replacement syntax.
///
/// - `\1`..`\9` → `${1}`..`${9}`
/// - `\&` → `${0}`
/// - `\\` → `\`
///
/// `$1`, `${1}` and `$name` pass through untouched; `$$` is a literal `$`.
fn expand_sed_references(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some(digit) if digit.is_ascii_digit() => {
                chars.next();
                out.push_str("${");
                out.push(digit);
                out.push('}');
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            _ => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_only_expression() {
        let expr = parse_sed_expression("s/old/new/").expect("must parse");
        assert_eq!(expr.pattern.as_str(), "old");
        assert_eq!(expr.replacement, "new");
        assert!(!expr.global);
    }

    #[test]
    fn parses_global_flag() {
        let expr = parse_sed_expression("s/old/new/g").expect("must parse");
        assert!(expr.global);
    }

    #[test]
    fn missing_flags_field_is_first_only() {
        let expr = parse_sed_expression("s/old/new").expect("must parse");
        assert_eq!(expr.replacement, "new");
        assert!(!expr.global);
    }

    #[test]
    fn keeps_capture_reference_literally_in_replacement() {
        let expr = parse_sed_expression("s/(.+)/prefix_$1/").expect("must parse");
        assert_eq!(expr.pattern.as_str(), "(.+)");
        assert_eq!(expr.replacement, "prefix_$1");
        assert_eq!(expr.apply("photo.jpg"), "prefix_photo.jpg");
    }

    #[test]
    fn rejects_missing_prefix() {
        let err = parse_sed_expression("invalid").expect_err("must fail");
        assert_eq!(err, SedError::InvalidExpression("must start with 's/'"));
    }

    #[test]
    fn rejects_missing_replacement() {
        let err = parse_sed_expression("s/old/").expect_err("must fail");
        assert_eq!(err, SedError::InvalidExpression("missing replacement"));

        let err = parse_sed_expression("s/old").expect_err("must fail");
        assert_eq!(err, SedError::InvalidExpression("missing replacement"));
    }

    #[test]
    fn rejects_empty_replacement_even_though_it_could_mean_delete() {
        let err = parse_sed_expression("s/old//").expect_err("empty replacement is rejected");
        assert_eq!(err, SedError::InvalidExpression("missing replacement"));
    }

    #[test]
    fn rejects_invalid_regex() {
        let err = parse_sed_expression("s/(unclosed/x/").expect_err("must fail");
        assert!(matches!(err, SedError::InvalidPattern(_)));
        assert!(err.to_string().starts_with("invalid regex pattern:"));
    }

    #[test]
    fn ignores_unknown_flags() {
        let expr = parse_sed_expression("s/a/b/ixg").expect("must parse");
        assert!(expr.global);
        let expr = parse_sed_expression("s/a/b/iz").expect("must parse");
        assert!(!expr.global);
    }

    #[test]
    fn slash_inside_pattern_shifts_fields() {
        let expr = parse_sed_expression("s/a/b/c/g").expect("must parse");
        assert_eq!(expr.pattern.as_str(), "a");
        assert_eq!(expr.replacement, "b");
        assert!(!expr.global, "third field is 'c', the 'g' lands in a fourth field");
    }

    #[test]
    fn first_only_leaves_later_matches() {
        let expr = parse_sed_expression("s/a/X/").expect("must parse");
        assert_eq!(expr.apply("banana"), "bXnana");
    }

    #[test]
    fn global_replaces_every_match() {
        let expr = parse_sed_expression("s/a/X/g").expect("must parse");
        assert_eq!(expr.apply("banana"), "bXnXnX");
    }

    #[test]
    fn no_match_returns_input() {
        let expr = parse_sed_expression("s/zzz/X/g").expect("must parse");
        assert_eq!(expr.apply("banana"), "banana");
    }

    #[test]
    fn anchored_empty_match_prepends() {
        let expr = parse_sed_expression("s/^/vacation_/").expect("must parse");
        assert_eq!(expr.apply("beach.jpg"), "vacation_beach.jpg");
    }

    #[test]
    fn sed_style_backreferences_expand() {
        let expr = parse_sed_expression(r"s/(\w+)-(\w+)/\2-\1/").expect("must parse");
        assert_eq!(expr.apply("left-right.txt"), "right-left.txt");

        let expr = parse_sed_expression(r"s/img/[\&]/").expect("must parse");
        assert_eq!(expr.apply("img01.png"), "[img]01.png");
    }

    #[test]
    fn backslash_digit_does_not_swallow_following_text() {
        assert_eq!(expand_sed_references(r"\1abc"), "${1}abc");
        assert_eq!(expand_sed_references(r"a\\b"), r"a\b");
        assert_eq!(expand_sed_references(r"tail\"), r"tail\");
    }

    #[test]
    fn doubled_dollar_is_literal() {
        let expr = parse_sed_expression("s/price/$$5/").expect("must parse");
        assert_eq!(expr.apply("price.txt"), "$5.txt");
    }

    #[test]
    fn dollar_references_expand_in_both_modes() {
        let global = parse_sed_expression("s/(.+)/prefix_$1/g").expect("must parse");
        assert_eq!(global.apply("photo.jpg"), "prefix_photo.jpg");

        let named =
            parse_sed_expression(r"s/(?P<stem>\w+)\.jpg/${stem}_x.jpg/").expect("must parse");
        assert_eq!(named.apply("beach.jpg"), "beach_x.jpg");
    }
}
