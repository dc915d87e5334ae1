//! Parser for the flat, identifier-keyed CSS found in table-styler output.
//!
//! This is deliberately not a general CSS parser. A stylesheet is split on
//! `}` into rule bodies, each body on its first `{` into a selector list and a
//! declaration list. Nothing is nested, nothing is normalised: values are kept
//! exactly as written, so they land in `style` attributes untouched.
//!
//! What happens to input that does not fit that shape is governed by
//! [`CssMode`]; the lenient mode records what it dropped instead of failing.

use crate::style::owned_css::{OwnedDeclaration, OwnedRule, OwnedStylesheet, Selector, Skipped};
use crate::{Error, Result};

/// How malformed rules and declarations are treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CssMode {
    /// Skip them and record a [`Skipped`] entry.
    #[default]
    Lenient,
    /// Fail with [`Error::MalformedRule`] or [`Error::MalformedDeclaration`].
    Strict,
}

/// A stylesheet together with everything that was stepped over while parsing it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedStylesheet {
    pub stylesheet: OwnedStylesheet,
    pub skipped: Vec<Skipped>,
}

pub fn parse_stylesheet(css_text: &str, mode: CssMode) -> Result<ParsedStylesheet> {
    let mut parsed = ParsedStylesheet::default();

    for body in css_text.split('}') {
        let body = body.trim();
        if body.is_empty() {
            continue;
        }

        let Some((selector_part, declaration_part)) = body.split_once('{') else {
            reject(
                mode,
                &mut parsed.skipped,
                Skipped::MalformedRule(body.to_string()),
                Error::MalformedRule(body.to_string()),
            )?;
            continue;
        };

        let selectors = selector_part
            .split(',')
            .map(str::trim)
            .filter(|sel| !sel.is_empty())
            .map(Selector::parse)
            .collect();
        let declarations = parse_declarations(declaration_part, mode, &mut parsed.skipped)?;

        parsed.stylesheet.rules.push(OwnedRule {
            selectors,
            declarations,
        });
    }

    Ok(parsed)
}

/// Parses a `;`-separated declaration list such as `color: red; top: 0;`.
///
/// A property repeated within one list keeps its first position and takes
/// the last value.
pub fn parse_declarations(
    declaration_part: &str,
    mode: CssMode,
    skipped: &mut Vec<Skipped>,
) -> Result<Vec<OwnedDeclaration>> {
    let mut declarations: Vec<OwnedDeclaration> = Vec::new();

    let declaration_part = declaration_part.trim().trim_end_matches(';');
    for decl in declaration_part
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
    {
        let Some((property, value)) = decl.split_once(':') else {
            reject(
                mode,
                skipped,
                Skipped::MalformedDeclaration(decl.to_string()),
                Error::MalformedDeclaration(decl.to_string()),
            )?;
            continue;
        };
        let (property, value) = (property.trim(), value.trim());

        match declarations.iter_mut().find(|d| d.property == property) {
            Some(existing) => existing.value = value.to_string(),
            None => declarations.push(OwnedDeclaration::new(property, value)),
        }
    }

    Ok(declarations)
}

fn reject(mode: CssMode, skipped: &mut Vec<Skipped>, entry: Skipped, error: Error) -> Result<()> {
    match mode {
        CssMode::Strict => Err(error),
        CssMode::Lenient => {
            log::debug!("skipping {}", entry);
            skipped.push(entry);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decl(property: &str, value: &str) -> OwnedDeclaration {
        OwnedDeclaration::new(property, value)
    }

    #[test]
    fn parses_styler_output() {
        let css = "
#T_1_row0_col0, #T_1_row1_col1 {
  background-color: #053061;
  color: #f1f1f1;
}
#T_1_row0_col1 {
  background-color: #f7f7f7;
  color: #000000;
}
";
        let parsed = parse_stylesheet(css, CssMode::Lenient).unwrap();
        assert!(parsed.skipped.is_empty());
        assert_eq!(
            parsed.stylesheet.rules,
            vec![
                OwnedRule {
                    selectors: vec![
                        Selector::Id("T_1_row0_col0".into()),
                        Selector::Id("T_1_row1_col1".into()),
                    ],
                    declarations: vec![
                        decl("background-color", "#053061"),
                        decl("color", "#f1f1f1"),
                    ],
                },
                OwnedRule {
                    selectors: vec![Selector::Id("T_1_row0_col1".into())],
                    declarations: vec![
                        decl("background-color", "#f7f7f7"),
                        decl("color", "#000000"),
                    ],
                },
            ]
        );
    }

    #[test]
    fn values_keep_their_colons() {
        let parsed = parse_stylesheet("#a { background: url(http://x/y.png); }", CssMode::Lenient)
            .unwrap();
        assert_eq!(
            parsed.stylesheet.rules[0].declarations,
            vec![decl("background", "url(http://x/y.png)")]
        );
    }

    #[test]
    fn lenient_mode_records_skips() {
        let parsed = parse_stylesheet(
            "stray text } #a { justcolor; color: red;; } , { top: 0 }",
            CssMode::Lenient,
        )
        .unwrap();
        assert_eq!(
            parsed.skipped,
            vec![
                Skipped::MalformedRule("stray text".into()),
                Skipped::MalformedDeclaration("justcolor".into()),
            ]
        );
        assert_eq!(parsed.stylesheet.rules.len(), 2);
        assert_eq!(parsed.stylesheet.rules[0].declarations, vec![decl("color", "red")]);
        assert!(parsed.stylesheet.rules[1].selectors.is_empty());
    }

    #[test]
    fn strict_mode_fails_on_first_problem() {
        let err = parse_stylesheet("#a { color: red } oops", CssMode::Strict).unwrap_err();
        assert!(matches!(err, Error::MalformedRule(ref body) if body == "oops"));

        let err = parse_stylesheet("#a { color }", CssMode::Strict).unwrap_err();
        assert!(matches!(err, Error::MalformedDeclaration(ref decl) if decl == "color"));
    }

    #[test]
    fn repeated_property_in_one_rule_keeps_last_value() {
        let parsed =
            parse_stylesheet("#a { color: red; top: 0; color: blue }", CssMode::Lenient).unwrap();
        assert_eq!(
            parsed.stylesheet.rules[0].declarations,
            vec![decl("color", "blue"), decl("top", "0")]
        );
    }
}
