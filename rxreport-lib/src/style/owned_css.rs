// Owned representation of the identifier-keyed stylesheets emitted by table stylers.
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OwnedStylesheet {
    pub rules: Vec<OwnedRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRule {
    /// e.g. "#T_abc_row0_col0", in source order.
    pub selectors: Vec<Selector>,
    /// Each declaration is property => value, e.g. "color" => "red".
    pub declarations: Vec<OwnedDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#foo`, holding `foo`.
    Id(String),
    /// Anything else: class, tag, compound and combinator selectors.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDeclaration {
    pub property: String,
    pub value: String,
}

/// Something the lenient pipeline stepped over instead of failing on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    /// A rule body without `{`.
    MalformedRule(String),
    /// A declaration without `:`.
    MalformedDeclaration(String),
    /// A selector that is not a plain identifier.
    UnsupportedSelector(String),
    /// An identifier no element carries.
    UnresolvedSelector(String),
}

impl Selector {
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('#') {
            Some(id) if !id.is_empty() => Selector::Id(id.to_string()),
            _ => Selector::Unsupported(text.to_string()),
        }
    }
}

impl OwnedDeclaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        OwnedDeclaration {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Unsupported(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for OwnedDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}

impl fmt::Display for OwnedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selectors: Vec<String> = self.selectors.iter().map(ToString::to_string).collect();
        writeln!(f, "{} {{", selectors.join(", "))?;
        for decl in &self.declarations {
            writeln!(f, "  {}", decl)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skipped::MalformedRule(text) => write!(f, "malformed rule \"{}\"", text),
            Skipped::MalformedDeclaration(text) => {
                write!(f, "malformed declaration \"{}\"", text)
            }
            Skipped::UnsupportedSelector(text) => write!(f, "unsupported selector \"{}\"", text),
            Skipped::UnresolvedSelector(text) => write!(f, "no element matches \"{}\"", text),
        }
    }
}
