use crate::style::owned_css::OwnedDeclaration;
use std::fmt;

/// How incoming declarations are combined with an element's existing `style`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Treat the existing value as an opaque string and append every
    /// declaration, repeated properties included.
    Append,
    /// Keep an ordered property map: a repeated property is overwritten in
    /// place, a new one goes to the end.
    #[default]
    Override,
}

/// Ordered property map backing an element's `style` attribute.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<OwnedDeclaration>,
}

impl InlineStyle {
    /// Reads an existing `style` attribute. Entries without `:` are dropped.
    ///
    /// `;` only separates entries outside quotes and parentheses, so values
    /// such as `url(data:image/png;base64,...)` or `"a;b"` survive intact.
    pub fn parse(style_attr: &str) -> Self {
        let mut style = InlineStyle::default();
        for entry in split_entries(style_attr) {
            let Some((property, value)) = entry.split_once(':') else {
                log::debug!("dropping inline style entry {:?}", entry);
                continue;
            };
            style.set(property.trim(), value.trim());
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|decl| decl.property == property)
            .map(|decl| decl.value.as_str())
    }

    pub fn set(&mut self, property: &str, value: &str) {
        match self
            .declarations
            .iter_mut()
            .find(|decl| decl.property == property)
        {
            Some(decl) => decl.value = value.to_string(),
            None => self
                .declarations
                .push(OwnedDeclaration::new(property, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Splits on `;` at the top level, honouring quotes (with `\\` escapes) and
/// parenthesis nesting. Empty entries are dropped.
fn split_entries(text: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                entries.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&text[start..]);

    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, decl) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", decl)?;
        }
        Ok(())
    }
}

impl MergePolicy {
    /// Returns the new `style` value for an element whose current value is
    /// `existing` after receiving `declarations`.
    pub fn merge(self, existing: Option<&str>, declarations: &[OwnedDeclaration]) -> String {
        match self {
            MergePolicy::Append => {
                let mut style = existing.unwrap_or_default().to_string();
                for decl in declarations {
                    style.push_str(&format!("{}: {}; ", decl.property, decl.value));
                }
                style.trim_end().to_string()
            }
            MergePolicy::Override => {
                let mut style = existing.map(InlineStyle::parse).unwrap_or_default();
                for decl in declarations {
                    style.set(&decl.property, &decl.value);
                }
                style.to_string()
            }
        }
    }
}
