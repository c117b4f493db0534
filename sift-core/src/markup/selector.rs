//! A small CSS selector subset
//!
//! Supports `tag`, `.class`, `#id`, `[attr]`, `[attr="value"]` and `*`
//! compounds joined by descendant (whitespace) or child (`>`) combinators,
//! with `,` separating alternatives.

use std::fmt;

use super::ElementRef;
use crate::error::{Result, SiftError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, el: ElementRef<'_>) -> bool {
        if let Some(tag) = &self.tag {
            if el.name() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(expected) => el.attr(name) == Some(expected.as_str()),
            None => el.attr(name).is_some(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<Compound>,
    // combinators[i] joins parts[i] and parts[i + 1]
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, el: ElementRef<'_>) -> bool {
        self.matches_at(el, self.parts.len() - 1)
    }

    fn matches_at(&self, el: ElementRef<'_>, index: usize) -> bool {
        if !self.parts[index].matches(el) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => el
                .parent()
                .is_some_and(|parent| self.matches_at(parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = el.parent();
                while let Some(current) = ancestor {
                    if self.matches_at(current, index - 1) {
                        return true;
                    }
                    ancestor = current.parent();
                }
                false
            }
        }
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let mut groups = Vec::new();
        for group in split_groups(input) {
            let group = group.trim();
            if group.is_empty() {
                return Err(SiftError::selector(input, "empty selector"));
            }
            let complex = parse_complex(group).map_err(|reason| SiftError::selector(input, reason))?;
            groups.push(complex);
        }

        Ok(Self {
            source: input.trim().to_string(),
            groups,
        })
    }

    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        self.groups.iter().any(|group| group.matches(el))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split a selector list on commas outside attribute brackets and quotes
fn split_groups(input: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut in_brackets = false;

    for (index, c) in input.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                groups.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    groups.push(&input[start..]);
    groups
}

fn parse_complex(input: &str) -> std::result::Result<Complex, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut parts = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            if !parts.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            i += 1;
            continue;
        }
        if c == '>' {
            if parts.is_empty() {
                return Err("selector cannot start with '>'".to_string());
            }
            pending = Some(Combinator::Child);
            i += 1;
            continue;
        }

        let (compound, next) = parse_compound(&chars, i)?;
        if !parts.is_empty() {
            combinators.push(pending.take().ok_or("missing combinator")?);
        }
        parts.push(compound);
        i = next;
    }

    if pending.is_some() {
        return Err("selector ends with a combinator".to_string());
    }
    if parts.is_empty() {
        return Err("empty selector".to_string());
    }

    Ok(Complex { parts, combinators })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn parse_compound(chars: &[char], start: usize) -> std::result::Result<(Compound, usize), String> {
    let mut compound = Compound::default();
    let mut i = start;

    if chars[i] == '*' {
        i += 1;
    } else if is_ident_char(chars[i]) {
        let (tag, next) = read_ident(chars, i);
        compound.tag = Some(tag.to_ascii_lowercase());
        i = next;
    }

    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '>' {
        match chars[i] {
            '.' => {
                let (class, next) = read_ident(chars, i + 1);
                if class.is_empty() {
                    return Err("expected class name after '.'".to_string());
                }
                compound.classes.push(class);
                i = next;
            }
            '#' => {
                let (id, next) = read_ident(chars, i + 1);
                if id.is_empty() {
                    return Err("expected id after '#'".to_string());
                }
                compound.id = Some(id);
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == ']')
                    .ok_or("unterminated attribute selector")?;
                let body: String = chars[i + 1..i + close].iter().collect();
                compound.attrs.push(parse_attr(&body)?);
                i += close + 1;
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    if compound == Compound::default() && chars[start] != '*' {
        return Err("empty compound selector".to_string());
    }

    Ok((compound, i))
}

fn parse_attr(body: &str) -> std::result::Result<(String, Option<String>), String> {
    match body.split_once('=') {
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err("attribute selector without a name".to_string());
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Ok((name.to_ascii_lowercase(), Some(value.to_string())))
        }
        None => {
            let name = body.trim();
            if name.is_empty() {
                return Err("attribute selector without a name".to_string());
            }
            Ok((name.to_ascii_lowercase(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Document;

    const PAGE: &str = r#"
<div class="all-plugins">
  <ul class="plugin-list">
    <li class="plugin" id="first"><h3 class="name"><a href="/acme">Acme</a></h3></li>
    <li class="plugin"><div><h3 class="name"><a href="/foo">Foo</a></h3></div></li>
  </ul>
</div>
<div class="pagination-container top"></div>
<div class="pagination-container bottom"></div>
"#;

    fn names(doc: &Document, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector).iter().map(|el| el.text()).collect()
    }

    #[test]
    fn test_descendant_and_child_combinators() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(names(&doc, "div.all-plugins ul > li.plugin").len(), 2);
        assert_eq!(names(&doc, "li > h3.name > a"), vec!["Acme"]);
        assert_eq!(names(&doc, "li h3.name > a"), vec!["Acme", "Foo"]);
    }

    #[test]
    fn test_groups_keep_document_order() {
        let doc = Document::parse(PAGE).unwrap();
        let selector = Selector::parse(".bottom, .top").unwrap();
        let found = doc.select(&selector);
        assert_eq!(found.len(), 2);
        assert!(found[0].has_class("top"));
    }

    #[test]
    fn test_id_and_attribute_compounds() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(names(&doc, "#first a"), vec!["Acme"]);
        assert_eq!(names(&doc, r#"a[href="/foo"]"#), vec!["Foo"]);
        assert_eq!(names(&doc, "a[href]").len(), 2);
    }

    #[test]
    fn test_comma_inside_attribute_value() {
        let doc = Document::parse(r#"<p data-x="a,b">one</p><p data-x="a">two</p><b>three</b>"#).unwrap();
        assert_eq!(names(&doc, r#"p[data-x="a,b"]"#), vec!["one"]);
        assert_eq!(names(&doc, r#"[data-x='a,b'], b"#), vec!["one", "three"]);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("> li").is_err());
        assert!(Selector::parse("ul >").is_err());
        assert!(Selector::parse("li.").is_err());
        assert!(Selector::parse("a, ").is_err());
        assert!(Selector::parse("a[href").is_err());
    }
}
