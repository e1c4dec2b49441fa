//! Coffee bean artwork
//!
//! One template is parsed once; every bean gets its own styled copy with
//! stroke widths scaled to the bean's size.

use std::fmt::Write;

use crate::error::BeanError;

/// Default artwork: 200x250 bean outline plus the centre crease
pub const COFFEE_BEAN_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="250" viewBox="0 0 200 250">
  <path d="M100 10 C150 10, 180 70, 180 125 C180 180, 150 240, 100 240
          C50 240, 20 180, 20 125 C20 70, 50 10, 100 10 Z"/>
  <path d="M100 30 C120 60, 80 90, 100 125 C120 160, 80 190, 100 220"/>
</svg>"#;

/// Parsed artwork
#[derive(Debug, Clone, PartialEq)]
pub enum BeanArt {
    /// Path outlines (`d` data), first is the body, the rest are details
    Paths(Vec<String>),
    /// Template markup used verbatim when it could not be parsed
    Raw(String),
}

impl Default for BeanArt {
    fn default() -> Self {
        Self::from_template(COFFEE_BEAN_SVG)
    }
}

impl BeanArt {
    /// Extract path data from an `<svg>` template
    pub fn parse(template: &str) -> Result<Self, BeanError> {
        let template = template.trim();
        if !template.starts_with("<svg") {
            return Err(BeanError::Template("missing <svg> root".into()));
        }
        if !template.ends_with("</svg>") {
            return Err(BeanError::Template("unterminated <svg> root".into()));
        }

        let mut paths = Vec::new();
        let mut rest = template;
        while let Some(start) = rest.find("<path") {
            let tag = &rest[start..];
            let end = tag
                .find('>')
                .ok_or_else(|| BeanError::Template("unterminated <path> tag".into()))?;
            let d = attribute(&tag[..end], "d")
                .ok_or_else(|| BeanError::Template("<path> without d attribute".into()))?;
            paths.push(normalize_whitespace(d));
            rest = &tag[end + 1..];
        }

        if paths.is_empty() {
            return Err(BeanError::Template("no <path> elements".into()));
        }
        Ok(Self::Paths(paths))
    }

    /// Parse, falling back to the raw markup without per-path styling
    pub fn from_template(template: &str) -> Self {
        match Self::parse(template) {
            Ok(art) => art,
            Err(e) => {
                log::warn!("{e}; inserting raw template markup");
                Self::Raw(template.trim().to_string())
            }
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Group contents for one bean drawn at `scale`
    pub fn instance_markup(&self, scale: f32) -> String {
        let paths = match self {
            Self::Raw(markup) => return markup.clone(),
            Self::Paths(paths) => paths,
        };

        let mut out = String::new();
        for (i, d) in paths.iter().enumerate() {
            let _ = if i == 0 {
                let stroke = (11.0 * scale).round().max(9.0);
                write!(
                    out,
                    r##"<path d="{d}" fill="#ffffff" stroke="#000000" stroke-width="{stroke}""##
                )
            } else {
                let stroke = (5.6 * scale).round().max(6.6);
                write!(
                    out,
                    r##"<path d="{d}" fill="none" stroke="#000000" stroke-width="{stroke}" opacity="0.98""##
                )
            };
            out.push_str(r#" stroke-linecap="round" stroke-linejoin="round" pointer-events="none"/>"#);
        }
        out
    }
}

/// Value of `name="..."` or `name='...'` inside a tag.
///
/// The name must follow whitespace; spaces around `=` are allowed.
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(found) = tag[from..].find(name) {
        let start = from + found;
        from = start + name.len();
        let after_space = tag[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if !after_space {
            continue;
        }
        let Some(rest) = tag[from..].trim_start().strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let quote = rest.chars().next().filter(|&c| c == '"' || c == '\'')?;
        let value = &rest[1..];
        let len = value.find(quote)?;
        return Some(&value[..len]);
    }
    None
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
