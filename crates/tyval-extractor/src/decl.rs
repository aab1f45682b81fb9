//! Declaration scanning: locates `// tyval:file` / `// tyval:type` /
//! `// tyval:ignore-changes` markers and the `interface`/`type` headers
//! they opt in, then hands each declaration's body to
//! [`crate::typeexpr::Parser`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;
use crate::lexer::lex;
use crate::typeexpr::{Parser, TypeExpr};

pub struct RawInterface {
    pub name: String,
    pub heritage: Vec<String>,
    pub body: InterfaceBody,
    pub ignore_changes: bool,
    pub file: String,
}

pub enum InterfaceBody {
    Fields(Vec<(String, bool, TypeExpr)>),
    IndexSignature(TypeExpr),
}

pub struct RawAlias {
    pub name: String,
    pub expr: TypeExpr,
    pub ignore_changes: bool,
    pub file: String,
}

pub enum RawDecl {
    Interface(RawInterface),
    Alias(RawAlias),
}

static FILE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*//[ \t]*tyval:file[ \t]*$").unwrap()
});
static INTERFACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:export[ \t]+)?interface[ \t]+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)(?P<generics><[^{]*>)?[ \t]*(?:extends[ \t]+(?P<heritage>[^{]+?))?[ \t]*\{",
    )
    .unwrap()
});
static ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:export[ \t]+)?type[ \t]+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)(?P<generics><[^=]*>)?[ \t]*=",
    )
    .unwrap()
});

/// Parses every opted-in `interface`/`type` declaration in `source`.
pub fn scan_file(file: &str, source: &str) -> Result<Vec<RawDecl>, ExtractError> {
    let file_opted_in = FILE_MARKER_RE.is_match(source);
    let chars: Vec<char> = source.chars().collect();
    let mut decls = Vec::new();

    let mut matches: Vec<(usize, usize, bool)> = Vec::new(); // (start, kind: 0=iface,1=alias)
    for m in INTERFACE_RE.find_iter(source) {
        matches.push((m.start(), m.end(), true));
    }
    for m in ALIAS_RE.find_iter(source) {
        matches.push((m.start(), m.end(), false));
    }
    matches.sort_by_key(|(start, _, _)| *start);

    for (start, _, is_interface) in matches {
        let marker = preceding_marker(source, start);
        let opted_in = file_opted_in || marker.has_type_marker;
        if !opted_in {
            continue;
        }
        if is_interface {
            let caps = INTERFACE_RE.captures_at(source, start).unwrap();
            let name = caps.name("name").unwrap().as_str().to_string();
            if caps.name("generics").is_some() {
                return Err(ExtractError::GenericsNotSupported(file.to_string(), name));
            }
            let heritage: Vec<String> = caps
                .name("heritage")
                .map(|h| {
                    h.as_str()
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let open_brace = caps.get(0).unwrap().end() - 1;
            let close_brace = find_matching_brace(&chars, open_brace)
                .ok_or_else(|| ExtractError::UnexpectedToken(file.to_string(), 0, "{".into()))?;
            let body: String = chars[open_brace..=close_brace].iter().collect();
            let tokens = lex(file, &body)?;
            let mut parser = Parser::new(file, &tokens);
            let parsed = parser.parse_type()?;
            let body = match parsed {
                TypeExpr::ObjectLiteral(fields) => InterfaceBody::Fields(fields),
                TypeExpr::IndexSignature(value_type) => {
                    if !heritage.is_empty() {
                        return Err(ExtractError::HeritageOnIndexSignature(name));
                    }
                    InterfaceBody::IndexSignature(*value_type)
                }
                _ => {
                    return Err(ExtractError::UnexpectedToken(file.to_string(), 0, "interface body".into()))
                }
            };
            decls.push(RawDecl::Interface(RawInterface {
                name,
                heritage,
                body,
                ignore_changes: marker.has_ignore_changes,
                file: file.to_string(),
            }));
        } else {
            let caps = ALIAS_RE.captures_at(source, start).unwrap();
            let name = caps.name("name").unwrap().as_str().to_string();
            if caps.name("generics").is_some() {
                return Err(ExtractError::GenericsNotSupported(file.to_string(), name));
            }
            let rhs_start = caps.get(0).unwrap().end();
            let rhs_end = scan_to_top_level_semi(&chars, rhs_start);
            let body: String = chars[rhs_start..rhs_end].iter().collect();
            let tokens = lex(file, &body)?;
            let mut parser = Parser::new(file, &tokens);
            let expr = parser.parse_type()?;
            decls.push(RawDecl::Alias(RawAlias {
                name,
                expr,
                ignore_changes: marker.has_ignore_changes,
                file: file.to_string(),
            }));
        }
    }
    Ok(decls)
}

struct Marker {
    has_type_marker: bool,
    has_ignore_changes: bool,
}

/// Walks upward from the line containing `decl_start`, collecting marker
/// comments directly above the declaration (blank lines tolerated between
/// them, any other content stops the walk).
fn preceding_marker(source: &str, decl_start: usize) -> Marker {
    let prefix = &source[..decl_start];
    let lines: Vec<&str> = prefix.lines().collect();
    let mut has_type_marker = false;
    let mut has_ignore_changes = false;
    for line in lines.iter().rev() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "// tyval:type" || trimmed == "//tyval:type" {
            has_type_marker = true;
            continue;
        }
        if trimmed == "// tyval:ignore-changes" || trimmed == "//tyval:ignore-changes" {
            has_ignore_changes = true;
            continue;
        }
        break;
    }
    Marker { has_type_marker, has_ignore_changes }
}

fn find_matching_brace(chars: &[char], open_idx: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = open_idx;
    while i < chars.len() {
        match chars[i] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            '\'' | '"' => {
                let q = chars[i];
                i += 1;
                while i < chars.len() && chars[i] != q {
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn scan_to_top_level_semi(chars: &[char], start: usize) -> usize {
    let mut depth = 0i32;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '{' | '[' | '(' | '<' => depth += 1,
            '}' | ']' | ')' | '>' => depth -= 1,
            ';' if depth <= 0 => return i,
            '\'' | '"' => {
                let q = chars[i];
                i += 1;
                while i < chars.len() && chars[i] != q {
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    i
}
