//! A deliberately small recognizer for a subset of Groovy class syntax.
//!
//! This is not a Groovy parser. It recognizes exactly the shapes needed to
//! exercise every phase, error kind, and dependency relation this crate's
//! driver is asked to produce in tests: a single top-level class with an
//! optional `extends`/`implements` clause, field declarations, method
//! signatures, imports, and a narrow syntax-error heuristic (an assignment
//! with no right-hand side before a closing delimiter).

use std::sync::LazyLock;

use groovy_dependency_graph::{MethodSignature, TypeRef};
use rustc_hash::FxHashMap;

use crate::ast::GroovyAst;

static KNOWN_TYPES: LazyLock<FxHashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("ArrayList", "java.util.ArrayList"),
        ("LinkedList", "java.util.LinkedList"),
        ("HashMap", "java.util.HashMap"),
        ("HashSet", "java.util.HashSet"),
        ("List", "java.util.List"),
        ("Map", "java.util.Map"),
        ("Set", "java.util.Set"),
        ("Optional", "java.util.Optional"),
        ("Serializable", "java.io.Serializable"),
        ("Comparable", "java.lang.Comparable"),
        ("String", "java.lang.String"),
        ("Integer", "java.lang.Integer"),
        ("Object", "java.lang.Object"),
    ]
    .into_iter()
    .collect()
});

fn resolve(simple_name: &str) -> String {
    KNOWN_TYPES.get(simple_name).map(|s| s.to_string()).unwrap_or_else(|| simple_name.to_string())
}

/// A syntax problem found while recognizing `source`, with a 1-based
/// line/column.
pub struct SyntaxProblem {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

fn line_col_of(source: &str, byte_offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for ch in source[..byte_offset.min(source.len())].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn find_unbalanced_delimiter(source: &str) -> Option<usize> {
    let mut depth: i64 = 0;
    for (idx, ch) in source.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        Some(source.len())
    } else {
        None
    }
}

static EMPTY_ASSIGNMENT_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"=\s*([}\)])").unwrap());
static CLASS_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"class\s+(\w+)").unwrap());
static IMPORT_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"import\s+([\w.*]+)\s*;?").unwrap());
static EXTENDS_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"extends\s+(\w+)").unwrap());
static IMPLEMENTS_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"implements\s+([\w,\s]+?)\s*\{").unwrap());
static ANNOTATION_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"@(\w+)").unwrap());
// Unanchored: a field/method can start anywhere, including right after the
// class's own opening brace on the same line. Run against `mask_method_bodies`'s
// output rather than raw source so statements inside a method body (e.g.
// `return null;`) can never be mistaken for a class-body field declaration.
static FIELD_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s*([A-Za-z_][\w.]*)(?:<([^>]*)>)?\s+([A-Za-z_]\w*)\s*;").unwrap());
static METHOD_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\s*([A-Za-z_][\w.]*)(?:<([^>]*)>)?\s+([A-Za-z_]\w*)\s*\(([^)]*)\)").unwrap()
});

/// Replace every character nested two or more curly-brace levels deep (i.e.
/// inside a method body rather than directly in the class body) with spaces,
/// preserving length and line breaks so byte offsets into the result still
/// line up with the original source. `FIELD_RE`/`METHOD_RE` are matched
/// against this masked text so they only ever see class-body declarations.
fn mask_method_bodies(source: &str) -> String {
    let mut masked = String::with_capacity(source.len());
    let mut depth: i64 = 0;
    for ch in source.chars() {
        match ch {
            '{' => {
                depth += 1;
                masked.push(if depth <= 1 { ch } else { ' ' });
            }
            '}' => {
                masked.push(if depth <= 1 { ch } else { ' ' });
                depth -= 1;
            }
            '\n' => masked.push('\n'),
            _ if depth == 1 => masked.push(ch),
            _ => {
                for _ in 0..ch.len_utf8() {
                    masked.push(' ');
                }
            }
        }
    }
    masked
}

/// Split a parameter list on top-level commas, ignoring commas nested inside
/// `<...>` generic argument lists.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in s.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = s[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

fn parse_type_ref(decl: &str) -> Option<TypeRef> {
    let decl = decl.trim();
    if decl.is_empty() {
        return None;
    }
    let (type_part, rest) = decl.split_once(char::is_whitespace)?;
    let _ = rest; // the parameter/field name itself is not needed downstream
    let (name, generics) = if let Some(start) = type_part.find('<') {
        let name = &type_part[..start];
        let generics_str = &type_part[start + 1..type_part.len().saturating_sub(1)];
        (name, split_top_level(generics_str).into_iter().map(resolve).collect())
    } else {
        (type_part, Vec::new())
    };
    Some(TypeRef { name: resolve(name), generic_args: generics })
}

/// Parse `source`, returning either the recognized AST or a syntax problem.
pub fn parse(source: &str) -> Result<GroovyAst, SyntaxProblem> {
    if let Some(offset) = find_unbalanced_delimiter(source) {
        let (line, column) = line_col_of(source, offset);
        return Err(SyntaxProblem {
            message: "Unexpected end of file".to_string(),
            line,
            column,
        });
    }

    if let Some(captures) = EMPTY_ASSIGNMENT_RE.captures(source) {
        let whole = captures.get(0).unwrap();
        let (line, column) = line_col_of(source, whole.start());
        let token = &captures[1];
        return Err(SyntaxProblem {
            message: format!("Unexpected token: '{token}'"),
            line,
            column,
        });
    }

    let Some(class_captures) = CLASS_RE.captures(source) else {
        return Err(SyntaxProblem {
            message: "Unexpected token: missing class declaration".to_string(),
            line: 1,
            column: 1,
        });
    };
    let class_name = class_captures[1].to_string();

    let imports = IMPORT_RE.captures_iter(source).map(|c| c[1].to_string()).collect();

    let superclass = EXTENDS_RE.captures(source).map(|c| resolve(&c[1]));

    let interfaces = IMPLEMENTS_RE
        .captures(source)
        .map(|c| c[1].split(',').map(|s| resolve(s.trim())).collect())
        .unwrap_or_default();

    let annotations = ANNOTATION_RE.captures_iter(source).map(|c| c[1].to_string()).collect();

    let class_body = mask_method_bodies(source);

    let field_types = FIELD_RE
        .captures_iter(&class_body)
        .filter_map(|c| {
            let name = &c[1];
            let generics = c.get(2).map(|m| m.as_str()).unwrap_or("");
            let generic_args = split_top_level(generics).into_iter().map(resolve).collect();
            Some(TypeRef { name: resolve(name), generic_args })
        })
        .collect();

    let methods = METHOD_RE
        .captures_iter(&class_body)
        .map(|c| {
            let return_name = &c[1];
            let return_generics = c.get(2).map(|m| m.as_str()).unwrap_or("");
            let return_type = TypeRef {
                name: resolve(return_name),
                generic_args: split_top_level(return_generics).into_iter().map(resolve).collect(),
            };
            let params_raw = &c[4];
            let parameter_types =
                split_top_level(params_raw).into_iter().filter_map(parse_type_ref).collect();
            MethodSignature { return_type, parameter_types }
        })
        .collect();

    Ok(GroovyAst { class_name, imports, superclass, interfaces, field_types, methods, annotations })
}
