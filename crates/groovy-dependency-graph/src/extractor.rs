//! Walks a finished AST (exposed through [`DependencySource`]) and produces a
//! `external class name -> relation` mapping.

use std::collections::HashMap;

/// The kind of reference a module makes to an external class.
///
/// Declaration order doubles as precedence order (earlier wins) via
/// [`DependencyRelation::precedence`]: a structural use (e.g. a field type)
/// always overrides a plain import of the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyRelation {
    Extends,
    Implements,
    FieldType,
    MethodType,
    ParameterType,
    Annotation,
    GenericArgument,
    Import,
}

impl DependencyRelation {
    /// Lower value wins when the same class is reachable through more than
    /// one relation in a single module.
    fn precedence(self) -> u8 {
        match self {
            DependencyRelation::Extends => 0,
            DependencyRelation::Implements => 1,
            DependencyRelation::FieldType => 2,
            DependencyRelation::MethodType => 3,
            DependencyRelation::ParameterType => 4,
            DependencyRelation::Annotation => 5,
            DependencyRelation::GenericArgument => 6,
            DependencyRelation::Import => 7,
        }
    }
}

/// A named type reference, with any generic type arguments it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub generic_args: Vec<String>,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        Self { name: name.into(), generic_args: Vec::new() }
    }
}

/// Return type plus parameter types of one method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub return_type: TypeRef,
    pub parameter_types: Vec<TypeRef>,
}

/// Structural view over a finished (or best-effort partial) AST that the
/// extractor needs. A driver adapter implements this over its own concrete
/// AST type; the extractor itself never depends on a specific compiler's
/// node types.
pub trait DependencySource {
    /// Import targets, including star imports written as `"package.*"`.
    fn imports(&self) -> Vec<String>;
    fn superclass(&self) -> Option<String>;
    fn interfaces(&self) -> Vec<String>;
    fn field_types(&self) -> Vec<TypeRef>;
    fn method_signatures(&self) -> Vec<MethodSignature>;
    fn annotations(&self) -> Vec<String>;
}

/// Types filtered out of every dependency mapping: Groovy/Java primitives
/// and the root object type, per the extractor's filtering rule.
fn is_filtered(name: &str) -> bool {
    matches!(
        name,
        "int" | "long"
            | "short"
            | "byte"
            | "char"
            | "boolean"
            | "float"
            | "double"
            | "void"
            | "def"
            | "Object"
            | "java.lang.Object"
    )
}

/// Extract the `external class -> relation` mapping from `source`, applying
/// the precedence rule so a class seen under more than one relation keeps
/// only the highest-precedence one.
///
/// A source with no content (e.g. a null/absent AST represented as a value
/// whose accessors all return empty) yields an empty mapping; this function
/// never fails, matching the "missing subtrees are skipped without error"
/// rule for partial ASTs.
pub fn extract_dependencies<S: DependencySource>(source: &S) -> HashMap<String, DependencyRelation> {
    let mut map: HashMap<String, DependencyRelation> = HashMap::new();

    let mut insert = |map: &mut HashMap<String, DependencyRelation>, name: String, relation: DependencyRelation| {
        if is_filtered(&name) {
            return;
        }
        map.entry(name)
            .and_modify(|existing| {
                if relation.precedence() < existing.precedence() {
                    *existing = relation;
                }
            })
            .or_insert(relation);
    };

    for import in source.imports() {
        insert(&mut map, import, DependencyRelation::Import);
    }
    if let Some(superclass) = source.superclass() {
        insert(&mut map, superclass, DependencyRelation::Extends);
    }
    for interface in source.interfaces() {
        insert(&mut map, interface, DependencyRelation::Implements);
    }
    for field in source.field_types() {
        insert(&mut map, field.name, DependencyRelation::FieldType);
        for arg in field.generic_args {
            insert(&mut map, arg, DependencyRelation::GenericArgument);
        }
    }
    for method in source.method_signatures() {
        insert(&mut map, method.return_type.name, DependencyRelation::MethodType);
        for arg in method.return_type.generic_args {
            insert(&mut map, arg, DependencyRelation::GenericArgument);
        }
        for param in method.parameter_types {
            insert(&mut map, param.name, DependencyRelation::ParameterType);
            for arg in param.generic_args {
                insert(&mut map, arg, DependencyRelation::GenericArgument);
            }
        }
    }
    for annotation in source.annotations() {
        insert(&mut map, annotation, DependencyRelation::Annotation);
    }

    map
}
