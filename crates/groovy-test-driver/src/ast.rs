//! The AST handle produced by the deterministic test driver.

use groovy_dependency_graph::{DependencySource, MethodSignature, TypeRef};

/// A coarse structural view of one parsed Groovy class, sufficient to drive
/// the dependency extractor and to let tests assert on class shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroovyAst {
    pub class_name: String,
    pub imports: Vec<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub field_types: Vec<TypeRef>,
    pub methods: Vec<MethodSignature>,
    pub annotations: Vec<String>,
}

impl DependencySource for GroovyAst {
    fn imports(&self) -> Vec<String> {
        self.imports.clone()
    }

    fn superclass(&self) -> Option<String> {
        self.superclass.clone()
    }

    fn interfaces(&self) -> Vec<String> {
        self.interfaces.clone()
    }

    fn field_types(&self) -> Vec<TypeRef> {
        self.field_types.clone()
    }

    fn method_signatures(&self) -> Vec<MethodSignature> {
        self.methods.clone()
    }

    fn annotations(&self) -> Vec<String> {
        self.annotations.clone()
    }
}
