mod constant_imported_as_non_constant;
mod first_argument_names;
mod invalid_argument_name;
mod invalid_class_name;
mod invalid_function_name;
mod non_lowercase_variable_in_function;

pub use constant_imported_as_non_constant::ConstantImportedAsNonConstant;
pub use first_argument_names::{
    InvalidFirstArgumentNameForClassMethod, InvalidFirstArgumentNameForMethod,
};
pub use invalid_argument_name::InvalidArgumentName;
pub use invalid_class_name::InvalidClassName;
pub use invalid_function_name::InvalidFunctionName;
pub use non_lowercase_variable_in_function::NonLowercaseVariableInFunction;

use crate::linter::Rule;
use crate::settings::NamingSettings;
use pyflint_parser::ast::{Expr, ExprKind, Stmt, StmtKind};
use pyflint_parser::visitor::{Visitor, walk_stmt};

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(InvalidClassName),
        Box::new(InvalidFunctionName),
        Box::new(InvalidArgumentName),
        Box::new(InvalidFirstArgumentNameForClassMethod),
        Box::new(InvalidFirstArgumentNameForMethod),
        Box::new(NonLowercaseVariableInFunction),
        Box::new(ConstantImportedAsNonConstant),
    ]
}

struct FunctionWalker<F> {
    f: F,
    /// `true` for each enclosing class, `false` for each enclosing function.
    parents: Vec<bool>,
}

impl<'a, F: FnMut(&'a Stmt, bool)> Visitor<'a> for FunctionWalker<F> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        let is_class = match &stmt.node {
            StmtKind::FunctionDef { .. } => {
                (self.f)(stmt, self.parents.last() == Some(&true));
                false
            }
            StmtKind::ClassDef { .. } => true,
            _ => return walk_stmt(self, stmt),
        };
        self.parents.push(is_class);
        walk_stmt(self, stmt);
        self.parents.pop();
    }
}

/// Call `f` on every function definition, with whether it is defined
/// directly in a class body.
pub(crate) fn walk_functions<'a>(body: &'a [Stmt], f: impl FnMut(&'a Stmt, bool)) {
    FunctionWalker {
        f,
        parents: Vec::new(),
    }
    .visit_body(body);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionKind {
    Function,
    Method,
    ClassMethod,
    StaticMethod,
}

fn decorated_with(decorators: &[Expr], builtin: &str, extra: &[String]) -> bool {
    decorators.iter().any(|decorator| {
        let target = match &decorator.node {
            ExprKind::Call { func, .. } => func,
            _ => decorator,
        };
        let Some(name) = target.dotted_name() else {
            return false;
        };
        let last = name.rsplit('.').next().unwrap_or(&name);
        name == builtin || extra.iter().any(|extra| *extra == name || extra == last)
    })
}

pub(crate) fn function_kind(
    name: &str,
    decorators: &[Expr],
    in_class: bool,
    settings: &NamingSettings,
) -> FunctionKind {
    if !in_class {
        return FunctionKind::Function;
    }
    if decorated_with(decorators, "staticmethod", &settings.staticmethod_decorators) {
        FunctionKind::StaticMethod
    } else if matches!(name, "__new__" | "__init_subclass__" | "__class_getitem__")
        || decorated_with(decorators, "classmethod", &settings.classmethod_decorators)
    {
        FunctionKind::ClassMethod
    } else {
        FunctionKind::Method
    }
}

fn is_lower(name: &str) -> bool {
    name.to_lowercase() == name
}

/// At least one cased character, and no lowercase ones.
fn is_upper(name: &str) -> bool {
    name.chars().any(char::is_alphabetic) && name.to_uppercase() == name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn kinds(source: &str) -> Vec<(String, FunctionKind)> {
        let module = pyflint_parser::parse_program(source).unwrap();
        let settings = Settings::default();
        let mut kinds = Vec::new();
        walk_functions(&module.body, |stmt, in_class| {
            if let StmtKind::FunctionDef {
                name,
                decorator_list,
                ..
            } = &stmt.node
            {
                let kind = function_kind(name, decorator_list, in_class, &settings.pep8_naming);
                kinds.push((name.clone(), kind));
            }
        });
        kinds
    }

    #[test]
    fn test_function_kinds() {
        let source = "def f():\n    def g():\n        pass\n\nclass A:\n    def m(self):\n        pass\n\n    @classmethod\n    def c(cls):\n        pass\n\n    @staticmethod\n    def s():\n        pass\n\n    def __new__(cls):\n        pass\n";
        assert_eq!(
            kinds(source),
            vec![
                ("f".to_string(), FunctionKind::Function),
                ("g".to_string(), FunctionKind::Function),
                ("m".to_string(), FunctionKind::Method),
                ("c".to_string(), FunctionKind::ClassMethod),
                ("s".to_string(), FunctionKind::StaticMethod),
                ("__new__".to_string(), FunctionKind::ClassMethod),
            ]
        );
    }

    #[test]
    fn test_case_helpers() {
        assert!(is_lower("snake_case_1"));
        assert!(!is_lower("camelCase"));
        assert!(is_upper("MAX_SIZE"));
        assert!(!is_upper("_1"));
        assert!(!is_upper("Max"));
    }
}
