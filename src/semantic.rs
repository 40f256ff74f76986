//! Scopes and bindings for the name-resolution rules.
//!
//! The model is built in one pass over the module. Function and lambda
//! bodies are deferred until the enclosing module has been walked, so a
//! function may refer to names bound after its definition. The finished
//! model is read-only; F401, F811, F821 and F841 query it.

use pyflint_parser::ast::{
    Arguments, Comprehension, ExceptHandler, Expr, ExprContext, ExprKind, Module, Position, Span,
    Stmt, StmtKind,
};
use pyflint_parser::visitor::{Visitor, walk_expr, walk_stmt};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

pub type ScopeId = usize;
pub type BindingId = usize;

/// Names Python provides in every module.
const PYTHON_BUILTINS: &[&str] = &[
    "ArithmeticError", "AssertionError", "AttributeError", "BaseException",
    "BaseExceptionGroup", "BlockingIOError", "BrokenPipeError", "BufferError", "BytesWarning",
    "ChildProcessError", "ConnectionAbortedError", "ConnectionError", "ConnectionRefusedError",
    "ConnectionResetError", "DeprecationWarning", "EOFError", "Ellipsis", "EncodingWarning",
    "EnvironmentError", "Exception", "ExceptionGroup", "False", "FileExistsError",
    "FileNotFoundError", "FloatingPointError", "FutureWarning", "GeneratorExit", "IOError",
    "ImportError", "ImportWarning", "IndentationError", "IndexError", "InterruptedError",
    "IsADirectoryError", "KeyError", "KeyboardInterrupt", "LookupError", "MemoryError",
    "ModuleNotFoundError", "NameError", "None", "NotADirectoryError", "NotImplemented",
    "NotImplementedError", "OSError", "OverflowError", "PendingDeprecationWarning",
    "PermissionError", "ProcessLookupError", "RecursionError", "ReferenceError",
    "ResourceWarning", "RuntimeError", "RuntimeWarning", "StopAsyncIteration", "StopIteration",
    "SyntaxError", "SyntaxWarning", "SystemError", "SystemExit", "TabError", "TimeoutError",
    "True", "TypeError", "UnboundLocalError", "UnicodeDecodeError", "UnicodeEncodeError",
    "UnicodeError", "UnicodeTranslateError", "UnicodeWarning", "UserWarning", "ValueError",
    "Warning", "ZeroDivisionError", "__build_class__", "__debug__", "__doc__", "__import__",
    "__loader__", "__name__", "__package__", "__spec__", "abs", "aiter", "all", "anext", "any",
    "ascii", "bin", "bool", "breakpoint", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "copyright", "credits", "delattr", "dict", "dir",
    "divmod", "enumerate", "eval", "exec", "exit", "filter", "float", "format", "frozenset",
    "getattr", "globals", "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance",
    "issubclass", "iter", "len", "license", "list", "locals", "map", "max", "memoryview", "min",
    "next", "object", "oct", "open", "ord", "pow", "print", "property", "quit", "range", "repr",
    "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum",
    "super", "tuple", "type", "vars", "zip",
];

/// Module attributes that exist without being bound.
const MODULE_DUNDERS: &[&str] = &[
    "__annotations__",
    "__builtins__",
    "__cached__",
    "__file__",
    "__path__",
];

/// Function locals that debuggers and test runners read by name.
const TRACEBACK_LOCALS: &[&str] = &[
    "__tracebackhide__",
    "__traceback_info__",
    "__traceback_supplement__",
    "__debuggerskip__",
];

static BUILTINS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| PYTHON_BUILTINS.iter().copied().collect());

/// The builtin name table, built on first use.
pub fn builtin_names() -> &'static HashSet<&'static str> {
    &BUILTINS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
    Lambda,
    Comprehension,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// `import a` or `import a.b as c`.
    Import { qualified: String },
    /// `import a.b`, which binds `a`.
    SubmoduleImport { qualified: String },
    /// `from a import b`.
    FromImport { qualified: String },
    FutureImport,
    FunctionDef,
    ClassDef,
    /// A name assigned directly, `x = …` or `x: T = …`.
    Assignment,
    /// A name inside a tuple target or a `with … as` target.
    Unpacked,
    NamedExpr,
    AugAssign,
    /// `x: T` without a value.
    Annotation,
    LoopVar,
    Argument,
    Global,
    ExceptHandler,
}

impl BindingKind {
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            BindingKind::Import { .. }
                | BindingKind::SubmoduleImport { .. }
                | BindingKind::FromImport { .. }
        )
    }

    /// Imports, functions and classes: bindings whose silent replacement is suspicious.
    pub fn is_definition(&self) -> bool {
        self.is_import() || matches!(self, BindingKind::FunctionDef | BindingKind::ClassDef)
    }

    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            BindingKind::Import { qualified }
            | BindingKind::SubmoduleImport { qualified }
            | BindingKind::FromImport { qualified } => Some(qualified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding<'a> {
    pub name: &'a str,
    pub kind: BindingKind,
    pub span: Span,
    pub scope: ScopeId,
    pub used: bool,
    pub decorated: bool,
    /// `(branching statement, branch)` pairs enclosing the binding.
    forks: Vec<(usize, usize)>,
}

impl Binding<'_> {
    /// Whether `self` and `other` sit in mutually exclusive branches.
    fn in_different_fork(&self, other: &Binding) -> bool {
        self.forks.iter().any(|(node, branch)| {
            other
                .forks
                .iter()
                .any(|(other_node, other_branch)| node == other_node && branch != other_branch)
        })
    }
}

#[derive(Debug, Clone)]
pub struct Scope<'a> {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    bindings: HashMap<&'a str, BindingId>,
    /// Names declared `global` or `nonlocal` here.
    declared_elsewhere: HashSet<&'a str>,
    star_import: bool,
    uses_locals: bool,
}

impl<'a> Scope<'a> {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            bindings: HashMap::new(),
            declared_elsewhere: HashSet::new(),
            star_import: false,
            uses_locals: false,
        }
    }

    /// The binding each name refers to at the end of the scope.
    pub fn bindings(&self) -> impl Iterator<Item = (&'a str, BindingId)> + '_ {
        self.bindings.iter().map(|(name, id)| (*name, *id))
    }

    pub fn get(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }

    pub fn has_star_import(&self) -> bool {
        self.star_import
    }

    pub fn uses_locals(&self) -> bool {
        self.uses_locals
    }
}

/// A load of a name that no scope binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference<'a> {
    pub name: &'a str,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redefinition {
    pub binding: BindingId,
    pub shadowed: BindingId,
}

#[derive(Debug, Default)]
pub struct SemanticModel<'a> {
    scopes: Vec<Scope<'a>>,
    bindings: Vec<Binding<'a>>,
    unresolved: Vec<UnresolvedReference<'a>>,
    redefinitions: Vec<Redefinition>,
    unused_handler_names: Vec<BindingId>,
}

impl<'a> SemanticModel<'a> {
    pub fn build(source: &'a str, module: &'a Module, extra_builtins: &[String]) -> Self {
        let mut builder = Builder::new(source, extra_builtins);
        builder.visit_body(&module.body);
        builder.run_deferred();
        builder.finish()
    }

    pub fn scopes(&self) -> &[Scope<'a>] {
        &self.scopes
    }

    pub fn binding(&self, id: BindingId) -> &Binding<'a> {
        &self.bindings[id]
    }

    pub fn bindings(&self) -> &[Binding<'a>] {
        &self.bindings
    }

    /// Imports never read before their scope ended. Class bodies are exempt,
    /// their imports being attributes of the class.
    pub fn unused_imports(&self) -> Vec<&Binding<'a>> {
        self.final_bindings(|scope| scope.kind != ScopeKind::Class)
            .filter(|binding| binding.kind.is_import() && !binding.used)
            .collect()
    }

    /// Function locals assigned but never read, plus unused `except … as` names.
    pub fn unused_variables(&self) -> Vec<&Binding<'a>> {
        let mut unused: Vec<&Binding<'a>> = self
            .scopes
            .iter()
            .filter(|scope| scope.kind == ScopeKind::Function && !scope.uses_locals)
            .flat_map(|scope| {
                scope
                    .bindings
                    .iter()
                    .filter(|(name, _)| !scope.declared_elsewhere.contains(*name))
                    .map(|(_, id)| &self.bindings[*id])
            })
            .filter(|binding| binding.kind == BindingKind::Assignment && !binding.used)
            .filter(|binding| !TRACEBACK_LOCALS.contains(&binding.name))
            .collect();
        unused.extend(self.unused_handler_names.iter().map(|id| &self.bindings[*id]));
        unused
    }

    pub fn unresolved_references(&self) -> &[UnresolvedReference<'a>] {
        &self.unresolved
    }

    /// `(new, shadowed)` pairs where an unused definition was replaced.
    pub fn redefinitions(&self) -> impl Iterator<Item = (&Binding<'a>, &Binding<'a>)> {
        self.redefinitions
            .iter()
            .map(|r| (&self.bindings[r.binding], &self.bindings[r.shadowed]))
    }

    fn final_bindings(
        &self,
        include: impl Fn(&Scope) -> bool,
    ) -> impl Iterator<Item = &Binding<'a>> {
        self.scopes
            .iter()
            .filter(move |scope| include(scope))
            .flat_map(|scope| scope.bindings.values())
            .map(|id| &self.bindings[*id])
    }
}

enum DeferredBody<'a> {
    Function(&'a [Stmt]),
    Lambda(&'a Expr),
}

struct Deferred<'a> {
    scope_stack: Vec<ScopeId>,
    args: &'a Arguments,
    body: DeferredBody<'a>,
}

struct Builder<'a> {
    source: &'a str,
    extra_builtins: HashSet<String>,
    model: SemanticModel<'a>,
    scope_stack: Vec<ScopeId>,
    forks: Vec<(usize, usize)>,
    next_fork: usize,
    loop_depth: usize,
    /// Depth of `try` bodies whose handlers catch `NameError`.
    name_error_guards: usize,
    deferred: VecDeque<Deferred<'a>>,
    dunder_all: Vec<&'a str>,
}

impl<'a> Builder<'a> {
    fn new(source: &'a str, extra_builtins: &[String]) -> Self {
        let mut model = SemanticModel::default();
        model.scopes.push(Scope::new(ScopeKind::Module, None));
        Self {
            source,
            extra_builtins: extra_builtins.iter().cloned().collect(),
            model,
            scope_stack: vec![0],
            forks: Vec::new(),
            next_fork: 0,
            loop_depth: 0,
            name_error_guards: 0,
            deferred: VecDeque::new(),
            dunder_all: Vec::new(),
        }
    }

    fn finish(mut self) -> SemanticModel<'a> {
        for name in std::mem::take(&mut self.dunder_all) {
            if let Some(id) = self.model.scopes[0].get(name) {
                self.model.bindings[id].used = true;
            }
        }
        self.model
    }

    fn current_scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(0)
    }

    fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = self.model.scopes.len();
        self.model
            .scopes
            .push(Scope::new(kind, Some(self.current_scope())));
        self.scope_stack.push(id);
        id
    }

    fn in_branch(&self) -> bool {
        !self.forks.is_empty() || self.loop_depth > 0
    }

    fn add_binding(
        &mut self,
        name: &'a str,
        kind: BindingKind,
        span: Span,
        decorated: bool,
    ) -> BindingId {
        let scope_id = match kind {
            BindingKind::NamedExpr => self.nearest_non_comprehension_scope(),
            _ => self.current_scope(),
        };
        if self.model.scopes[scope_id].declared_elsewhere.contains(name) {
            if let Some(id) = self.lookup(name) {
                self.model.bindings[id].used = true;
                return id;
            }
        }

        let mut binding = Binding {
            name,
            kind,
            span,
            scope: scope_id,
            used: false,
            decorated,
            forks: self.forks.clone(),
        };
        let id = self.model.bindings.len();
        if let Some(existing_id) = self.model.scopes[scope_id].get(name) {
            let existing = &self.model.bindings[existing_id];
            if binding.kind == BindingKind::Annotation {
                return existing_id;
            }
            if redefines(&binding, existing) {
                self.model.redefinitions.push(Redefinition {
                    binding: id,
                    shadowed: existing_id,
                });
            }
            binding.used = existing.used;
        }
        self.model.bindings.push(binding);
        self.model.scopes[scope_id].bindings.insert(name, id);
        id
    }

    fn nearest_non_comprehension_scope(&self) -> ScopeId {
        self.scope_stack
            .iter()
            .rev()
            .copied()
            .find(|id| self.model.scopes[*id].kind != ScopeKind::Comprehension)
            .unwrap_or(0)
    }

    /// Resolve `name` from the current scope outwards. Class scopes are only
    /// visible from their own body.
    fn lookup(&self, name: &str) -> Option<BindingId> {
        let innermost = self.scope_stack.len().saturating_sub(1);
        self.scope_stack
            .iter()
            .enumerate()
            .rev()
            .filter(|(index, id)| {
                *index == innermost || self.model.scopes[**id].kind != ScopeKind::Class
            })
            .find_map(|(_, id)| self.model.scopes[*id].get(name))
    }

    fn handle_load(&mut self, name: &'a str, span: Span) {
        if let Some(id) = self.lookup(name) {
            self.model.bindings[id].used = true;
            return;
        }
        if self.is_implicitly_defined(name) {
            return;
        }
        let star_import = self
            .scope_stack
            .iter()
            .any(|id| self.model.scopes[*id].star_import);
        if star_import || self.name_error_guards > 0 {
            return;
        }
        self.model.unresolved.push(UnresolvedReference { name, span });
    }

    fn is_implicitly_defined(&self, name: &str) -> bool {
        if BUILTINS.contains(name)
            || self.extra_builtins.contains(name)
            || MODULE_DUNDERS.contains(&name)
        {
            return true;
        }
        let kind = self.model.scopes[self.current_scope()].kind;
        match name {
            "__module__" | "__qualname__" => kind == ScopeKind::Class,
            "__class__" => self
                .scope_stack
                .iter()
                .any(|id| self.model.scopes[*id].kind == ScopeKind::Function),
            _ => false,
        }
    }

    fn handle_delete(&mut self, name: &'a str, span: Span) {
        let scope_id = self.current_scope();
        match self.model.scopes[scope_id].get(name) {
            Some(id) if self.in_branch() => self.model.bindings[id].used = true,
            Some(_) => {
                self.model.scopes[scope_id].bindings.remove(name);
            }
            None => self.handle_load(name, span),
        }
    }

    /// Bind the names in an assignment target.
    fn bind_target(&mut self, target: &'a Expr, kind: BindingKind) {
        match &target.node {
            ExprKind::Name { id, .. } => {
                self.add_binding(id, kind, target.span, false);
            }
            ExprKind::Tuple { elts, .. } | ExprKind::List { elts, .. } => {
                let kind = if kind == BindingKind::Assignment {
                    BindingKind::Unpacked
                } else {
                    kind
                };
                for elt in elts {
                    self.bind_target(elt, kind.clone());
                }
            }
            ExprKind::Starred { value } => self.bind_target(value, kind),
            _ => self.visit_expr(target),
        }
    }

    fn with_fork<F: FnOnce(&mut Self)>(&mut self, node: usize, branch: usize, f: F) {
        self.forks.push((node, branch));
        f(self);
        self.forks.pop();
    }

    fn fork_id(&mut self) -> usize {
        self.next_fork += 1;
        self.next_fork
    }

    fn record_dunder_all(&mut self, value: &'a Expr) {
        if self.current_scope() != 0 {
            return;
        }
        if let ExprKind::List { elts, .. } | ExprKind::Tuple { elts, .. } = &value.node {
            for elt in elts {
                if let Some(pyflint_parser::ast::Constant::Str(name)) = elt.as_constant() {
                    self.dunder_all.push(name);
                }
            }
        }
    }

    fn bind_arguments(&mut self, args: &'a Arguments) {
        for arg in args.all() {
            self.add_binding(&arg.arg, BindingKind::Argument, arg.span, false);
        }
    }

    fn run_deferred(&mut self) {
        while let Some(deferred) = self.deferred.pop_front() {
            self.scope_stack = deferred.scope_stack;
            self.forks.clear();
            self.loop_depth = 0;
            self.name_error_guards = 0;
            self.bind_arguments(deferred.args);
            match deferred.body {
                DeferredBody::Function(body) => self.visit_body(body),
                DeferredBody::Lambda(body) => self.visit_expr(body),
            }
        }
    }

    fn defer(&mut self, kind: ScopeKind, args: &'a Arguments, body: DeferredBody<'a>) {
        self.push_scope(kind);
        let scope_stack = self.scope_stack.clone();
        self.scope_stack.pop();
        self.deferred.push_back(Deferred {
            scope_stack,
            args,
            body,
        });
    }

    fn visit_comprehensions(&mut self, generators: &'a [Comprehension], elements: &[&'a Expr]) {
        // The first iterable is evaluated in the enclosing scope.
        if let Some(first) = generators.first() {
            self.visit_expr(&first.iter);
        }
        self.push_scope(ScopeKind::Comprehension);
        for (index, generator) in generators.iter().enumerate() {
            if index > 0 {
                self.visit_expr(&generator.iter);
            }
            self.bind_target(&generator.target, BindingKind::LoopVar);
            for condition in &generator.ifs {
                self.visit_expr(condition);
            }
        }
        for element in elements {
            self.visit_expr(element);
        }
        self.scope_stack.pop();
    }

    /// Location of the `name` in `except E as name`.
    fn handler_name_span(&self, handler: &ExceptHandler, name: &str) -> Span {
        let header_end = handler
            .body
            .first()
            .map(|stmt| stmt.span.start.offset)
            .unwrap_or(handler.span.end.offset);
        let header = &self.source[handler.span.start.offset..header_end];
        let found = header.rfind(name).filter(|index| header[..*index].trim_end().ends_with("as"));
        match found {
            Some(index) => {
                let start = advance(handler.span.start, &header[..index]);
                let end = advance(start, name);
                Span::new(start, end)
            }
            None => handler.span,
        }
    }
}

/// Position reached after reading `text` from `from`.
fn advance(from: Position, text: &str) -> Position {
    let mut position = from;
    for c in text.chars() {
        position.offset += c.len_utf8();
        if c == '\n' {
            position.row += 1;
            position.column = 1;
        } else {
            position.column += 1;
        }
    }
    position
}

/// Whether `binding` silently replaces an unused import, function or class.
fn redefines(binding: &Binding, existing: &Binding) -> bool {
    if existing.used || !existing.kind.is_definition() || !binding.kind.is_definition() {
        return false;
    }
    if binding.decorated || existing.decorated || binding.in_different_fork(existing) {
        return false;
    }
    match (&binding.kind, &existing.kind) {
        (BindingKind::SubmoduleImport { .. }, _) | (_, BindingKind::SubmoduleImport { .. }) => {
            binding.kind.qualified_name() == existing.kind.qualified_name()
        }
        _ => true,
    }
}

fn catches_name_error(handlers: &[ExceptHandler]) -> bool {
    handlers.iter().any(|handler| match handler.type_.as_deref() {
        Some(expr) => match &expr.node {
            ExprKind::Tuple { elts, .. } => elts.iter().any(|e| e.as_name() == Some("NameError")),
            _ => expr.as_name() == Some("NameError"),
        },
        None => false,
    })
}

impl<'a> Visitor<'a> for Builder<'a> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match &stmt.node {
            StmtKind::FunctionDef {
                name,
                name_span,
                args,
                body,
                decorator_list,
                returns,
                ..
            } => {
                for decorator in decorator_list {
                    self.visit_expr(decorator);
                }
                self.visit_arguments(args);
                if let Some(returns) = returns {
                    self.visit_expr(returns);
                }
                self.add_binding(
                    name,
                    BindingKind::FunctionDef,
                    *name_span,
                    !decorator_list.is_empty(),
                );
                self.defer(ScopeKind::Function, args, DeferredBody::Function(body));
            }
            StmtKind::ClassDef {
                name,
                name_span,
                bases,
                keywords,
                body,
                decorator_list,
            } => {
                for decorator in decorator_list {
                    self.visit_expr(decorator);
                }
                for base in bases {
                    self.visit_expr(base);
                }
                for keyword in keywords {
                    self.visit_keyword(keyword);
                }
                self.push_scope(ScopeKind::Class);
                self.visit_body(body);
                self.scope_stack.pop();
                self.add_binding(
                    name,
                    BindingKind::ClassDef,
                    *name_span,
                    !decorator_list.is_empty(),
                );
            }
            StmtKind::Import { names } => {
                for alias in names {
                    let qualified = alias.name.clone();
                    let kind = if alias.asname.is_none() && alias.name.contains('.') {
                        BindingKind::SubmoduleImport { qualified }
                    } else {
                        BindingKind::Import { qualified }
                    };
                    self.add_binding(alias.bound_name(), kind, alias.span, false);
                }
            }
            StmtKind::ImportFrom {
                module,
                names,
                level,
            } => {
                let dots = ".".repeat(*level);
                for alias in names {
                    if alias.name == "*" {
                        let scope = self.current_scope();
                        self.model.scopes[scope].star_import = true;
                        continue;
                    }
                    let id = if module.as_deref() == Some("__future__") {
                        self.add_binding(
                            alias.bound_name(),
                            BindingKind::FutureImport,
                            alias.span,
                            false,
                        )
                    } else {
                        let qualified = match module {
                            Some(module) => format!("{dots}{module}.{}", alias.name),
                            None => format!("{dots}{}", alias.name),
                        };
                        self.add_binding(
                            alias.bound_name(),
                            BindingKind::FromImport { qualified },
                            alias.span,
                            false,
                        )
                    };
                    if self.model.bindings[id].kind == BindingKind::FutureImport {
                        self.model.bindings[id].used = true;
                    }
                }
            }
            StmtKind::Global { names } | StmtKind::Nonlocal { names } => {
                let scope = self.current_scope();
                let is_global = matches!(stmt.node, StmtKind::Global { .. });
                for name in names {
                    self.model.scopes[scope].declared_elsewhere.insert(name);
                    if is_global && scope != 0 && self.model.scopes[0].get(name).is_none() {
                        let id = self.model.bindings.len();
                        self.model.bindings.push(Binding {
                            name,
                            kind: BindingKind::Global,
                            span: stmt.span,
                            scope: 0,
                            used: true,
                            decorated: false,
                            forks: Vec::new(),
                        });
                        self.model.scopes[0].bindings.insert(name, id);
                    }
                }
            }
            StmtKind::Assign { targets, value } => {
                self.visit_expr(value);
                let literal_value = matches!(
                    value.node,
                    ExprKind::Tuple { .. } | ExprKind::List { .. }
                );
                for target in targets {
                    if target.as_name() == Some("__all__") {
                        self.record_dunder_all(value);
                    }
                    match &target.node {
                        ExprKind::Tuple { elts, .. } | ExprKind::List { elts, .. }
                            if literal_value =>
                        {
                            for elt in elts {
                                self.bind_target(elt, BindingKind::Assignment);
                            }
                        }
                        _ => self.bind_target(target, BindingKind::Assignment),
                    }
                }
            }
            StmtKind::AugAssign { target, value, .. } => {
                self.visit_expr(value);
                match &target.node {
                    ExprKind::Name { id, .. } => {
                        if id == "__all__" {
                            self.record_dunder_all(value);
                        }
                        self.handle_load(id, target.span);
                        self.add_binding(id, BindingKind::AugAssign, target.span, false);
                    }
                    _ => self.visit_expr(target),
                }
            }
            StmtKind::AnnAssign {
                target,
                annotation,
                value,
                ..
            } => {
                self.visit_expr(annotation);
                if let Some(value) = value {
                    self.visit_expr(value);
                }
                match &target.node {
                    ExprKind::Name { id, .. } => {
                        let kind = if value.is_some() {
                            BindingKind::Assignment
                        } else {
                            BindingKind::Annotation
                        };
                        self.add_binding(id, kind, target.span, false);
                    }
                    _ => self.visit_expr(target),
                }
            }
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
                ..
            } => {
                self.visit_expr(iter);
                self.loop_depth += 1;
                self.bind_target(target, BindingKind::LoopVar);
                self.visit_body(body);
                self.visit_body(orelse);
                self.loop_depth -= 1;
            }
            StmtKind::While { test, body, orelse } => {
                self.visit_expr(test);
                self.loop_depth += 1;
                self.visit_body(body);
                self.visit_body(orelse);
                self.loop_depth -= 1;
            }
            StmtKind::If { test, body, orelse } => {
                self.visit_expr(test);
                let node = self.fork_id();
                self.with_fork(node, 0, |this| this.visit_body(body));
                self.with_fork(node, 1, |this| this.visit_body(orelse));
            }
            StmtKind::With { items, body, .. } => {
                for item in items {
                    self.visit_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.bind_target(vars, BindingKind::Unpacked);
                    }
                }
                self.visit_body(body);
            }
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                let node = self.fork_id();
                let guarded = catches_name_error(handlers);
                if guarded {
                    self.name_error_guards += 1;
                }
                self.with_fork(node, 0, |this| this.visit_body(body));
                if guarded {
                    self.name_error_guards -= 1;
                }
                for (index, handler) in handlers.iter().enumerate() {
                    self.with_fork(node, index + 1, |this| this.visit_except_handler(handler));
                }
                self.with_fork(node, 0, |this| this.visit_body(orelse));
                self.visit_body(finalbody);
            }
            StmtKind::Delete { targets } => {
                for target in targets {
                    match &target.node {
                        ExprKind::Name { id, .. } => self.handle_delete(id, target.span),
                        _ => self.visit_expr(target),
                    }
                }
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        match &expr.node {
            ExprKind::Name { id, ctx } => match ctx {
                ExprContext::Load => self.handle_load(id, expr.span),
                ExprContext::Store => {
                    self.add_binding(id, BindingKind::Assignment, expr.span, false);
                }
                ExprContext::Del => self.handle_delete(id, expr.span),
            },
            ExprKind::NamedExpr { target, value } => {
                self.visit_expr(value);
                if let Some(name) = target.as_name() {
                    self.add_binding(name, BindingKind::NamedExpr, target.span, false);
                }
            }
            ExprKind::Lambda { args, body } => {
                self.visit_arguments(args);
                self.defer(ScopeKind::Lambda, args, DeferredBody::Lambda(body));
            }
            ExprKind::ListComp { elt, generators }
            | ExprKind::SetComp { elt, generators }
            | ExprKind::GeneratorExp { elt, generators } => {
                self.visit_comprehensions(generators, &[&**elt]);
            }
            ExprKind::DictComp {
                key,
                value,
                generators,
            } => {
                self.visit_comprehensions(generators, &[&**key, &**value]);
            }
            ExprKind::Call { func, args, .. } => {
                if func.as_name() == Some("locals") && args.is_empty() {
                    let scope = self.current_scope();
                    self.model.scopes[scope].uses_locals = true;
                }
                walk_expr(self, expr);
            }
            _ => walk_expr(self, expr),
        }
    }

    fn visit_except_handler(&mut self, handler: &'a ExceptHandler) {
        if let Some(type_) = &handler.type_ {
            self.visit_expr(type_);
        }
        let Some(name) = handler.name.as_deref() else {
            self.visit_body(&handler.body);
            return;
        };
        let scope = self.current_scope();
        let previous = self.model.scopes[scope].get(name);
        let span = self.handler_name_span(handler, name);
        let id = self.add_binding(name, BindingKind::ExceptHandler, span, false);
        self.visit_body(&handler.body);
        if !self.model.bindings[id].used
            && self.model.bindings[id].kind == BindingKind::ExceptHandler
        {
            self.model.unused_handler_names.push(id);
        }
        match previous {
            Some(previous) => {
                self.model.scopes[scope].bindings.insert(name, previous);
            }
            None => {
                self.model.scopes[scope].bindings.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> (Module, Vec<String>) {
        (pyflint_parser::parse_program(source).unwrap(), Vec::new())
    }

    fn unresolved(source: &str) -> Vec<String> {
        let (module, builtins) = build(source);
        let model = SemanticModel::build(source, &module, &builtins);
        model
            .unresolved_references()
            .iter()
            .map(|r| r.name.to_string())
            .collect()
    }

    fn unused_imports(source: &str) -> Vec<String> {
        let (module, builtins) = build(source);
        let model = SemanticModel::build(source, &module, &builtins);
        let mut names: Vec<_> = model
            .unused_imports()
            .iter()
            .map(|b| b.name.to_string())
            .collect();
        names.sort();
        names
    }

    fn unused_variables(source: &str) -> Vec<String> {
        let (module, builtins) = build(source);
        let model = SemanticModel::build(source, &module, &builtins);
        let mut names: Vec<_> = model
            .unused_variables()
            .iter()
            .map(|b| b.name.to_string())
            .collect();
        names.sort();
        names
    }

    fn redefinitions(source: &str) -> Vec<(String, usize)> {
        let (module, builtins) = build(source);
        let model = SemanticModel::build(source, &module, &builtins);
        model
            .redefinitions()
            .map(|(new, old)| (new.name.to_string(), old.span.start.row))
            .collect()
    }

    #[test]
    fn test_function_sees_later_module_names() {
        assert!(unresolved("def f():\n    return g()\n\ndef g():\n    return 1\n").is_empty());
    }

    #[test]
    fn test_undefined_name() {
        assert_eq!(unresolved("print(missing)\n"), vec!["missing"]);
    }

    #[test]
    fn test_builtins_and_dunders_resolve() {
        assert!(unresolved("print(len(__file__), __name__)\n").is_empty());
    }

    #[test]
    fn test_extra_builtins() {
        let source = "_(\"text\")\n";
        let module = pyflint_parser::parse_program(source).unwrap();
        let model = SemanticModel::build(source, &module, &["_".to_string()]);
        assert!(model.unresolved_references().is_empty());
    }

    #[test]
    fn test_class_scope_hidden_from_methods() {
        let source = "class A:\n    x = 1\n    def f(self):\n        return x\n";
        assert_eq!(unresolved(source), vec!["x"]);
    }

    #[test]
    fn test_class_scope_visible_in_body() {
        assert!(unresolved("class A:\n    x = 1\n    y = x + 1\n").is_empty());
    }

    #[test]
    fn test_star_import_suppresses_undefined() {
        assert!(unresolved("from os import *\nprint(path)\n").is_empty());
    }

    #[test]
    fn test_name_error_guard() {
        assert!(unresolved("try:\n    unicode\nexcept NameError:\n    pass\n").is_empty());
    }

    #[test]
    fn test_comprehension_variables_are_local() {
        assert_eq!(unresolved("[x for x in range(3)]\nprint(x)\n"), vec!["x"]);
    }

    #[test]
    fn test_global_declaration_defines_name() {
        let source = "def f():\n    global counter\n    counter = 1\n\ndef g():\n    return counter\n";
        assert!(unresolved(source).is_empty());
    }

    #[test]
    fn test_unused_imports() {
        assert_eq!(unused_imports("import os\nimport sys\nsys.exit()\n"), vec!["os"]);
    }

    #[test]
    fn test_future_and_all_are_used() {
        let source = "from __future__ import annotations\nfrom a import b\n__all__ = ['b']\n";
        assert!(unused_imports(source).is_empty());
    }

    #[test]
    fn test_import_used_inside_function() {
        assert!(unused_imports("import os\n\ndef f():\n    return os.getcwd()\n").is_empty());
    }

    #[test]
    fn test_unused_local() {
        assert_eq!(unused_variables("def f():\n    x = 1\n    y = 2\n    return y\n"), vec!["x"]);
    }

    #[test]
    fn test_unpacking_and_loops_not_reported() {
        let source = "def f(items):\n    a, b = items\n    for i in items:\n        pass\n    with open('f') as fh:\n        pass\n";
        assert!(unused_variables(source).is_empty());
    }

    #[test]
    fn test_literal_unpacking_is_reported() {
        assert_eq!(unused_variables("def f():\n    a, b = 1, 2\n    return a\n"), vec!["b"]);
    }

    #[test]
    fn test_locals_disables_unused_variables() {
        assert!(unused_variables("def f():\n    x = 1\n    return locals()\n").is_empty());
    }

    #[test]
    fn test_module_assignments_not_reported() {
        assert!(unused_variables("x = 1\n").is_empty());
    }

    #[test]
    fn test_unused_exception_name() {
        let source = "try:\n    pass\nexcept ValueError as error:\n    pass\n";
        let (module, builtins) = build(source);
        let model = SemanticModel::build(source, &module, &builtins);
        let unused = model.unused_variables();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].name, "error");
        assert_eq!(unused[0].span.start.row, 3);
        assert_eq!(unused[0].span.start.column, 22);
    }

    #[test]
    fn test_exception_name_unbound_after_handler() {
        let source = "try:\n    pass\nexcept ValueError as error:\n    print(error)\nprint(error)\n";
        assert_eq!(unresolved(source), vec!["error"]);
    }

    #[test]
    fn test_rebinding_keeps_used() {
        assert!(unused_variables("def f():\n    x = 1\n    print(x)\n    x = 2\n").is_empty());
    }

    #[test]
    fn test_redefinition_of_unused_import() {
        assert_eq!(redefinitions("import os\nimport os\n"), vec![("os".to_string(), 1)]);
    }

    #[test]
    fn test_redefinition_in_other_branch_is_fine() {
        let source = "try:\n    from json import loads\nexcept ImportError:\n    from simplejson import loads\n";
        assert!(redefinitions(source).is_empty());
    }

    #[test]
    fn test_decorated_redefinition_is_fine() {
        let source = "class A:\n    @property\n    def x(self):\n        return 1\n\n    @x.setter\n    def x(self, value):\n        pass\n";
        assert!(redefinitions(source).is_empty());
    }

    #[test]
    fn test_submodule_imports_do_not_redefine() {
        assert!(redefinitions("import os.path\nimport os.sep\n").is_empty());
    }

    #[test]
    fn test_del_removes_binding() {
        assert_eq!(unresolved("x = 1\ndel x\nprint(x)\n"), vec!["x"]);
    }
}
