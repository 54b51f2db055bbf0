//! Semantic Analysis for Ago
//!
//! A single-pass tree walk that infers a type for every expression from the
//! suffix convention, resolves stem-based casts and calls, and validates
//! control flow. Problems are collected as [`Diagnostic`]s - the walk never
//! stops at the first error; it substitutes `unknown` and continues.
//!
//! Besides diagnostics, the checker produces a [`Resolutions`] record keyed
//! by expression node identity. Code generators consume that record instead
//! of re-deriving suffix or cast logic.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::frontend::ast::*;
use crate::frontend::symbols::{Symbol, SymbolKind, SymbolTable};
use crate::stdlib::builtins::BUILTINS;
use crate::types::suffix;
use crate::types::{arithmetic_result, castable, compatible, SemType};
use crate::utils::Span;

// ==================== Diagnostics ====================

/// A semantic problem found during analysis. Immutable once created and
/// never used as control flow.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: Option<usize>,
    pub col: Option<usize>,
    /// The expression node the problem anchors to, when there is one
    pub node: Option<NodeId>,
}

impl Diagnostic {
    fn new(message: String, span: Span, node: Option<NodeId>) -> Self {
        let (line, col) = if span.line == 0 {
            (None, None)
        } else {
            (Some(span.line), Some(span.col))
        };
        Self { message, line, col, node }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.col) {
            (Some(line), Some(col)) => write!(f, "(line {}, col {}) {}", line, col, self.message),
            (Some(line), None) => write!(f, "(line {}) {}", line, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

// ==================== Resolution Record ====================

/// An identifier (or `id` variant) referenced under an alternate suffix:
/// the value of `base` is cast from `from` to `to` at runtime.
#[derive(Debug, Clone)]
pub struct CastSite {
    pub base: String,
    pub from: SemType,
    pub to: SemType,
}

/// A resolved call: the callee after stem resolution, the cast applied to
/// its return value (if called through an alternate suffix), and which
/// positional argument is the implicit receiver, if any.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub callee: String,
    pub cast: Option<SemType>,
    pub receiver_arg: Option<usize>,
}

/// Everything downstream consumers need, keyed by AST node identity
#[derive(Debug, Default)]
pub struct Resolutions {
    types: HashMap<NodeId, SemType>,
    casts: HashMap<NodeId, CastSite>,
    calls: HashMap<NodeId, CallSite>,
}

impl Resolutions {
    /// The inferred type of a checked expression node
    pub fn type_of(&self, id: NodeId) -> Option<SemType> {
        self.types.get(&id).copied()
    }

    /// The cast applied at an identifier site, if any
    pub fn cast_of(&self, id: NodeId) -> Option<&CastSite> {
        self.casts.get(&id)
    }

    /// The resolved callee at a call or method-chain site
    pub fn call_of(&self, id: NodeId) -> Option<&CallSite> {
        self.calls.get(&id)
    }
}

// ==================== Semantic Checker ====================

/// The checker. One instance processes exactly one compilation unit.
pub struct SemanticChecker {
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    resolutions: Resolutions,
    loop_depth: usize,
    current_function: Option<Symbol>,
    current_lambda: Option<Symbol>,
    function_has_return: bool,
}

impl SemanticChecker {
    pub fn new() -> Self {
        let mut checker = Self {
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
            resolutions: Resolutions::default(),
            loop_depth: 0,
            current_function: None,
            current_lambda: None,
            function_has_return: false,
        };
        checker.register_stdlib();
        checker
    }

    /// Seed the global scope with standard-library signatures
    fn register_stdlib(&mut self) {
        for builtin in BUILTINS {
            let sym = Symbol::func(
                builtin.name,
                builtin.params.to_vec(),
                builtin.ret,
                Span::dummy(),
            );
            self.symbols
                .declare(sym)
                .expect("builtin names are unique");
        }
    }

    /// Walk the whole program, top-level items strictly in source order
    pub fn check(&mut self, program: &Program) {
        for item in &program.items {
            match item {
                Item::Function(func) => self.check_function(func),
                Item::Stmt(stmt) => self.check_stmt(stmt),
            }
        }
        debug!("check finished with {} diagnostic(s)", self.diagnostics.len());
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// The resolution record for code generators
    pub fn resolutions(&self) -> &Resolutions {
        &self.resolutions
    }

    /// Read-only view of the symbol table (global scope signatures)
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    // ==================== Reporting Helpers ====================

    fn report(&mut self, message: String, span: Span, node: Option<NodeId>) {
        self.diagnostics.push(Diagnostic::new(message, span, node));
    }

    /// Get a type from a name suffix, reporting if the name has none
    fn require_suffix_type(&mut self, name: &str, span: Span) -> SemType {
        match suffix::suffix_type(name) {
            Some(ty) => ty,
            None => {
                self.report(
                    format!(
                        "Variable '{}' does not have a valid type suffix. Valid suffixes: {}",
                        name,
                        suffix::suffix_list()
                    ),
                    span,
                    None,
                );
                SemType::Unknown
            }
        }
    }

    fn check_compatible(
        &mut self,
        actual: SemType,
        expected: SemType,
        context: &str,
        span: Span,
        node: Option<NodeId>,
    ) -> bool {
        if compatible(actual, expected) {
            return true;
        }
        self.report(
            format!(
                "Type mismatch in {}: expected '{}', got '{}'",
                context, expected, actual
            ),
            span,
            node,
        );
        false
    }

    // ==================== Declarations & Functions ====================

    fn param_symbols(&mut self, params: &[Param]) -> Vec<Symbol> {
        params
            .iter()
            .map(|p| {
                let ty = self.require_suffix_type(&p.name, p.span);
                Symbol {
                    name: p.name.clone(),
                    ty,
                    kind: SymbolKind::Param,
                    scope: 0,
                    num_params: Some(0),
                    param_types: Vec::new(),
                    return_type: None,
                    span: p.span,
                }
            })
            .collect()
    }

    /// Function declaration. The function symbol lands in the *enclosing*
    /// scope before the body scope is pushed, so recursive self-calls work.
    fn check_function(&mut self, func: &FunctionDecl) {
        let return_type = self.require_suffix_type(&func.name, func.span);
        let params = self.param_symbols(&func.params);
        let param_types: Vec<SemType> = params.iter().map(|p| p.ty).collect();

        let symbol = Symbol {
            name: func.name.clone(),
            ty: SemType::Function,
            kind: SymbolKind::Func,
            scope: 0,
            num_params: Some(params.len()),
            param_types,
            return_type: Some(return_type),
            span: func.span,
        };
        if let Err(msg) = self.symbols.declare(symbol.clone()) {
            self.report(msg, func.span, None);
        }

        let prev_function = self.current_function.replace(symbol);
        let prev_has_return = std::mem::replace(&mut self.function_has_return, false);
        self.symbols.enter_scope();
        for param in params {
            if let Err(msg) = self.symbols.declare(param) {
                self.report(msg, func.span, None);
            }
        }

        self.check_block(&func.body);

        // Functions whose suffix implies null need no explicit return
        if !matches!(return_type, SemType::Null | SemType::Unknown | SemType::Any)
            && !self.function_has_return
        {
            self.report(
                format!(
                    "Function '{}' expects to return '{}' but has no return statement",
                    func.name, return_type
                ),
                func.span,
                None,
            );
        }

        self.symbols.exit_scope();
        self.current_function = prev_function;
        self.function_has_return = prev_has_return;
    }

    /// Lambda body check. Returns the lambda's symbol so declarations can
    /// carry its signature.
    fn check_lambda(&mut self, lambda: &LambdaDecl) -> Symbol {
        let params = self.param_symbols(&lambda.params);
        let param_types: Vec<SemType> = params.iter().map(|p| p.ty).collect();

        let symbol = Symbol {
            name: "<lambda>".to_string(),
            ty: SemType::Function,
            kind: SymbolKind::Lambda,
            scope: 0,
            num_params: Some(params.len()),
            param_types,
            return_type: Some(SemType::Any),
            span: lambda.span,
        };

        let prev_lambda = self.current_lambda.replace(symbol.clone());
        let prev_function = self.current_function.replace(symbol.clone());
        let prev_has_return = std::mem::replace(&mut self.function_has_return, false);
        self.symbols.enter_scope();
        for param in params {
            if let Err(msg) = self.symbols.declare(param) {
                self.report(msg, lambda.span, None);
            }
        }

        self.check_block(&lambda.body);

        self.symbols.exit_scope();
        self.current_lambda = prev_lambda;
        self.current_function = prev_function;
        self.function_has_return = prev_has_return;
        symbol
    }

    fn check_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
    }

    // ==================== Statements ====================

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration { name, value, span } => {
                self.check_declaration(name, value, *span);
            }
            Stmt::Assignment { target, indices, value, span } => {
                self.check_assignment(target, indices, value, *span);
            }
            Stmt::If { cond, then_block, elifs, else_block, span } => {
                let cond_ty = self.infer_expr(cond);
                self.check_compatible(cond_ty, SemType::Bool, "if condition", *span, Some(cond.id));

                self.symbols.enter_scope();
                self.check_block(then_block);
                self.symbols.exit_scope();

                for elif in elifs {
                    let elif_ty = self.infer_expr(&elif.cond);
                    self.check_compatible(
                        elif_ty,
                        SemType::Bool,
                        "elif condition",
                        elif.span,
                        Some(elif.cond.id),
                    );
                    self.symbols.enter_scope();
                    self.check_block(&elif.body);
                    self.symbols.exit_scope();
                }

                if let Some(else_block) = else_block {
                    self.symbols.enter_scope();
                    self.check_block(else_block);
                    self.symbols.exit_scope();
                }
            }
            Stmt::While { cond, body, span } => {
                let cond_ty = self.infer_expr(cond);
                self.check_compatible(
                    cond_ty,
                    SemType::Bool,
                    "while condition",
                    *span,
                    Some(cond.id),
                );
                self.loop_depth += 1;
                self.symbols.enter_scope();
                self.check_block(body);
                self.symbols.exit_scope();
                self.loop_depth -= 1;
            }
            Stmt::For { iterator, iterable, body, span } => {
                self.check_for(iterator, iterable, body, *span);
            }
            Stmt::Return { value, span } => self.check_return(value.as_ref(), *span),
            Stmt::Break { span } => {
                if self.loop_depth == 0 {
                    self.report("'frio' (break) outside of loop".to_string(), *span, None);
                }
            }
            Stmt::Continue { span } => {
                if self.loop_depth == 0 {
                    self.report("'pergo' (continue) outside of loop".to_string(), *span, None);
                }
            }
            Stmt::Pass { .. } => {}
            Stmt::Expr(expr) => {
                self.infer_expr(expr);
            }
        }
    }

    fn check_declaration(&mut self, name: &str, value: &Expr, span: Span) {
        let expected = self.require_suffix_type(name, span);

        // Type the initializer first: a same-stem variable about to be
        // retired must still be referenceable from the right-hand side
        let actual;
        let symbol;
        if let ExprKind::Lambda(lambda) = &value.kind {
            let lam = self.check_lambda(lambda);
            self.resolutions.types.insert(value.id, SemType::Function);
            actual = SemType::Function;
            symbol = Symbol {
                name: name.to_string(),
                ty: expected,
                kind: SymbolKind::Var,
                scope: 0,
                num_params: lam.num_params,
                param_types: lam.param_types,
                return_type: lam.return_type,
                span,
            };
        } else {
            actual = self.infer_expr(value);
            if actual == SemType::Function || expected == SemType::Function {
                // A function value from elsewhere: arity unknown
                symbol = Symbol {
                    name: name.to_string(),
                    ty: expected,
                    kind: SymbolKind::Var,
                    scope: 0,
                    num_params: None,
                    param_types: Vec::new(),
                    return_type: None,
                    span,
                };
            } else {
                symbol = Symbol::var(name, expected, span);
            }
        }

        self.check_compatible(
            actual,
            expected,
            &format!("declaration of '{}'", name),
            span,
            Some(value.id),
        );

        if expected.is_list() && expected != SemType::ListAny {
            self.validate_list_elements(value, expected, name, span);
        }

        // One variable per stem and scope: the new declaration retires any
        // same-stem variable, now that its initializer has been checked
        if let Some(new_stem) = suffix::stem(name) {
            for existing in self.symbols.local_names() {
                if existing == name {
                    continue;
                }
                let is_var = self
                    .symbols
                    .lookup_local(&existing)
                    .map_or(false, |s| s.kind == SymbolKind::Var);
                if is_var && suffix::stem(&existing) == Some(new_stem) {
                    debug!("retiring '{}' in favor of '{}'", existing, name);
                    self.symbols.remove_local(&existing);
                }
            }
        }

        if let Err(msg) = self.symbols.declare(symbol) {
            self.report(msg, span, None);
        }
    }

    /// Elementwise check of a list literal against a concrete list type.
    /// Stricter than assignment: int may widen to float, nothing else.
    fn validate_list_elements(
        &mut self,
        value: &Expr,
        list_ty: SemType,
        var_name: &str,
        span: Span,
    ) {
        let ExprKind::List(elements) = &value.kind else {
            return;
        };
        let want = list_ty.element_type();
        for (i, elem) in elements.iter().enumerate() {
            let got = self
                .resolutions
                .type_of(elem.id)
                .unwrap_or(SemType::Unknown);
            if got == want || got.is_wild() {
                continue;
            }
            if got == SemType::Int && want == SemType::Float {
                continue;
            }
            self.report(
                format!(
                    "List element {} has type '{}', but '{}' expects '{}' elements",
                    i, got, var_name, want
                ),
                span,
                Some(elem.id),
            );
        }
    }

    fn check_assignment(&mut self, target: &str, indices: &[Expr], value: &Expr, span: Span) {
        let Some(sym) = self.symbols.lookup(target).cloned() else {
            self.report(
                format!("Use of undeclared identifier '{}'", target),
                span,
                None,
            );
            return;
        };

        let mut effective = sym.ty;
        for (i, index) in indices.iter().enumerate() {
            self.infer_expr(index);
            if i == 0 {
                effective = if effective.is_list() {
                    effective.element_type()
                } else {
                    match effective {
                        SemType::Str => SemType::Str,
                        SemType::Struct => SemType::Any,
                        SemType::Unknown => SemType::Any,
                        other => {
                            self.report(
                                format!("Cannot index non-indexable type '{}'", other),
                                span,
                                None,
                            );
                            SemType::Unknown
                        }
                    }
                };
            } else {
                // Deeper levels degrade without further complaints
                effective = match effective {
                    t if t.is_list() => t.element_type(),
                    SemType::Str => SemType::Str,
                    _ => SemType::Any,
                };
            }
        }

        let rhs = self.infer_expr(value);
        self.check_compatible(
            rhs,
            effective,
            &format!("assignment to '{}'", target),
            span,
            Some(value.id),
        );
    }

    fn check_for(&mut self, iterator: &str, iterable: &Expr, body: &Block, span: Span) {
        let iterable_ty = self.infer_expr(iterable);
        if !iterable_ty.is_list()
            && !matches!(
                iterable_ty,
                SemType::Str | SemType::Range | SemType::Any | SemType::Unknown
            )
        {
            self.report(
                format!("Cannot iterate over non-iterable type '{}'", iterable_ty),
                span,
                Some(iterable.id),
            );
        }

        let element = if iterable_ty.is_list() {
            iterable_ty.element_type()
        } else {
            match iterable_ty {
                SemType::Str => SemType::Str,
                SemType::Range => SemType::Int,
                _ => SemType::Any,
            }
        };

        let expected = self.require_suffix_type(iterator, span);
        // The iterator suffix must equal the element type exactly - for
        // loops do not widen
        if expected != SemType::Unknown && element != SemType::Any && element != expected {
            self.report(
                format!(
                    "Type mismatch in for loop iterator '{}': expected '{}', got '{}'",
                    iterator, expected, element
                ),
                span,
                None,
            );
        }

        self.loop_depth += 1;
        self.symbols.enter_scope();
        if let Err(msg) = self.symbols.declare(Symbol::var(iterator, element, span)) {
            self.report(msg, span, None);
        }
        self.check_block(body);
        self.symbols.exit_scope();
        self.loop_depth -= 1;
    }

    fn check_return(&mut self, value: Option<&Expr>, span: Span) {
        if self.current_function.is_none() {
            self.report("'redeo' (return) outside of function".to_string(), span, None);
            return;
        }
        self.function_has_return = true;

        if let Some(expr) = value {
            let returned = self.infer_expr(expr);
            let expected = self
                .current_function
                .as_ref()
                .and_then(|f| f.return_type);
            if let Some(expected) = expected {
                if !expected.is_wild() && !compatible(returned, expected) {
                    self.report(
                        format!(
                            "Return type mismatch: expected '{}', but got '{}'",
                            expected, returned
                        ),
                        span,
                        Some(expr.id),
                    );
                }
            }
        }
    }

    // ==================== Expression Inference ====================

    /// Infer an expression's type, recording it in the resolution record
    fn infer_expr(&mut self, expr: &Expr) -> SemType {
        let ty = self.infer_expr_kind(expr);
        self.resolutions.types.insert(expr.id, ty);
        ty
    }

    fn infer_expr_kind(&mut self, expr: &Expr) -> SemType {
        match &expr.kind {
            ExprKind::Int(_) => SemType::Int,
            ExprKind::Float(_) => SemType::Float,
            ExprKind::Str(_) => SemType::Str,
            ExprKind::Bool(_) => SemType::Bool,
            ExprKind::Null => SemType::Null,
            ExprKind::Ident(name) => self.resolve_ident(name, expr.id, expr.span),
            ExprKind::Id => self.resolve_id_keyword(expr.span),
            ExprKind::List(elements) => self.infer_list(elements),
            ExprKind::StructLit(entries) => self.check_struct_lit(entries),
            ExprKind::Index { base, index } => {
                let base_ty = self.infer_expr(base);
                self.infer_expr(index);
                match base_ty {
                    t if t.is_list() => t.element_type(),
                    SemType::Str => SemType::Str,
                    _ => SemType::Any,
                }
            }
            ExprKind::Field { base, field } => {
                self.infer_expr(base);
                match field {
                    FieldKey::Str(_) => SemType::Any,
                    FieldKey::Ident(name) => suffix::suffix_type(name).unwrap_or(SemType::Any),
                }
            }
            ExprKind::Call { callee, args } => self.check_call(expr.id, callee, args, expr.span),
            ExprKind::MethodCall { receiver, method, args } => {
                self.check_method_call(expr.id, receiver, method, args, expr.span)
            }
            ExprKind::Lambda(lambda) => {
                self.check_lambda(lambda);
                SemType::Function
            }
            ExprKind::Binary { op, left, right } => {
                self.infer_binary(*op, left, right, expr.span)
            }
            ExprKind::Unary { op, expr: operand } => self.infer_unary(*op, operand, expr.span),
        }
    }

    fn infer_list(&mut self, elements: &[Expr]) -> SemType {
        if elements.is_empty() {
            return SemType::ListAny;
        }
        let mut elem_ty = None;
        let mut uniform = true;
        for elem in elements {
            let ty = self.infer_expr(elem);
            match elem_ty {
                None => elem_ty = Some(ty),
                Some(prev) if prev != ty => uniform = false,
                Some(_) => {}
            }
        }
        match elem_ty {
            Some(ty) if uniform => SemType::list_of(ty),
            _ => SemType::ListAny,
        }
    }

    /// Struct literal: identifier keys must carry a valid suffix whose type
    /// accepts the value; string-literal keys bypass the check entirely.
    fn check_struct_lit(&mut self, entries: &[StructEntry]) -> SemType {
        for entry in entries {
            let value_ty = self.infer_expr(&entry.value);
            let StructKey::Ident(key) = &entry.key else {
                continue;
            };
            match suffix::suffix_type(key) {
                None => {
                    self.report(
                        format!("Struct key '{}' does not have a valid type suffix", key),
                        entry.span,
                        Some(entry.value.id),
                    );
                }
                Some(expected) => {
                    if !compatible(value_ty, expected) {
                        self.report(
                            format!(
                                "Struct key '{}' expects type '{}' but value has type '{}'",
                                key, expected, value_ty
                            ),
                            entry.span,
                            Some(entry.value.id),
                        );
                    }
                }
            }
        }
        SemType::Struct
    }

    // ==================== Name Resolution ====================

    /// Resolve an identifier used as an expression: exact name first, then
    /// a same-stem symbol referenced through an alternate suffix (a cast).
    fn resolve_ident(&mut self, name: &str, id: NodeId, span: Span) -> SemType {
        // `id` variants (ida, ides, ...) reach the lambda parameter
        if let Some(rest) = name.strip_prefix("id") {
            if !rest.is_empty()
                && self.current_lambda.is_some()
                && suffix::type_of_suffix(rest).is_some()
            {
                let target = suffix::type_of_suffix(rest).expect("checked above");
                return self.id_cast(name, target, id, span);
            }
        }

        if let Some(sym) = self.symbols.lookup(name) {
            return sym.ty;
        }

        if let Some((stem_part, _, target)) = suffix::split(name) {
            if let Some(base) = self.find_by_stem(stem_part, name, false) {
                if castable(base.ty, target) {
                    self.resolutions.casts.insert(
                        id,
                        CastSite { base: base.name.clone(), from: base.ty, to: target },
                    );
                    return target;
                }
                self.report(
                    format!(
                        "Cannot cast variable '{}' (type '{}') to '{}' using identifier '{}'",
                        base.name, base.ty, target, name
                    ),
                    span,
                    Some(id),
                );
                return SemType::Unknown;
            }
        }

        self.report(format!("Variable '{}' not defined.", name), span, Some(id));
        SemType::Unknown
    }

    /// Innermost-outward scan for a symbol with the given stem. With
    /// `callable_only`, skips symbols that cannot be called.
    fn find_by_stem(&self, stem_part: &str, exclude: &str, callable_only: bool) -> Option<Symbol> {
        let mut found: Option<Symbol> = None;
        self.symbols.visit_visible(|sym| {
            if sym.name == exclude {
                return false;
            }
            if callable_only && !sym.is_callable() {
                return false;
            }
            if suffix::stem(&sym.name) == Some(stem_part) {
                found = Some(sym.clone());
                true
            } else {
                false
            }
        });
        found
    }

    /// The bare `id` keyword: the sole parameter of a one-parameter lambda
    fn resolve_id_keyword(&mut self, span: Span) -> SemType {
        let Some(lambda) = self.current_lambda.clone() else {
            self.report(
                "'id' keyword can only be used inside a lambda function".to_string(),
                span,
                None,
            );
            return SemType::Unknown;
        };
        if lambda.num_params != Some(1) {
            self.report(
                format!(
                    "'id' keyword can only be used in lambdas with exactly 1 parameter, \
                     but this lambda has {} parameters",
                    lambda.num_params.unwrap_or(0)
                ),
                span,
                None,
            );
            return SemType::Unknown;
        }
        lambda.param_types.first().copied().unwrap_or(SemType::Any)
    }

    /// An `id` variant like `ida` or `ides`: the lambda parameter cast to
    /// the type the suffix implies
    fn id_cast(&mut self, name: &str, target: SemType, id: NodeId, span: Span) -> SemType {
        let lambda = self.current_lambda.clone().expect("id cast outside lambda");
        if lambda.num_params != Some(1) {
            self.report(
                format!(
                    "'{}' (id keyword variant) can only be used in lambdas with exactly 1 parameter",
                    name
                ),
                span,
                Some(id),
            );
            return SemType::Unknown;
        }
        let from = lambda.param_types.first().copied().unwrap_or(SemType::Any);
        if !castable(from, target) {
            self.report(
                format!(
                    "Cannot cast 'id' (type '{}') to '{}' using identifier '{}'",
                    from, target, name
                ),
                span,
                Some(id),
            );
            return SemType::Unknown;
        }
        self.resolutions
            .casts
            .insert(id, CastSite { base: "id".to_string(), from, to: target });
        target
    }

    // ==================== Calls ====================

    /// Plain call `callee(args)`: exact name first, then a same-stem
    /// function called through an alternate suffix (casting its return)
    fn check_call(&mut self, id: NodeId, callee: &str, args: &[Expr], span: Span) -> SemType {
        if let Some(sym) = self.symbols.lookup(callee).cloned() {
            if !sym.is_callable() {
                for arg in args {
                    self.infer_expr(arg);
                }
                self.report(
                    format!("'{}' is not callable (type '{}')", callee, sym.ty),
                    span,
                    Some(id),
                );
                return SemType::Unknown;
            }
            self.validate_call_args(&sym, args, span, id);
            self.resolutions.calls.insert(
                id,
                CallSite { callee: sym.name.clone(), cast: None, receiver_arg: None },
            );
            return sym.return_type.unwrap_or(SemType::Any);
        }

        if let Some((stem_part, _, target)) = suffix::split(callee) {
            if let Some(base) = self.find_by_stem(stem_part, callee, true) {
                self.validate_call_args(&base, args, span, id);
                let mut result = target;
                if let Some(rt) = base.return_type {
                    if !castable(rt, target) {
                        self.report(
                            format!(
                                "Cannot cast return type '{}' of '{}' to '{}' when calling as '{}'",
                                rt, base.name, target, callee
                            ),
                            span,
                            Some(id),
                        );
                        result = SemType::Unknown;
                    }
                }
                self.resolutions.calls.insert(
                    id,
                    CallSite { callee: base.name.clone(), cast: Some(target), receiver_arg: None },
                );
                return result;
            }
        }

        for arg in args {
            self.infer_expr(arg);
        }
        self.report(
            format!("Use of undeclared identifier '{}'", callee),
            span,
            Some(id),
        );
        SemType::Unknown
    }

    fn validate_call_args(&mut self, sym: &Symbol, args: &[Expr], span: Span, id: NodeId) {
        let arg_types: Vec<SemType> = args.iter().map(|a| self.infer_expr(a)).collect();
        let Some(expected) = sym.num_params else {
            return;
        };
        if arg_types.len() != expected {
            self.report(
                format!(
                    "'{}' expects {} argument(s), but got {}",
                    sym.name,
                    expected,
                    arg_types.len()
                ),
                span,
                Some(id),
            );
            return;
        }
        for (i, (ty, want)) in arg_types.iter().zip(&sym.param_types).enumerate() {
            if !compatible(*ty, *want) {
                self.report(
                    format!(
                        "Argument {} of '{}' expects type '{}', but got '{}'",
                        i + 1,
                        sym.name,
                        want,
                        ty
                    ),
                    span,
                    Some(id),
                );
            }
        }
    }

    /// Method-chain call `recv.f(a)`: the receiver is argument 0. Resolves
    /// against a known callee, a bare-suffix cast (`.es()`), or a same-stem
    /// function.
    fn check_method_call(
        &mut self,
        id: NodeId,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
        span: Span,
    ) -> SemType {
        let recv_ty = self.infer_expr(receiver);

        if let Some(sym) = self.symbols.lookup(method).cloned() {
            if !sym.is_callable() {
                for arg in args {
                    self.infer_expr(arg);
                }
                self.report(
                    format!("'{}' is not callable in method chain", method),
                    span,
                    Some(id),
                );
                return SemType::Any;
            }
            self.validate_chain_call(&sym, recv_ty, args, span, id);
            self.resolutions.calls.insert(
                id,
                CallSite { callee: sym.name.clone(), cast: None, receiver_arg: Some(0) },
            );
            // null/function results cannot meaningfully continue a chain
            return match sym.return_type {
                Some(rt) if rt != SemType::Null && rt != SemType::Function => rt,
                _ => SemType::Any,
            };
        }

        // `.es()`, `.a()`: a pure cast of the receiver
        if let Some(target) = suffix::type_of_suffix(method) {
            for arg in args {
                self.infer_expr(arg);
            }
            self.resolutions.casts.insert(
                id,
                CastSite { base: method.to_string(), from: recv_ty, to: target },
            );
            return target;
        }

        if let Some((stem_part, sfx, target)) = suffix::split(method) {
            if let Some(base) = self.find_by_stem(stem_part, method, true) {
                for arg in args {
                    self.infer_expr(arg);
                }
                self.resolutions.calls.insert(
                    id,
                    CallSite {
                        callee: base.name.clone(),
                        cast: Some(target),
                        receiver_arg: Some(0),
                    },
                );
                return target;
            }
            for arg in args {
                self.infer_expr(arg);
            }
            self.report(
                format!(
                    "No function with stem '{}' found for '{}'. Use '.{}()' for type casting.",
                    stem_part, method, sfx
                ),
                span,
                Some(id),
            );
            return SemType::Any;
        }

        // No suffix and no symbol: the receiver may be Any-typed, let it go
        for arg in args {
            self.infer_expr(arg);
        }
        SemType::Any
    }

    fn validate_chain_call(
        &mut self,
        sym: &Symbol,
        recv_ty: SemType,
        args: &[Expr],
        span: Span,
        id: NodeId,
    ) {
        let arg_types: Vec<SemType> = args.iter().map(|a| self.infer_expr(a)).collect();
        let Some(expected) = sym.num_params else {
            return;
        };
        // A 0-parameter function was not designed for chaining; skip the
        // receiver checks entirely
        if expected == 0 {
            return;
        }
        let actual = arg_types.len() + 1;
        if actual != expected {
            self.report(
                format!(
                    "Method '{}' expects {} argument(s) (including receiver), but got {}",
                    sym.name, expected, actual
                ),
                span,
                Some(id),
            );
            return;
        }
        if let Some(&first) = sym.param_types.first() {
            if !compatible(recv_ty, first) {
                self.report(
                    format!(
                        "Method '{}' expects first argument of type '{}', but receiver has type '{}'",
                        sym.name, first, recv_ty
                    ),
                    span,
                    Some(id),
                );
            }
        }
        for (i, (ty, want)) in arg_types.iter().zip(sym.param_types.iter().skip(1)).enumerate() {
            if !compatible(*ty, *want) {
                self.report(
                    format!(
                        "Argument {} of '{}' expects type '{}', but got '{}'",
                        i + 2,
                        sym.name,
                        want,
                        ty
                    ),
                    span,
                    Some(id),
                );
            }
        }
    }

    // ==================== Operators ====================

    fn infer_binary(&mut self, op: BinOp, left: &Expr, right: &Expr, span: Span) -> SemType {
        let lt = self.infer_expr(left);
        let rt = self.infer_expr(right);

        match op {
            BinOp::And | BinOp::Or => {
                if lt != SemType::Bool && !lt.is_wild() {
                    self.report(
                        format!("Left operand of '{}' must be bool, got '{}'", op.symbol(), lt),
                        span,
                        Some(left.id),
                    );
                }
                if rt != SemType::Bool && !rt.is_wild() {
                    self.report(
                        format!("Right operand of '{}' must be bool, got '{}'", op.symbol(), rt),
                        span,
                        Some(right.id),
                    );
                }
                SemType::Bool
            }
            BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor => SemType::Int,
            BinOp::Eq | BinOp::Ne => {
                let comparable = lt == rt
                    || (lt.is_numeric() && rt.is_numeric())
                    || lt == SemType::Null
                    || rt == SemType::Null
                    || lt.is_wild()
                    || rt.is_wild();
                if !comparable {
                    self.report(
                        format!(
                            "{} {} {} is an invalid comparison between types.",
                            lt,
                            op.symbol(),
                            rt
                        ),
                        span,
                        None,
                    );
                }
                SemType::Bool
            }
            // 'est' tests type identity; any two values qualify
            BinOp::Est => SemType::Bool,
            BinOp::In => {
                let valid_haystack =
                    rt == SemType::Str || rt.is_list() || rt == SemType::Struct || rt.is_wild();
                if !valid_haystack {
                    self.report(
                        format!(
                            "Cannot use 'in' operator with '{}' - right operand must be string, list, or struct",
                            rt
                        ),
                        span,
                        Some(right.id),
                    );
                }
                if rt == SemType::Str {
                    if lt != SemType::Str && !lt.is_wild() {
                        self.report(
                            format!("String membership requires string needle, got '{}'", lt),
                            span,
                            Some(left.id),
                        );
                    }
                } else if rt == SemType::Struct {
                    if lt != SemType::Str && !lt.is_wild() {
                        self.report(
                            format!("Struct key lookup requires string needle, got '{}'", lt),
                            span,
                            Some(left.id),
                        );
                    }
                } else if rt.is_list() {
                    let elem = rt.element_type();
                    if elem != SemType::Any && !compatible(lt, elem) {
                        self.report(
                            format!(
                                "List membership: needle type '{}' incompatible with list element type '{}'",
                                lt, elem
                            ),
                            span,
                            Some(left.id),
                        );
                    }
                }
                SemType::Bool
            }
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                let valid = (lt.is_numeric() && rt.is_numeric())
                    || (lt == SemType::Str && rt == SemType::Str)
                    || lt.is_wild()
                    || rt.is_wild();
                if !valid {
                    self.report(
                        format!(
                            "Cannot compare {} {} {}. Ordering comparisons only work on numeric or string types.",
                            lt,
                            op.symbol(),
                            rt
                        ),
                        span,
                        None,
                    );
                }
                SemType::Bool
            }
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                // String concatenation rides on '+'
                if op == BinOp::Add && (lt == SemType::Str || rt == SemType::Str) {
                    return SemType::Str;
                }
                if !lt.is_numeric() && !lt.is_wild() {
                    self.report(
                        format!(
                            "'{}' is not a numeric type, but you're trying to use it in a numeric expression.",
                            lt
                        ),
                        span,
                        Some(left.id),
                    );
                }
                if !rt.is_numeric() && !rt.is_wild() {
                    self.report(
                        format!(
                            "'{}' is not a numeric type, but you're trying to use it in a numeric expression.",
                            rt
                        ),
                        span,
                        Some(right.id),
                    );
                }
                arithmetic_result(lt, rt)
            }
            BinOp::Range | BinOp::RangeExcl => {
                if lt != SemType::Int && !lt.is_wild() {
                    self.report(
                        format!("Left operand of '{}' must be int, got '{}'", op.symbol(), lt),
                        span,
                        Some(left.id),
                    );
                }
                if rt != SemType::Int && !rt.is_wild() {
                    self.report(
                        format!("Right operand of '{}' must be int, got '{}'", op.symbol(), rt),
                        span,
                        Some(right.id),
                    );
                }
                SemType::Range
            }
            BinOp::Elvis => {
                if lt == SemType::Null {
                    rt
                } else {
                    lt
                }
            }
        }
    }

    fn infer_unary(&mut self, op: UnOp, operand: &Expr, span: Span) -> SemType {
        let ty = self.infer_expr(operand);
        match op {
            UnOp::Not => {
                if ty != SemType::Bool && !ty.is_wild() {
                    self.report(
                        format!("Unary 'non' requires bool operand, got '{}'", ty),
                        span,
                        Some(operand.id),
                    );
                }
                SemType::Bool
            }
            UnOp::Neg | UnOp::Pos => {
                if !ty.is_numeric() && !ty.is_wild() {
                    self.report(
                        format!("Unary '{}' requires numeric operand, got '{}'", op.symbol(), ty),
                        span,
                        Some(operand.id),
                    );
                    return SemType::Unknown;
                }
                ty
            }
        }
    }
}

impl Default for SemanticChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Program {
        Parser::new(src)
            .expect("lex should succeed")
            .parse_program()
            .expect("parse should succeed")
    }

    fn run_checker(src: &str) -> SemanticChecker {
        let program = parse(src);
        let mut checker = SemanticChecker::new();
        checker.check(&program);
        checker
    }

    fn check(src: &str) -> Vec<String> {
        run_checker(src)
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    fn has_error(errors: &[String], substr: &str) -> bool {
        errors.iter().any(|e| e.contains(substr))
    }

    // ---------- basic variable semantics ----------

    #[test]
    fn declaration_then_assignment_has_no_errors() {
        assert_eq!(check("xa := 1\nxa = 2\n"), Vec::<String>::new());
    }

    #[test]
    fn undeclared_variable_in_assignment_reports_error() {
        let errors = check("xa = 1\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Use of undeclared identifier 'xa'"));
    }

    #[test]
    fn duplicate_declaration_reports_error() {
        let errors = check("xa := 1\nxa := 2\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Variable name already exists in this scope"));
    }

    #[test]
    fn indexed_reassignment_requires_declaration() {
        let errors = check("arraem[0] = 1\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Use of undeclared identifier 'arraem'"));
    }

    #[test]
    fn declaration_type_mismatch() {
        let errors = check("xa := \"text\"\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Type mismatch in declaration of 'xa': expected 'int', got 'string'"
        ));
    }

    #[test]
    fn declaration_without_suffix_reports_error() {
        let errors = check("xyz := 1\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "does not have a valid type suffix"));
    }

    #[test]
    fn int_widens_to_float_in_declaration() {
        assert_eq!(check("xae := 1\n"), Vec::<String>::new());
    }

    // ---------- stem casting ----------

    #[test]
    fn stem_cast_resolves_against_same_stem_symbol() {
        // xes refers to xa's value, cast to string
        assert_eq!(check("xa := 10\nyes := xes\n"), Vec::<String>::new());
    }

    #[test]
    fn stem_retirement_keeps_old_variable_alive_for_initializer() {
        // The RHS xes must still see xa before the new xes retires it
        let checker = run_checker("xa := 10\nxes := xes\ndici(xes)\n");
        assert_eq!(checker.diagnostics().len(), 0);
        // After checking, only the string variable remains in scope 0
        assert!(checker.symbols().lookup("xa").is_none());
        assert_eq!(checker.symbols().lookup("xes").unwrap().ty, SemType::Str);
    }

    #[test]
    fn exactly_one_symbol_per_stem() {
        // xae retires xa; a later cast resolves through xae
        let checker = run_checker("xa := 1\nxae := 2.0\nyes := xes\n");
        assert_eq!(checker.diagnostics().len(), 0);
        let program = parse("xa := 1\nxae := 2.0\nyes := xes\n");
        // Find the xes ident node and confirm its cast base is xae
        let mut cast_base = None;
        if let Item::Stmt(Stmt::Declaration { value, .. }) = &program.items[2] {
            let mut checker = SemanticChecker::new();
            checker.check(&program);
            cast_base = checker
                .resolutions()
                .cast_of(value.id)
                .map(|c| c.base.clone());
        }
        assert_eq!(cast_base.as_deref(), Some("xae"));
    }

    #[test]
    fn invalid_stem_cast_reports_error() {
        // struct only casts to bool or string, not to int_list
        let errors = check("su := {}\nlaem := saem\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Cannot cast variable 'su' (type 'struct') to 'int_list' using identifier 'saem'"
        ));
    }

    #[test]
    fn unresolvable_identifier_reports_not_defined() {
        let errors = check("xa := ya\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Variable 'ya' not defined."));
    }

    // ---------- functions and returns ----------

    #[test]
    fn return_outside_function_reports_error() {
        let errors = check("redeo verum\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'redeo' (return) outside of function"));
    }

    #[test]
    fn return_inside_function_is_allowed() {
        assert_eq!(
            check("des fooa(xa) {\n    redeo xa\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn missing_return_detected_for_int_function() {
        let errors = check("des fooa(xa) {\n    omitto\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Function 'fooa' expects to return 'int' but has no return statement"
        ));
    }

    #[test]
    fn null_function_needs_no_return() {
        assert_eq!(
            check("des fooi(xa) {\n    omitto\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn return_type_mismatch_reports_error() {
        let errors = check("des fooa(xa) {\n    redeo \"text\"\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Return type mismatch: expected 'int', but got 'string'"
        ));
    }

    #[test]
    fn recursion_is_allowed() {
        let src = "des facta(na) {\n    si na <= 1 {\n        redeo 1\n    }\n    redeo na * facta(na - 1)\n}\n";
        assert_eq!(check(src), Vec::<String>::new());
    }

    #[test]
    fn forward_reference_is_rejected() {
        // Single-pass order: a later function is invisible earlier
        let errors = check("fooa(1)\ndes fooa(xa) {\n    redeo xa\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Use of undeclared identifier 'fooa'"));
    }

    // ---------- calls ----------

    #[test]
    fn call_to_undeclared_function_reports_error() {
        let errors = check("fooa(1, 2)\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Use of undeclared identifier 'fooa'"));
    }

    #[test]
    fn call_to_declared_function_has_no_errors() {
        assert_eq!(
            check("des fooa(xa) {\n    redeo xa\n}\n\nfooa(1)\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn call_arity_mismatch() {
        let errors = check("des fooi(xa) {\n    omitto\n}\nfooi(1, 2)\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'fooi' expects 1 argument(s), but got 2"));
    }

    #[test]
    fn call_argument_type_mismatch() {
        let errors = check("des fooi(xa) {\n    omitto\n}\nfooi(\"text\")\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Argument 1 of 'fooi' expects type 'int', but got 'string'"
        ));
    }

    #[test]
    fn calling_a_non_function_is_distinct_error() {
        let errors = check("xa := 1\nxa(2)\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'xa' is not callable (type 'int')"));
    }

    #[test]
    fn stem_call_casts_the_return_value() {
        let src = "des quadrata(xa) {\n    redeo xa * xa\n}\nyes := quadrates(3)\n";
        let program = parse(src);
        let mut checker = SemanticChecker::new();
        checker.check(&program);
        assert_eq!(checker.diagnostics().len(), 0);
        // The call site resolves to quadrata with a string cast
        if let Item::Stmt(Stmt::Declaration { value, .. }) = &program.items[1] {
            let site = checker.resolutions().call_of(value.id).expect("call site");
            assert_eq!(site.callee, "quadrata");
            assert_eq!(site.cast, Some(SemType::Str));
            assert_eq!(site.receiver_arg, None);
        } else {
            panic!("expected declaration");
        }
    }

    #[test]
    fn stem_call_with_impossible_return_cast() {
        // struct return only casts to bool/string; calling as -aem wants int_list
        let errors = check("des fooau(xa) {\n    redeo {}\n}\nlaem := fooaaem(1)\n");
        assert!(has_error(&errors, "Cannot cast return type"));
    }

    #[test]
    fn lambda_variable_is_callable_with_arity_check() {
        let errors = check("fo := des(xa) {\n    redeo xa\n}\nfo(1, 2)\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'fo' expects 1 argument(s), but got 2"));
    }

    #[test]
    fn stdlib_functions_are_preseeded() {
        assert_eq!(check("dici(\"salve\")\n"), Vec::<String>::new());
        let errors = check("dici(1)\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Argument 1 of 'dici' expects type 'string', but got 'int'"
        ));
    }

    // ---------- loops and control flow ----------

    #[test]
    fn break_outside_loop_reports_error() {
        let errors = check("frio\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'frio' (break) outside of loop"));
    }

    #[test]
    fn continue_outside_loop_reports_error() {
        let errors = check("pergo\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'pergo' (continue) outside of loop"));
    }

    #[test]
    fn break_inside_while_is_allowed() {
        assert_eq!(
            check("xa := 0\ndum xa < 10 {\n    frio\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn continue_inside_for_is_allowed() {
        assert_eq!(
            check("pro ia in [1, 2, 3] {\n    pergo\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn nested_loops_allow_break_and_continue() {
        let src = "xa := 0\ndum xa < 10 {\n    pro ia in [1, 2, 3] {\n        pergo\n    }\n    frio\n}\n";
        assert_eq!(check(src), Vec::<String>::new());
    }

    #[test]
    fn break_in_function_but_outside_loop_is_error() {
        let errors = check("des fooi() {\n    frio\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'frio' (break) outside of loop"));
    }

    #[test]
    fn while_condition_must_be_bool() {
        let errors = check("dum 1 {\n    omitto\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Type mismatch in while condition: expected 'bool', got 'int'"
        ));
    }

    #[test]
    fn if_condition_must_be_bool() {
        let errors = check("si 1 {\n    omitto\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Type mismatch in if condition"));
    }

    #[test]
    fn if_with_elif_and_else_is_checked() {
        let src = "xa := 0\nsi xa < 0 {\n    omitto\n}\naluid xa == 0 {\n    omitto\n}\naluid {\n    omitto\n}\n";
        assert_eq!(check(src), Vec::<String>::new());
    }

    #[test]
    fn branch_scopes_do_not_leak() {
        let errors = check("si verum {\n    ya := 1\n}\nza := ya\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Variable 'ya' not defined."));
    }

    // ---------- for loops ----------

    #[test]
    fn for_over_range_with_int_iterator_is_fine() {
        assert_eq!(
            check("rangee := 1..5\npro itema in rangee {\n    omitto\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn for_iterator_suffix_must_match_element_exactly() {
        let errors = check("rangee := 1..5\npro itemes in rangee {\n    omitto\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Type mismatch in for loop iterator 'itemes': expected 'string', got 'int'"
        ));
    }

    #[test]
    fn for_does_not_widen_int_to_float() {
        // Stricter than assignment: int element with float iterator fails
        let errors = check("pro itemae in [1, 2] {\n    omitto\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Type mismatch in for loop iterator"));
    }

    #[test]
    fn for_over_string_yields_string_elements() {
        assert_eq!(
            check("verbes := \"salve\"\npro ches in verbes {\n    dici(ches)\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn for_over_non_iterable_reports_error() {
        let errors = check("xa := 5\npro ia in xa {\n    omitto\n}\n");
        assert!(has_error(&errors, "Cannot iterate over non-iterable type 'int'"));
    }

    // ---------- multiple errors ----------

    #[test]
    fn multiple_semantic_errors_are_all_collected() {
        let errors = check("xa = 1\nfrio\nredeo verum\n");
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "Use of undeclared identifier 'xa'"));
        assert!(has_error(&errors, "'frio' (break) outside of loop"));
        assert!(has_error(&errors, "'redeo' (return) outside of function"));
    }

    // ---------- lists ----------

    #[test]
    fn list_literal_element_mismatch() {
        let errors = check("xaem := [1, 2.5, 3]\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "List element 1 has type 'float', but 'xaem' expects 'int' elements"
        ));
    }

    #[test]
    fn list_elements_widen_int_to_float() {
        // Mixed literal infers list_any; elements individually widen
        assert_eq!(check("xarum := [1, 2.5]\n"), Vec::<String>::new());
    }

    #[test]
    fn empty_list_is_list_any() {
        assert_eq!(check("xuum := []\n"), Vec::<String>::new());
        assert_eq!(check("xaem := []\n"), Vec::<String>::new());
    }

    #[test]
    fn indexed_assignment_checks_element_type() {
        let errors = check("araem := [1, 2]\naraem[0] = \"s\"\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Type mismatch in assignment to 'araem': expected 'int', got 'string'"
        ));
    }

    #[test]
    fn indexing_a_scalar_target_is_an_error() {
        let errors = check("xa := 1\nxa[0] = 2\n");
        assert!(has_error(&errors, "Cannot index non-indexable type 'int'"));
    }

    #[test]
    fn string_targets_index_to_string() {
        assert_eq!(
            check("verbes := \"abc\"\nverbes[0] = \"z\"\n"),
            Vec::<String>::new()
        );
    }

    // ---------- structs ----------

    #[test]
    fn struct_key_suffix_must_accept_value_type() {
        let errors = check("stru := {listaem: {innera: 1}}\n");
        assert!(errors.iter().any(|e| e.contains("listaem")));
        assert!(has_error(
            &errors,
            "Struct key 'listaem' expects type 'int_list' but value has type 'struct'"
        ));
    }

    #[test]
    fn string_literal_keys_bypass_validation() {
        assert_eq!(
            check("stru := {\"listaem\": {\"inner\": 1}}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn struct_key_without_suffix_reports_error() {
        let errors = check("stru := {xyz: 1}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Struct key 'xyz' does not have a valid type suffix"
        ));
    }

    #[test]
    fn struct_field_access_types_from_trailing_suffix() {
        let checker = run_checker("personu := {agea: 30}\nagea := personu.agea\n");
        assert_eq!(checker.diagnostics().len(), 0);
    }

    #[test]
    fn string_field_access_yields_any() {
        assert_eq!(
            check("personu := {\"first names\": \"Alice\"}\nxium := personu.\"first names\"\n"),
            Vec::<String>::new()
        );
    }

    // ---------- method chains ----------

    #[test]
    fn method_chain_prepends_receiver() {
        let src = "des addia(xium, yium) {\n    redeo 1\n}\nza := 1.addia(2)\n";
        assert_eq!(check(src), Vec::<String>::new());
    }

    #[test]
    fn method_chain_arity_counts_receiver() {
        let src = "des adda(xium, yium, zium) {\n    redeo 1\n}\nza := 1.adda(2)\n";
        let errors = check(src);
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Method 'adda' expects 3 argument(s) (including receiver), but got 2"
        ));
    }

    #[test]
    fn zero_param_functions_chain_leniently() {
        let src = "des zeroa() {\n    redeo 1\n}\nza := 1.zeroa()\n";
        assert_eq!(check(src), Vec::<String>::new());
    }

    #[test]
    fn chain_receiver_type_is_checked() {
        let src = "des duplices(verbes) {\n    redeo verbes + verbes\n}\nyes := 1.duplices()\n";
        let errors = check(src);
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Method 'duplices' expects first argument of type 'string', but receiver has type 'int'"
        ));
    }

    #[test]
    fn bare_suffix_chain_call_is_a_cast() {
        let src = "xa := 5\nyes := xa.es()\n";
        let program = parse(src);
        let mut checker = SemanticChecker::new();
        checker.check(&program);
        assert_eq!(checker.diagnostics().len(), 0);
        if let Item::Stmt(Stmt::Declaration { value, .. }) = &program.items[1] {
            let cast = checker.resolutions().cast_of(value.id).expect("cast site");
            assert_eq!(cast.from, SemType::Int);
            assert_eq!(cast.to, SemType::Str);
        } else {
            panic!("expected declaration");
        }
    }

    #[test]
    fn chain_stem_call_resolves_and_casts() {
        let src = "des quadrata(xa) {\n    redeo xa * xa\n}\nyes := 3.quadrates()\n";
        let program = parse(src);
        let mut checker = SemanticChecker::new();
        checker.check(&program);
        assert_eq!(checker.diagnostics().len(), 0);
        if let Item::Stmt(Stmt::Declaration { value, .. }) = &program.items[1] {
            let site = checker.resolutions().call_of(value.id).expect("call site");
            assert_eq!(site.callee, "quadrata");
            assert_eq!(site.cast, Some(SemType::Str));
            assert_eq!(site.receiver_arg, Some(0));
        } else {
            panic!("expected declaration");
        }
    }

    #[test]
    fn chain_stem_without_match_reports_error() {
        let errors = check("xa := 1\nya := xa.mysteria()\n");
        assert!(has_error(
            &errors,
            "No function with stem 'mysteri' found for 'mysteria'. Use '.a()' for type casting."
        ));
    }

    #[test]
    fn chain_through_non_callable_reports_error() {
        let errors = check("xa := 1\nya := 2\nza := 1.ya()\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'ya' is not callable in method chain"));
    }

    #[test]
    fn chain_null_return_continues_as_any() {
        // dici returns null; the chain continues with Any and stays legal
        assert_eq!(
            check("xium := \"salve\".dici()\n"),
            Vec::<String>::new()
        );
    }

    // ---------- lambdas and id ----------

    #[test]
    fn lambda_declaration_requires_function_suffix() {
        let errors = check("xa := des(ya) {\n    redeo ya\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Type mismatch in declaration of 'xa': expected 'int', got 'function'"
        ));
    }

    #[test]
    fn id_refers_to_sole_lambda_parameter() {
        assert_eq!(
            check("fo := des(xa) {\n    redeo id\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn id_variant_casts_the_parameter() {
        assert_eq!(
            check("fo := des(xa) {\n    redeo ides\n}\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn id_outside_lambda_is_an_error() {
        let errors = check("xium := id\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "'id' keyword can only be used inside a lambda function"
        ));
    }

    #[test]
    fn id_in_two_param_lambda_is_an_error() {
        let errors = check("fo := des(xa, ya) {\n    redeo id\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "'id' keyword can only be used in lambdas with exactly 1 parameter"
        ));
    }

    #[test]
    fn id_variant_in_two_param_lambda_is_an_error() {
        let errors = check("fo := des(xa, ya) {\n    redeo ides\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "(id keyword variant)"));
    }

    #[test]
    fn id_variant_with_impossible_cast() {
        // struct parameter does not cast to range
        let errors = check("fo := des(xu) {\n    redeo ide\n}\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(
            &errors,
            "Cannot cast 'id' (type 'struct') to 'range' using identifier 'ide'"
        ));
    }

    #[test]
    fn inline_lambda_bodies_are_checked() {
        let errors = check("des applio(fo, xa) {\n    redeo fo\n}\napplio(des(ya) {\n    redeo yaza\n}, 1)\n");
        assert!(has_error(&errors, "Variable 'yaza' not defined."));
    }

    // ---------- operators ----------

    #[test]
    fn logical_operators_require_bool() {
        let errors = check("bam := 1 et verum\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Left operand of 'et' must be bool, got 'int'"));
    }

    #[test]
    fn bitwise_operators_yield_int() {
        assert_eq!(check("xa := 1 & 2\nya := 1 | 2\nza := 1 ^ 2\n"), Vec::<String>::new());
    }

    #[test]
    fn equality_rejects_unrelated_types() {
        let errors = check("bam := 1 == \"s\"\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "is an invalid comparison between types"));
    }

    #[test]
    fn equality_allows_null_comparison() {
        assert_eq!(check("xi := inanis\nbam := xi == inanis\n"), Vec::<String>::new());
    }

    #[test]
    fn est_always_yields_bool() {
        assert_eq!(check("bam := 1 est \"s\"\n"), Vec::<String>::new());
    }

    #[test]
    fn ordering_rejects_booleans() {
        let errors = check("bam := verum < falsus\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Ordering comparisons only work on numeric or string types"));
    }

    #[test]
    fn ordering_allows_strings() {
        assert_eq!(check("bam := \"a\" < \"b\"\n"), Vec::<String>::new());
    }

    #[test]
    fn membership_checks_haystack_and_needle() {
        let errors = check("bam := 1 in 2\n");
        assert!(has_error(&errors, "right operand must be string, list, or struct"));

        let errors = check("laem := [1, 2]\nbam := \"s\" in laem\n");
        assert!(has_error(
            &errors,
            "List membership: needle type 'string' incompatible with list element type 'int'"
        ));

        assert_eq!(
            check("laem := [1, 2]\nbam := 1 in laem\n"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn struct_membership_requires_string_needle() {
        let errors = check("stru := {}\nbam := 1 in stru\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Struct key lookup requires string needle, got 'int'"));
    }

    #[test]
    fn string_concatenation_rides_on_plus() {
        assert_eq!(check("yes := \"a\" + 1\n"), Vec::<String>::new());
    }

    #[test]
    fn arithmetic_rejects_non_numeric_operands() {
        let errors = check("xa := 1 - \"s\"\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "'string' is not a numeric type"));
    }

    #[test]
    fn arithmetic_widens_to_float() {
        assert_eq!(check("xae := 1 + 2.0\n"), Vec::<String>::new());
        let errors = check("xa := 1 + 2.0\n");
        assert!(has_error(
            &errors,
            "Type mismatch in declaration of 'xa': expected 'int', got 'float'"
        ));
    }

    #[test]
    fn range_construction_requires_ints() {
        assert_eq!(check("re := 1..5\n"), Vec::<String>::new());
        let errors = check("re := 1.5 .. 2\n");
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "Left operand of '..' must be int, got 'float'"));
    }

    #[test]
    fn range_is_compatible_with_int_list() {
        assert_eq!(check("laem := 1..5\n"), Vec::<String>::new());
    }

    #[test]
    fn elvis_takes_left_unless_null() {
        let checker = run_checker("xi := inanis\nza := xi ?: 5\n");
        assert_eq!(checker.diagnostics().len(), 0);
        let checker = run_checker("xa := 3\nza := xa ?: 5\n");
        assert_eq!(checker.diagnostics().len(), 0);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(check("xa := -5\nbam := non verum\n"), Vec::<String>::new());
        let errors = check("bam := non 1\n");
        assert!(has_error(&errors, "Unary 'non' requires bool operand, got 'int'"));
        let errors = check("xa := -verum\n");
        assert!(has_error(&errors, "Unary '-' requires numeric operand, got 'bool'"));
    }

    // ---------- resolution record ----------

    #[test]
    fn expression_types_are_recorded() {
        let src = "xa := 1 + 2\n";
        let program = parse(src);
        let mut checker = SemanticChecker::new();
        checker.check(&program);
        if let Item::Stmt(Stmt::Declaration { value, .. }) = &program.items[0] {
            assert_eq!(checker.resolutions().type_of(value.id), Some(SemType::Int));
        } else {
            panic!("expected declaration");
        }
    }

    #[test]
    fn globals_expose_function_signatures() {
        let checker = run_checker("des fooa(xa, yes) {\n    redeo xa\n}\n");
        let sym = checker.symbols().globals().get("fooa").expect("fooa in globals");
        assert_eq!(sym.num_params, Some(2));
        assert_eq!(sym.param_types, vec![SemType::Int, SemType::Str]);
        assert_eq!(sym.return_type, Some(SemType::Int));
    }

    #[test]
    fn diagnostics_carry_line_numbers() {
        let checker = run_checker("xa := 1\nfrio\n");
        let diag = &checker.diagnostics()[0];
        assert_eq!(diag.line, Some(2));
        assert!(diag.to_string().starts_with("(line 2"));
    }
}
