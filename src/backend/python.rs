//! Python Code Generator
//!
//! Translates a checked Ago program to Python source. This backend is a
//! pure consumer of the checker's resolution record: every cast it emits
//! and every callee it names comes from [`Resolutions`], never from
//! re-running suffix or stem logic.

use std::fmt::Write as _;

use crate::frontend::ast::*;
use crate::frontend::semantic::Resolutions;
use crate::stdlib::builtins;
use crate::types::SemType;

/// Runtime helpers prepended to every generated program
const PRELUDE: &str = r#"# generated by agoc
def ago_cast(value, target):
    if target == "int":
        if isinstance(value, bool):
            return 1 if value else 0
        if isinstance(value, (list, range)):
            return len(list(value))
        if isinstance(value, str):
            return int(float(value))
        return int(value)
    if target == "float":
        return float(value)
    if target == "bool":
        if isinstance(value, (list, range, str, dict)):
            return len(value) != 0
        return value != 0
    if target == "string":
        return str(value)
    if target == "range":
        seq = list(value)
        return range(seq[0], seq[-1] + 1) if seq else range(0)
    if target.endswith("_list") or target == "list_any":
        elem = target[:-5] if target.endswith("_list") else None
        items = list(value) if not isinstance(value, str) else list(value)
        if elem is None:
            return items
        return [ago_cast(item, elem) for item in items]
    return value

def ago_dici(s):
    print(s)

def ago_species(v):
    return type(v).__name__

def ago_apertu(path):
    handle = open(path)
    return {"pathes": path, "contentes": handle.read()}

def ago_exei(code):
    raise SystemExit(code)

def ago_aequalam(a, b):
    return a == b

def ago_claverum(s):
    return list(s.keys())

def ago_get(c, k):
    return c[k]

def ago_set(c, k, v):
    c[k] = v

def ago_insero(c, k, v):
    if isinstance(c, list):
        c.insert(k, v)
    else:
        c[k] = v

def ago_removeo(c, k):
    return c.pop(k)

def ago_into_iter(v):
    return list(v)

"#;

/// Python code generator
pub struct PyCodeGen<'a> {
    resolutions: &'a Resolutions,
    output: String,
    indent: usize,
    /// Lambda defs waiting to be flushed before the current statement
    pending_defs: Vec<String>,
    lambda_counter: usize,
    /// Parameter names of enclosing lambdas, for the `id` keyword
    lambda_params: Vec<Vec<String>>,
}

impl<'a> PyCodeGen<'a> {
    pub fn new(resolutions: &'a Resolutions) -> Self {
        Self {
            resolutions,
            output: String::new(),
            indent: 0,
            pending_defs: Vec::new(),
            lambda_counter: 0,
            lambda_params: Vec::new(),
        }
    }

    /// Generate the complete Python program
    pub fn generate(mut self, program: &Program) -> String {
        self.output.push_str(PRELUDE);
        for item in &program.items {
            match item {
                Item::Function(func) => self.gen_function(func),
                Item::Stmt(stmt) => self.gen_stmt(stmt),
            }
        }
        self.output
    }

    // ==================== Emission Helpers ====================

    fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn flush_pending(&mut self) {
        for def in std::mem::take(&mut self.pending_defs) {
            self.output.push_str(&def);
        }
    }

    fn fresh_lambda_name(&mut self) -> String {
        let name = format!("_ago_lambda_{}", self.lambda_counter);
        self.lambda_counter += 1;
        name
    }

    // ==================== Items & Statements ====================

    fn gen_function(&mut self, func: &FunctionDecl) {
        let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
        self.writeln(&format!("def {}({}):", func.name, params.join(", ")));
        self.indent += 1;
        if func.body.stmts.is_empty() {
            self.writeln("pass");
        } else {
            self.gen_block(&func.body, false);
        }
        self.indent -= 1;
        self.writeln("");
    }

    fn gen_block(&mut self, block: &Block, implicit_return: bool) {
        if block.stmts.is_empty() {
            self.writeln("pass");
            return;
        }
        let last = block.stmts.len() - 1;
        for (i, stmt) in block.stmts.iter().enumerate() {
            // Lambda bodies return their trailing expression
            if implicit_return && i == last {
                if let Stmt::Expr(expr) = stmt {
                    let text = self.gen_expr(expr);
                    self.flush_pending();
                    self.writeln(&format!("return {}", text));
                    continue;
                }
            }
            self.gen_stmt(stmt);
        }
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration { name, value, .. } => {
                let text = self.gen_expr(value);
                self.flush_pending();
                self.writeln(&format!("{} = {}", name, text));
            }
            Stmt::Assignment { target, indices, value, .. } => {
                let mut lhs = target.clone();
                for index in indices {
                    let idx = self.gen_expr(index);
                    let _ = write!(lhs, "[{}]", idx);
                }
                let text = self.gen_expr(value);
                self.flush_pending();
                self.writeln(&format!("{} = {}", lhs, text));
            }
            Stmt::If { cond, then_block, elifs, else_block, .. } => {
                let cond_text = self.gen_expr(cond);
                self.flush_pending();
                self.writeln(&format!("if {}:", cond_text));
                self.indent += 1;
                self.gen_block(then_block, false);
                self.indent -= 1;
                for elif in elifs {
                    let elif_text = self.gen_expr(&elif.cond);
                    self.flush_pending();
                    self.writeln(&format!("elif {}:", elif_text));
                    self.indent += 1;
                    self.gen_block(&elif.body, false);
                    self.indent -= 1;
                }
                if let Some(else_block) = else_block {
                    self.writeln("else:");
                    self.indent += 1;
                    self.gen_block(else_block, false);
                    self.indent -= 1;
                }
            }
            Stmt::While { cond, body, .. } => {
                let cond_text = self.gen_expr(cond);
                self.flush_pending();
                self.writeln(&format!("while {}:", cond_text));
                self.indent += 1;
                self.gen_block(body, false);
                self.indent -= 1;
            }
            Stmt::For { iterator, iterable, body, .. } => {
                let iter_text = self.gen_expr(iterable);
                self.flush_pending();
                self.writeln(&format!("for {} in {}:", iterator, iter_text));
                self.indent += 1;
                self.gen_block(body, false);
                self.indent -= 1;
            }
            Stmt::Return { value, .. } => match value {
                Some(expr) => {
                    let text = self.gen_expr(expr);
                    self.flush_pending();
                    self.writeln(&format!("return {}", text));
                }
                None => self.writeln("return"),
            },
            Stmt::Break { .. } => self.writeln("break"),
            Stmt::Continue { .. } => self.writeln("continue"),
            Stmt::Pass { .. } => self.writeln("pass"),
            Stmt::Expr(expr) => {
                let text = self.gen_expr(expr);
                self.flush_pending();
                self.writeln(&text);
            }
        }
    }

    // ==================== Expressions ====================

    fn gen_expr(&mut self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Int(v) => v.to_string(),
            ExprKind::Float(v) => {
                // Keep a decimal point so Python sees a float
                if v.fract() == 0.0 {
                    format!("{:.1}", v)
                } else {
                    v.to_string()
                }
            }
            ExprKind::Str(s) => py_string(s),
            ExprKind::Bool(true) => "True".to_string(),
            ExprKind::Bool(false) => "False".to_string(),
            ExprKind::Null => "None".to_string(),
            ExprKind::Ident(name) => {
                // Alternate-suffix references become runtime casts, resolved
                // by the checker
                if let Some(cast) = self.resolutions.cast_of(expr.id) {
                    let base = if cast.base == "id" {
                        self.id_param_name()
                    } else {
                        cast.base.clone()
                    };
                    format!("ago_cast({}, {})", base, py_string(cast.to.name()))
                } else {
                    name.clone()
                }
            }
            ExprKind::Id => self.id_param_name(),
            ExprKind::List(elements) => {
                let parts: Vec<String> = elements.iter().map(|e| self.gen_expr(e)).collect();
                format!("[{}]", parts.join(", "))
            }
            ExprKind::StructLit(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|entry| {
                        let value = self.gen_expr(&entry.value);
                        format!("{}: {}", py_string(entry.key.text()), value)
                    })
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            ExprKind::Index { base, index } => {
                let base_text = self.gen_expr(base);
                let index_text = self.gen_expr(index);
                format!("{}[{}]", base_text, index_text)
            }
            ExprKind::Field { base, field } => {
                let base_text = self.gen_expr(base);
                let key = match field {
                    FieldKey::Ident(name) => name.as_str(),
                    FieldKey::Str(text) => text.as_str(),
                };
                format!("{}[{}]", base_text, py_string(key))
            }
            ExprKind::Call { callee, args } => {
                let arg_texts: Vec<String> = args.iter().map(|a| self.gen_expr(a)).collect();
                self.gen_call(expr.id, callee, None, arg_texts)
            }
            ExprKind::MethodCall { receiver, method, args } => {
                let recv_text = self.gen_expr(receiver);
                // A bare-suffix chain call is a pure cast of the receiver
                if let Some(cast) = self.resolutions.cast_of(expr.id) {
                    return format!("ago_cast({}, {})", recv_text, py_string(cast.to.name()));
                }
                let arg_texts: Vec<String> = args.iter().map(|a| self.gen_expr(a)).collect();
                self.gen_call(expr.id, method, Some(recv_text), arg_texts)
            }
            ExprKind::Lambda(lambda) => self.gen_lambda(lambda),
            ExprKind::Binary { op, left, right } => self.gen_binary(expr, *op, left, right),
            ExprKind::Unary { op, expr: operand } => {
                let text = self.gen_expr(operand);
                match op {
                    UnOp::Not => format!("(not {})", text),
                    UnOp::Neg => format!("(-{})", text),
                    UnOp::Pos => format!("(+{})", text),
                }
            }
        }
    }

    /// Emit a call through the resolution record: resolved callee name,
    /// implicit receiver position, and return cast all come from the checker
    fn gen_call(
        &mut self,
        id: NodeId,
        fallback_name: &str,
        receiver: Option<String>,
        mut args: Vec<String>,
    ) -> String {
        let (callee, cast) = match self.resolutions.call_of(id) {
            Some(site) => {
                if let (Some(pos), Some(recv)) = (site.receiver_arg, receiver.clone()) {
                    args.insert(pos, recv);
                }
                (site.callee.clone(), site.cast)
            }
            None => {
                // Unresolved chains (Any-typed receivers) keep their shape
                if let Some(recv) = receiver {
                    args.insert(0, recv);
                }
                (fallback_name.to_string(), None)
            }
        };
        let py_callee = builtins::find(&callee)
            .map(|b| b.py_name.to_string())
            .unwrap_or(callee);
        let call = format!("{}({})", py_callee, args.join(", "));
        match cast {
            Some(to) => format!("ago_cast({}, {})", call, py_string(to.name())),
            None => call,
        }
    }

    fn gen_lambda(&mut self, lambda: &LambdaDecl) -> String {
        let name = self.fresh_lambda_name();
        let params: Vec<String> = lambda.params.iter().map(|p| p.name.clone()).collect();

        // Render the def into a buffer so nested statements indent from the
        // flush point, then queue it ahead of the current statement
        let mut nested = PyCodeGen {
            resolutions: self.resolutions,
            output: String::new(),
            indent: self.indent + 1,
            pending_defs: Vec::new(),
            lambda_counter: self.lambda_counter,
            lambda_params: self.lambda_params.clone(),
        };
        nested.lambda_params.push(params.clone());
        nested.gen_block(&lambda.body, true);
        nested.flush_pending();
        self.lambda_counter = nested.lambda_counter;

        let mut def = String::new();
        for _ in 0..self.indent {
            def.push_str("    ");
        }
        let _ = writeln!(def, "def {}({}):", name, params.join(", "));
        def.push_str(&nested.output);
        self.pending_defs.push(def);
        name
    }

    fn gen_binary(&mut self, expr: &Expr, op: BinOp, left: &Expr, right: &Expr) -> String {
        let l = self.gen_expr(left);
        let r = self.gen_expr(right);
        match op {
            BinOp::Or => format!("({} or {})", l, r),
            BinOp::And => format!("({} and {})", l, r),
            BinOp::BitOr => format!("({} | {})", l, r),
            BinOp::BitAnd => format!("({} & {})", l, r),
            BinOp::BitXor => format!("({} ^ {})", l, r),
            BinOp::Elvis => format!("({} if {} is not None else {})", l, l, r),
            BinOp::Eq => format!("({} == {})", l, r),
            BinOp::Ne => format!("({} != {})", l, r),
            BinOp::Lt => format!("({} < {})", l, r),
            BinOp::Gt => format!("({} > {})", l, r),
            BinOp::Le => format!("({} <= {})", l, r),
            BinOp::Ge => format!("({} >= {})", l, r),
            BinOp::Est => format!("(type({}) == type({}))", l, r),
            BinOp::In => format!("({} in {})", l, r),
            BinOp::Range => format!("range({}, ({}) + 1)", l, r),
            BinOp::RangeExcl => format!("range({}, {})", l, r),
            BinOp::Add => format!("({} + {})", l, r),
            BinOp::Sub => format!("({} - {})", l, r),
            BinOp::Mul => format!("({} * {})", l, r),
            BinOp::Div => {
                // Integer division when the checker typed the result int
                if self.resolutions.type_of(expr.id) == Some(SemType::Int) {
                    format!("({} // {})", l, r)
                } else {
                    format!("({} / {})", l, r)
                }
            }
            BinOp::Mod => format!("({} % {})", l, r),
        }
    }

    fn id_param_name(&self) -> String {
        self.lambda_params
            .last()
            .and_then(|params| params.first())
            .cloned()
            .unwrap_or_else(|| "id".to_string())
    }
}

/// Render a Python string literal
fn py_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
