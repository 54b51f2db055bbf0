//! Parser for Ago
//!
//! Recursive descent over the token stream. Statements are separated by
//! newlines; the expression grammar is a fixed precedence ladder with
//! postfix indexing, field access, and method-chain calls on top.

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_id: NodeId,
}

impl Parser {
    /// Create a parser for the given source
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(source).tokenize()?,
            pos: 0,
            next_id: 0,
        })
    }

    /// Create a parser from pre-tokenized input
    #[allow(dead_code)]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, next_id: 0 }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("tokens should not be empty"))
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(Error::UnexpectedToken {
                expected: expected.describe(),
                got: self.current_kind().describe(),
                span: self.current().span,
            })
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span)> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                let span = self.current().span;
                self.advance();
                Ok((name, span))
            }
            _ => Err(Error::ExpectedIdent { span: self.current().span }),
        }
    }

    fn make_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = self.next_id;
        self.next_id += 1;
        Expr { kind, id, span }
    }

    /// A statement ends at a newline, a closing brace, or end of input
    fn at_stmt_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        )
    }

    // ==================== Program Structure ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();

        self.skip_newlines();
        while !self.is_at_end() {
            items.push(self.parse_item()?);
            if !self.is_at_end() {
                self.expect(TokenKind::Newline)?;
            }
            self.skip_newlines();
        }

        if items.is_empty() {
            return Err(Error::EmptyProgram);
        }
        Ok(Program { items })
    }

    /// Parse a top-level item: a function declaration or a statement
    fn parse_item(&mut self) -> Result<Item> {
        if self.check(&TokenKind::Des) {
            // `des name(...)` declares a function; a bare `des(...)` lambda
            // is not a top-level item
            Ok(Item::Function(self.parse_function()?))
        } else {
            Ok(Item::Stmt(self.parse_statement()?))
        }
    }

    /// Parse a function definition
    fn parse_function(&mut self) -> Result<FunctionDecl> {
        let start = self.current().span;
        self.expect(TokenKind::Des)?;
        let (name, _) = self.expect_ident()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(FunctionDecl { name, params, body, span })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            let (name, span) = self.expect_ident()?;
            params.push(Param { name, span });
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    /// Parse a brace-delimited block of statements
    fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();

        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
            if !self.check(&TokenKind::RBrace) {
                self.expect(TokenKind::Newline)?;
            }
            self.skip_newlines();
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Block { stmts, span: start.merge(&end) })
    }

    // ==================== Statements ====================

    fn parse_statement(&mut self) -> Result<Stmt> {
        match self.current_kind() {
            TokenKind::Redeo => {
                let span = self.advance().span;
                let value = if self.at_stmt_end() {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                Ok(Stmt::Return { value, span })
            }
            TokenKind::Frio => {
                let span = self.advance().span;
                Ok(Stmt::Break { span })
            }
            TokenKind::Pergo => {
                let span = self.advance().span;
                Ok(Stmt::Continue { span })
            }
            TokenKind::Omitto => {
                let span = self.advance().span;
                Ok(Stmt::Pass { span })
            }
            TokenKind::Si => self.parse_if(),
            TokenKind::Dum => self.parse_while(),
            TokenKind::Pro => self.parse_for(),
            TokenKind::Des => Err(Error::UnexpectedToken {
                expected: "statement".to_string(),
                got: self.current_kind().describe(),
                span: self.current().span,
            }),
            TokenKind::Ident(_) => self.parse_ident_statement(),
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    /// A statement starting with an identifier: declaration, reassignment
    /// (possibly indexed), or a plain expression statement.
    fn parse_ident_statement(&mut self) -> Result<Stmt> {
        match self.peek_kind() {
            Some(TokenKind::ColonAssign) => {
                let (name, span) = self.expect_ident()?;
                self.expect(TokenKind::ColonAssign)?;
                let value = self.parse_expr()?;
                let span = span.merge(&value.span);
                Ok(Stmt::Declaration { name, value, span })
            }
            Some(TokenKind::Assign) => {
                let (target, span) = self.expect_ident()?;
                self.expect(TokenKind::Assign)?;
                let value = self.parse_expr()?;
                let span = span.merge(&value.span);
                Ok(Stmt::Assignment { target, indices: Vec::new(), value, span })
            }
            Some(TokenKind::LBracket) => {
                // Could be `arr[i] = v` or an expression like `arr[i].fo()`;
                // try the assignment shape first and rewind if it is not one
                let saved_pos = self.pos;
                let saved_id = self.next_id;
                match self.try_parse_indexed_assignment() {
                    Ok(Some(stmt)) => Ok(stmt),
                    Ok(None) | Err(_) => {
                        self.pos = saved_pos;
                        self.next_id = saved_id;
                        Ok(Stmt::Expr(self.parse_expr()?))
                    }
                }
            }
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    fn try_parse_indexed_assignment(&mut self) -> Result<Option<Stmt>> {
        let (target, span) = self.expect_ident()?;
        let mut indices = Vec::new();
        while self.consume(&TokenKind::LBracket) {
            indices.push(self.parse_expr()?);
            self.expect(TokenKind::RBracket)?;
        }
        if !self.check(&TokenKind::Assign) {
            return Ok(None);
        }
        self.advance();
        let value = self.parse_expr()?;
        let span = span.merge(&value.span);
        Ok(Some(Stmt::Assignment { target, indices, value, span }))
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Si)?.span;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let mut span = start.merge(&then_block.span);

        let mut elifs = Vec::new();
        let mut else_block = None;

        // `aluid` branches sit on following lines; rewind if the next
        // non-newline token is not one
        loop {
            let saved_pos = self.pos;
            self.skip_newlines();
            if !self.check(&TokenKind::Aluid) {
                self.pos = saved_pos;
                break;
            }
            let branch_start = self.advance().span;
            if self.check(&TokenKind::LBrace) {
                let body = self.parse_block()?;
                span = span.merge(&body.span);
                else_block = Some(body);
                break;
            }
            let elif_cond = self.parse_expr()?;
            let body = self.parse_block()?;
            let branch_span = branch_start.merge(&body.span);
            span = span.merge(&body.span);
            elifs.push(ElifBranch { cond: elif_cond, body, span: branch_span });
        }

        Ok(Stmt::If { cond, then_block, elifs, else_block, span })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Dum)?.span;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(Stmt::While { cond, body, span })
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Pro)?.span;
        let (iterator, _) = self.expect_ident()?;
        self.expect(TokenKind::In)?;
        let iterable = self.parse_expr()?;
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(Stmt::For { iterator, iterable, body, span })
    }

    // ==================== Expressions ====================
    //
    // Precedence ladder, loosest first:
    //   vel | ^ ?:  ->  et &  ->  comparisons est in  ->  .. .<
    //   ->  + -  ->  * / %  ->  unary  ->  postfix

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_binary(0)
    }

    fn binary_op_at(&self, level: usize) -> Option<BinOp> {
        let op = match (level, self.current_kind()) {
            (0, TokenKind::Vel) => BinOp::Or,
            (0, TokenKind::Pipe) => BinOp::BitOr,
            (0, TokenKind::Caret) => BinOp::BitXor,
            (0, TokenKind::Elvis) => BinOp::Elvis,
            (1, TokenKind::Et) => BinOp::And,
            (1, TokenKind::Amp) => BinOp::BitAnd,
            (2, TokenKind::EqEq) => BinOp::Eq,
            (2, TokenKind::NotEq) => BinOp::Ne,
            (2, TokenKind::Lt) => BinOp::Lt,
            (2, TokenKind::Gt) => BinOp::Gt,
            (2, TokenKind::Le) => BinOp::Le,
            (2, TokenKind::Ge) => BinOp::Ge,
            (2, TokenKind::Est) => BinOp::Est,
            (2, TokenKind::In) => BinOp::In,
            (3, TokenKind::DotDot) => BinOp::Range,
            (3, TokenKind::DotLess) => BinOp::RangeExcl,
            (4, TokenKind::Plus) => BinOp::Add,
            (4, TokenKind::Minus) => BinOp::Sub,
            (5, TokenKind::Star) => BinOp::Mul,
            (5, TokenKind::Slash) => BinOp::Div,
            (5, TokenKind::Percent) => BinOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    fn parse_binary(&mut self, level: usize) -> Result<Expr> {
        if level > 5 {
            return self.parse_unary();
        }
        let mut left = self.parse_binary(level + 1)?;
        while let Some(op) = self.binary_op_at(level) {
            self.advance();
            let right = self.parse_binary(level + 1)?;
            let span = left.span.merge(&right.span);
            left = self.make_expr(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Plus => Some(UnOp::Pos),
            TokenKind::Non => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let expr = self.parse_unary()?;
            let span = start.merge(&expr.span);
            return Ok(self.make_expr(ExprKind::Unary { op, expr: Box::new(expr) }, span));
        }
        self.parse_postfix()
    }

    /// Postfix operations: indexing, field access, method-chain calls
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    let end = self.expect(TokenKind::RBracket)?.span;
                    let span = expr.span.merge(&end);
                    expr = self.make_expr(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    match self.current_kind().clone() {
                        TokenKind::Ident(name) => {
                            let name_span = self.advance().span;
                            if self.check(&TokenKind::LParen) {
                                let (args, end) = self.parse_args()?;
                                let span = expr.span.merge(&end);
                                expr = self.make_expr(
                                    ExprKind::MethodCall {
                                        receiver: Box::new(expr),
                                        method: name,
                                        args,
                                    },
                                    span,
                                );
                            } else {
                                let span = expr.span.merge(&name_span);
                                expr = self.make_expr(
                                    ExprKind::Field {
                                        base: Box::new(expr),
                                        field: FieldKey::Ident(name),
                                    },
                                    span,
                                );
                            }
                        }
                        TokenKind::StrLit(text) => {
                            let end = self.advance().span;
                            let span = expr.span.merge(&end);
                            expr = self.make_expr(
                                ExprKind::Field {
                                    base: Box::new(expr),
                                    field: FieldKey::Str(text),
                                },
                                span,
                            );
                        }
                        _ => {
                            return Err(Error::ExpectedIdent { span: self.current().span });
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current().span;
        match self.current_kind().clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Ok(self.make_expr(ExprKind::Int(v), span))
            }
            TokenKind::FloatLit(v) => {
                self.advance();
                Ok(self.make_expr(ExprKind::Float(v), span))
            }
            TokenKind::StrLit(s) => {
                self.advance();
                Ok(self.make_expr(ExprKind::Str(s), span))
            }
            TokenKind::RomanLit(v) => {
                self.advance();
                Ok(self.make_expr(ExprKind::Int(v), span))
            }
            TokenKind::Verum => {
                self.advance();
                Ok(self.make_expr(ExprKind::Bool(true), span))
            }
            TokenKind::Falsus => {
                self.advance();
                Ok(self.make_expr(ExprKind::Bool(false), span))
            }
            TokenKind::Inanis => {
                self.advance();
                Ok(self.make_expr(ExprKind::Null, span))
            }
            TokenKind::Id => {
                self.advance();
                Ok(self.make_expr(ExprKind::Id, span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    let (args, end) = self.parse_args()?;
                    let span = span.merge(&end);
                    Ok(self.make_expr(ExprKind::Call { callee: name, args }, span))
                } else {
                    Ok(self.make_expr(ExprKind::Ident(name), span))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_struct_lit(),
            TokenKind::Des => self.parse_lambda(),
            _ => Err(Error::ExpectedExpr { span }),
        }
    }

    fn parse_args(&mut self) -> Result<(Vec<Expr>, Span)> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        self.skip_newlines();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                self.skip_newlines();
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }
        let end = self.expect(TokenKind::RParen)?.span;
        Ok((args, end))
    }

    fn parse_list(&mut self) -> Result<Expr> {
        let start = self.expect(TokenKind::LBracket)?.span;
        let mut elements = Vec::new();
        self.skip_newlines();
        if !self.check(&TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expr()?);
                self.skip_newlines();
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }
        let end = self.expect(TokenKind::RBracket)?.span;
        let span = start.merge(&end);
        Ok(self.make_expr(ExprKind::List(elements), span))
    }

    /// Struct literal `{key: value, "str key": value,}` - trailing comma
    /// and interior newlines are allowed
    fn parse_struct_lit(&mut self) -> Result<Expr> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let mut entries = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let key_span = self.current().span;
            let key = match self.current_kind().clone() {
                TokenKind::Ident(name) => {
                    self.advance();
                    StructKey::Ident(name)
                }
                TokenKind::StrLit(text) => {
                    self.advance();
                    StructKey::Str(text)
                }
                _ => {
                    return Err(Error::UnexpectedToken {
                        expected: "struct key".to_string(),
                        got: self.current_kind().describe(),
                        span: key_span,
                    });
                }
            };
            self.expect(TokenKind::Colon)?;
            self.skip_newlines();
            let value = self.parse_expr()?;
            let span = key_span.merge(&value.span);
            entries.push(StructEntry { key, value, span });

            self.skip_newlines();
            if !self.consume(&TokenKind::Comma) {
                self.skip_newlines();
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(TokenKind::RBrace)?.span;
        let span = start.merge(&end);
        Ok(self.make_expr(ExprKind::StructLit(entries), span))
    }

    /// Lambda: `des(x, y) { ... }` or `des { ... }`
    fn parse_lambda(&mut self) -> Result<Expr> {
        let start = self.expect(TokenKind::Des)?.span;
        let params = if self.consume(&TokenKind::LParen) {
            let params = self.parse_params()?;
            self.expect(TokenKind::RParen)?;
            params
        } else {
            Vec::new()
        };
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(self.make_expr(ExprKind::Lambda(LambdaDecl { params, body, span }), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Program {
        Parser::new(src)
            .expect("lex should succeed")
            .parse_program()
            .expect("parse should succeed")
    }

    fn parse_err(src: &str) -> Error {
        Parser::new(src)
            .and_then(|mut p| p.parse_program())
            .expect_err("parse should fail")
    }

    #[test]
    fn declaration_and_reassignment() {
        let program = parse("xa := 1\nxa = xa + 1\n");
        assert_eq!(program.items.len(), 2);
        assert!(matches!(
            program.items[0],
            Item::Stmt(Stmt::Declaration { ref name, .. }) if name == "xa"
        ));
        assert!(matches!(
            program.items[1],
            Item::Stmt(Stmt::Assignment { ref target, ref indices, .. })
                if target == "xa" && indices.is_empty()
        ));
    }

    #[test]
    fn indexed_reassignment() {
        let program = parse("arraem[0] = 1\narraem[1][0] = 20\n");
        match &program.items[1] {
            Item::Stmt(Stmt::Assignment { indices, .. }) => assert_eq!(indices.len(), 2),
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn function_declaration() {
        let program = parse("des fooa(xa, yes) {\n    redeo xa\n}\n");
        match &program.items[0] {
            Item::Function(func) => {
                assert_eq!(func.name, "fooa");
                assert_eq!(func.params.len(), 2);
                assert_eq!(func.body.stmts.len(), 1);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn if_elif_else_chain() {
        let program = parse(
            "si xa < 0 {\n    omitto\n}\naluid xa == 0 {\n    pergo\n}\naluid {\n    frio\n}\n",
        );
        match &program.items[0] {
            Item::Stmt(Stmt::If { elifs, else_block, .. }) => {
                assert_eq!(elifs.len(), 1);
                assert!(else_block.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn while_and_for() {
        let program = parse("dum xa < 10 {\n    frio\n}\npro ia in [1, 2, 3] {\n    pergo\n}\n");
        assert!(matches!(program.items[0], Item::Stmt(Stmt::While { .. })));
        match &program.items[1] {
            Item::Stmt(Stmt::For { iterator, .. }) => assert_eq!(iterator, "ia"),
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        let program = parse("xa := 1 + 2 * 3\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => match &value.kind {
                ExprKind::Binary { op: BinOp::Add, right, .. } => {
                    assert!(matches!(
                        right.kind,
                        ExprKind::Binary { op: BinOp::Mul, .. }
                    ));
                }
                other => panic!("expected +, got {:?}", other),
            },
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn range_binds_looser_than_add() {
        let program = parse("re := 1 .. 2 + 3\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => {
                assert!(matches!(
                    value.kind,
                    ExprKind::Binary { op: BinOp::Range, .. }
                ));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn method_chain_nests_left() {
        let program = parse("obj.fooa(1).bara(2, 3)\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Expr(expr)) => match &expr.kind {
                ExprKind::MethodCall { receiver, method, args } => {
                    assert_eq!(method, "bara");
                    assert_eq!(args.len(), 2);
                    assert!(matches!(
                        receiver.kind,
                        ExprKind::MethodCall { ref method, .. } if method == "fooa"
                    ));
                }
                other => panic!("expected method call, got {:?}", other),
            },
            other => panic!("expected expression, got {:?}", other),
        }
    }

    #[test]
    fn struct_literal_with_string_and_ident_keys() {
        let program = parse("personu := {\n    \"names\": \"Tom\",\n    agea: 30,\n}\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => match &value.kind {
                ExprKind::StructLit(entries) => {
                    assert_eq!(entries.len(), 2);
                    assert!(matches!(entries[0].key, StructKey::Str(_)));
                    assert!(matches!(entries[1].key, StructKey::Ident(_)));
                }
                other => panic!("expected struct literal, got {:?}", other),
            },
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn string_field_access() {
        let program = parse("names := personu.\"first names\"\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => {
                assert!(matches!(
                    value.kind,
                    ExprKind::Field { field: FieldKey::Str(_), .. }
                ));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn lambda_as_initializer() {
        let program = parse("fo := des(xa) {\n    redeo xa * xa\n}\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => match &value.kind {
                ExprKind::Lambda(lambda) => assert_eq!(lambda.params.len(), 1),
                other => panic!("expected lambda, got {:?}", other),
            },
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn lambda_without_params() {
        let program = parse("fo := des {\n    redeo 1\n}\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => {
                assert!(matches!(value.kind, ExprKind::Lambda(_)));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn roman_numeral_literal() {
        let program = parse("xa := XII\n");
        match &program.items[0] {
            Item::Stmt(Stmt::Declaration { value, .. }) => {
                assert!(matches!(value.kind, ExprKind::Int(12)));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn node_ids_are_unique() {
        let program = parse("xa := 1 + 2\nyes := \"s\"\n");
        let mut ids = Vec::new();
        for item in &program.items {
            if let Item::Stmt(Stmt::Declaration { value, .. }) = item {
                collect_ids(value, &mut ids);
            }
        }
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    fn collect_ids(expr: &Expr, out: &mut Vec<NodeId>) {
        out.push(expr.id);
        if let ExprKind::Binary { left, right, .. } = &expr.kind {
            collect_ids(left, out);
            collect_ids(right, out);
        }
    }

    #[test]
    fn empty_program_is_invalid() {
        assert!(matches!(parse_err(""), Error::EmptyProgram));
    }

    #[test]
    fn reserved_keyword_is_not_an_identifier() {
        for kw in ["si", "dum", "pro", "verum", "falsus", "inanis", "des"] {
            let src = format!("{} := 1\n", kw);
            Parser::new(&src)
                .unwrap()
                .parse_program()
                .expect_err("keyword as identifier should fail");
        }
    }

    #[test]
    fn missing_condition_is_invalid() {
        parse_err("si {\n    omitto\n}\n");
        parse_err("dum {\n    omitto\n}\n");
    }

    #[test]
    fn unterminated_call_is_invalid() {
        parse_err("fooa(1, 2\n");
        parse_err("fooa(1, 2, )\n");
    }

    #[test]
    fn for_requires_in_keyword() {
        parse_err("pro ia [1, 2, 3] {\n    omitto\n}\n");
    }

    #[test]
    fn lambda_at_top_level_is_invalid() {
        parse_err("des(xa){\n    redeo xa\n}\n");
    }
}
