//! Recursive-descent parser
//!
//! One method per grammar rule. The parser keeps a single token of lookahead
//! (`current`) pulled lazily from the [`Lexer`] and stops at the first
//! mismatch.

use crate::ast::{
    BinOp, Block, Call, Compound, Decl, Expr, Number, Param, Program, RelOp, RoutineDecl, Span,
    Spanned, Stmt, UnOp, VarDecl, VarType,
};
use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Token};
use crate::{STACK_GROW_SIZE, STACK_RED_ZONE};
use std::mem;
use std::rc::Rc;

#[cfg(test)]
mod tests;

/// Parse a complete program
pub fn parse(source: &str) -> Result<Program> {
    let program = Parser::new(source)?.parse_program()?;
    tracing::debug!(program = %program.name.node, "parsed program");
    Ok(program)
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    current: (Token, Span),
    /// Span of the most recently consumed token
    prev_span: Span,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let current = Self::pull(&mut lexer, source.len())?;
        Ok(Parser {
            lexer,
            current,
            prev_span: Span::point(0),
        })
    }

    fn pull(lexer: &mut Lexer<'src>, eof_at: usize) -> Result<(Token, Span)> {
        lexer
            .next()
            .unwrap_or_else(|| Ok((Token::Eof, Span::point(eof_at))))
    }

    // ============ Token helpers ============

    fn peek(&self) -> &Token {
        &self.current.0
    }

    fn span(&self) -> Span {
        self.current.1
    }

    /// Consume the current token and return it
    fn advance(&mut self) -> Result<(Token, Span)> {
        let eof_at = self.current.1.end;
        let next = Self::pull(&mut self.lexer, eof_at)?;
        let consumed = mem::replace(&mut self.current, next);
        self.prev_span = consumed.1;
        Ok(consumed)
    }

    fn at(&self, token: &Token) -> bool {
        mem::discriminant(self.peek()) == mem::discriminant(token)
    }

    fn eat(&mut self, token: &Token) -> Result<bool> {
        if self.at(token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, token: Token) -> Result<Span> {
        if self.at(&token) {
            Ok(self.advance()?.1)
        } else {
            Err(self.unexpected(token.to_string()))
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>> {
        match self.peek() {
            Token::Ident(_) => match self.advance()? {
                (Token::Ident(name), span) => Ok(Spanned::new(name, span)),
                _ => unreachable!("current token was an identifier"),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::syntax(expected, self.peek().to_string(), self.span())
    }

    // ============ Program structure ============

    /// program → PROGRAM id SEMI block DOT
    fn parse_program(&mut self) -> Result<Program> {
        self.expect(Token::Program)?;
        let name = self.expect_ident()?;
        self.expect(Token::Semi)?;
        let block = self.parse_block()?;
        self.expect(Token::Dot)?;
        self.expect(Token::Eof)?;
        Ok(Program { name, block })
    }

    /// block → declarations compound
    ///
    /// Nested routines recurse through here, so the stack grows on demand.
    fn parse_block(&mut self) -> Result<Block> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.parse_block_inner())
    }

    fn parse_block_inner(&mut self) -> Result<Block> {
        let declarations = self.parse_declarations()?;
        let compound = self.parse_compound()?;
        Ok(Block {
            declarations,
            compound,
        })
    }

    /// declarations → (VAR (idlist COLON type SEMI)+)? (routine SEMI)*
    fn parse_declarations(&mut self) -> Result<Vec<Decl>> {
        let mut declarations = Vec::new();

        if self.eat(&Token::Var)? {
            loop {
                let names = self.parse_ident_list()?;
                self.expect(Token::Colon)?;
                let ty = self.parse_type()?;
                self.expect(Token::Semi)?;
                declarations.extend(
                    names
                        .into_iter()
                        .map(|name| Decl::Var(VarDecl { name, ty })),
                );
                if !matches!(self.peek(), Token::Ident(_)) {
                    break;
                }
            }
        }

        while matches!(self.peek(), Token::Procedure | Token::Function) {
            let routine = self.parse_routine()?;
            self.expect(Token::Semi)?;
            declarations.push(Decl::Routine(Rc::new(routine)));
        }

        Ok(declarations)
    }

    /// routine → PROCEDURE id params? SEMI block
    ///         | FUNCTION id params? COLON type SEMI block
    fn parse_routine(&mut self) -> Result<RoutineDecl> {
        let (keyword, start) = self.advance()?;
        let name = self.expect_ident()?;
        let params = if self.at(&Token::LParen) {
            self.parse_params()?
        } else {
            Vec::new()
        };
        let ret_ty = if keyword == Token::Function {
            self.expect(Token::Colon)?;
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(Token::Semi)?;
        let block = self.parse_block()?;

        tracing::trace!(routine = %name.node, params = params.len(), "parsed routine");
        Ok(RoutineDecl {
            name,
            params,
            ret_ty,
            block,
            span: start.merge(self.prev_span),
        })
    }

    /// params → LPAREN (idlist COLON type (SEMI idlist COLON type)*)? RPAREN
    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        if self.eat(&Token::RParen)? {
            return Ok(params);
        }

        loop {
            let names = self.parse_ident_list()?;
            self.expect(Token::Colon)?;
            let ty = self.parse_type()?;
            params.extend(names.into_iter().map(|name| Param { name, ty }));
            if !self.eat(&Token::Semi)? {
                break;
            }
        }

        self.expect(Token::RParen)?;
        Ok(params)
    }

    fn parse_ident_list(&mut self) -> Result<Vec<Spanned<String>>> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(&Token::Comma)? {
            names.push(self.expect_ident()?);
        }
        Ok(names)
    }

    fn parse_type(&mut self) -> Result<VarType> {
        let ty = match self.peek() {
            Token::TyInteger => VarType::Integer,
            Token::TyReal => VarType::Real,
            _ => return Err(self.unexpected("type name")),
        };
        self.advance()?;
        Ok(ty)
    }

    // ============ Statements ============

    /// compound → BEGIN stmt_list END
    fn parse_compound(&mut self) -> Result<Compound> {
        self.expect(Token::Begin)?;
        let statements = self.parse_statement_list()?;
        self.expect(Token::End)?;
        Ok(Compound { statements })
    }

    /// stmt_list → statement (SEMI statement)*
    fn parse_statement_list(&mut self) -> Result<Vec<Spanned<Stmt>>> {
        let mut statements = vec![self.parse_statement()?];
        while self.eat(&Token::Semi)? {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse one statement with automatic stack growth for deep nesting
    fn parse_statement(&mut self) -> Result<Spanned<Stmt>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.span();
        let stmt = match self.peek() {
            Token::Begin => Stmt::Compound(self.parse_compound()?),
            Token::If => return self.parse_if(),
            Token::Repeat => return self.parse_repeat(),
            Token::Ident(_) => return self.parse_assignment_or_call(),
            _ => return Ok(Spanned::new(Stmt::NoOp, Span::point(start.start))),
        };
        Ok(Spanned::new(stmt, start.merge(self.prev_span)))
    }

    /// assignment → id ASSIGN expr
    /// call       → id (LPAREN arglist? RPAREN)?
    fn parse_assignment_or_call(&mut self) -> Result<Spanned<Stmt>> {
        let name = self.expect_ident()?;
        let start = name.span;

        let stmt = match self.peek() {
            Token::Assign => {
                self.advance()?;
                let value = self.parse_expr()?;
                Stmt::Assign {
                    target: name,
                    value,
                }
            }
            Token::LParen => Stmt::Call(Call {
                name,
                args: self.parse_args()?,
            }),
            _ => Stmt::Call(Call {
                name,
                args: Vec::new(),
            }),
        };
        Ok(Spanned::new(stmt, start.merge(self.prev_span)))
    }

    /// if → IF condition THEN statement (ELSE statement)?
    fn parse_if(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.expect(Token::If)?;
        let cond = self.parse_condition()?;
        self.expect(Token::Then)?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&Token::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Spanned::new(
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            },
            start.merge(self.prev_span),
        ))
    }

    /// repeat → REPEAT stmt_list UNTIL condition
    fn parse_repeat(&mut self) -> Result<Spanned<Stmt>> {
        let start = self.expect(Token::Repeat)?;
        let statements = self.parse_statement_list()?;
        self.expect(Token::Until)?;
        let cond = self.parse_condition()?;
        Ok(Spanned::new(
            Stmt::Repeat {
                body: Compound { statements },
                cond,
            },
            start.merge(self.prev_span),
        ))
    }

    // ============ Expressions ============

    /// condition → expr relop expr
    fn parse_condition(&mut self) -> Result<Spanned<Expr>> {
        let left = self.parse_expr()?;
        let op = match self.peek() {
            Token::Gt => RelOp::Gt,
            Token::Lt => RelOp::Lt,
            Token::Eq => RelOp::Eq,
            _ => return Err(self.unexpected("relational operator")),
        };
        self.advance()?;
        let right = self.parse_expr()?;
        let span = left.span.merge(right.span);
        Ok(Spanned::new(
            Expr::Relational {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// expr → term ((PLUS | MINUS) term)*
    fn parse_expr(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = binary(left, op, right);
        }
    }

    /// term → factor ((MUL | DIV | SLASH) factor)*
    fn parse_term(&mut self) -> Result<Spanned<Expr>> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Div => BinOp::IntDiv,
                Token::Slash => BinOp::FloatDiv,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_factor()?;
            left = binary(left, op, right);
        }
    }

    /// factor → (PLUS | MINUS) factor | INTCONST | REALCONST | STRCONST
    ///        | LPAREN expr RPAREN | id LPAREN arglist? RPAREN | id
    fn parse_factor(&mut self) -> Result<Spanned<Expr>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.parse_factor_inner())
    }

    fn parse_factor_inner(&mut self) -> Result<Spanned<Expr>> {
        let start = self.span();
        match self.peek() {
            Token::Plus | Token::Minus => {
                let op = if self.advance()?.0 == Token::Plus {
                    UnOp::Plus
                } else {
                    UnOp::Minus
                };
                let operand = self.parse_factor()?;
                let span = start.merge(operand.span);
                Ok(Spanned::new(
                    Expr::Unary {
                        op,
                        expr: Box::new(operand),
                    },
                    span,
                ))
            }
            Token::IntConst(_) | Token::RealConst(_) | Token::StrConst(_) => {
                let expr = match self.advance()?.0 {
                    Token::IntConst(n) => Expr::Number(Number::Integer(n)),
                    Token::RealConst(x) => Expr::Number(Number::Real(x)),
                    Token::StrConst(s) => Expr::Str(s),
                    _ => unreachable!("current token was a constant"),
                };
                Ok(Spanned::new(expr, start))
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(Spanned::new(inner.node, start.merge(self.prev_span)))
            }
            Token::Ident(_) => {
                let name = self.expect_ident()?;
                if self.at(&Token::LParen) {
                    let args = self.parse_args()?;
                    Ok(Spanned::new(
                        Expr::Call(Call { name, args }),
                        start.merge(self.prev_span),
                    ))
                } else {
                    Ok(Spanned::new(Expr::Var(name.node), name.span))
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// LPAREN (expr (COMMA expr)*)? RPAREN
    fn parse_args(&mut self) -> Result<Vec<Spanned<Expr>>> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if self.eat(&Token::RParen)? {
            return Ok(args);
        }
        args.push(self.parse_expr()?);
        while self.eat(&Token::Comma)? {
            args.push(self.parse_expr()?);
        }
        self.expect(Token::RParen)?;
        Ok(args)
    }
}

fn binary(left: Spanned<Expr>, op: BinOp, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
