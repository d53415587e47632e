use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Result, bail};

use crate::ast::{BinaryOperator, Comparator, Expression, Program, Statement};
use crate::runtime::{Class, Method};
use crate::token::{Span, Token, TokenKind};

pub mod ast;

/// Recursive-descent parser over the token vector.
///
/// Classes are resolved while parsing: every `class` statement registers its
/// finished [`Class`] object here, so later instantiation sites and base
/// class references bind directly to the shared object. A name used as a
/// call target must therefore be declared before it is used.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    current: Token,
    classes: HashMap<String, Rc<Class>>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, Span::default()));
        }
        let current = tokens[0].clone();
        Self {
            tokens,
            pos: 0,
            current,
            classes: HashMap::new(),
        }
    }

    pub fn parse_program(mut self) -> Result<Program> {
        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::Eof) {
            if self.consume_newlines() {
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        if matches!(self.current.kind, TokenKind::Class) {
            return self.parse_class_def();
        }
        if matches!(self.current.kind, TokenKind::If) {
            return self.parse_if();
        }
        if matches!(self.current.kind, TokenKind::Print) {
            return self.parse_print();
        }
        if matches!(self.current.kind, TokenKind::Return) {
            return self.parse_return();
        }
        if matches!(self.current.kind, TokenKind::Def) {
            bail!("Method definitions are only allowed inside a class body");
        }
        if matches!(self.current.kind, TokenKind::Identifier(_)) && self.lookahead_is_assignment() {
            return self.parse_assignment();
        }
        let expr = self.parse_expression()?;
        self.expect_newline()?;
        Ok(Statement::Expr(expr))
    }

    /// Scans ahead for `Id {'.' Id} '='`; the `==` comparison lexes as its
    /// own token kind, so a bare `Char('=')` is unambiguous.
    fn lookahead_is_assignment(&self) -> bool {
        let mut index = self.pos;
        loop {
            if !matches!(
                self.tokens.get(index).map(Token::kind),
                Some(TokenKind::Identifier(_))
            ) {
                return false;
            }
            match self.tokens.get(index + 1).map(Token::kind) {
                Some(TokenKind::Char('.')) => index += 2,
                Some(TokenKind::Char('=')) => return true,
                _ => return false,
            }
        }
    }

    fn parse_assignment(&mut self) -> Result<Statement> {
        let first = self.expect_identifier()?;
        let mut rest = Vec::new();
        while matches!(self.current.kind, TokenKind::Char('.')) {
            self.advance();
            rest.push(self.expect_identifier()?);
        }
        self.expect_char('=')?;
        let value = self.parse_expression()?;
        self.expect_newline()?;

        if let Some(field) = rest.pop() {
            let mut object = vec![first];
            object.extend(rest);
            Ok(Statement::FieldAssign {
                object,
                field,
                value,
            })
        } else {
            Ok(Statement::Assign { name: first, value })
        }
    }

    fn parse_class_def(&mut self) -> Result<Statement> {
        self.expect_class()?;
        let name = self.expect_identifier()?;
        if self.classes.contains_key(&name) {
            bail!("Class '{name}' is already defined");
        }

        let parent = if matches!(self.current.kind, TokenKind::Char('(')) {
            self.advance();
            let base = self.expect_identifier()?;
            self.expect_char(')')?;
            match self.classes.get(&base) {
                Some(class) => Some(Rc::clone(class)),
                None => bail!("Unknown base class '{base}' for class '{name}'"),
            }
        } else {
            None
        };

        self.expect_char(':')?;
        self.expect_newline()?;
        self.expect_indent()?;

        let mut methods = Vec::new();
        while !matches!(self.current.kind, TokenKind::Dedent | TokenKind::Eof) {
            if self.consume_newlines() {
                continue;
            }
            methods.push(self.parse_method_def()?);
        }
        self.expect_dedent()?;

        let class = Rc::new(Class::new(name.clone(), methods, parent));
        self.classes.insert(name, Rc::clone(&class));
        Ok(Statement::ClassDef(class))
    }

    fn parse_method_def(&mut self) -> Result<Method> {
        self.expect_def()?;
        let name = self.expect_identifier()?;
        self.expect_char('(')?;
        if matches!(self.current.kind, TokenKind::Char(')')) {
            bail!("Method '{name}' must declare a receiver parameter");
        }
        // The receiver is always bound as `self` at call time; its declared
        // name does not become a formal parameter.
        self.expect_identifier()?;
        let mut formal_params = Vec::new();
        while matches!(self.current.kind, TokenKind::Char(',')) {
            self.advance();
            formal_params.push(self.expect_identifier()?);
        }
        self.expect_char(')')?;
        let body = self.parse_suite()?;
        Ok(Method {
            name,
            formal_params,
            body,
        })
    }

    fn parse_if(&mut self) -> Result<Statement> {
        self.expect_if()?;
        let condition = self.parse_expression()?;
        let then_body = self.parse_suite()?;
        let else_body = if matches!(self.current.kind, TokenKind::Else) {
            self.advance();
            self.parse_suite()?
        } else {
            Vec::new()
        };
        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_print(&mut self) -> Result<Statement> {
        self.expect_print()?;
        let mut args = Vec::new();
        if !matches!(self.current.kind, TokenKind::Newline) {
            args.push(self.parse_expression()?);
            while matches!(self.current.kind, TokenKind::Char(',')) {
                self.advance();
                args.push(self.parse_expression()?);
            }
        }
        self.expect_newline()?;
        Ok(Statement::Print(args))
    }

    fn parse_return(&mut self) -> Result<Statement> {
        self.expect_return()?;
        let value = self.parse_expression()?;
        self.expect_newline()?;
        Ok(Statement::Return(value))
    }

    /// `':' NEWLINE INDENT statement+ DEDENT`
    fn parse_suite(&mut self) -> Result<Vec<Statement>> {
        self.expect_char(':')?;
        self.expect_newline()?;
        self.expect_indent()?;
        let mut body = Vec::new();
        while !matches!(self.current.kind, TokenKind::Dedent | TokenKind::Eof) {
            if self.consume_newlines() {
                continue;
            }
            body.push(self.parse_statement()?);
        }
        self.expect_dedent()?;
        Ok(body)
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut expr = self.parse_and()?;
        while matches!(self.current.kind, TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op: BinaryOperator::Or,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut expr = self.parse_not()?;
        while matches!(self.current.kind, TokenKind::And) {
            self.advance();
            let right = self.parse_not()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op: BinaryOperator::And,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<Expression> {
        if matches!(self.current.kind, TokenKind::Not) {
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expression::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    /// Comparisons do not chain: at most one comparator per expression.
    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_additive()?;
        let op = match self.current.kind {
            TokenKind::Eq => Comparator::Equal,
            TokenKind::NotEq => Comparator::NotEqual,
            TokenKind::Char('<') => Comparator::Less,
            TokenKind::LessOrEq => Comparator::LessOrEqual,
            TokenKind::Char('>') => Comparator::Greater,
            TokenKind::GreaterOrEq => Comparator::GreaterOrEqual,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        Ok(Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Char('+') => BinaryOperator::Add,
                TokenKind::Char('-') => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Char('*') => BinaryOperator::Mult,
                TokenKind::Char('/') => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        // `-x` is rewritten to `0 - x`.
        if matches!(self.current.kind, TokenKind::Char('-')) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::BinaryOp {
                left: Box::new(Expression::Integer(0)),
                op: BinaryOperator::Sub,
                right: Box::new(operand),
            });
        }
        if matches!(&self.current.kind, TokenKind::Identifier(name) if name.as_str() == "str")
            && matches!(self.peek_kind(), Some(TokenKind::Char('(')))
        {
            self.advance();
            self.advance();
            let argument = self.parse_expression()?;
            self.expect_char(')')?;
            return Ok(Expression::Stringify(Box::new(argument)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        match &self.current.kind {
            TokenKind::Integer(value) => {
                let value = *value;
                self.advance();
                Ok(Expression::Integer(value))
            }
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(Expression::String(value))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::Boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::Boolean(false))
            }
            TokenKind::None => {
                self.advance();
                Ok(Expression::None)
            }
            TokenKind::Char('(') => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_char(')')?;
                Ok(expr)
            }
            TokenKind::Identifier(_) => self.parse_name_expression(),
            _ => Err(self.error("expression")),
        }
    }

    /// `dotted_ids [ '(' arglist ')' ]`: a plain chain is a variable read, a
    /// chain of two or more followed by arguments is a method call, and a
    /// single identifier followed by arguments instantiates a declared class.
    /// A call result may be called again through `.method(args)` chains, as
    /// in `B().f()`.
    fn parse_name_expression(&mut self) -> Result<Expression> {
        let mut ids = self.parse_dotted_ids()?;
        if !matches!(self.current.kind, TokenKind::Char('(')) {
            return Ok(Expression::Variable(ids));
        }
        self.advance();
        let args = self.parse_arglist()?;

        let mut expr = if ids.len() == 1 {
            let name = ids.remove(0);
            let Some(class) = self.classes.get(&name) else {
                bail!("Unknown class '{name}'");
            };
            Expression::NewInstance {
                class: Rc::clone(class),
                args,
            }
        } else {
            let method = match ids.pop() {
                Some(name) => name,
                None => return Err(self.error("method name")),
            };
            Expression::MethodCall {
                object: Box::new(Expression::Variable(ids)),
                method,
                args,
            }
        };

        while matches!(self.current.kind, TokenKind::Char('.')) {
            self.advance();
            let method = self.expect_identifier()?;
            self.expect_char('(')?;
            let args = self.parse_arglist()?;
            expr = Expression::MethodCall {
                object: Box::new(expr),
                method,
                args,
            };
        }
        Ok(expr)
    }

    fn parse_dotted_ids(&mut self) -> Result<Vec<String>> {
        let mut ids = vec![self.expect_identifier()?];
        while matches!(self.current.kind, TokenKind::Char('.')) {
            self.advance();
            ids.push(self.expect_identifier()?);
        }
        Ok(ids)
    }

    /// Arguments up to and including the closing parenthesis.
    fn parse_arglist(&mut self) -> Result<Vec<Expression>> {
        let mut args = Vec::new();
        if !matches!(self.current.kind, TokenKind::Char(')')) {
            args.push(self.parse_expression()?);
            while matches!(self.current.kind, TokenKind::Char(',')) {
                self.advance();
                args.push(self.parse_expression()?);
            }
        }
        self.expect_char(')')?;
        Ok(args)
    }

    fn consume_newlines(&mut self) -> bool {
        let mut consumed = false;
        while matches!(self.current.kind, TokenKind::Newline) {
            consumed = true;
            self.advance();
        }
        consumed
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error("identifier"))
        }
    }

    fn expect_class(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Class) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("class"))
        }
    }

    fn expect_def(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Def) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("def"))
        }
    }

    fn expect_if(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::If) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("if"))
        }
    }

    fn expect_print(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Print) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("print"))
        }
    }

    fn expect_return(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Return) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("return"))
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Char(c) if c == expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&expected.to_string()))
        }
    }

    fn expect_newline(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Newline) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("newline"))
        }
    }

    fn expect_indent(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Indent) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("indent"))
        }
    }

    fn expect_dedent(&mut self) -> Result<()> {
        if matches!(self.current.kind, TokenKind::Dedent) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("dedent"))
        }
    }

    fn advance(&mut self) -> Token {
        let next = self
            .tokens
            .get(self.pos + 1)
            .cloned()
            .unwrap_or(Token::new(TokenKind::Eof, Span::default()));
        self.pos = self.pos.saturating_add(1);
        std::mem::replace(&mut self.current, next)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(Token::kind)
    }

    fn error(&self, expected: &str) -> anyhow::Error {
        anyhow::anyhow!(
            "Expected {expected}, got {:?} at position {}",
            self.current.kind(),
            self.current.span().start
        )
    }
}

pub fn parse_tokens(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use indoc::indoc;

    fn parse(source: &str) -> Program {
        let tokens = tokenize(source).expect("tokenize failed");
        parse_tokens(tokens).expect("parse failed")
    }

    fn parse_err(source: &str) -> String {
        let tokens = tokenize(source).expect("tokenize failed");
        parse_tokens(tokens)
            .expect_err("expected parse failure")
            .to_string()
    }

    fn variable(ids: &[&str]) -> Expression {
        Expression::Variable(ids.iter().map(|id| id.to_string()).collect())
    }

    fn int(value: i64) -> Expression {
        Expression::Integer(value)
    }

    fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Expression {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let program = parse("print 1 + 2 * 3\n");
        let expected = Program {
            statements: vec![Statement::Print(vec![binary(
                int(1),
                BinaryOperator::Add,
                binary(int(2), BinaryOperator::Mult, int(3)),
            )])],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn parentheses_override_precedence() {
        let program = parse("print (1 + 2) * 3\n");
        let expected = Program {
            statements: vec![Statement::Print(vec![binary(
                binary(int(1), BinaryOperator::Add, int(2)),
                BinaryOperator::Mult,
                int(3),
            )])],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn unary_minus_rewrites_to_subtraction_from_zero() {
        let program = parse("x = -1 * 2\n");
        let expected = Program {
            statements: vec![Statement::Assign {
                name: "x".to_string(),
                value: binary(
                    binary(int(0), BinaryOperator::Sub, int(1)),
                    BinaryOperator::Mult,
                    int(2),
                ),
            }],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn boolean_connectives_bind_looser_than_comparisons() {
        let program = parse("print not x == 1 and y or z\n");
        let comparison = Expression::Comparison {
            op: Comparator::Equal,
            left: Box::new(variable(&["x"])),
            right: Box::new(int(1)),
        };
        let expected = Program {
            statements: vec![Statement::Print(vec![binary(
                binary(
                    Expression::Not(Box::new(comparison)),
                    BinaryOperator::And,
                    variable(&["y"]),
                ),
                BinaryOperator::Or,
                variable(&["z"]),
            )])],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn comparisons_do_not_chain() {
        let message = parse_err("print 1 < 2 < 3\n");
        assert!(message.contains("Expected newline"), "got: {message}");
    }

    #[test]
    fn dotted_chain_is_a_variable_read() {
        let program = parse("print circle.center.x\n");
        let expected = Program {
            statements: vec![Statement::Print(vec![variable(&[
                "circle", "center", "x",
            ])])],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn dotted_chain_with_arguments_is_a_method_call() {
        let program = parse("a.b.f(1, 2)\n");
        let expected = Program {
            statements: vec![Statement::Expr(Expression::MethodCall {
                object: Box::new(variable(&["a", "b"])),
                method: "f".to_string(),
                args: vec![int(1), int(2)],
            })],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn assignment_and_field_assignment_are_told_apart_by_lookahead() {
        let program = parse("x = 1\na.b.c = 2\n");
        let expected = Program {
            statements: vec![
                Statement::Assign {
                    name: "x".to_string(),
                    value: int(1),
                },
                Statement::FieldAssign {
                    object: vec!["a".to_string(), "b".to_string()],
                    field: "c".to_string(),
                    value: int(2),
                },
            ],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn equality_test_is_not_an_assignment() {
        let program = parse("x == 1\n");
        let expected = Program {
            statements: vec![Statement::Expr(Expression::Comparison {
                op: Comparator::Equal,
                left: Box::new(variable(&["x"])),
                right: Box::new(int(1)),
            })],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn str_call_parses_as_stringify() {
        let program = parse("print str(5)\n");
        let expected = Program {
            statements: vec![Statement::Print(vec![Expression::Stringify(Box::new(
                int(5),
            ))])],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn parses_class_with_methods_and_instantiation() {
        let source = indoc! {"
            class Counter:
              def __init__(self, start):
                self.count = start
              def bump(self):
                return self.count + 1
            c = Counter(10)
        "};
        let program = parse(source);

        let class = Rc::new(Class::new(
            "Counter".to_string(),
            vec![
                Method {
                    name: "__init__".to_string(),
                    formal_params: vec!["start".to_string()],
                    body: vec![Statement::FieldAssign {
                        object: vec!["self".to_string()],
                        field: "count".to_string(),
                        value: variable(&["start"]),
                    }],
                },
                Method {
                    name: "bump".to_string(),
                    formal_params: vec![],
                    body: vec![Statement::Return(binary(
                        variable(&["self", "count"]),
                        BinaryOperator::Add,
                        int(1),
                    ))],
                },
            ],
            None,
        ));
        let expected = Program {
            statements: vec![
                Statement::ClassDef(Rc::clone(&class)),
                Statement::Assign {
                    name: "c".to_string(),
                    value: Expression::NewInstance {
                        class,
                        args: vec![int(10)],
                    },
                },
            ],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn call_results_can_be_called_again() {
        let source = indoc! {"
            class A:
              def f(self):
                return 1
            print A().f()
        "};
        let program = parse(source);

        let Statement::ClassDef(class) = &program.statements[0] else {
            panic!("expected class definition");
        };
        let expected = Statement::Print(vec![Expression::MethodCall {
            object: Box::new(Expression::NewInstance {
                class: Rc::clone(class),
                args: vec![],
            }),
            method: "f".to_string(),
            args: vec![],
        }]);
        assert_eq!(program.statements[1], expected);
    }

    #[test]
    fn subclass_resolves_its_declared_base() {
        let source = indoc! {"
            class A:
              def f(self):
                return 1
            class B(A):
              def g(self):
                return 2
        "};
        let program = parse(source);

        let Statement::ClassDef(b) = &program.statements[1] else {
            panic!("expected class definition");
        };
        assert_eq!(b.name(), "B");
        assert!(b.method("f").is_some(), "inherited method must resolve");
    }

    #[test]
    fn parses_if_else_suites() {
        let source = indoc! {"
            if x < 10:
              print 1
            else:
              print 2
        "};
        let program = parse(source);
        let expected = Program {
            statements: vec![Statement::If {
                condition: Expression::Comparison {
                    op: Comparator::Less,
                    left: Box::new(variable(&["x"])),
                    right: Box::new(int(10)),
                },
                then_body: vec![Statement::Print(vec![int(1)])],
                else_body: vec![Statement::Print(vec![int(2)])],
            }],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn print_without_arguments_is_allowed() {
        let program = parse("print\n");
        assert_eq!(
            program,
            Program {
                statements: vec![Statement::Print(vec![])],
            }
        );
    }

    #[test]
    fn errors_on_unknown_class() {
        let message = parse_err("x = Missing()\n");
        assert!(message.contains("Unknown class 'Missing'"), "got: {message}");
    }

    #[test]
    fn errors_on_unknown_base_class() {
        let source = indoc! {"
            class B(A):
              def f(self):
                return 1
        "};
        let message = parse_err(source);
        assert!(message.contains("Unknown base class 'A'"), "got: {message}");
    }

    #[test]
    fn errors_on_class_redefinition() {
        let source = indoc! {"
            class A:
              def f(self):
                return 1
            class A:
              def g(self):
                return 2
        "};
        let message = parse_err(source);
        assert!(message.contains("already defined"), "got: {message}");
    }

    #[test]
    fn errors_on_def_outside_class() {
        let source = indoc! {"
            def f(self):
              return 1
        "};
        let message = parse_err(source);
        assert!(
            message.contains("only allowed inside a class body"),
            "got: {message}"
        );
    }

    #[test]
    fn errors_on_method_without_receiver() {
        let source = indoc! {"
            class A:
              def f():
                return 1
        "};
        let message = parse_err(source);
        assert!(
            message.contains("must declare a receiver parameter"),
            "got: {message}"
        );
    }

    #[test]
    fn errors_on_missing_colon() {
        let message = parse_err("if x\n  print 1\n");
        assert!(message.contains("Expected :"), "got: {message}");
    }
}
