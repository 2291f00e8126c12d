//! Typed syntax tree produced by [`crate::parser::Parser`].
//!
//! Every node category is a closed enum, so consumers can match
//! exhaustively.  For consumers that prefer double dispatch, each category
//! also has a visitor trait with one method per variant and an `accept`
//! method that routes a node to it.  Nodes never evaluate themselves.
//!
//! Ownership is strictly hierarchical: a parent owns its children through
//! `Box`/`Vec`, so a tree is acyclic by construction.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A named reference to a variable or function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    /// Non‑empty and not starting with a digit.
    pub fn is_valid_name(name: &str) -> bool {
        name.chars().next().is_some_and(|c| !c.is_ascii_digit())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// The `empty` keyword (null sentinel).
    Empty,

    Boolean(bool),

    /// String contents without the surrounding quotes.
    Str(String),

    Integer(i64),

    /// Numbers with a fractional part or outside the `i64` range.
    Double(f64),

    /// `dd/MM/yyyy` calendar date.
    Date(NaiveDate),
}

/// Binary operators, highest precedence first.
///
/// The shift and bitwise operators are reserved: no grammar path produces
/// them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Exponent,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    ShiftLeft,
    ShiftRight,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Exponent => "^",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^^",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators.  `Increment` and `Decrement` are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Increment,
    Decrement,
    Negate,
    Invert,
    Not,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Increment => "++",
            UnaryOperator::Decrement => "--",
            UnaryOperator::Negate => "-",
            UnaryOperator::Invert => "~",
            UnaryOperator::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The leaves of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Term {
    Literal(Literal),

    Variable(Variable),

    /// `name(arg, ...)`, at least one argument.
    Call {
        function: Variable,
        arguments: Vec<Expr>,
    },

    /// `name[index]`
    ArrayAccess {
        qualifier: Variable,
        index: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    Term(Term),
}

impl Expr {
    pub fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn literal(lit: Literal) -> Self {
        Expr::Term(Term::Literal(lit))
    }

    pub fn variable<S: Into<String>>(name: S) -> Self {
        Expr::Term(Term::Variable(Variable::new(name)))
    }
}

/// Executable constructs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `let name = value`
    Declare { variable: Variable, value: Expr },

    /// `let name = [length]`
    ArrayDeclare { variable: Variable, length: Expr },

    /// `name = value`
    Assign { variable: Variable, value: Expr },

    /// `name[index] = value`
    ArrayAssign {
        variable: Variable,
        index: Expr,
        value: Expr,
    },

    If {
        condition: Expr,
        then_scope: Scope,
        else_scope: Option<Scope>,
    },

    While { condition: Expr, body: Scope },

    /// `def name(params) { body }`
    Function {
        name: Variable,
        params: Vec<Variable>,
        body: Scope,
    },

    Return(Option<Expr>),

    /// Bare `{ ... }` block.
    Scope(Scope),

    Expression(Expr),
}

/// An ordered, immutable block of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scope {
    statements: Vec<Stmt>,
}

impl Scope {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.statements.iter()
    }
}

impl<'s> IntoIterator for &'s Scope {
    type Item = &'s Stmt;
    type IntoIter = std::slice::Iter<'s, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl FromIterator<Stmt> for Scope {
    fn from_iter<I: IntoIterator<Item = Stmt>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Double dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// One method per [`Stmt`] variant.
pub trait StmtVisitor {
    type Output;

    fn visit_declare(&mut self, variable: &Variable, value: &Expr) -> Self::Output;
    fn visit_array_declare(&mut self, variable: &Variable, length: &Expr) -> Self::Output;
    fn visit_assign(&mut self, variable: &Variable, value: &Expr) -> Self::Output;
    fn visit_array_assign(
        &mut self,
        variable: &Variable,
        index: &Expr,
        value: &Expr,
    ) -> Self::Output;
    fn visit_if(
        &mut self,
        condition: &Expr,
        then_scope: &Scope,
        else_scope: Option<&Scope>,
    ) -> Self::Output;
    fn visit_while(&mut self, condition: &Expr, body: &Scope) -> Self::Output;
    fn visit_function(&mut self, name: &Variable, params: &[Variable], body: &Scope)
        -> Self::Output;
    fn visit_return(&mut self, value: Option<&Expr>) -> Self::Output;
    fn visit_scope(&mut self, scope: &Scope) -> Self::Output;
    fn visit_expression(&mut self, expr: &Expr) -> Self::Output;
}

/// One method per [`Expr`] variant.
pub trait ExprVisitor {
    type Output;

    fn visit_binary(&mut self, op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> Self::Output;
    fn visit_unary(&mut self, op: UnaryOperator, operand: &Expr) -> Self::Output;
    fn visit_term(&mut self, term: &Term) -> Self::Output;
}

/// One method per [`Term`] variant.
pub trait TermVisitor {
    type Output;

    fn visit_literal(&mut self, literal: &Literal) -> Self::Output;
    fn visit_variable(&mut self, variable: &Variable) -> Self::Output;
    fn visit_call(&mut self, function: &Variable, arguments: &[Expr]) -> Self::Output;
    fn visit_array_access(&mut self, qualifier: &Variable, index: &Expr) -> Self::Output;
}

impl Stmt {
    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Stmt::Declare { variable, value } => visitor.visit_declare(variable, value),
            Stmt::ArrayDeclare { variable, length } => {
                visitor.visit_array_declare(variable, length)
            }
            Stmt::Assign { variable, value } => visitor.visit_assign(variable, value),
            Stmt::ArrayAssign {
                variable,
                index,
                value,
            } => visitor.visit_array_assign(variable, index, value),
            Stmt::If {
                condition,
                then_scope,
                else_scope,
            } => visitor.visit_if(condition, then_scope, else_scope.as_ref()),
            Stmt::While { condition, body } => visitor.visit_while(condition, body),
            Stmt::Function { name, params, body } => visitor.visit_function(name, params, body),
            Stmt::Return(value) => visitor.visit_return(value.as_ref()),
            Stmt::Scope(scope) => visitor.visit_scope(scope),
            Stmt::Expression(expr) => visitor.visit_expression(expr),
        }
    }
}

impl Expr {
    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Binary { op, lhs, rhs } => visitor.visit_binary(*op, lhs, rhs),
            Expr::Unary { op, operand } => visitor.visit_unary(*op, operand),
            Expr::Term(term) => visitor.visit_term(term),
        }
    }
}

impl Term {
    pub fn accept<V: TermVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Term::Literal(literal) => visitor.visit_literal(literal),
            Term::Variable(variable) => visitor.visit_variable(variable),
            Term::Call {
                function,
                arguments,
            } => visitor.visit_call(function, arguments),
            Term::ArrayAccess { qualifier, index } => visitor.visit_array_access(qualifier, index),
        }
    }
}
