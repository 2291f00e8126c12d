use crate::ast::{
    BinaryOperator, Expr, ExprVisitor, Literal, Scope, StmtVisitor, Term, TermVisitor,
    UnaryOperator, Variable,
};

/// Renders a tree back to canonical Scrawl source.
///
/// Binary expressions are fully parenthesised and blocks are indented four
/// spaces, so parsing the output again yields an equal tree.
#[derive(Debug, Default)]
pub struct AstPrinter {
    depth: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A whole program, one statement per line.
    pub fn print(scope: &Scope) -> String {
        let mut printer = Self::new();
        let mut out = printer.lines(scope);
        out.push('\n');
        out
    }

    pub fn print_expr(expr: &Expr) -> String {
        expr.accept(&mut Self::new())
    }

    fn pad(&self) -> String {
        "    ".repeat(self.depth)
    }

    fn lines(&mut self, scope: &Scope) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(scope.len());

        for stmt in scope {
            let text: String = stmt.accept(self);
            lines.push(format!("{}{}", self.pad(), text));
        }

        lines.join("\n")
    }

    fn block(&mut self, scope: &Scope) -> String {
        self.depth += 1;
        let body: String = self.lines(scope);
        self.depth -= 1;

        if body.is_empty() {
            format!("{{\n{}}}", self.pad())
        } else {
            format!("{{\n{}\n{}}}", body, self.pad())
        }
    }

    fn list(&mut self, exprs: &[Expr]) -> String {
        exprs
            .iter()
            .map(|e| e.accept(&mut *self))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl StmtVisitor for AstPrinter {
    type Output = String;

    fn visit_declare(&mut self, variable: &Variable, value: &Expr) -> String {
        format!("let {} = {}", variable, value.accept(self))
    }

    fn visit_array_declare(&mut self, variable: &Variable, length: &Expr) -> String {
        format!("let {} = [{}]", variable, length.accept(self))
    }

    fn visit_assign(&mut self, variable: &Variable, value: &Expr) -> String {
        format!("{} = {}", variable, value.accept(self))
    }

    fn visit_array_assign(&mut self, variable: &Variable, index: &Expr, value: &Expr) -> String {
        let index: String = index.accept(self);
        format!("{}[{}] = {}", variable, index, value.accept(self))
    }

    fn visit_if(
        &mut self,
        condition: &Expr,
        then_scope: &Scope,
        else_scope: Option<&Scope>,
    ) -> String {
        let mut out = format!("if {} {}", condition.accept(self), self.block(then_scope));

        if let Some(else_scope) = else_scope {
            out.push_str(" else ");
            out.push_str(&self.block(else_scope));
        }

        out
    }

    fn visit_while(&mut self, condition: &Expr, body: &Scope) -> String {
        format!("while {} {}", condition.accept(self), self.block(body))
    }

    fn visit_function(&mut self, name: &Variable, params: &[Variable], body: &Scope) -> String {
        let params: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        format!("def {}({}) {}", name, params.join(", "), self.block(body))
    }

    fn visit_return(&mut self, value: Option<&Expr>) -> String {
        match value {
            Some(value) => format!("return {}", value.accept(self)),
            None => "return".into(),
        }
    }

    fn visit_scope(&mut self, scope: &Scope) -> String {
        self.block(scope)
    }

    fn visit_expression(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl ExprVisitor for AstPrinter {
    type Output = String;

    fn visit_binary(&mut self, op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> String {
        let lhs: String = lhs.accept(self);
        format!("({} {} {})", lhs, op, rhs.accept(self))
    }

    fn visit_unary(&mut self, op: UnaryOperator, operand: &Expr) -> String {
        format!("{}{}", op, operand.accept(self))
    }

    fn visit_term(&mut self, term: &Term) -> String {
        term.accept(self)
    }
}

impl TermVisitor for AstPrinter {
    type Output = String;

    fn visit_literal(&mut self, literal: &Literal) -> String {
        match literal {
            Literal::Empty => "empty".into(),

            Literal::Boolean(b) => b.to_string(),

            Literal::Str(s) if s.contains('"') => format!("'{}'", s),

            Literal::Str(s) => format!("\"{}\"", s),

            Literal::Integer(n) => n.to_string(),

            Literal::Double(n) => {
                // 3.0 stays a double when read back; huge values print in
                // full and overflow back into a double.
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    format!("{:.1}", n)
                } else {
                    n.to_string()
                }
            }

            Literal::Date(date) => date.format("%d/%m/%Y").to_string(),
        }
    }

    fn visit_variable(&mut self, variable: &Variable) -> String {
        variable.name.clone()
    }

    fn visit_call(&mut self, function: &Variable, arguments: &[Expr]) -> String {
        format!("{}({})", function, self.list(arguments))
    }

    fn visit_array_access(&mut self, qualifier: &Variable, index: &Expr) -> String {
        format!("{}[{}]", qualifier, index.accept(self))
    }
}
