//! Source text printer
//!
//! Two layouts: pretty (one statement per line, indented) for debug
//! builds and compact (no line breaks or indentation) for release builds.
//! Raw fragments are always followed by a line break so a trailing line
//! comment in a fragment cannot swallow the code after it.

use crate::ast::{BinaryOperator, Block, Expr, Function, Program, Stmt};

/// Layout options for [`print_program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub pretty: bool,
    pub indent_width: usize,
}

impl PrintOptions {
    pub fn pretty(indent_width: usize) -> Self {
        Self {
            pretty: true,
            indent_width,
        }
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent_width: 0,
        }
    }
}

/// Print a whole program
pub fn print_program(program: &Program, options: PrintOptions) -> String {
    let mut printer = Printer::new(options);
    for stmt in &program.body {
        printer.stmt(stmt);
    }
    printer.out
}

/// Print a single expression (mostly useful in tests and diagnostics)
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(PrintOptions::compact());
    printer.expr(expr);
    printer.out
}

struct Printer {
    out: String,
    options: PrintOptions,
    depth: usize,
}

impl Printer {
    fn new(options: PrintOptions) -> Self {
        Self {
            out: String::new(),
            options,
            depth: 0,
        }
    }

    fn indent(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth * self.options.indent_width {
                self.out.push(' ');
            }
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Raw(text) => {
                self.raw(text);
                return;
            }
            _ => self.indent(),
        }

        match stmt {
            Stmt::Expr(expr) => {
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Decl { kind, name, init } => {
                self.out.push_str(kind.keyword());
                self.out.push(' ');
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.expr(init);
                self.out.push(';');
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.out.push_str("if (");
                self.expr(test);
                self.out.push_str(") ");
                self.block(consequent);
                if let Some(alternate) = alternate {
                    self.out.push_str(" else ");
                    self.block(alternate);
                }
            }
            Stmt::While { test, body } => {
                self.out.push_str("while (");
                self.expr(test);
                self.out.push_str(") ");
                self.block(body);
            }
            Stmt::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value);
                }
                self.out.push(';');
            }
            Stmt::Block(block) => self.block(block),
            Stmt::Function(function) => self.function(function),
            Stmt::Raw(_) => {}
        }
        self.newline();
    }

    fn raw(&mut self, text: &str) {
        if self.options.pretty {
            for line in text.trim_end().lines() {
                if !line.trim().is_empty() {
                    self.indent();
                    self.out.push_str(line.trim_end());
                }
                self.out.push('\n');
            }
        } else {
            self.out.push_str(text.trim());
            self.out.push('\n');
        }
    }

    fn block(&mut self, block: &Block) {
        if block.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.newline();
        self.depth += 1;
        for stmt in block.statements() {
            self.stmt(stmt);
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn function(&mut self, function: &Function) {
        self.out.push_str("function");
        if function.generator {
            self.out.push('*');
        }
        self.out.push(' ');
        if let Some(name) = &function.name {
            self.out.push_str(name);
        }
        self.out.push('(');
        self.out.push_str(&function.params.join(", "));
        self.out.push_str(") ");
        self.block(&function.body);
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::Str(value) => {
                let quoted = serde_json::Value::String(value.clone()).to_string();
                self.out.push_str(&quoted);
            }
            Expr::Num(value) => self.out.push_str(&format_number(*value)),
            Expr::BigInt(digits) => {
                self.out.push_str(digits);
                self.out.push('n');
            }
            Expr::Bool(value) => self.out.push_str(if *value { "true" } else { "false" }),
            Expr::Null => self.out.push_str("null"),
            Expr::Raw(text) => self.out.push_str(text),
            Expr::Binary { op, left, right } => {
                if *op == BinaryOperator::Exp && is_negative_literal(left) {
                    self.out.push('(');
                    self.expr(left);
                    self.out.push(')');
                } else {
                    self.operand(left);
                }
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.operand(right);
            }
            Expr::Member { object, property } => {
                self.operand(object);
                self.out.push('.');
                self.out.push_str(property);
            }
            Expr::Call { callee, args } => {
                self.operand(callee);
                self.out.push('(');
                self.list(args);
                self.out.push(')');
            }
            Expr::Array(items) => {
                self.out.push('[');
                self.list(items);
                self.out.push(']');
            }
            Expr::Object(props) => {
                if props.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (i, (key, value)) in props.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if is_identifier(key) {
                        self.out.push_str(key);
                    } else {
                        self.out.push_str(&serde_json::Value::String(key.clone()).to_string());
                    }
                    self.out.push_str(": ");
                    self.expr(value);
                }
                self.out.push_str(" }");
            }
            Expr::Function(function) => self.function(function),
            Expr::Arrow { params, body } => {
                self.out.push('(');
                self.out.push_str(&params.join(", "));
                self.out.push_str(") => ");
                if matches!(**body, Expr::Object(_)) {
                    self.out.push('(');
                    self.expr(body);
                    self.out.push(')');
                } else {
                    self.expr(body);
                }
            }
            Expr::Assign { target, value } => {
                self.expr(target);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Expr::Yield(value) => {
                self.out.push_str("yield ");
                self.expr(value);
            }
        }
    }

    /// Print a sub-expression, parenthesized when it binds looser than
    /// its position requires
    fn operand(&mut self, expr: &Expr) {
        let wrap = matches!(
            expr,
            Expr::Binary { .. }
                | Expr::Assign { .. }
                | Expr::Yield(_)
                | Expr::Arrow { .. }
                | Expr::Function(_)
                | Expr::Object(_)
        );
        if wrap {
            self.out.push('(');
            self.expr(expr);
            self.out.push(')');
        } else {
            self.expr(expr);
        }
    }

    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(item);
        }
    }
}

/// Numbers print as integers when integral
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 && value.is_sign_negative() {
        "-0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// A unary minus may not be the base of `**`
fn is_negative_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Num(n) => n.is_sign_negative() && !n.is_nan(),
        Expr::BigInt(digits) => digits.starts_with('-'),
        _ => false,
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
