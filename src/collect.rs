//! `StatementExpressionCollector` + `ChildStatementCollector`: walks over a
//! statement's sub-expressions and nested statement lists for analysis
//! passes (the transitive modification propagator is the main consumer).

use crate::cst::{Expression, Statement};

pub struct StatementExpressionCollector;

impl StatementExpressionCollector {
    /// Every expression directly attached to this statement, not recursing
    /// into nested blocks (those are reached via `ChildStatementCollector`
    /// and collected again at their own level).
    pub fn collect(stmt: &Statement) -> Vec<&Expression> {
        match stmt {
            Statement::VariableDeclaration(decl) => decl.initializer.iter().collect(),
            Statement::Assignment(assign) => vec![&assign.target, &assign.value],
            Statement::If(s) => vec![&s.condition],
            Statement::While(s) => vec![&s.condition],
            Statement::DoWhile(s) => vec![&s.condition],
            Statement::For(s) => s.condition.iter().collect(),
            Statement::Switch(s) => {
                let mut exprs = vec![&s.scrutinee];
                exprs.extend(s.cases.iter().map(|c| &c.value));
                exprs
            }
            Statement::Return(s) => s.value.iter().collect(),
            Statement::Expression(s) => vec![&s.expr],
            Statement::Block(_) => Vec::new(),
        }
    }

    /// Recurses through sub-expressions (call arguments, member-access
    /// chains, subscript operands) to collect call-sites and identifiers
    /// anywhere below the given expressions.
    pub fn collect_calls<'a>(exprs: impl IntoIterator<Item = &'a Expression>) -> Vec<&'a Expression> {
        let mut calls = Vec::new();
        let mut stack: Vec<&Expression> = exprs.into_iter().collect();
        while let Some(expr) = stack.pop() {
            if matches!(expr, Expression::Call { .. }) {
                calls.push(expr);
            }
            Self::push_children(expr, &mut stack);
        }
        calls
    }

    fn push_children<'a>(expr: &'a Expression, stack: &mut Vec<&'a Expression>) {
        match expr {
            Expression::Binary { left, right, .. } => {
                stack.push(left);
                stack.push(right);
            }
            Expression::Unary { operand, .. } => stack.push(operand),
            Expression::Parens { inner, .. } => stack.push(inner),
            Expression::MemberAccess { base, .. } => stack.push(base),
            Expression::Subscripted { base, index, .. } => {
                stack.push(base);
                match index {
                    crate::cst::Subscript::Index(i) => stack.push(i),
                    crate::cst::Subscript::BitRange { start, width } => {
                        stack.push(start);
                        stack.push(width);
                    }
                }
            }
            Expression::Call { args, .. } => stack.extend(args.iter()),
            Expression::StructLiteral { fields, .. } => stack.extend(fields.iter().map(|(_, e)| e)),
            Expression::Identifier { .. }
            | Expression::IntLiteral { .. }
            | Expression::BoolLiteral { .. }
            | Expression::StringLiteral { .. }
            | Expression::Sizeof { .. } => {}
        }
    }
}

pub struct ChildStatementCollector;

impl ChildStatementCollector {
    /// The immediate nested blocks of a statement, one level deep. The
    /// caller recurses by calling this again on each returned statement.
    pub fn children(stmt: &Statement) -> Vec<&Statement> {
        match stmt {
            Statement::If(s) => {
                let mut children: Vec<&Statement> = s.then_block.statements.iter().collect();
                if let Some(else_block) = &s.else_block {
                    children.extend(else_block.statements.iter());
                }
                children
            }
            Statement::While(s) => s.body.statements.iter().collect(),
            Statement::DoWhile(s) => s.body.statements.iter().collect(),
            Statement::For(s) => {
                let mut children: Vec<&Statement> = Vec::new();
                if let Some(init) = &s.init {
                    children.push(init);
                }
                children.extend(s.body.statements.iter());
                if let Some(step) = &s.step {
                    children.push(step);
                }
                children
            }
            Statement::Switch(s) => {
                let mut children: Vec<&Statement> =
                    s.cases.iter().flat_map(|c| c.body.statements.iter()).collect();
                if let Some(default) = &s.default {
                    children.extend(default.statements.iter());
                }
                children
            }
            Statement::Block(b) => b.statements.iter().collect(),
            Statement::VariableDeclaration(_)
            | Statement::Assignment(_)
            | Statement::Return(_)
            | Statement::Expression(_) => Vec::new(),
        }
    }

    /// Flattens an entire statement tree (depth-first) into a single list.
    pub fn flatten_all<'a>(root: &'a Statement) -> Vec<&'a Statement> {
        let mut all = vec![root];
        let mut frontier = Self::children(root);
        while let Some(stmt) = frontier.pop() {
            all.push(stmt);
            frontier.extend(Self::children(stmt));
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{AssignmentOp, AssignmentStatement, Block, IfStatement, Span};

    fn ident(name: &str) -> Expression {
        Expression::Identifier {
            name: name.to_string(),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn collects_condition_and_target_value_pairs() {
        let assign = Statement::Assignment(AssignmentStatement {
            target: ident("x"),
            op: AssignmentOp::Assign,
            value: ident("y"),
            span: Span::synthetic(),
        });
        let collected = StatementExpressionCollector::collect(&assign);
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn if_statement_exposes_then_and_else_children() {
        let inner = Statement::Expression(crate::cst::ExpressionStatement {
            expr: ident("a"),
            span: Span::synthetic(),
        });
        let if_stmt = Statement::If(IfStatement {
            condition: ident("cond"),
            then_block: Block {
                statements: vec![inner.clone()],
                span: Span::synthetic(),
            },
            else_block: Some(Block {
                statements: vec![inner],
                span: Span::synthetic(),
            }),
            span: Span::synthetic(),
        });
        let children = ChildStatementCollector::children(&if_stmt);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn flatten_all_includes_root_and_every_descendant() {
        let leaf = Statement::Expression(crate::cst::ExpressionStatement {
            expr: ident("a"),
            span: Span::synthetic(),
        });
        let while_stmt = Statement::While(crate::cst::WhileStatement {
            condition: ident("cond"),
            body: Block {
                statements: vec![leaf],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
        });
        let flattened = ChildStatementCollector::flatten_all(&while_stmt);
        assert_eq!(flattened.len(), 2);
    }

    #[test]
    fn collect_calls_finds_nested_call_inside_binary_expression() {
        let call = Expression::Call {
            callee: "f".to_string(),
            args: vec![],
            span: Span::synthetic(),
        };
        let binary = Expression::Binary {
            op: crate::cst::BinaryOp::Add,
            left: Box::new(call),
            right: Box::new(ident("y")),
            span: Span::synthetic(),
        };
        let calls = StatementExpressionCollector::collect_calls(vec![&binary]);
        assert_eq!(calls.len(), 1);
    }
}
