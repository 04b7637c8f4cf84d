//! The outer code-generator dispatcher: walks parse-tree
//! nodes depth-first, delegating to the helpers in every other module and
//! appending text to the current line with indentation. Before emitting
//! any statement it flushes the pending temp-declaration and C++
//! class-assignment buffers onto preceding lines.

use crate::arguments::{ArgumentGenerator, ArgumentShape};
use crate::assignment::{AssignmentExpectedTypeResolver, AssignmentTargetShape, AssignmentValidator};
use crate::bitrange::{BitRangeHelper, FloatBitHelper};
use crate::cast::BooleanHelper;
use crate::cst::{
    BinaryOp, Block, Expression, FunctionDeclaration, Statement, Subscript, UnaryOp,
};
use crate::error::{CodegenError, CodegenErrorKind};
use crate::function_context::FunctionContextManager;
use crate::identifier::IdentifierResolver;
use crate::literal::parse_int_literal;
use crate::mode::Mode;
use crate::state::CodegenState;
use crate::variable_decl::VariableDeclHelper;
use std::collections::HashSet;

/// Owns the [`CodegenState`] and [`Mode`] for one translation unit and
/// drives the depth-first walk. A fresh `CodeGenerator` must be created per
/// unit; reusing one across units without resetting its state is undefined.
pub struct CodeGenerator {
    pub state: CodegenState,
    pub mode: Mode,
}

impl CodeGenerator {
    pub fn new(state: CodegenState, mode: Mode) -> Self {
        CodeGenerator { state, mode }
    }

    pub fn emit_function(
        &self,
        func: &FunctionDeclaration,
        modified_params: &HashSet<String>,
        scope: Option<String>,
    ) -> Result<Vec<String>, CodegenError> {
        let return_type = crate::types::TypeInfo::primitive(func.return_type.base_name.clone());
        FunctionContextManager::enter(
            &self.state,
            &func.name,
            &func.parameters.0,
            modified_params,
            return_type.clone(),
            scope,
        );

        let signature = crate::parameters::SignatureBuilder::render_signature(
            self.mode,
            &self.state.current_parameters_ordered(),
        );
        let c_return = crate::type_render::c_primitive_name(&return_type.base_type);
        let mut lines = vec![format!("{c_return} {}({signature}) {{", func.name)];

        self.state.enter_block();
        let body = self.emit_block(&func.body);
        self.state.exit_block();

        let body = match body {
            Ok(lines) => lines,
            Err(e) => {
                FunctionContextManager::exit(&self.state);
                return Err(e);
            }
        };
        lines.extend(body);
        lines.push("}".to_string());

        FunctionContextManager::exit(&self.state);
        Ok(lines)
    }

    pub fn emit_block(&self, block: &Block) -> Result<Vec<String>, CodegenError> {
        let mut lines = Vec::new();
        for stmt in &block.statements {
            lines.extend(self.emit_statement(stmt)?);
        }
        Ok(lines)
    }

    /// Flushes the pending buffers, then emits this single statement with
    /// the current indentation prefix.
    pub fn emit_statement(&self, stmt: &Statement) -> Result<Vec<String>, CodegenError> {
        let body_lines = self.lower_statement(stmt)?;
        let (pending_temps, pending_assignments) = self.state.flush_pending();

        let indent = self.state.indent();
        let mut out = Vec::new();
        for line in pending_temps.into_iter().chain(pending_assignments) {
            out.push(format!("{indent}{line}"));
        }
        for line in body_lines {
            out.push(format!("{indent}{line}"));
        }
        Ok(out)
    }

    fn lower_statement(&self, stmt: &Statement) -> Result<Vec<String>, CodegenError> {
        match stmt {
            Statement::VariableDeclaration(decl) => {
                VariableDeclHelper::declare(&self.state, self.mode, decl, true)
            }
            Statement::Assignment(assign) => self.lower_assignment(assign),
            Statement::Expression(expr_stmt) => {
                Ok(vec![format!("{};", self.lower_expression(&expr_stmt.expr)?)])
            }
            Statement::Return(ret) => match &ret.value {
                Some(expr) => Ok(vec![format!("return {};", self.lower_expression(expr)?)]),
                None => Ok(vec!["return;".to_string()]),
            },
            Statement::If(if_stmt) => {
                let cond = self.lower_expression(&if_stmt.condition)?;
                let mut lines = vec![format!("if ({cond}) {{")];
                self.state.enter_block();
                let then_lines = self.emit_block(&if_stmt.then_block);
                self.state.exit_block();
                lines.extend(then_lines?);
                lines.push("}".to_string());
                if let Some(else_block) = &if_stmt.else_block {
                    lines.push("else {".to_string());
                    self.state.enter_block();
                    let else_lines = self.emit_block(else_block);
                    self.state.exit_block();
                    lines.extend(else_lines?);
                    lines.push("}".to_string());
                }
                Ok(lines)
            }
            Statement::While(while_stmt) => {
                let cond = self.lower_expression(&while_stmt.condition)?;
                let mut lines = vec![format!("while ({cond}) {{")];
                self.state.enter_block();
                let body = self.emit_block(&while_stmt.body);
                self.state.exit_block();
                lines.extend(body?);
                lines.push("}".to_string());
                Ok(lines)
            }
            Statement::DoWhile(do_while) => {
                let mut lines = vec!["do {".to_string()];
                self.state.enter_block();
                let body = self.emit_block(&do_while.body);
                self.state.exit_block();
                lines.extend(body?);
                let cond = self.lower_expression(&do_while.condition)?;
                lines.push(format!("}} while ({cond});"));
                Ok(lines)
            }
            Statement::For(for_stmt) => {
                let init = match &for_stmt.init {
                    Some(stmt) => self.lower_statement(stmt)?.join(" "),
                    None => String::new(),
                };
                let cond = match &for_stmt.condition {
                    Some(expr) => self.lower_expression(expr)?,
                    None => String::new(),
                };
                let step = match &for_stmt.step {
                    Some(stmt) => self.lower_statement(stmt)?.join(" "),
                    None => String::new(),
                };
                let mut lines = vec![format!(
                    "for ({} {}; {}) {{",
                    init.trim_end_matches(';'),
                    cond,
                    step.trim_end_matches(';')
                )];
                self.state.enter_block();
                let body = self.emit_block(&for_stmt.body);
                self.state.exit_block();
                lines.extend(body?);
                lines.push("}".to_string());
                Ok(lines)
            }
            Statement::Switch(switch) => {
                let scrutinee = self.lower_expression(&switch.scrutinee)?;
                let mut lines = vec![format!("switch ({scrutinee}) {{")];
                for case in &switch.cases {
                    let value = self.lower_expression(&case.value)?;
                    lines.push(format!("case {value}:"));
                    self.state.enter_block();
                    let body = self.emit_block(&case.body);
                    self.state.exit_block();
                    lines.extend(body?);
                    lines.push("break;".to_string());
                }
                if let Some(default) = &switch.default {
                    lines.push("default:".to_string());
                    self.state.enter_block();
                    let body = self.emit_block(default);
                    self.state.exit_block();
                    lines.extend(body?);
                    lines.push("break;".to_string());
                }
                lines.push("}".to_string());
                Ok(lines)
            }
            Statement::Block(block) => self.emit_block(block),
        }
    }

    fn lower_assignment(
        &self,
        assign: &crate::cst::AssignmentStatement,
    ) -> Result<Vec<String>, CodegenError> {
        match &assign.target {
            Expression::Identifier { name, .. } => self.lower_plain_assignment(name, assign),
            Expression::Subscripted { base, index: Subscript::Index(idx_expr), .. } => {
                self.lower_array_element_assignment(base, idx_expr, assign)
            }
            Expression::Subscripted { base, index: Subscript::BitRange { start, width }, .. } => {
                self.lower_bit_range_assignment(base, start, width, assign)
            }
            Expression::MemberAccess { base, member, .. } => {
                self.lower_member_assignment(base, member, assign)
            }
            other => {
                let target_rendered = self.lower_expression(other)?;
                let value = self.lower_expression(&assign.value)?;
                let op_token = assign.op.as_c_token();
                Ok(vec![format!("{target_rendered} {op_token} {value};")])
            }
        }
    }

    fn lower_plain_assignment(
        &self,
        name: &str,
        assign: &crate::cst::AssignmentStatement,
    ) -> Result<Vec<String>, CodegenError> {
        let target_type = AssignmentExpectedTypeResolver::resolve(&self.state, name);
        let is_const = target_type.as_ref().map(|t| t.is_const).unwrap_or(false);
        AssignmentValidator::reject_const_write(name, is_const, AssignmentTargetShape::Plain)
            .map_err(|e| CodegenError::new(assign.span, CodegenErrorKind::Access(e)))?;

        let is_float_target = target_type.as_ref().map(|t| t.is_float()).unwrap_or(false);
        AssignmentValidator::invalidate_shadow_on_float_write(&self.state, name, is_float_target);

        let value = self.lower_expression(&assign.value)?;
        let op_token = assign.op.as_c_token();
        Ok(vec![format!("{name} {op_token} {value};")])
    }

    fn lower_array_element_assignment(
        &self,
        base: &Expression,
        idx_expr: &Expression,
        assign: &crate::cst::AssignmentStatement,
    ) -> Result<Vec<String>, CodegenError> {
        let base_name = Self::base_identifier_name(base);
        let target_type = AssignmentExpectedTypeResolver::resolve(&self.state, &base_name);
        let is_const = target_type.as_ref().map(|t| t.is_const).unwrap_or(false);
        AssignmentValidator::reject_const_write(&base_name, is_const, AssignmentTargetShape::ArrayElement)
            .map_err(|e| CodegenError::new(assign.span, CodegenErrorKind::Access(e)))?;

        let declared_size = target_type
            .as_ref()
            .and_then(|t| t.array_dimensions.first())
            .and_then(|d| match d {
                crate::cst::ArrayDimension::Literal(n) => Some(*n),
                crate::cst::ArrayDimension::Unresolved(_) => None,
            });
        let evaluator = crate::literal::LiteralEvaluator::new(&self.state.const_table_snapshot());
        let resolved_index = evaluator.evaluate(idx_expr).map(|v| v as usize);
        AssignmentValidator::validate_array_bounds(declared_size, resolved_index)
            .map_err(|e| CodegenError::new(assign.span, CodegenErrorKind::Capacity(e)))?;

        let target_rendered = self.lower_expression(&assign.target)?;
        let value = self.lower_expression(&assign.value)?;
        let op_token = assign.op.as_c_token();
        Ok(vec![format!("{target_rendered} {op_token} {value};")])
    }

    fn lower_bit_range_assignment(
        &self,
        base: &Expression,
        start: &Expression,
        width: &Expression,
        assign: &crate::cst::AssignmentStatement,
    ) -> Result<Vec<String>, CodegenError> {
        let base_name = Self::base_identifier_name(base);
        let target_type = AssignmentExpectedTypeResolver::resolve(&self.state, &base_name);
        let is_const = target_type.as_ref().map(|t| t.is_const).unwrap_or(false);
        AssignmentValidator::reject_const_write(&base_name, is_const, AssignmentTargetShape::BitRange)
            .map_err(|e| CodegenError::new(assign.span, CodegenErrorKind::Access(e)))?;

        let evaluator = crate::literal::LiteralEvaluator::new(&self.state.const_table_snapshot());
        let start_value = evaluator.evaluate(start).unwrap_or(0) as u32;
        let width_value = evaluator.evaluate(width).unwrap_or(1) as u32;
        let value = self.lower_expression(&assign.value)?;

        let is_float_target = target_type.as_ref().map(|t| t.is_float()).unwrap_or(false);
        if is_float_target {
            let float_type = target_type.as_ref().map(|t| t.base_type.as_str()).unwrap_or("f32");
            let lines = FloatBitHelper::write_bits(
                &self.state,
                &base_name,
                float_type,
                start_value,
                width_value,
                &value,
            )
            .map_err(|e| CodegenError::new(assign.span, CodegenErrorKind::Scope(e)))?;
            return Ok(lines);
        }

        let base_rendered = self.lower_expression(base)?;
        let line = BitRangeHelper::write_integer(&base_rendered, start_value, width_value, &value);
        Ok(vec![format!("{line};")])
    }

    fn lower_member_assignment(
        &self,
        base: &Expression,
        member: &str,
        assign: &crate::cst::AssignmentStatement,
    ) -> Result<Vec<String>, CodegenError> {
        if let Expression::MemberAccess { base: inner_base, member: inner_member, .. } = base {
            if let Expression::Identifier { name, .. } = inner_base.as_ref() {
                if name == "global" && self.state.symbols.is_known_register(inner_member) {
                    AssignmentValidator::validate_register_write(&self.state.symbols, inner_member, member)
                        .map_err(|e| CodegenError::new(assign.span, CodegenErrorKind::Access(e)))?;
                }
            }
        }

        let target_rendered = self.lower_expression(&assign.target)?;
        let value = self.lower_expression(&assign.value)?;
        let op_token = assign.op.as_c_token();
        Ok(vec![format!("{target_rendered} {op_token} {value};")])
    }

    pub fn lower_expression(&self, expr: &Expression) -> Result<String, CodegenError> {
        match expr {
            Expression::Identifier { name, .. } => Ok(IdentifierResolver::resolve(&self.state, self.mode, name)),
            Expression::IntLiteral { text, .. } => Ok(parse_int_literal(text)
                .map(|p| p.value.to_string())
                .unwrap_or_else(|| text.clone())),
            Expression::BoolLiteral { value, .. } => Ok(BooleanHelper::literal_as_int(*value).to_string()),
            Expression::StringLiteral { value, .. } => Ok(format!("\"{value}\"")),
            Expression::Parens { inner, .. } => Ok(format!("({})", self.lower_expression(inner)?)),
            Expression::Unary { op, operand, .. } => {
                let inner = self.lower_expression(operand)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{inner}"),
                    UnaryOp::Not => format!("!{inner}"),
                    UnaryOp::BitNot => format!("~{inner}"),
                })
            }
            Expression::Binary { op, left, right, .. } => {
                let l = self.lower_expression(left)?;
                let r = self.lower_expression(right)?;
                Ok(format!("{l} {} {r}", Self::binary_token(*op)))
            }
            Expression::MemberAccess { base, member, span } => {
                self.lower_member_access(base, member, *span)
            }
            Expression::Subscripted { base, index, .. } => self.lower_subscripted(base, index, expr),
            Expression::Call { callee, args, .. } => self.lower_call(callee, args),
            Expression::StructLiteral { type_name, fields, .. } => {
                let rendered: Result<Vec<String>, CodegenError> = fields
                    .iter()
                    .map(|(name, value)| Ok(format!(".{name} = {}", self.lower_expression(value)?)))
                    .collect();
                Ok(format!("({type_name}){{ {} }}", rendered?.join(", ")))
            }
            Expression::Sizeof { type_ctx, .. } => {
                Ok(format!("sizeof({})", crate::type_render::c_primitive_name(&type_ctx.base_name)))
            }
        }
    }

    fn lower_subscripted(
        &self,
        base: &Expression,
        index: &Subscript,
        expr: &Expression,
    ) -> Result<String, CodegenError> {
        let base_rendered = self.lower_expression(base)?;
        match index {
            Subscript::Index(idx) => {
                let idx_rendered = self.lower_expression(idx)?;
                Ok(crate::array::ArrayAccessHelper::index(&base_rendered, &idx_rendered))
            }
            Subscript::BitRange { start, width } => {
                let start_value = crate::literal::LiteralEvaluator::new(&self.state.const_table_snapshot())
                    .evaluate(start)
                    .unwrap_or(0) as u32;
                let width_value = crate::literal::LiteralEvaluator::new(&self.state.const_table_snapshot())
                    .evaluate(width)
                    .unwrap_or(1) as u32;
                let target_type = self.state.lookup_type(&Self::base_identifier_name(base));
                let target_is_float = target_type.as_ref().map(|t| t.is_float()).unwrap_or(false);
                if target_is_float {
                    let base_name = Self::base_identifier_name(base);
                    let float_type = target_type.as_ref().map(|t| t.base_type.as_str()).unwrap_or("f32");
                    let (lines, bits_expr) =
                        FloatBitHelper::read_bits(&self.state, &base_name, float_type, start_value, width_value)
                            .map_err(|e| CodegenError::new(expr.span(), CodegenErrorKind::Scope(e)))?;
                    for line in lines {
                        self.state.push_pending_temp(line);
                    }
                    return Ok(crate::cast::NarrowingCastHelper::wrap_if_needed(
                        self.mode,
                        target_type.as_ref(),
                        &bits_expr,
                    ));
                }
                crate::array::ArrayAccessHelper::bit_range_read(
                    self.mode,
                    &base_rendered,
                    start_value,
                    width_value,
                    target_type.as_ref(),
                )
                .map_err(|_| {
                    CodegenError::new(
                        expr.span(),
                        CodegenErrorKind::Shape(crate::error::ShapeError::CStyleArrayDeclaration {
                            name: base_rendered.clone(),
                        }),
                    )
                })
            }
        }
    }

    /// Resolves the separator and the scope/register validation for a
    /// `base.member` chain. `this.x`, `Scope.x`, `global.Register.x`, and
    /// plain struct-parameter access each choose a different
    /// [`crate::member_access::AccessContext`].
    fn lower_member_access(
        &self,
        base: &Expression,
        member: &str,
        span: crate::cst::Span,
    ) -> Result<String, CodegenError> {
        use crate::member_access::{AccessContext, MemberAccessValidator, MemberSeparatorResolver};

        if let Expression::Identifier { name, .. } = base {
            if name == "this" {
                MemberAccessValidator::require_scope_for_this(self.state.current_scope().as_deref())
                    .map_err(|e| CodegenError::new(span, CodegenErrorKind::Scope(e)))?;
                let scope = self.state.current_scope().unwrap_or_default();
                let sep = MemberSeparatorResolver::first_separator(self.mode, AccessContext::ThisAccess);
                return Ok(format!("{scope}{sep}{member}"));
            }
            if self.state.symbols.is_known_scope(name) {
                let current = self.state.current_scope();
                MemberAccessValidator::reject_self_scope_reference(name, name, current.as_deref(), member)
                    .map_err(|e| CodegenError::new(span, CodegenErrorKind::Access(e)))?;
                MemberAccessValidator::validate_visibility(&self.state.symbols, name, member, current.as_deref())
                    .map_err(|e| CodegenError::new(span, CodegenErrorKind::Access(e)))?;
                let context = if self.mode.is_cpp() {
                    AccessContext::CppNamespace
                } else {
                    AccessContext::CrossScope
                };
                let sep = MemberSeparatorResolver::first_separator(self.mode, context);
                return Ok(format!("{name}{sep}{member}"));
            }
            if name == "global" {
                let sep = MemberSeparatorResolver::first_separator(self.mode, AccessContext::GlobalRegister);
                return Ok(format!("global{sep}{member}"));
            }
        }

        if let Expression::MemberAccess { base: inner_base, member: inner_member, .. } = base {
            if let Expression::Identifier { name, .. } = inner_base.as_ref() {
                if name == "global" && self.state.symbols.is_known_register(inner_member) {
                    MemberAccessValidator::validate_register_read(
                        &self.state.symbols,
                        inner_member,
                        member,
                        false,
                    )
                    .map_err(|e| CodegenError::new(span, CodegenErrorKind::Access(e)))?;
                    let sep1 = MemberSeparatorResolver::first_separator(self.mode, AccessContext::GlobalRegister);
                    let sep2 = MemberSeparatorResolver::subsequent_separator(true);
                    return Ok(format!("global{sep1}{inner_member}{sep2}{member}"));
                }
            }
        }

        let base_name = Self::base_identifier_name(base);
        let via_pointer = self
            .state
            .current_parameter(&base_name)
            .map(|p| p.force_pointer_syntax)
            .unwrap_or(false);
        let base_rendered = self.lower_expression(base)?;
        let sep = MemberSeparatorResolver::first_separator(self.mode, AccessContext::StructParameter { via_pointer });
        Ok(format!("{base_rendered}{sep}{member}"))
    }

    fn base_identifier_name(expr: &Expression) -> String {
        match expr {
            Expression::Identifier { name, .. } => name.clone(),
            _ => String::new(),
        }
    }

    fn lower_call(&self, callee: &str, args: &[Expression]) -> Result<String, CodegenError> {
        let rendered_args: Result<Vec<String>, CodegenError> = args
            .iter()
            .map(|arg| {
                let rendered = self.lower_expression(arg)?;
                let is_array_member = matches!(arg, Expression::MemberAccess { .. })
                    && self.state.is_local_array(&Self::base_identifier_name(arg));
                let shape = ArgumentGenerator::classify(arg, rendered, is_array_member);
                Ok(ArgumentGenerator::generate(&self.state, self.mode, shape, None))
            })
            .collect();
        Ok(format!("{callee}({})", rendered_args?.join(", ")))
    }

    fn binary_token(op: BinaryOp) -> &'static str {
        match op {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerConfig;
    use crate::cst::{ExpressionStatement, ParameterList, Span, TypeContext};
    use crate::scope_tables::ScopeTables;

    fn new_generator() -> CodeGenerator {
        CodeGenerator::new(
            CodegenState::new(TranspilerConfig::new(Mode::C), ScopeTables::default()),
            Mode::C,
        )
    }

    #[test]
    fn emits_empty_function_with_braces() {
        let gen = new_generator();
        let func = FunctionDeclaration {
            name: "f".to_string(),
            parameters: ParameterList(vec![]),
            return_type: TypeContext::primitive("u32", Span::synthetic()),
            body: Block {
                statements: vec![],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
        };
        let lines = gen.emit_function(&func, &HashSet::new(), None).unwrap();
        assert_eq!(lines, vec!["uint32_t f() {", "}"]);
    }

    #[test]
    fn emits_indented_expression_statement_inside_block() {
        let gen = new_generator();
        gen.state.enter_function("f", crate::types::TypeInfo::primitive("void"), None, vec![]);
        gen.state.enter_block();
        let stmt = Statement::Expression(ExpressionStatement {
            expr: Expression::Call {
                callee: "noop".to_string(),
                args: vec![],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
        });
        let lines = gen.emit_statement(&stmt).unwrap();
        assert_eq!(lines, vec!["    noop();"]);
        gen.state.exit_block();
        gen.state.exit_function();
    }

    #[test]
    fn pending_temp_is_flushed_before_the_statement_it_was_generated_for() {
        let gen = new_generator();
        gen.state.push_pending_temp("uint8_t _cnx_tmp_0 = 1;".to_string());
        let stmt = Statement::Expression(ExpressionStatement {
            expr: Expression::Identifier {
                name: "_cnx_tmp_0".to_string(),
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
        });
        let lines = gen.emit_statement(&stmt).unwrap();
        assert_eq!(lines, vec!["uint8_t _cnx_tmp_0 = 1;", "_cnx_tmp_0;"]);
    }

    #[test]
    fn const_write_is_rejected_with_span_attached() {
        let gen = new_generator();
        gen.state.register_type(
            "x",
            {
                let mut t = crate::types::TypeInfo::primitive("u32");
                t.is_const = true;
                t
            },
        );
        let assign = crate::cst::AssignmentStatement {
            target: Expression::Identifier {
                name: "x".to_string(),
                span: Span::synthetic(),
            },
            op: crate::cst::AssignmentOp::Assign,
            value: Expression::IntLiteral {
                text: "1".to_string(),
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
        };
        let err = gen.lower_assignment(&assign).unwrap_err();
        assert!(err.to_string().contains("Cannot assign to const 'x'"));
    }
}
