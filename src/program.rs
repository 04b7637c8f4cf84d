//! `ProgramCompiler`: the whole-program driver. Runs the global
//! registration pass, builds the call graph from every function body,
//! closes it over `TransitiveModificationPropagator`, then emits each
//! function's signature with its final modified-parameter set.

use std::collections::{HashMap, HashSet};

use crate::collect::{ChildStatementCollector, StatementExpressionCollector};
use crate::cst::{Expression, FunctionDeclaration, Statement, TopLevelDeclaration};
use crate::dispatcher::CodeGenerator;
use crate::error::CodegenError;
use crate::includes::render_includes;
use crate::mode::Mode;
use crate::registration::TypeRegistrationEngine;
use crate::state::CodegenState;
use crate::transitive::{CallEdge, TransitiveModificationPropagator};

pub struct ProgramCompiler;

impl ProgramCompiler {
    /// Lowers a whole translation unit: globals first, then every function
    /// body, with modified-parameter sets closed over the call graph before
    /// any signature is rendered. `#include` lines are collected during the
    /// walk and prepended once everything else has run.
    pub fn compile_program(
        state: CodegenState,
        mode: Mode,
        declarations: &[TopLevelDeclaration],
    ) -> Result<Vec<String>, CodegenError> {
        let mut global_lines = TypeRegistrationEngine::register_all(&state, mode, declarations)?;
        global_lines.extend(TypeRegistrationEngine::reresolve_forward_referenced_arrays(
            &state,
            mode,
            declarations,
        )?);

        let functions: Vec<&FunctionDeclaration> = declarations
            .iter()
            .filter_map(|decl| match decl {
                TopLevelDeclaration::Function(func) => Some(func),
                TopLevelDeclaration::Variable(_) => None,
            })
            .collect();

        let modified = Self::resolve_modified_parameters(&functions);

        let generator = CodeGenerator::new(state, mode);
        let mut function_lines = Vec::new();
        for func in &functions {
            let mods = modified.get(&func.name).cloned().unwrap_or_default();
            if !function_lines.is_empty() {
                function_lines.push(String::new());
            }
            function_lines.extend(generator.emit_function(func, &mods, None)?);
        }

        let mut lines = render_includes(mode, &generator.state.includes_required());
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(global_lines);
        if !function_lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(function_lines);
        Ok(lines)
    }

    /// Seeds each function's directly-modified parameter set from its own
    /// body (a parameter that's the target of a plain assignment), builds
    /// the call graph from every call site that passes a parameter
    /// through unchanged, then closes the sets over that graph.
    fn resolve_modified_parameters(
        functions: &[&FunctionDeclaration],
    ) -> HashMap<String, HashSet<String>> {
        let mut parameter_lists = HashMap::new();
        for func in functions {
            parameter_lists.insert(
                func.name.clone(),
                func.parameters.0.iter().map(|p| p.name.clone()).collect(),
            );
        }

        let mut modified: HashMap<String, HashSet<String>> = HashMap::new();
        let mut call_graph: HashMap<String, Vec<CallEdge>> = HashMap::new();

        for func in functions {
            let param_names: HashSet<String> =
                func.parameters.0.iter().map(|p| p.name.clone()).collect();
            let statements: Vec<&Statement> = func
                .body
                .statements
                .iter()
                .flat_map(ChildStatementCollector::flatten_all)
                .collect();

            let mut direct = HashSet::new();
            let mut edges = Vec::new();
            for stmt in &statements {
                if let Statement::Assignment(assign) = stmt {
                    if let Expression::Identifier { name, .. } = &assign.target {
                        if param_names.contains(name) {
                            direct.insert(name.clone());
                        }
                    }
                }
                let exprs = StatementExpressionCollector::collect(stmt);
                for call in StatementExpressionCollector::collect_calls(exprs) {
                    let Expression::Call { callee, args, .. } = call else {
                        continue;
                    };
                    for (index, arg) in args.iter().enumerate() {
                        if let Expression::Identifier { name, .. } = arg {
                            if param_names.contains(name) {
                                edges.push(CallEdge {
                                    callee: callee.clone(),
                                    param_index: index,
                                    arg_param_name: name.clone(),
                                });
                            }
                        }
                    }
                }
            }
            modified.insert(func.name.clone(), direct);
            call_graph.insert(func.name.clone(), edges);
        }

        TransitiveModificationPropagator::propagate(&call_graph, &parameter_lists, &mut modified);
        modified
    }
}
