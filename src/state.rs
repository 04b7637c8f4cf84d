//! The process-wide code-generation state: initialized once
//! per translation unit, mutated only through its own methods. Interior
//! mutability via `RefCell` mirrors the `CodegenContext` pattern this
//! lineage already uses for its LLVM backend — methods take `&self` and
//! borrow the cell they need, rather than requiring `&mut self` threaded
//! through every helper call.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::TranspilerConfig;
use crate::error::CodegenError;
use crate::includes::IncludeTag;
use crate::scope_tables::ScopeTables;
use crate::types::{ParameterInfo, TypeInfo};

#[derive(Default)]
struct FunctionState {
    name: Option<String>,
    return_type: Option<TypeInfo>,
    scope: Option<String>,
}

pub struct CodegenState {
    pub config: TranspilerConfig,
    pub symbols: ScopeTables,

    type_registry: RefCell<HashMap<String, TypeInfo>>,
    const_values: RefCell<HashMap<String, i128>>,
    local_variables: RefCell<HashSet<String>>,
    local_arrays: RefCell<HashSet<String>>,
    current_parameters: RefCell<Vec<(String, ParameterInfo)>>,

    function_state: RefCell<FunctionState>,
    in_function_body: RefCell<bool>,
    indent_level: RefCell<i64>,

    float_bit_shadows: RefCell<HashSet<String>>,
    float_shadow_current: RefCell<HashSet<String>>,

    pending_temp_declarations: RefCell<Vec<String>>,
    pending_cpp_class_assignments: RefCell<Vec<String>>,
    temp_var_counter: RefCell<u32>,

    last_array_init_count: RefCell<Option<usize>>,
    last_array_fill_value: RefCell<Option<String>>,

    main_args_name: RefCell<Option<String>>,
    includes_required: RefCell<BTreeSet<IncludeTag>>,
    callback_field_types: RefCell<HashMap<String, String>>,

    diagnostics: RefCell<Vec<CodegenError>>,
}

impl CodegenState {
    pub fn new(config: TranspilerConfig, symbols: ScopeTables) -> Self {
        CodegenState {
            config,
            symbols,
            type_registry: RefCell::default(),
            const_values: RefCell::default(),
            local_variables: RefCell::default(),
            local_arrays: RefCell::default(),
            current_parameters: RefCell::default(),
            function_state: RefCell::default(),
            in_function_body: RefCell::new(false),
            indent_level: RefCell::new(0),
            float_bit_shadows: RefCell::default(),
            float_shadow_current: RefCell::default(),
            pending_temp_declarations: RefCell::default(),
            pending_cpp_class_assignments: RefCell::default(),
            temp_var_counter: RefCell::new(0),
            last_array_init_count: RefCell::default(),
            last_array_fill_value: RefCell::default(),
            main_args_name: RefCell::default(),
            includes_required: RefCell::default(),
            callback_field_types: RefCell::default(),
            diagnostics: RefCell::default(),
        }
    }

    // -- type registry -----------------------------------------------

    pub fn register_type(&self, name: impl Into<String>, info: TypeInfo) {
        self.type_registry.borrow_mut().insert(name.into(), info);
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeInfo> {
        self.type_registry.borrow().get(name).cloned()
    }

    pub fn remove_type(&self, name: &str) {
        self.type_registry.borrow_mut().remove(name);
    }

    // -- constants ----------------------------------------------------

    pub fn register_const(&self, name: impl Into<String>, value: i128) {
        self.const_values.borrow_mut().insert(name.into(), value);
    }

    pub fn const_value(&self, name: &str) -> Option<i128> {
        self.const_values.borrow().get(name).copied()
    }

    pub fn const_table_snapshot(&self) -> HashMap<String, i128> {
        self.const_values.borrow().clone()
    }

    // -- locals ---------------------------------------------------------

    pub fn declare_local(&self, name: impl Into<String>, is_array: bool) {
        let name = name.into();
        if is_array {
            self.local_arrays.borrow_mut().insert(name);
        } else {
            self.local_variables.borrow_mut().insert(name);
        }
    }

    pub fn is_local_variable(&self, name: &str) -> bool {
        self.local_variables.borrow().contains(name)
    }

    pub fn is_local_array(&self, name: &str) -> bool {
        self.local_arrays.borrow().contains(name)
    }

    // -- parameters (kept paired with type_registry) ------

    pub fn enter_parameters(&self, params: Vec<ParameterInfo>) {
        let mut current = self.current_parameters.borrow_mut();
        for param in params {
            self.register_type(param.name.clone(), param.type_info());
            current.push((param.name.clone(), param));
        }
    }

    pub fn current_parameter(&self, name: &str) -> Option<ParameterInfo> {
        self.current_parameters
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
    }

    pub fn is_current_parameter(&self, name: &str) -> bool {
        self.current_parameters.borrow().iter().any(|(n, _)| n == name)
    }

    pub fn current_parameters_ordered(&self) -> Vec<ParameterInfo> {
        self.current_parameters
            .borrow()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn clear_parameters(&self) {
        let mut current = self.current_parameters.borrow_mut();
        for (name, _) in current.drain(..) {
            self.remove_type(&name);
        }
    }

    // -- function lifecycle --------------------------------------------

    pub fn enter_function(
        &self,
        name: impl Into<String>,
        return_type: TypeInfo,
        scope: Option<String>,
        params: Vec<ParameterInfo>,
    ) {
        *self.function_state.borrow_mut() = FunctionState {
            name: Some(name.into()),
            return_type: Some(return_type),
            scope,
        };
        *self.in_function_body.borrow_mut() = true;
        *self.temp_var_counter.borrow_mut() = 0;
        self.enter_parameters(params);
    }

    pub fn exit_function(&self) {
        self.clear_parameters();
        self.local_variables.borrow_mut().clear();
        self.local_arrays.borrow_mut().clear();
        self.float_bit_shadows.borrow_mut().clear();
        self.float_shadow_current.borrow_mut().clear();
        *self.function_state.borrow_mut() = FunctionState::default();
        *self.in_function_body.borrow_mut() = false;
    }

    pub fn in_function_body(&self) -> bool {
        *self.in_function_body.borrow()
    }

    pub fn current_function_name(&self) -> Option<String> {
        self.function_state.borrow().name.clone()
    }

    pub fn current_function_return_type(&self) -> Option<TypeInfo> {
        self.function_state.borrow().return_type.clone()
    }

    pub fn current_scope(&self) -> Option<String> {
        self.function_state.borrow().scope.clone()
    }

    // -- indentation ------------------------------------------------

    pub fn enter_block(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn exit_block(&self) {
        let mut level = self.indent_level.borrow_mut();
        *level -= 1;
        debug_assert!(*level >= 0, "indentLevel invariant violated");
    }

    pub fn indent(&self) -> String {
        " ".repeat(self.config.tab_width * (*self.indent_level.borrow()).max(0) as usize)
    }

    // -- float bit shadows --------------------------------------------

    pub fn shadow_name(var_name: &str) -> String {
        format!("__bits_{var_name}")
    }

    pub fn is_shadow_declared(&self, shadow: &str) -> bool {
        self.float_bit_shadows.borrow().contains(shadow)
    }

    pub fn is_shadow_current(&self, shadow: &str) -> bool {
        self.float_shadow_current.borrow().contains(shadow)
    }

    pub fn declare_shadow(&self, shadow: impl Into<String>) {
        let shadow = shadow.into();
        self.float_bit_shadows.borrow_mut().insert(shadow.clone());
        self.float_shadow_current.borrow_mut().insert(shadow);
    }

    pub fn mark_shadow_current(&self, shadow: impl Into<String>) {
        self.float_shadow_current.borrow_mut().insert(shadow.into());
    }

    pub fn invalidate_shadow(&self, shadow: &str) {
        self.float_shadow_current.borrow_mut().remove(shadow);
    }

    // -- pending emission buffers ---------------------------------------

    pub fn push_pending_temp(&self, decl: impl Into<String>) {
        self.pending_temp_declarations.borrow_mut().push(decl.into());
    }

    pub fn push_pending_cpp_assignment(&self, assignment: impl Into<String>) {
        self.pending_cpp_class_assignments
            .borrow_mut()
            .push(assignment.into());
    }

    /// Drains both pending buffers; must be called before the enclosing
    /// statement is emitted.
    pub fn flush_pending(&self) -> (Vec<String>, Vec<String>) {
        (
            self.pending_temp_declarations.borrow_mut().drain(..).collect(),
            self.pending_cpp_class_assignments.borrow_mut().drain(..).collect(),
        )
    }

    pub fn fresh_temp_name(&self) -> String {
        let mut counter = self.temp_var_counter.borrow_mut();
        let name = format!("_cnx_tmp_{}", *counter);
        *counter += 1;
        name
    }

    // -- array init side channel -----------------------------------

    pub fn set_last_array_init(&self, count: usize, fill_value: Option<String>) {
        *self.last_array_init_count.borrow_mut() = Some(count);
        *self.last_array_fill_value.borrow_mut() = fill_value;
    }

    pub fn take_last_array_init(&self) -> (Option<usize>, Option<String>) {
        (
            self.last_array_init_count.borrow_mut().take(),
            self.last_array_fill_value.borrow_mut().take(),
        )
    }

    // -- misc ---------------------------------------------------------

    pub fn set_main_args_name(&self, name: impl Into<String>) {
        *self.main_args_name.borrow_mut() = Some(name.into());
    }

    pub fn main_args_name(&self) -> Option<String> {
        self.main_args_name.borrow().clone()
    }

    pub fn require_include(&self, tag: IncludeTag) {
        self.includes_required.borrow_mut().insert(tag);
    }

    pub fn includes_required(&self) -> BTreeSet<IncludeTag> {
        self.includes_required.borrow().clone()
    }

    pub fn set_callback_field_type(&self, struct_field: impl Into<String>, typedef: impl Into<String>) {
        self.callback_field_types
            .borrow_mut()
            .insert(struct_field.into(), typedef.into());
    }

    pub fn callback_field_type(&self, struct_field: &str) -> Option<String> {
        self.callback_field_types.borrow().get(struct_field).cloned()
    }

    pub fn push_diagnostic(&self, error: CodegenError) {
        self.diagnostics.borrow_mut().push(error);
    }

    pub fn diagnostics(&self) -> Vec<CodegenError> {
        self.diagnostics.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use crate::types::TypeInfo;

    fn new_state() -> CodegenState {
        CodegenState::new(TranspilerConfig::new(Mode::C), ScopeTables::default())
    }

    #[test]
    fn parameter_entry_and_exit_are_paired() {
        let state = new_state();
        let param = ParameterInfo {
            name: "x".to_string(),
            base_type: "u32".to_string(),
            is_array: false,
            is_struct: false,
            is_const: false,
            is_callback: false,
            is_string: false,
            is_unbounded_string: false,
            is_auto_const: false,
            array_dimensions: vec![],
            callback_typedef_name: None,
            string_capacity: None,
            is_pass_by_value: false,
            force_pointer_syntax: false,
        };
        state.enter_function("f", TypeInfo::primitive("u32"), None, vec![param]);
        assert!(state.is_current_parameter("x"));
        assert!(state.lookup_type("x").unwrap().is_parameter);
        state.exit_function();
        assert!(!state.is_current_parameter("x"));
        assert!(state.lookup_type("x").is_none());
    }

    #[test]
    fn shadow_current_is_subset_of_declared() {
        let state = new_state();
        state.declare_shadow("__bits_v");
        assert!(state.is_shadow_declared("__bits_v"));
        assert!(state.is_shadow_current("__bits_v"));
        state.invalidate_shadow("__bits_v");
        assert!(state.is_shadow_declared("__bits_v"));
        assert!(!state.is_shadow_current("__bits_v"));
    }

    #[test]
    fn indent_level_never_negative_in_balanced_use() {
        let state = new_state();
        state.enter_block();
        state.enter_block();
        state.exit_block();
        state.exit_block();
        assert_eq!(state.indent(), "");
    }
}
