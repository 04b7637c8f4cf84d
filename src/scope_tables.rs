//! Read-only scope tables populated by the resolver: sets of
//! known scopes, enums, bitmaps, structs, and registers. The core never
//! mutates these; they are handed in once per translation unit.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn readable(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterMember {
    pub access: AccessMode,
    pub c_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub members: HashMap<String, RegisterMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// member name -> visibility
    pub members: HashMap<String, Visibility>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructDef {
    /// ordered field name -> declared type name
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDef {
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitmapDef {
    /// flag name -> bit position
    pub flags: HashMap<String, u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ScopeTables {
    pub scopes: HashMap<String, Scope>,
    pub enums: HashMap<String, EnumDef>,
    pub bitmaps: HashMap<String, BitmapDef>,
    pub structs: HashMap<String, StructDef>,
    pub registers: HashMap<String, Register>,
}

impl ScopeTables {
    pub fn is_scope_member(&self, scope: &str, member: &str) -> bool {
        self.scopes
            .get(scope)
            .map(|s| s.members.contains_key(member))
            .unwrap_or(false)
    }

    pub fn member_visibility(&self, scope: &str, member: &str) -> Option<Visibility> {
        self.scopes.get(scope).and_then(|s| s.members.get(member)).copied()
    }

    pub fn register_member(&self, register: &str, member: &str) -> Option<&RegisterMember> {
        self.registers.get(register).and_then(|r| r.members.get(member))
    }

    pub fn is_known_register(&self, name: &str) -> bool {
        self.registers.contains_key(name)
    }

    pub fn is_known_struct(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn is_known_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    pub fn is_known_bitmap(&self, name: &str) -> bool {
        self.bitmaps.contains_key(name)
    }

    pub fn is_known_scope(&self, name: &str) -> bool {
        self.scopes.contains_key(name)
    }
}
