//! Symbols and the symbol table
//!
//! Symbols live in a table-owned arena and are referenced everywhere by
//! copyable `SymbolId` handles; basic types compare by handle. Name binding
//! uses a scope stack.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::config::TargetConfig;

use super::types::Type;

bitflags! {
    /// Classification bits carried by basic-type symbols. Each bit admits the
    /// type to one class of operator contexts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TypeMask: u8 {
        const NUMERIC    = 1 << 0;
        const ORDINAL    = 1 << 1;
        const EQUALITY   = 1 << 2;
        const ASSIGNMENT = 1 << 3;
        const CONDITION  = 1 << 4;
    }
}

impl TypeMask {
    /// The full mask of an ordinary arithmetic type
    pub fn arithmetic() -> Self {
        TypeMask::NUMERIC
            | TypeMask::ORDINAL
            | TypeMask::EQUALITY
            | TypeMask::ASSIGNMENT
            | TypeMask::CONDITION
    }
}

/// Opaque handle to a symbol in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A builtin or enum type name
    Type,
    /// A struct tag
    Struct,
    /// A variable or function
    Id,
    /// A function parameter
    Param,
    /// An enumeration constant
    EnumConstant,
}

impl SymbolKind {
    /// Lowercase description for diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Type => "type",
            SymbolKind::Struct => "struct",
            SymbolKind::Id => "variable",
            SymbolKind::Param => "parameter",
            SymbolKind::EnumConstant => "enum constant",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub ident: String,
    pub kind: SymbolKind,
    /// Declared type, for value symbols
    pub ty: Option<Type>,
    /// Struct fields or enum constants, in declaration order
    pub children: Vec<SymbolId>,
    /// Storage size, for basic types
    pub size: usize,
    /// Classification bits, for basic types
    pub mask: TypeMask,
    /// Whether a function body has been seen
    pub defined: bool,
}

impl Symbol {
    pub fn new(ident: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            ident: ident.into(),
            kind,
            ty: None,
            children: Vec::new(),
            size: 0,
            mask: TypeMask::empty(),
            defined: false,
        }
    }

    /// A basic type symbol with its classification bits and size
    pub fn basic(ident: impl Into<String>, mask: TypeMask, size: usize) -> Self {
        Self {
            mask,
            size,
            ..Self::new(ident, SymbolKind::Type)
        }
    }

    /// A value symbol (variable, parameter, field, enum constant)
    pub fn value(ident: impl Into<String>, kind: SymbolKind, ty: Type) -> Self {
        Self {
            ty: Some(ty),
            ..Self::new(ident, kind)
        }
    }
}

/// The builtin types, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Void,
    Bool,
    Char,
    Int,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<FxHashMap<String, SymbolId>>,
    builtins: [SymbolId; 4],
    word_size: usize,
}

impl SymbolTable {
    pub fn new(config: &TargetConfig) -> Self {
        let mut table = Self {
            symbols: Vec::new(),
            scopes: vec![FxHashMap::default()],
            builtins: [SymbolId(0); 4],
            word_size: config.word_size,
        };

        let arith = TypeMask::arithmetic();
        let boolean = TypeMask::EQUALITY | TypeMask::ASSIGNMENT | TypeMask::CONDITION;

        let void_ = table.intern(Symbol::basic("void", TypeMask::empty(), 0));
        let bool_ = table.intern(Symbol::basic("bool", boolean, 1));
        let char_ = table.intern(Symbol::basic("char", arith, 1));
        let int_ = table.intern(Symbol::basic("int", arith, config.int_size));

        table.builtins = [void_, bool_, char_, int_];
        for id in table.builtins {
            let name = table.symbols[id.0 as usize].ident.clone();
            table.declare(&name, id);
        }
        table
    }

    /// Add a symbol to the arena without binding a name
    pub fn intern(&mut self, sym: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(sym);
        id
    }

    /// Bind a name to a symbol in the current scope
    pub fn declare(&mut self, name: &str, id: SymbolId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), id);
        }
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    /// Look a name up through all scopes, innermost first
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        for scope in self.scopes.iter().rev() {
            if let Some(id) = scope.get(name) {
                return Some(*id);
            }
        }
        None
    }

    /// Look a name up in the innermost scope only
    pub fn lookup_current(&self, name: &str) -> Option<SymbolId> {
        self.scopes.last().and_then(|s| s.get(name)).copied()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Find a named child (field) of a record symbol
    pub fn child(&self, record: SymbolId, name: &str) -> Option<SymbolId> {
        self.get(record)
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).ident == name)
    }

    pub fn builtin(&self, b: Builtin) -> SymbolId {
        self.builtins[b as usize]
    }

    /// Size of pointers and function designators on the target
    pub fn word_size(&self) -> usize {
        self.word_size
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(&TargetConfig::default())
    }
}
