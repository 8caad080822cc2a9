//! The type algebra
//!
//! Semantic types are owned trees: payloads belong exclusively to their
//! parent and `Clone` is a deep structural copy. `Invalid` is the
//! error-absorbing bottom: it is produced after a diagnostic, every
//! classification predicate accepts it, and every derivation propagates it,
//! so one broken subexpression never triggers a cascade.

use super::table::{SymbolId, SymbolKind, SymbolTable, TypeMask};

#[derive(Debug, Clone)]
pub enum Type {
    /// A builtin, enum, or struct type, named by its symbol
    Basic(SymbolId),
    /// Pointer to a pointee
    Pointer(Box<Type>),
    /// Array of elements; -1 means the length is unspecified
    Array(Box<Type>, i64),
    /// Function designator
    Function {
        ret: Box<Type>,
        params: Vec<Type>,
        variadic: bool,
    },
    /// The bottom element, produced after an error
    Invalid,
}

impl Type {
    pub fn pointer(pointee: Type) -> Type {
        Type::Pointer(Box::new(pointee))
    }

    pub fn array(element: Type, size: i64) -> Type {
        Type::Array(Box::new(element), size)
    }

    pub fn function(ret: Type, params: Vec<Type>, variadic: bool) -> Type {
        Type::Function {
            ret: Box::new(ret),
            params,
            variadic,
        }
    }

    // === Classification ===
    //
    // Every predicate answers true for Invalid.

    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Type::Basic(_)) || self.is_invalid()
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_)) || self.is_invalid()
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(..)) || self.is_invalid()
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. }) || self.is_invalid()
    }

    /// A built in type of size zero
    pub fn is_void(&self, table: &SymbolTable) -> bool {
        match self {
            Type::Basic(sym) => {
                let sym = table.get(*sym);
                sym.kind == SymbolKind::Type && sym.size == 0
            }
            Type::Invalid => true,
            _ => false,
        }
    }

    /// A struct type
    pub fn is_record(&self, table: &SymbolTable) -> bool {
        match self {
            Type::Basic(sym) => table.get(*sym).kind == SymbolKind::Struct,
            Type::Invalid => true,
            _ => false,
        }
    }

    /// A function, or a pointer to one (callable through the pointer)
    pub fn is_callable(&self) -> bool {
        match self {
            Type::Pointer(base) => base.is_function(),
            _ => self.is_function(),
        }
    }

    fn mask_contains(&self, table: &SymbolTable, bit: TypeMask) -> bool {
        matches!(self, Type::Basic(sym) if table.get(*sym).mask.contains(bit))
    }

    /// Pointers satisfy every operand class; arrays satisfy none.
    pub fn is_numeric(&self, table: &SymbolTable) -> bool {
        self.mask_contains(table, TypeMask::NUMERIC) || self.is_pointer()
    }

    pub fn is_ordinal(&self, table: &SymbolTable) -> bool {
        self.mask_contains(table, TypeMask::ORDINAL) || self.is_pointer()
    }

    pub fn is_equality(&self, table: &SymbolTable) -> bool {
        self.mask_contains(table, TypeMask::EQUALITY) || self.is_pointer()
    }

    pub fn is_assignment(&self, table: &SymbolTable) -> bool {
        self.mask_contains(table, TypeMask::ASSIGNMENT) || self.is_pointer()
    }

    pub fn is_condition(&self, table: &SymbolTable) -> bool {
        self.mask_contains(table, TypeMask::CONDITION) || self.is_pointer()
    }

    /// The struct symbol behind a record or pointer-to-record
    pub fn record_symbol(&self, table: &SymbolTable) -> Option<SymbolId> {
        match self {
            Type::Basic(sym) if table.get(*sym).kind == SymbolKind::Struct => Some(*sym),
            Type::Pointer(base) => match **base {
                Type::Basic(sym) if table.get(sym).kind == SymbolKind::Struct => Some(sym),
                _ => None,
            },
            _ => None,
        }
    }

    // === Comparison ===

    /// Structural equality. Either side Invalid compares equal; functions
    /// defer to compatibility.
    pub fn is_equal(&self, other: &Type, table: &SymbolTable) -> bool {
        match (self, other) {
            (Type::Invalid, _) | (_, Type::Invalid) => true,
            (Type::Function { .. }, Type::Function { .. }) => self.is_compatible(other, table),
            (Type::Pointer(l), Type::Pointer(r)) => l.is_equal(r, table),
            (Type::Array(l, ln), Type::Array(r, rn)) => ln == rn && l.is_equal(r, table),
            (Type::Basic(l), Type::Basic(r)) => l == r,
            _ => false,
        }
    }

    /// Will a value of this type do where `model` is expected?
    ///
    /// Weaker than equality and asymmetric: pointer models admit arrays and
    /// numeric basics, a `void` pointee admits any pointee, unsized array
    /// models admit any length, and numeric basic models admit pointers.
    pub fn is_compatible(&self, model: &Type, table: &SymbolTable) -> bool {
        if self.is_invalid() || model.is_invalid() {
            return true;
        }

        match model {
            // A function model requires matching arity and equal parameter
            // and return types
            Type::Function {
                ret: model_ret,
                params: model_params,
                ..
            } => match self {
                Type::Function { ret, params, .. } => {
                    params.len() == model_params.len()
                        && params
                            .iter()
                            .zip(model_params)
                            .all(|(p, m)| p.is_equal(m, table))
                        && ret.is_equal(model_ret, table)
                }
                _ => false,
            },

            // A pointer model admits pointers and arrays of a workable
            // element type, and numeric basics (pointer/integer
            // interconversion at value sites). void* admits any pointee.
            Type::Pointer(model_base) => match self {
                Type::Pointer(base) | Type::Array(base, _) => {
                    model_base.is_void(table) || base.is_compatible(model_base, table)
                }
                Type::Basic(sym) => table.get(*sym).mask.contains(TypeMask::NUMERIC),
                _ => false,
            },

            // An array model admits only arrays of matching length (or any
            // length if the model leaves it unspecified) and element type
            Type::Array(model_base, model_size) => match self {
                Type::Array(base, size) => {
                    (size == model_size || *model_size == -1)
                        && base.is_compatible(model_base, table)
                }
                _ => false,
            },

            Type::Basic(model_sym) => match self {
                Type::Pointer(_) => table.get(*model_sym).mask.contains(TypeMask::NUMERIC),
                Type::Array(..) => false,
                Type::Basic(sym) => sym == model_sym,
                _ => false,
            },

            Type::Invalid => true,
        }
    }

    // === Derivation ===
    //
    // Each operation returns a freshly-owned type; Invalid inputs yield
    // Invalid outputs.

    /// The result type of an operator that preserves its operand's type
    pub fn derive_from(&self) -> Type {
        self.clone()
    }

    /// The result type of a binary operator over compatible operands
    /// (left-biased)
    pub fn derive_from_two(&self, other: &Type, table: &SymbolTable) -> Type {
        if self.is_invalid() || other.is_invalid() {
            return Type::Invalid;
        }
        debug_assert!(self.is_compatible(other, table));
        self.derive_from()
    }

    /// A single type standing for both arms of a ternary
    pub fn derive_unified(&self, other: &Type, table: &SymbolTable) -> Type {
        if self.is_invalid() || other.is_invalid() {
            return Type::Invalid;
        }
        debug_assert!(self.is_compatible(other, table));
        if self.is_equal(other, table) {
            self.clone()
        } else {
            self.derive_from_two(other, table)
        }
    }

    /// The element type of a pointer or array
    pub fn derive_base(&self) -> Type {
        match self {
            Type::Invalid => Type::Invalid,
            Type::Pointer(base) | Type::Array(base, _) => (**base).clone(),
            _ => {
                debug_assert!(false, "derive_base on a non-indirect type");
                Type::Invalid
            }
        }
    }

    /// A pointer to this type
    pub fn derive_pointer(&self) -> Type {
        Type::pointer(self.clone())
    }

    /// The return type of a callable; function pointers are transparently
    /// called through
    pub fn derive_return(&self) -> Type {
        match self {
            Type::Invalid => Type::Invalid,
            Type::Pointer(base) => base.derive_return(),
            Type::Function { ret, .. } => (**ret).clone(),
            _ => {
                debug_assert!(false, "derive_return on a non-callable type");
                Type::Invalid
            }
        }
    }

    // === Size ===

    pub fn size(&self, table: &SymbolTable) -> usize {
        match self {
            Type::Invalid => 0,
            Type::Array(base, n) => (*n).max(0) as usize * base.size(table),
            Type::Pointer(_) | Type::Function { .. } => table.word_size(),
            Type::Basic(sym) => table.get(*sym).size,
        }
    }

    // === Rendering ===

    /// Render the type in declarator syntax
    pub fn render(&self, table: &SymbolTable) -> String {
        self.render_declarator(table, "")
    }

    /// Render with a declarator threaded through the derivations: pointers
    /// prepend `*`, arrays append `[n]`, functions wrap `(..)(params)` and
    /// recurse on the return type.
    pub fn render_declarator(&self, table: &SymbolTable, embedded: &str) -> String {
        match self {
            Type::Invalid | Type::Basic(_) => {
                let basic = match self {
                    Type::Basic(sym) => table.get(*sym).ident.as_str(),
                    _ => "<invalid>",
                };
                if embedded.is_empty() {
                    basic.to_string()
                } else {
                    format!("{} {}", basic, embedded)
                }
            }

            Type::Function {
                ret,
                params,
                variadic,
            } => {
                let mut inner = if params.is_empty() {
                    "void".to_string()
                } else {
                    params
                        .iter()
                        .map(|p| p.render(table))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                if *variadic {
                    inner.push_str(", ...");
                }
                ret.render_declarator(table, &format!("({})({})", embedded, inner))
            }

            Type::Pointer(base) => base.render_declarator(table, &format!("*{}", embedded)),

            Type::Array(base, n) => {
                let format = if *n == -1 {
                    format!("{}[]", embedded)
                } else {
                    format!("{}[{}]", embedded, n)
                };
                base.render_declarator(table, &format)
            }
        }
    }
}
