//! The type system: primitives, structure definitions, and the
//! concrete/placeholder type split used by parameterized structures.

use drip_base::{Interner, Symbol};
use std::collections::HashMap;
use std::rc::Rc;

/// A primitive tag. Used at runtime to guard arithmetic: both operands of a
/// binary op must share a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Int,
    Float,
}

/// Maps a source-level primitive name to its internal type.
pub fn primitive_name_to_type(name: &str) -> Option<Primitive> {
    match name {
        "Int" => Some(Primitive::Int),
        "Float" => Some(Primitive::Float),
        _ => None,
    }
}

/// Interns `"Int"`/`"Float"` up front and returns the symbol → primitive map.
///
/// Later stages (the type checker resolving a type-parameter argument's
/// symbol, for instance) only ever see [`Symbol`]s, not source text; this
/// map is how they recognize a primitive name without re-reading the
/// interner's string table.
pub fn intern_primitive_symbols(interner: &mut Interner) -> HashMap<Symbol, Primitive> {
    let mut map = HashMap::new();
    map.insert(interner.intern("Int"), Primitive::Int);
    map.insert(interner.intern("Float"), Primitive::Float);
    map
}

/// A single `name: type` field of a structure, or a function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: Symbol,
    pub type_: ExpressionType,
}

/// An ordered, named structure with optional type parameters.
///
/// Two structure definitions are equal iff their fields and type parameters
/// are equal (structural equality) — this follows directly from deriving
/// `PartialEq` over the fields below.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDefinition {
    pub name: Symbol,
    pub type_parameters: Vec<Symbol>,
    pub fields: Vec<FieldDefinition>,
}

impl StructureDefinition {
    /// Finds a field by name, in declaration order.
    pub fn field_lookup(&self, name: Symbol) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Substitutes every [`ExpressionType::Placeholder`] field type using
    /// `parameter_types`, producing a new, non-parameterized structure.
    ///
    /// A no-op (besides cloning) when `type_parameters` is empty.
    pub fn resolve_type(&self, parameter_types: &HashMap<Symbol, ConcreteType>) -> StructureDefinition {
        if self.type_parameters.is_empty() {
            return self.clone();
        }
        let fields = self
            .fields
            .iter()
            .map(|field| match &field.type_ {
                ExpressionType::Placeholder(name) => match parameter_types.get(name) {
                    Some(concrete) => FieldDefinition {
                        name: field.name,
                        type_: ExpressionType::Concrete(concrete.clone()),
                    },
                    None => field.clone(),
                },
                ExpressionType::Concrete(_) => field.clone(),
            })
            .collect();
        StructureDefinition {
            name: self.name,
            type_parameters: Vec::new(),
            fields,
        }
    }
}

/// A fully resolved (non-placeholder) type: either a primitive or a
/// (possibly already-resolved) structure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConcreteType {
    Primitive(Primitive),
    Structure(Rc<StructureDefinition>),
}

/// The type of an expression: either fully concrete, or a placeholder
/// standing for a not-yet-bound type parameter inside a parameterized
/// structure's own field declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionType {
    Concrete(ConcreteType),
    Placeholder(Symbol),
}

impl ExpressionType {
    pub fn as_concrete(&self) -> Option<&ConcreteType> {
        match self {
            ExpressionType::Concrete(c) => Some(c),
            ExpressionType::Placeholder(_) => None,
        }
    }
}
