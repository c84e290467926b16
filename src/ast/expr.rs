use std::hash::{Hash, Hasher};

use num_bigint::BigInt;

use super::position::{Info, Position};

/// The type system is opaque beyond what §4.4's `isAssignable` needs: exact
/// identity, plus domain types and unbound type variables (as used by
/// `Forall`/`Exists`-bound generic domain functions) which are assignable to
/// themselves only. Full subtyping is a verifier-backend concern (spec.md §1
/// Non-goals: "no type inference").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Typ {
    Bool,
    Int,
    Perm,
    Ref,
    Domain(String),
    TypeVar(String),
}

impl Typ {
    /// §4.4 `isAssignable(a, b)`: may a value of type `a` flow into a `b`-typed
    /// slot. The core never needs real subtyping, only type-variable binding,
    /// so this is identity plus "anything is assignable to an unbound type
    /// variable".
    pub fn is_assignable(&self, target: &Typ) -> bool {
        self == target || matches!(target, Typ::TypeVar(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalVarDecl {
    pub name: String,
    pub typ: Typ,
}

/// An expression node. Every expression carries a [`Typ`] (spec.md §3); the
/// core never evaluates these, only matches on `kind` and typechecks
/// condition positions.
///
/// `pos`/`info` are metadata, not part of the value: `PartialEq`/`Eq`/`Hash`
/// compare `kind` and `typ` only, so structural equality (used for
/// deduplication and by the rewrite engine's `Node` matching) does not care
/// where an expression came from.
#[derive(Clone, Debug)]
pub struct Exp {
    pub kind: ExpKind,
    pub typ: Typ,
    pub pos: Position,
    pub info: Option<Info>,
}

impl PartialEq for Exp {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.typ == other.typ
    }
}

impl Eq for Exp {}

impl Hash for Exp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.typ.hash(state);
    }
}

impl Exp {
    pub fn new(kind: ExpKind, typ: Typ) -> Exp {
        Exp {
            kind,
            typ,
            pos: Position::NoPosition,
            info: None,
        }
    }

    pub fn is_bool_typed(&self) -> bool {
        self.typ == Typ::Bool
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExpKind {
    TrueLit,
    FalseLit,
    IntLit(BigInt),
    LocalVar(String),

    Not(Box<Exp>),
    And(Box<Exp>, Box<Exp>),
    Or(Box<Exp>, Box<Exp>),
    Implies(Box<Exp>, Box<Exp>),

    Add(Box<Exp>, Box<Exp>),
    Sub(Box<Exp>, Box<Exp>),
    Mul(Box<Exp>, Box<Exp>),
    Div(Box<Exp>, Box<Exp>),

    EqCmp(Box<Exp>, Box<Exp>),
    NeCmp(Box<Exp>, Box<Exp>),
    LtCmp(Box<Exp>, Box<Exp>),
    LeCmp(Box<Exp>, Box<Exp>),
    GtCmp(Box<Exp>, Box<Exp>),
    GeCmp(Box<Exp>, Box<Exp>),

    Forall(Vec<LocalVarDecl>, Box<Exp>),
    Exists(Vec<LocalVarDecl>, Box<Exp>),

    FuncApp(String, Vec<Exp>),
    CondExp(Box<Exp>, Box<Exp>, Box<Exp>),
}
