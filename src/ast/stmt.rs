use std::hash::{Hash, Hasher};

use super::expr::Exp;
use super::position::{Info, Position};

/// A statement node (spec.md §3). `Seqn`/`If`/`While`/`Label`/`Goto` are the
/// control-flow shapes the [`crate::cfg`] lowering understands; everything
/// else is a "regular" leaf statement — an opaque, atomic side-effecting unit
/// that the linearizer copies into a basic block verbatim without looking
/// inside it.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Position,
    pub info: Option<Info>,
}

// As with `Exp`, `pos`/`info` are metadata: structural equality (used by the
// rewrite engine to detect whether a rule actually changed anything) compares
// `kind` only.
impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Stmt {}

impl Hash for Stmt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Stmt {
        Stmt {
            kind,
            pos: Position::NoPosition,
            info: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StmtKind {
    Seqn(Vec<Stmt>),
    If(Exp, Box<Stmt>, Box<Stmt>),
    While(Exp, Vec<Exp>, Box<Stmt>),
    Label(String),
    Goto(String),

    // Regular (opaque) leaf statements:
    LocalVarAssign(String, Exp),
    FieldAssign {
        receiver: Exp,
        field: String,
        rhs: Exp,
    },
    Inhale(Exp),
    Exhale(Exp),
    Fold(String, Vec<Exp>),
    Unfold(String, Vec<Exp>),
    MethodCall {
        method: String,
        args: Vec<Exp>,
        targets: Vec<String>,
    },
}
