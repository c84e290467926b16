//! Free-function constructors for [`Exp`]/[`Stmt`] values, mirroring the
//! teacher's own `mk_variable`-style helpers in `decompiler::types`. Pure
//! convenience over the data model: no new semantics, just fewer
//! `Position`/`Info`/`Typ` fields to spell out by hand in callers and tests.

use num_bigint::BigInt;

use super::expr::{Exp, ExpKind, LocalVarDecl, Typ};
use super::stmt::{Stmt, StmtKind};

pub fn local_var(name: impl Into<String>, typ: Typ) -> Exp {
    Exp::new(ExpKind::LocalVar(name.into()), typ)
}

pub fn int_lit(value: impl Into<BigInt>) -> Exp {
    Exp::new(ExpKind::IntLit(value.into()), Typ::Int)
}

pub fn true_lit() -> Exp {
    Exp::new(ExpKind::TrueLit, Typ::Bool)
}

pub fn false_lit() -> Exp {
    Exp::new(ExpKind::FalseLit, Typ::Bool)
}

pub fn not(e: Exp) -> Exp {
    Exp::new(ExpKind::Not(Box::new(e)), Typ::Bool)
}

pub fn and(l: Exp, r: Exp) -> Exp {
    Exp::new(ExpKind::And(Box::new(l), Box::new(r)), Typ::Bool)
}

pub fn or(l: Exp, r: Exp) -> Exp {
    Exp::new(ExpKind::Or(Box::new(l), Box::new(r)), Typ::Bool)
}

pub fn implies(l: Exp, r: Exp) -> Exp {
    Exp::new(ExpKind::Implies(Box::new(l), Box::new(r)), Typ::Bool)
}

macro_rules! arith_op {
    ($name:ident, $variant:ident) => {
        pub fn $name(l: Exp, r: Exp) -> Exp {
            Exp::new(ExpKind::$variant(Box::new(l), Box::new(r)), Typ::Int)
        }
    };
}
arith_op!(add, Add);
arith_op!(sub, Sub);
arith_op!(mul, Mul);
arith_op!(div, Div);

macro_rules! cmp_op {
    ($name:ident, $variant:ident) => {
        pub fn $name(l: Exp, r: Exp) -> Exp {
            Exp::new(ExpKind::$variant(Box::new(l), Box::new(r)), Typ::Bool)
        }
    };
}
cmp_op!(eq_cmp, EqCmp);
cmp_op!(ne_cmp, NeCmp);
cmp_op!(lt_cmp, LtCmp);
cmp_op!(le_cmp, LeCmp);
cmp_op!(gt_cmp, GtCmp);
cmp_op!(ge_cmp, GeCmp);

pub fn forall(vars: Vec<LocalVarDecl>, body: Exp) -> Exp {
    Exp::new(ExpKind::Forall(vars, Box::new(body)), Typ::Bool)
}

pub fn exists(vars: Vec<LocalVarDecl>, body: Exp) -> Exp {
    Exp::new(ExpKind::Exists(vars, Box::new(body)), Typ::Bool)
}

pub fn func_app(name: impl Into<String>, args: Vec<Exp>, result_typ: Typ) -> Exp {
    Exp::new(ExpKind::FuncApp(name.into(), args), result_typ)
}

pub fn cond_exp(cond: Exp, then: Exp, els: Exp) -> Exp {
    let typ = then.typ.clone();
    Exp::new(ExpKind::CondExp(Box::new(cond), Box::new(then), Box::new(els)), typ)
}

pub fn seqn(stmts: Vec<Stmt>) -> Stmt {
    Stmt::new(StmtKind::Seqn(stmts))
}

pub fn if_stmt(cond: Exp, then: Stmt, els: Stmt) -> Stmt {
    Stmt::new(StmtKind::If(cond, Box::new(then), Box::new(els)))
}

pub fn while_stmt(cond: Exp, invs: Vec<Exp>, body: Stmt) -> Stmt {
    Stmt::new(StmtKind::While(cond, invs, Box::new(body)))
}

pub fn label(name: impl Into<String>) -> Stmt {
    Stmt::new(StmtKind::Label(name.into()))
}

pub fn goto(target: impl Into<String>) -> Stmt {
    Stmt::new(StmtKind::Goto(target.into()))
}

pub fn local_var_assign(name: impl Into<String>, rhs: Exp) -> Stmt {
    Stmt::new(StmtKind::LocalVarAssign(name.into(), rhs))
}

pub fn inhale(e: Exp) -> Stmt {
    Stmt::new(StmtKind::Inhale(e))
}

pub fn exhale(e: Exp) -> Stmt {
    Stmt::new(StmtKind::Exhale(e))
}
