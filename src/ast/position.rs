/// A source location, or the absence of one.
///
/// Mirrors the teacher's habit of carrying a decoded-but-unvalidated position
/// alongside every node (`disassembler::compilation_unit`'s `(pc, Instruction)`
/// pairs) — here it is explicit rather than implicit in a tuple.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    #[default]
    NoPosition,
    At {
        line: u32,
        column: u32,
    },
}

/// Opaque, caller-attached metadata. The core never reads the contents, only
/// whether one is present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Info {
    pub comment: Option<String>,
}
