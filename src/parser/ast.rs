// AST definitions for the teaching-language parser

/// Source location information for diagnostics and runtime faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,      // true division, always yields a float
    FloorDiv, // //
    Mod,
    Pow,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Membership
    In,
    NotIn,
    // Logical (short-circuiting)
    And,
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Pos, // +x
    Not, // not x
}

/// Expression nodes
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    BoolLiteral(bool, SourceLocation),
    NoneLiteral(SourceLocation),
    Name(String, SourceLocation),
    ListDisplay {
        items: Vec<Expr>,
        location: SourceLocation,
    },
    TupleDisplay {
        items: Vec<Expr>,
        location: SourceLocation,
    },
    DictDisplay {
        entries: Vec<(Expr, Expr)>,
        location: SourceLocation,
    },
    SetDisplay {
        items: Vec<Expr>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Attribute {
        object: Box<Expr>,
        name: String,
        location: SourceLocation,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::FloatLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::BoolLiteral(_, loc)
            | Expr::NoneLiteral(loc)
            | Expr::Name(_, loc) => *loc,
            Expr::ListDisplay { location, .. }
            | Expr::TupleDisplay { location, .. }
            | Expr::DictDisplay { location, .. }
            | Expr::SetDisplay { location, .. }
            | Expr::BinaryOp { location, .. }
            | Expr::UnaryOp { location, .. }
            | Expr::Call { location, .. }
            | Expr::Attribute { location, .. }
            | Expr::Index { location, .. } => *location,
        }
    }
}

/// One `if`/`elif` arm: condition plus body
#[derive(Debug, Clone)]
pub struct CondBranch {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

/// Statement nodes
#[derive(Debug, Clone)]
pub enum Stmt {
    Assign {
        target: Expr,
        value: Expr,
        location: SourceLocation,
    },
    AugAssign {
        target: Expr,
        op: BinOp,
        value: Expr,
        location: SourceLocation,
    },
    ExprStatement {
        expr: Expr,
        location: SourceLocation,
    },
    If {
        branches: Vec<CondBranch>,
        else_body: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    For {
        target: String,
        iterable: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    ClassDef {
        name: String,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Pass {
        location: SourceLocation,
    },
    // The following statements parse so that the static validator can reject
    // them with an accurate line number. `import`/`from-import` additionally
    // execute under the sandbox import guard on the unvalidated path.
    Import {
        module: String,
        location: SourceLocation,
    },
    ImportFrom {
        module: String,
        names: Vec<String>,
        location: SourceLocation,
    },
    Delete {
        target: Expr,
        location: SourceLocation,
    },
    Global {
        names: Vec<String>,
        location: SourceLocation,
    },
    Nonlocal {
        names: Vec<String>,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Assign { location, .. }
            | Stmt::AugAssign { location, .. }
            | Stmt::ExprStatement { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::For { location, .. }
            | Stmt::FunctionDef { location, .. }
            | Stmt::ClassDef { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Pass { location }
            | Stmt::Import { location, .. }
            | Stmt::ImportFrom { location, .. }
            | Stmt::Delete { location, .. }
            | Stmt::Global { location, .. }
            | Stmt::Nonlocal { location, .. } => *location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
