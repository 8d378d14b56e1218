use std::fmt;

use crate::Node;

/// Index of a variable, `x{n}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Var(pub u32);

impl Var {
    pub const OUTPUT: Var = Var(0);
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Node!)]
pub enum Statement {
    /// `xN := xN + 1` or `xN := xN - 1`.
    Increment { var: Var, decrement: bool },

    /// `P1; P2`. Chains nest to the right.
    Sequence(Box<Statement>, Box<Statement>),

    /// `WHILE xN != 0 DO P END`.
    While { var: Var, body: Box<Statement> },
}

impl Statement {
    pub fn increment(var: u32) -> Self {
        Self::Increment {
            var: Var(var),
            decrement: false,
        }
    }

    pub fn decrement(var: u32) -> Self {
        Self::Increment {
            var: Var(var),
            decrement: true,
        }
    }

    pub fn sequence(first: Statement, second: Statement) -> Self {
        Self::Sequence(Box::new(first), Box::new(second))
    }

    pub fn while_loop(var: u32, body: Statement) -> Self {
        Self::While {
            var: Var(var),
            body: Box::new(body),
        }
    }
}

impl Drop for Statement {
    // long sequences nest deeply, so children are torn down from a heap stack
    fn drop(&mut self) {
        let mut stack = Vec::new();
        detach_children(self, &mut stack);

        while let Some(mut statement) = stack.pop() {
            detach_children(&mut statement, &mut stack);
        }
    }
}

fn detach_children(statement: &mut Statement, stack: &mut Vec<Statement>) {
    let mut detach = |child: &mut Box<Statement>| {
        if !matches!(**child, Statement::Increment { .. }) {
            stack.push(std::mem::replace(&mut **child, Statement::increment(0)));
        }
    };

    match statement {
        Statement::Increment { .. } => {}
        Statement::Sequence(first, second) => {
            detach(first);
            detach(second);
        }
        Statement::While { body, .. } => detach(body),
    }
}
