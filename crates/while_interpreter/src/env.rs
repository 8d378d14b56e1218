use std::collections::BTreeMap;

use while_frontend::ast::Var;

/// Variable assignment of a running program.
///
/// Unset variables read as zero, and variables that drop back to zero are
/// forgotten, so two environments are equal exactly when every variable has
/// the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    values: BTreeMap<Var, u64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the arguments of `P(x1, ..., xk)` to `x1` onwards.
    pub fn from_args(args: impl IntoIterator<Item = u64>) -> Self {
        (1..)
            .zip(args)
            .map(|(index, value)| (Var(index), value))
            .collect()
    }

    pub fn get(&self, var: Var) -> u64 {
        self.values.get(&var).copied().unwrap_or(0)
    }

    pub fn set(&mut self, var: Var, value: u64) {
        if value == 0 {
            self.values.remove(&var);
        } else {
            self.values.insert(var, value);
        }
    }

    /// The program result, `x0`.
    pub fn output(&self) -> u64 {
        self.get(Var::OUTPUT)
    }

    /// Variables with a non-zero value, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, u64)> + '_ {
        self.values.iter().map(|(&var, &value)| (var, value))
    }
}

impl FromIterator<(Var, u64)> for Environment {
    fn from_iter<T: IntoIterator<Item = (Var, u64)>>(iter: T) -> Self {
        let mut env = Self::new();
        for (var, value) in iter {
            env.set(var, value);
        }
        env
    }
}
