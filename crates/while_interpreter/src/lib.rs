mod env;
mod interrupt;


pub use env::Environment;
pub use interrupt::{Deadline, Interrupt, NoInterrupt};

use while_frontend::ast::{Statement, Var};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    #[error("`{var}` overflowed")]
    Overflow { var: Var },

    #[error("interrupted after {iterations} loop iterations")]
    Interrupted { iterations: u64 },
}

pub type RunResult<T> = Result<T, RunError>;

/// Runs a program to completion without any way to stop it.
pub fn run(program: &Statement, env: Environment) -> RunResult<Environment> {
    Interpreter::new().run(program, env)
}

/// Tree-walking evaluator.
///
/// The interrupt is polled once before every loop iteration; it never
/// changes what a program computes, only whether it is allowed to finish.
#[derive(Debug)]
pub struct Interpreter<I = NoInterrupt> {
    interrupt: I,
    iterations: u64,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_interrupt(NoInterrupt)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Interrupt> Interpreter<I> {
    pub fn with_interrupt(interrupt: I) -> Self {
        Self {
            interrupt,
            iterations: 0,
        }
    }

    /// Total loop iterations executed by this interpreter so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn run(&mut self, program: &Statement, mut env: Environment) -> RunResult<Environment> {
        let result = self.exec(program, &mut env);

        match &result {
            Ok(()) => tracing::debug!(
                iterations = self.iterations,
                output = env.output(),
                "program finished"
            ),
            Err(err) => tracing::debug!(%err, "program stopped"),
        }

        result.map(|()| env)
    }

    fn exec(&mut self, program: &Statement, env: &mut Environment) -> RunResult<()> {
        // pending work lives on the heap so deep nesting can't grow the call stack
        let mut stack = vec![Frame::Exec(program)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Exec(Statement::Increment {
                    var,
                    decrement: false,
                }) => {
                    let value = env
                        .get(*var)
                        .checked_add(1)
                        .ok_or(RunError::Overflow { var: *var })?;
                    env.set(*var, value);
                }

                Frame::Exec(Statement::Increment {
                    var,
                    decrement: true,
                }) => {
                    env.set(*var, env.get(*var).saturating_sub(1));
                }

                Frame::Exec(Statement::Sequence(first, second)) => {
                    stack.push(Frame::Exec(second));
                    stack.push(Frame::Exec(first));
                }

                Frame::Exec(Statement::While { var, body }) => {
                    stack.push(Frame::Loop { var: *var, body });
                }

                Frame::Loop { var, body } => {
                    if env.get(var) == 0 {
                        continue;
                    }

                    if self.interrupt.should_interrupt() {
                        return Err(RunError::Interrupted {
                            iterations: self.iterations,
                        });
                    }

                    self.iterations += 1;
                    tracing::trace!(%var, value = env.get(var), "loop iteration");

                    stack.push(Frame::Loop { var, body });
                    stack.push(Frame::Exec(body));
                }
            }
        }

        Ok(())
    }
}

enum Frame<'a> {
    Exec(&'a Statement),
    /// Checks the condition, then runs one more iteration.
    Loop { var: Var, body: &'a Statement },
}
