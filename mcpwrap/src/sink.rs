//! Emission strategies.
//!
//! A [`CommandSink`] realizes a [`CommandRegistry`]: the live sink registers
//! commands with the MCP runtime, the source sink renders them as text. Both
//! see exactly the same commands in the same order.

use crate::error::Result;
use crate::registry::CommandRegistry;
use crate::spec::CommandSpec;

/// Consumer of synthesized commands.
pub trait CommandSink {
    /// What the sink produces once every command is accepted.
    type Output;

    /// Register one command.
    fn accept(&mut self, command: &CommandSpec) -> Result<()>;

    /// Produce the final artifact.
    fn finish(self) -> Result<Self::Output>;
}

/// Feed every command of a registry into a sink, in order.
pub fn emit<S: CommandSink>(registry: &CommandRegistry, mut sink: S) -> Result<S::Output> {
    for command in registry {
        sink.accept(command)?;
    }
    sink.finish()
}
