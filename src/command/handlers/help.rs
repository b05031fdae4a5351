//! `/help`.

use async_trait::async_trait;
use minijinja::context;

use super::{CommandContext, CommandHandler, render};
use crate::command::domain::{Arity, CommandResult, CommandUsage};

static USAGE: CommandUsage = CommandUsage {
    name: "help",
    script: "/help",
    description: "Get help with available commands",
    example: "/help",
};

const TEMPLATE: &str = "Available commands:\n\n\
{% for command in commands %}{{ loop.index }}. {{ command.script }}\n\n\
Description: {{ command.description }}\n\n\
Example: {{ command.example }}\n\n\
{% endfor %}";

/// Lists every registered command in registry order.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    fn usage(&self) -> &'static CommandUsage {
        &USAGE
    }

    fn arity(&self) -> Arity {
        Arity::Any
    }

    async fn run(&self, _args: &[String], context: CommandContext<'_>) -> CommandResult {
        let commands: Vec<&CommandUsage> = context.registry.usages().collect();
        render(USAGE.name, TEMPLATE, context! { commands => commands })
    }
}
