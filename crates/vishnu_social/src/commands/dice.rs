use super::required;
use crate::presentation;
use crate::{BotCommand, CommandContext, CommandServices, Reply};
use async_trait::async_trait;
use tracing::debug;
use vishnu_error::VishnuResult;

/// `roll <dice>...`: one message per expression, split further when a
/// result is longer than a single message allows.
///
/// A malformed expression gets its own error message; the others still roll.
pub struct RollCommand;

#[async_trait]
impl BotCommand for RollCommand {
    fn name(&self) -> &'static str {
        "roll"
    }

    fn usage(&self) -> &'static str {
        "<NdM[+K]>..."
    }

    fn summary(&self) -> &'static str {
        "Roll dice, e.g. 3d8+4"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        _ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        required(args, 0, self.name(), "dice expression")?;

        let mut reply = Reply::default();
        for token in args {
            match services.roller().roll(token) {
                Ok(outcome) => {
                    debug!(token = %token, total = *outcome.total(), "Rolled");
                    for message in presentation::split_text(&outcome.to_string()) {
                        reply.push(message);
                    }
                }
                Err(e) => reply.push(e.user_message()),
            }
        }
        Ok(reply)
    }
}
