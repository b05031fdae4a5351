//! Model-context filtering.

use std::collections::HashSet;

use crate::chat::domain::{Identified, MessageId};

/// Returns `messages` without the command-originated ones, order preserved.
///
/// The input is left untouched, so applying the filter twice gives the same
/// result as applying it once.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
///
/// use memechat::chat::domain::{MessageId, RequestMessage, Role};
/// use memechat::chat::services::filter_history;
///
/// let command = RequestMessage::new(MessageId::new(), Role::User, "/help");
/// let question = RequestMessage::new(MessageId::new(), Role::User, "gm");
/// let command_ids = HashSet::from([command.id]);
///
/// let context = filter_history(&[command, question.clone()], &command_ids);
/// assert_eq!(context, [question]);
/// ```
#[must_use]
pub fn filter_history<M>(messages: &[M], command_ids: &HashSet<MessageId>) -> Vec<M>
where
    M: Identified + Clone,
{
    messages
        .iter()
        .filter(|message| !command_ids.contains(&message.message_id()))
        .cloned()
        .collect()
}
