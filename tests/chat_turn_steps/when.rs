//! When steps for chat turn scenarios.

use memechat::chat::domain::{Identity, UserId};
use rstest_bdd_macros::when;

use super::world::{ChatWorld, run_async};

#[when(r#""{user}" sends "{content}""#)]
fn user_sends(world: &mut ChatWorld, user: String, content: String) {
    world.send(Some(&user), &content);
}

#[when(r#"an anonymous caller sends "{content}""#)]
fn anonymous_sends(world: &mut ChatWorld, content: String) {
    world.send(None, &content);
}

#[when(r#""{user}" deletes the chat"#)]
fn user_deletes_chat(world: &mut ChatWorld, user: String) {
    let identity = Identity::new(UserId::new(user));
    world.last_error = run_async(world.service.delete_chat(Some(&identity), world.chat_id)).err();
}
