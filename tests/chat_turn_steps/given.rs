//! Given steps for chat turn scenarios.

use memechat::chat::{
    domain::ReplyChunk,
    ports::ModelError,
};
use rstest_bdd_macros::given;

use super::world::ChatWorld;

#[given(r#""{user}" has already run "{command}" in the chat"#)]
fn command_already_run(
    world: &mut ChatWorld,
    user: String,
    command: String,
) -> Result<(), eyre::Report> {
    world.send(Some(&user), &command);
    if let Some(err) = &world.last_error {
        return Err(eyre::eyre!("setup command failed: {err}"));
    }
    Ok(())
}

#[given(r#"the model replies "{text}""#)]
fn model_replies(world: &mut ChatWorld, text: String) {
    world.model.set_script(vec![Ok(ReplyChunk::Text(text))]);
}

#[given(r#"the model fails after "{text}""#)]
fn model_fails_after(world: &mut ChatWorld, text: String) {
    world.model.set_script(vec![
        Ok(ReplyChunk::Text(text)),
        Err(ModelError::Provider("model crashed".to_owned())),
    ]);
}
