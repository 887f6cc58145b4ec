//! When steps for forum message BDD scenarios.

use super::world::{ForumWorld, ROOT_ID, run_async};
use agora::message::{
    domain::{MessageContent, PostReplyCommand, ReviseCommand},
    ports::account::Account,
};
use rstest_bdd_macros::when;

#[when(r#"account {account:u64} replies with "{subject}" saying "{body}""#)]
fn account_replies(
    world: &mut ForumWorld,
    account: u64,
    subject: String,
    body: String,
) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.author.id().value() == account,
        "scenario only models account {}",
        world.author.id()
    );
    let reply_id = world.allocate_id();
    let command = PostReplyCommand::new(
        ROOT_ID,
        reply_id,
        MessageContent::new(subject, body),
        world.author.clone(),
    );
    let result = run_async(world.service.post_reply(command)).map(|_| ());
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the root body is revised to "{body}""#)]
fn root_body_revised(world: &mut ForumWorld, body: String) -> Result<(), eyre::Report> {
    let subject = world.root_content()?.subject().to_owned();
    let command = ReviseCommand::new(MessageContent::new(subject, body));
    let result = run_async(world.service.revise(ROOT_ID, command));
    world.last_result = Some(result);
    Ok(())
}

#[when("the root is dug {times:u32} times")]
fn root_dug(world: &mut ForumWorld, times: u32) -> Result<(), eyre::Report> {
    for _ in 0..times {
        run_async(world.service.dig(ROOT_ID))?;
    }
    world.last_result = Some(Ok(()));
    Ok(())
}

#[when("a moderator masks the root")]
fn moderator_masks_root(world: &mut ForumWorld) {
    let result = run_async(world.service.moderate(ROOT_ID, true));
    world.last_result = Some(result);
}
