//! Then steps for forum message BDD scenarios.

use super::world::{ForumWorld, ROOT_ID, run_async};
use agora::message::{
    error::{CollaboratorError, MessageError},
    ports::account::Account,
    services::MessageServiceError,
};
use rstest_bdd_macros::then;

#[then("the thread lists {count:usize} reply to the root")]
fn thread_lists_replies(world: &ForumWorld, count: usize) -> Result<(), eyre::Report> {
    let replies = world.thread.replies_to(ROOT_ID);
    eyre::ensure!(
        replies.len() == count,
        "expected {count} replies, found {}",
        replies.len()
    );
    Ok(())
}

#[then("account {account:u64} has posted {count:i64} message")]
fn account_has_posted(world: &ForumWorld, account: u64, count: i64) -> Result<(), eyre::Report> {
    eyre::ensure!(world.author.id().value() == account, "unknown account {account}");
    let posted = world.author.message_count();
    eyre::ensure!(posted == count, "expected {count} messages, found {posted}");
    Ok(())
}

#[then("{count:usize} event has been published")]
fn one_event_published(world: &ForumWorld, count: usize) -> Result<(), eyre::Report> {
    events_published(world, count)
}

#[then("{count:usize} events have been published")]
fn events_published(world: &ForumWorld, count: usize) -> Result<(), eyre::Report> {
    let published = world.events.len();
    eyre::ensure!(
        published == count,
        "expected {count} events, found {published}"
    );
    Ok(())
}

#[then(r#"the root body is "{body}""#)]
fn root_body_is(world: &ForumWorld, body: String) -> Result<(), eyre::Report> {
    let content = world.root_content()?;
    eyre::ensure!(
        content.body() == body,
        "expected body {body:?}, found {:?}",
        content.body()
    );
    Ok(())
}

#[then(r#"the last event is "{event_type}""#)]
fn last_event_is(world: &ForumWorld, event_type: String) -> Result<(), eyre::Report> {
    let events = world.events.events();
    let last = events
        .last()
        .ok_or_else(|| eyre::eyre!("no events published"))?;
    eyre::ensure!(
        last.event_type() == event_type,
        "expected {event_type}, found {}",
        last.event_type()
    );
    Ok(())
}

#[then("the root has {count:u32} digs")]
fn root_has_digs(world: &ForumWorld, count: u32) -> Result<(), eyre::Report> {
    let digs = run_async(async {
        let handle = world
            .service
            .find(ROOT_ID)
            .await?
            .ok_or_else(|| eyre::eyre!("root message not registered"))?;
        let message = handle.lock().await;
        Ok::<_, eyre::Report>(message.state()?.dig_count())
    })?;
    eyre::ensure!(digs == count, "expected {count} digs, found {digs}");
    let thread_digs = world.thread.entry(ROOT_ID).map(|entry| entry.dig_count);
    eyre::ensure!(
        thread_digs == Some(count),
        "thread reports {thread_digs:?} digs"
    );
    Ok(())
}

#[then("the root is masked")]
fn root_is_masked(world: &ForumWorld) -> Result<(), eyre::Report> {
    let masked = run_async(async {
        let handle = world
            .service
            .find(ROOT_ID)
            .await?
            .ok_or_else(|| eyre::eyre!("root message not registered"))?;
        let message = handle.lock().await;
        Ok::<_, eyre::Report>(message.state()?.is_masked())
    })?;
    eyre::ensure!(masked, "root message is not masked");
    Ok(())
}

#[then("the author is masked")]
fn author_is_masked(world: &ForumWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.author.is_masked(), "author account is not masked");
    Ok(())
}

#[then("the command fails with an event sink error")]
fn command_fails_with_event_sink_error(world: &ForumWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing command result"))?;

    if !matches!(
        result,
        Err(MessageServiceError::Message(MessageError::Collaborator(
            CollaboratorError::EventSink(_)
        )))
    ) {
        return Err(eyre::eyre!("expected event sink error, got {result:?}"));
    }

    Ok(())
}
