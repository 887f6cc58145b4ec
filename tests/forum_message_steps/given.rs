//! Given steps for forum message BDD scenarios.

use std::sync::Arc;

use super::world::{ForumWorld, ROOT_ID, run_async};
use agora::message::{
    domain::{ForumId, ForumMessage, ForumRef, MessageContent, ThreadId},
    ports::filter::PassThroughFilter,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;

#[given(r#"a thread with root message "{subject}" saying "{body}""#)]
fn thread_with_root(
    world: &mut ForumWorld,
    subject: String,
    body: String,
) -> Result<(), eyre::Report> {
    let content = MessageContent::new(subject, body);
    let draft = ForumMessage::builder(ROOT_ID)
        .content(content.clone())
        .forum(ForumRef::new(ForumId::new(100), "General"))
        .thread(ThreadId::new(10))
        .account(world.author.clone())
        .filter(Arc::new(PassThroughFilter))
        .build(&DefaultClock)
        .wrap_err("build root draft")?;

    let handle = run_async(world.service.register(draft)).wrap_err("register root message")?;
    run_async(async { world.thread.set_root(&*handle.lock().await) })
        .wrap_err("make message the thread root")?;
    world.events.record_original(ROOT_ID, content);
    Ok(())
}

#[given("the event store is unavailable")]
fn event_store_unavailable(world: &mut ForumWorld) {
    world.events.set_available(false);
}
