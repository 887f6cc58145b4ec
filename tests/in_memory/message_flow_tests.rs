//! End-to-end command flows through the message service.

use crate::in_memory::helpers::{ROOT_ID, TestEnv, env};
use agora::message::domain::{
    MessageContent, MessageEvent, MessageId, PostReplyCommand, ReviseCommand,
};
use rstest::rstest;

const REPLY_ID: MessageId = MessageId::new(2);

fn reply(env: &TestEnv) -> PostReplyCommand {
    PostReplyCommand::new(
        ROOT_ID,
        REPLY_ID,
        MessageContent::new("Re: Hello", "Hi there"),
        env.author.clone(),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_message_can_be_found(env: TestEnv) {
    env.register_root().await.expect("root registered");

    let content = env.content_of(ROOT_ID).await.expect("root stored");

    assert_eq!(content, MessageContent::new("Hello", "World"));
    assert_eq!(env.repository.len(), 1);
    assert!(env.events.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn posted_reply_is_stored_and_counted(env: TestEnv) {
    env.register_root().await.expect("root registered");

    let handle = env.service.post_reply(reply(&env)).await.expect("reply posted");

    let state_parent = handle.lock().await.state().map(|state| state.parent_id()).ok();
    assert_eq!(state_parent, Some(Some(ROOT_ID)));
    assert!(env.service.find(REPLY_ID).await.expect("lookup").is_some());
    assert_eq!(env.author.message_count(), 1);
    assert_eq!(env.thread.replies_to(ROOT_ID), vec![REPLY_ID]);
    assert_eq!(env.events.events_for(ROOT_ID).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_to_reply_extends_the_thread(env: TestEnv) {
    env.register_root().await.expect("root registered");
    env.service.post_reply(reply(&env)).await.expect("reply posted");

    env.service
        .post_reply(PostReplyCommand::new(
            REPLY_ID,
            MessageId::new(3),
            MessageContent::new("Re: Re: Hello", "Nested"),
            env.author.clone(),
        ))
        .await
        .expect("nested reply posted");

    assert_eq!(env.thread.replies_to(REPLY_ID), vec![MessageId::new(3)]);
    assert_eq!(env.thread.message_count(), 3);
    assert_eq!(env.author.message_count(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revision_updates_content_and_original(env: TestEnv) {
    env.register_root().await.expect("root registered");

    env.service
        .revise(
            ROOT_ID,
            ReviseCommand::new(MessageContent::new("Hello", "Updated")),
        )
        .await
        .expect("revision applied");

    let content = env.content_of(ROOT_ID).await.expect("root stored");
    assert_eq!(content.body(), "Updated");
    assert!(matches!(
        env.events.events().as_slice(),
        [MessageEvent::MessageRevised { .. }]
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moderation_masks_and_unmasks(env: TestEnv) {
    env.register_root().await.expect("root registered");

    env.service.moderate(ROOT_ID, true).await.expect("masked");
    let masked = env
        .service
        .find(ROOT_ID)
        .await
        .expect("lookup")
        .expect("stored")
        .lock()
        .await
        .state()
        .map(|state| state.is_masked())
        .ok();
    assert_eq!(masked, Some(true));
    assert!(env.thread.entry(ROOT_ID).is_some_and(|entry| entry.masked));

    env.service.moderate(ROOT_ID, false).await.expect("unmasked");
    assert!(env.thread.entry(ROOT_ID).is_some_and(|entry| !entry.masked));
    assert_eq!(env.events.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn digs_reach_the_thread(env: TestEnv) {
    env.register_root().await.expect("root registered");

    env.service.dig(ROOT_ID).await.expect("first dig");
    env.service.dig(ROOT_ID).await.expect("second dig");

    assert_eq!(env.thread.entry(ROOT_ID).map(|entry| entry.dig_count), Some(2));
    assert_eq!(env.events.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_restores_submitted_content(env: TestEnv) {
    env.register_root().await.expect("root registered");
    env.service
        .revise(
            ROOT_ID,
            ReviseCommand::new(MessageContent::new("Hello", "Second")),
        )
        .await
        .expect("revision applied");

    env.service
        .reload_original(ROOT_ID)
        .await
        .expect("original reloaded");

    let content = env.content_of(ROOT_ID).await.expect("root stored");
    assert_eq!(content.body(), "Second");
}
