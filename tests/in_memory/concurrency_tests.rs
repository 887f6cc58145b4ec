//! Concurrency tests for commands on a shared aggregate.

use std::sync::Arc;

use crate::in_memory::helpers::{ROOT_ID, TestEnv, env};
use agora::message::{
    domain::{MessageContent, MessageEvent, MessageId, PostReplyCommand, ThreadId},
    error::RepositoryError,
    services::MessageServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_digs_are_all_counted(env: TestEnv) {
    env.register_root().await.expect("root registered");
    let shared_env = Arc::new(env);

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let shared = Arc::clone(&shared_env);
            tokio::spawn(async move { shared.service.dig(ROOT_ID).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("task joins").expect("dig applied");
    }

    assert_eq!(shared_env.thread.entry(ROOT_ID).map(|entry| entry.dig_count), Some(16));
    assert_eq!(shared_env.events.len(), 16);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_replies_each_register_once(env: TestEnv) {
    env.register_root().await.expect("root registered");
    let shared_env = Arc::new(env);

    let tasks: Vec<_> = (2..10)
        .map(|n| {
            let shared = Arc::clone(&shared_env);
            tokio::spawn(async move {
                shared
                    .service
                    .post_reply(PostReplyCommand::new(
                        ROOT_ID,
                        MessageId::new(n),
                        MessageContent::new("Re: Hello", format!("reply {n}")),
                        shared.author.clone(),
                    ))
                    .await
                    .map(|_| ())
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task joins").expect("reply posted");
    }

    assert_eq!(shared_env.author.message_count(), 8);
    assert_eq!(shared_env.thread.replies_to(ROOT_ID).len(), 8);
    assert_eq!(shared_env.repository.len(), 9);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn competing_replies_with_one_id_post_once(env: TestEnv) {
    let other_root = MessageId::new(2);
    let reply_id = MessageId::new(99);
    env.register_root().await.expect("root registered");
    let other_thread = env.add_thread(ThreadId::new(20));
    env.register_root_in(other_root, &other_thread)
        .await
        .expect("second root registered");
    let shared_env = Arc::new(env);

    let other_handle = shared_env
        .service
        .find(other_root)
        .await
        .expect("lookup succeeds")
        .expect("second root stored");
    let held = other_handle.lock().await;
    let blocked = {
        let shared = Arc::clone(&shared_env);
        tokio::spawn(async move {
            shared
                .service
                .post_reply(PostReplyCommand::new(
                    other_root,
                    reply_id,
                    MessageContent::new("Re: Hello", "from thread 20"),
                    shared.author.clone(),
                ))
                .await
                .map(|_| ())
        })
    };
    let direct = shared_env
        .service
        .post_reply(PostReplyCommand::new(
            ROOT_ID,
            reply_id,
            MessageContent::new("Re: Hello", "from thread 10"),
            shared_env.author.clone(),
        ))
        .await
        .map(|_| ());
    drop(held);
    let queued = blocked.await.expect("task joins");

    let outcomes = [direct, queued];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(MessageServiceError::Repository(RepositoryError::DuplicateMessage(id))) if *id == reply_id
    )));
    assert_eq!(shared_env.author.message_count(), 1);
    let posted = shared_env
        .events
        .events()
        .into_iter()
        .filter(|event| matches!(event, MessageEvent::ReplyPosted { .. }))
        .count();
    assert_eq!(posted, 1);
    assert_ne!(
        shared_env.thread.contains(reply_id),
        other_thread.contains(reply_id)
    );
    assert!(!shared_env.repository.is_reserved(reply_id));
}
