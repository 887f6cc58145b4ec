//! Constraint tests for the message service.
//!
//! Tests duplicate detection, unknown identifiers, and boundary limits.

use crate::in_memory::helpers::{ROOT_ID, TestEnv, env};
use agora::message::{
    domain::{
        DIG_COUNT_KEY, MASKED_KEY, MessageContent, MessageId, PostReplyCommand, Property,
        ReviseCommand,
    },
    error::{CollaboratorError, MessageError, RepositoryError, ValidationError},
    ports::{account::Account, repository::MessageRepository},
    services::MessageServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_registration_is_rejected(env: TestEnv) {
    env.register_root().await.expect("root registered");

    let result = env.register_root().await;

    let err = result.expect_err("second registration must fail");
    assert!(matches!(
        err.downcast_ref::<MessageServiceError>(),
        Some(MessageServiceError::Repository(RepositoryError::DuplicateMessage(id))) if *id == ROOT_ID
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_reply_id_is_rejected_before_any_change(env: TestEnv) {
    env.register_root().await.expect("root registered");

    let result = env
        .service
        .post_reply(PostReplyCommand::new(
            ROOT_ID,
            ROOT_ID,
            MessageContent::new("Re: Hello", "Hi"),
            env.author.clone(),
        ))
        .await;

    assert!(matches!(
        result,
        Err(MessageServiceError::Repository(RepositoryError::DuplicateMessage(_)))
    ));
    assert_eq!(env.author.message_count(), 0);
    assert!(env.events.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn commands_on_unknown_message_fail(env: TestEnv) {
    let missing = MessageId::new(404);

    let dig = env.service.dig(missing).await;
    let moderate = env.service.moderate(missing, true).await;
    let revise = env
        .service
        .revise(missing, ReviseCommand::new(MessageContent::new("a", "b")))
        .await;

    for result in [dig, moderate, revise] {
        assert!(matches!(
            result,
            Err(MessageServiceError::Repository(RepositoryError::NotFound(id))) if id == missing
        ));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlong_revision_is_rejected_at_the_boundary(env: TestEnv) {
    env.register_root().await.expect("root registered");

    let result = env
        .service
        .revise(
            ROOT_ID,
            ReviseCommand::new(MessageContent::new("x".repeat(201), "body")),
        )
        .await;

    assert!(matches!(
        result,
        Err(MessageServiceError::Validation(ValidationError::SubjectTooLong { .. }))
    ));
    assert!(env.events.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_publication_surfaces_collaborator_error(env: TestEnv) {
    env.register_root().await.expect("root registered");
    env.events.set_available(false);

    let result = env.service.dig(ROOT_ID).await;

    assert!(matches!(
        result,
        Err(MessageServiceError::Message(MessageError::Collaborator(
            CollaboratorError::EventSink(_)
        )))
    ));
    assert_eq!(env.thread.entry(ROOT_ID).map(|entry| entry.dig_count), Some(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_reply_releases_its_identifier(env: TestEnv) {
    env.register_root().await.expect("root registered");
    let reply_id = MessageId::new(5);

    let orphan = env
        .service
        .post_reply(PostReplyCommand::new(
            MessageId::new(404),
            reply_id,
            MessageContent::new("Re: ?", "Lost"),
            env.author.clone(),
        ))
        .await;
    assert!(matches!(
        orphan,
        Err(MessageServiceError::Repository(RepositoryError::NotFound(_)))
    ));
    assert!(!env.repository.is_reserved(reply_id));

    env.service
        .post_reply(PostReplyCommand::new(
            ROOT_ID,
            reply_id,
            MessageContent::new("Re: Hello", "Found"),
            env.author.clone(),
        ))
        .await
        .expect("identifier is free again");
    assert!(!env.repository.is_reserved(reply_id));
    assert_eq!(env.author.message_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reserved_identifier_blocks_registration(env: TestEnv) {
    env.repository
        .reserve(ROOT_ID)
        .await
        .expect("identifier is free");

    let err = env
        .register_root()
        .await
        .expect_err("reserved identifier must be refused");

    assert!(matches!(
        err.downcast_ref::<MessageServiceError>(),
        Some(MessageServiceError::Repository(RepositoryError::DuplicateMessage(id))) if *id == ROOT_ID
    ));
    assert!(matches!(
        env.repository.reserve(ROOT_ID).await,
        Err(RepositoryError::DuplicateMessage(_))
    ));
    env.repository.release(ROOT_ID).await.expect("released");
    env.register_root().await.expect("root registered after release");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revision_cannot_mask_or_dig_behind_the_account(env: TestEnv) {
    env.register_root().await.expect("root registered");

    let result = env
        .service
        .revise(
            ROOT_ID,
            ReviseCommand::new(MessageContent::new("Hello", "Sneaky")).with_properties([
                Property::new(MASKED_KEY, "true"),
                Property::new(DIG_COUNT_KEY, "500"),
            ]),
        )
        .await;

    assert!(matches!(
        result,
        Err(MessageServiceError::Message(MessageError::Validation(
            ValidationError::ReservedProperty { .. }
        )))
    ));
    let handle = env
        .service
        .find(ROOT_ID)
        .await
        .expect("lookup succeeds")
        .expect("root stored");
    let root = handle.lock().await;
    let state = root.state().expect("ready");
    assert!(!state.is_masked());
    assert_eq!(state.dig_count(), 0);
    assert!(!env.author.is_masked());
    assert!(env.events.is_empty());
}
