//! Schema creation and row constraint tests.

use crate::postgres::helpers::{PgContext, pg_context};
use crate::repository_contract::FrozenClock;
use diesel::prelude::*;
use diesel::sql_types::{Text, Uuid as SqlUuid};
use memechat::chat::{
    domain::{Chat, ChatId, Message, MessageId, Role, UserId},
    ports::ChatRepository,
};
use rstest::rstest;

fn seeded_chat(context: &PgContext) -> ChatId {
    let chat_id = ChatId::new();
    let chat = Chat::new(chat_id, UserId::new("alice"), "Seeded", &FrozenClock);
    let messages = [
        Message::new(MessageId::new(), chat_id, Role::User, "gm", &FrozenClock),
        Message::new(MessageId::new(), chat_id, Role::Assistant, "gm!", &FrozenClock),
    ];
    context.rt.block_on(async {
        context.repo.create_chat(&chat).await.expect("create chat");
        context
            .repo
            .append_messages(&messages)
            .await
            .expect("append messages");
    });
    chat_id
}

#[rstest]
fn migrations_can_run_twice(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    let chat_id = seeded_chat(&context);

    context
        .rt
        .block_on(context.repo.run_migrations())
        .expect("second migration run");

    let stored = context
        .rt
        .block_on(context.repo.messages(chat_id))
        .expect("read messages");
    assert_eq!(stored.len(), 2);
}

#[rstest]
fn deleting_a_chat_row_removes_its_messages(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    let chat_id = seeded_chat(&context);
    let mut conn = context.connection();

    diesel::sql_query("DELETE FROM chats WHERE id = $1")
        .bind::<SqlUuid, _>(chat_id.into_inner())
        .execute(&mut conn)
        .expect("delete chat row");

    let stored = context
        .rt
        .block_on(context.repo.messages(chat_id))
        .expect("read messages");
    assert!(stored.is_empty());
}

#[rstest]
#[case("tool")]
#[case("")]
#[case("USER")]
fn unknown_roles_are_refused_by_the_table(pg_context: Option<PgContext>, #[case] role: &str) {
    let Some(context) = pg_context else { return };
    let chat_id = seeded_chat(&context);
    let mut conn = context.connection();

    let result = diesel::sql_query(concat!(
        "INSERT INTO messages (id, chat_id, role, content, created_at) ",
        "VALUES ($1, $2, $3, 'hi', NOW())",
    ))
    .bind::<SqlUuid, _>(MessageId::new().into_inner())
    .bind::<SqlUuid, _>(chat_id.into_inner())
    .bind::<Text, _>(role)
    .execute(&mut conn);

    assert!(result.is_err(), "role {role:?} should be refused");
}
