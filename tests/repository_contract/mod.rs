//! Behaviour every `ChatRepository` implementation must share.
//!
//! Each check takes a freshly created, empty store and panics on the first
//! deviation. The in-memory and `PostgreSQL` suites run the same checks.

use chrono::{DateTime, Local, TimeZone, Utc};
use memechat::chat::{
    domain::{Chat, ChatId, Message, MessageId, Role, UserId},
    error::RepositoryError,
    ports::ChatRepository,
};
use mockable::Clock;

/// Clock frozen on a whole second, so every row shares one timestamp and
/// survives a database round trip unchanged.
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid instant")
    }
}

async fn new_chat<R>(repo: &R, owner: &str) -> ChatId
where
    R: ChatRepository + ?Sized,
{
    let id = ChatId::new();
    let chat = Chat::new(id, UserId::new(owner), "Meme coin chat", &FrozenClock);
    repo.create_chat(&chat).await.expect("create chat");
    id
}

fn plain(chat_id: ChatId, role: Role, content: &str) -> Message {
    Message::new(MessageId::new(), chat_id, role, content, &FrozenClock)
}

fn command(chat_id: ChatId, role: Role, content: &str) -> Message {
    Message::command(MessageId::new(), chat_id, role, content, &FrozenClock)
}

pub async fn created_chat_round_trips<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let id = ChatId::new();
    let chat = Chat::new(id, UserId::new("alice"), "Doge launch", &FrozenClock);

    repo.create_chat(&chat).await.expect("create chat");

    let found = repo.find_chat(id).await.expect("find chat");
    assert_eq!(found, Some(chat));
}

pub async fn creating_a_chat_twice_is_rejected<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let id = new_chat(repo, "alice").await;
    let again = Chat::new(id, UserId::new("bob"), "Other title", &FrozenClock);

    let result = repo.create_chat(&again).await;

    assert!(matches!(result, Err(RepositoryError::DuplicateChat(dup)) if dup == id));
    let kept = repo.find_chat(id).await.expect("find chat").expect("chat kept");
    assert!(kept.is_owned_by(&UserId::new("alice")));
}

pub async fn command_exchange_is_stored_as_one_unit<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let chat_id = new_chat(repo, "alice").await;
    let exchange = [
        command(chat_id, Role::User, "/mCreate DogeCoin DOGE 10000000"),
        command(chat_id, Role::Assistant, "Meme coin created."),
    ];

    repo.append_messages(&exchange).await.expect("append exchange");

    let stored = repo.messages(chat_id).await.expect("read messages");
    assert_eq!(stored, exchange);
    let ids = repo.command_message_ids(chat_id).await.expect("command ids");
    assert_eq!(ids.len(), 2);
    assert!(exchange.iter().all(|message| ids.contains(&message.id())));
}

pub async fn append_order_survives_equal_timestamps<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let chat_id = new_chat(repo, "alice").await;
    let first = plain(chat_id, Role::User, "one");
    let pair = [
        command(chat_id, Role::User, "/help"),
        command(chat_id, Role::Assistant, "two"),
    ];
    let last = plain(chat_id, Role::Assistant, "three").with_reasoning("thinking");

    repo.append_messages(std::slice::from_ref(&first))
        .await
        .expect("append first");
    repo.append_messages(&pair).await.expect("append pair");
    repo.append_messages(std::slice::from_ref(&last))
        .await
        .expect("append last");

    let stored = repo.messages(chat_id).await.expect("read messages");
    let contents: Vec<&str> = stored.iter().map(Message::content).collect();
    assert_eq!(contents, ["one", "/help", "two", "three"]);
    assert!(
        stored
            .iter()
            .all(|message| message.created_at() == first.created_at())
    );
    assert_eq!(stored.last(), Some(&last));
}

pub async fn taken_message_id_rejects_the_whole_batch<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let chat_id = new_chat(repo, "alice").await;
    let original = plain(chat_id, Role::User, "hello");
    repo.append_messages(std::slice::from_ref(&original))
        .await
        .expect("append original");
    let fresh = plain(chat_id, Role::User, "fresh");
    let clash = Message::new(
        original.id(),
        chat_id,
        Role::Assistant,
        "clash",
        &FrozenClock,
    );

    let result = repo.append_messages(&[fresh, clash]).await;

    assert!(matches!(
        result,
        Err(RepositoryError::DuplicateMessage(dup)) if dup == original.id()
    ));
    let stored = repo.messages(chat_id).await.expect("read messages");
    assert_eq!(stored, [original]);
}

pub async fn repeated_id_inside_a_batch_is_rejected<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let chat_id = new_chat(repo, "alice").await;
    let first = command(chat_id, Role::User, "/help");
    let twin = Message::command(
        first.id(),
        chat_id,
        Role::Assistant,
        "body",
        &FrozenClock,
    );

    let result = repo.append_messages(&[first.clone(), twin]).await;

    assert!(matches!(
        result,
        Err(RepositoryError::DuplicateMessage(dup)) if dup == first.id()
    ));
    assert!(repo.messages(chat_id).await.expect("read messages").is_empty());
}

pub async fn batch_spanning_two_chats_is_rejected<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let first = new_chat(repo, "alice").await;
    let second = new_chat(repo, "alice").await;

    let result = repo
        .append_messages(&[
            plain(first, Role::User, "hello"),
            plain(second, Role::User, "hi"),
        ])
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::MixedChats { expected, found })
            if expected == first && found == second
    ));
    assert!(repo.messages(first).await.expect("read messages").is_empty());
    assert!(repo.messages(second).await.expect("read messages").is_empty());
}

pub async fn appending_to_a_missing_chat_is_rejected<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let missing = ChatId::new();

    let result = repo
        .append_messages(&[plain(missing, Role::User, "hello")])
        .await;

    assert!(matches!(result, Err(RepositoryError::ChatNotFound(id)) if id == missing));
}

pub async fn deleting_a_chat_cascades_to_its_messages<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let doomed = new_chat(repo, "alice").await;
    let kept = new_chat(repo, "alice").await;
    repo.append_messages(&[
        command(doomed, Role::User, "/mW"),
        command(doomed, Role::Assistant, "Wallet created successfully"),
    ])
    .await
    .expect("append doomed");
    let survivor = plain(kept, Role::User, "still here");
    repo.append_messages(std::slice::from_ref(&survivor))
        .await
        .expect("append kept");

    repo.delete_chat(doomed).await.expect("delete chat");

    assert!(repo.find_chat(doomed).await.expect("find chat").is_none());
    assert!(repo.messages(doomed).await.expect("read messages").is_empty());
    assert!(
        repo.command_message_ids(doomed)
            .await
            .expect("command ids")
            .is_empty()
    );
    assert_eq!(
        repo.messages(kept).await.expect("read messages"),
        [survivor]
    );
}

pub async fn unknown_chats_read_as_empty<R>(repo: &R)
where
    R: ChatRepository + ?Sized,
{
    let unknown = ChatId::new();

    assert!(repo.find_chat(unknown).await.expect("find chat").is_none());
    assert!(repo.messages(unknown).await.expect("read messages").is_empty());
    assert!(
        repo.command_message_ids(unknown)
            .await
            .expect("command ids")
            .is_empty()
    );
    repo.delete_chat(unknown)
        .await
        .expect("deleting a missing chat is not an error");
    repo.append_messages(&[]).await.expect("empty append");
}
