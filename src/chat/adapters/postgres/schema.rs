//! Diesel table definitions for chat persistence.

diesel::table! {
    /// Chats, one row per conversation.
    chats (id) {
        /// Chat identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Text,
        /// Title fixed at creation.
        title -> Text,
        /// Creation time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Messages, ordered within a chat by `position`.
    messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Owning chat.
        chat_id -> Uuid,
        /// Author role.
        role -> Text,
        /// Visible content.
        content -> Text,
        /// Reasoning trace.
        reasoning -> Nullable<Text>,
        /// Whether the command path produced the message.
        is_command -> Bool,
        /// Creation time.
        created_at -> Timestamptz,
        /// Append order.
        position -> Int8,
    }
}

diesel::joinable!(messages -> chats (chat_id));
diesel::allow_tables_to_appear_in_same_query!(chats, messages);
