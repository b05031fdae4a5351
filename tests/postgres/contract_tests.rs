//! Repository behaviour checks against `PostgreSQL`.

use crate::postgres::helpers::{PgContext, pg_context};
use crate::repository_contract as contract;
use rstest::rstest;

#[rstest]
fn created_chat_round_trips(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::created_chat_round_trips(&context.repo));
}

#[rstest]
fn creating_a_chat_twice_is_rejected(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::creating_a_chat_twice_is_rejected(&context.repo));
}

#[rstest]
fn command_exchange_is_stored_as_one_unit(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::command_exchange_is_stored_as_one_unit(&context.repo));
}

#[rstest]
fn append_order_survives_equal_timestamps(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::append_order_survives_equal_timestamps(&context.repo));
}

#[rstest]
fn taken_message_id_rejects_the_whole_batch(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::taken_message_id_rejects_the_whole_batch(&context.repo));
}

#[rstest]
fn repeated_id_inside_a_batch_is_rejected(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::repeated_id_inside_a_batch_is_rejected(&context.repo));
}

#[rstest]
fn batch_spanning_two_chats_is_rejected(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::batch_spanning_two_chats_is_rejected(&context.repo));
}

#[rstest]
fn appending_to_a_missing_chat_is_rejected(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::appending_to_a_missing_chat_is_rejected(&context.repo));
}

#[rstest]
fn deleting_a_chat_cascades_to_its_messages(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::deleting_a_chat_cascades_to_its_messages(&context.repo));
}

#[rstest]
fn unknown_chats_read_as_empty(pg_context: Option<PgContext>) {
    let Some(context) = pg_context else { return };
    context.rt.block_on(contract::unknown_chats_read_as_empty(&context.repo));
}
