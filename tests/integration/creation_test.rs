//! Ticket creation dialog tests

use assert_matches::assert_matches;
use tokio_test::assert_ok;
use TicketDesk::config::TicketsConfig;
use TicketDesk::database::Repository;
use TicketDesk::models::TicketStatus;
use TicketDesk::services::view;
use TicketDesk::state::ConversationPhase;
use TicketDesk::TicketDeskError;

use crate::helpers::{Sent, TestContext, ADMIN_A, ADMIN_B, ADMIN_C, USER_A, USER_B};

#[tokio::test]
async fn test_create_ticket_scenario_notifies_every_admin() {
    let ctx = TestContext::new().await;

    assert_ok!(ctx.press(USER_A, "create_ticket").await.1);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::AwaitingTitle);

    assert_ok!(ctx.text(USER_A, "Printer broken").await);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::AwaitingDescription);

    assert_ok!(ctx.text(USER_A, "Won't turn on").await);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::ConfirmPending);
    let prompt = ctx.messenger.last_to(USER_A).unwrap();
    assert!(prompt.text().contains("Printer broken"));
    assert!(prompt.text().contains("Won't turn on"));
    assert_eq!(prompt.tokens(), vec!["confirm_ticket", "cancel_ticket"]);
    assert_eq!(ctx.repository.ticket_count().await, 0);

    assert_ok!(ctx.press(USER_A, "confirm_ticket").await.1);

    let tickets = ctx.repository.list_tickets_by_user(USER_A).await.unwrap();
    assert_eq!(tickets.len(), 1);
    let ticket = &tickets[0];
    assert_eq!(ticket.id, 1);
    assert_eq!(ticket.title, "Printer broken");
    assert_eq!(ticket.description, "Won't turn on");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.priority, "normal");
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::None);

    for admin in [ADMIN_A, ADMIN_B, ADMIN_C] {
        let notices = ctx.messenger.sent_to(admin);
        assert_eq!(notices.len(), 1, "admin {} should get exactly one notice", admin);
        assert!(notices[0].text().contains("Ticket ID: 1"));
        assert!(notices[0].text().contains("Printer broken"));
        assert_eq!(notices[0].tokens(), vec!["assign_ticket_1"]);
    }

    // Creator sees the confirmation, then the fresh ticket view
    let creator = ctx.messenger.sent_to(USER_A);
    let view_message = creator.last().unwrap();
    assert!(view_message.text().starts_with("Ticket #1\nTitle: Printer broken"));
    assert_eq!(view_message.tokens(), vec!["add_comment_1", "close_ticket_1", "view_tickets"]);
    assert!(ctx.messenger.texts_to(USER_A).contains(&view::ticket_created(1)));
}

#[tokio::test]
async fn test_ticket_ids_follow_the_sequence() {
    let ctx = TestContext::new().await;
    let first = ctx.create_ticket(USER_A, "One", "first").await;
    let second = ctx.create_ticket(USER_B, "Two", "second").await;
    let third = ctx.create_ticket(USER_A, "Three", "third").await;
    assert_eq!((first.id, second.id, third.id), (1, 2, 3));
}

#[tokio::test]
async fn test_cancel_discards_draft() {
    let ctx = TestContext::new().await;
    ctx.press(USER_A, "create_ticket").await.1.unwrap();
    ctx.text(USER_A, "Printer broken").await.unwrap();
    ctx.text(USER_A, "Won't turn on").await.unwrap();

    assert_ok!(ctx.press(USER_A, "cancel_ticket").await.1);

    assert_eq!(ctx.repository.ticket_count().await, 0);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::None);
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::CREATION_CANCELLED);
    for admin in [ADMIN_A, ADMIN_B, ADMIN_C] {
        assert!(ctx.messenger.sent_to(admin).is_empty());
    }

    // A later confirm has nothing to create
    let (_, result) = ctx.press(USER_A, "confirm_ticket").await;
    assert_matches!(result, Err(TicketDeskError::InvalidStateTransition { .. }));
    assert_eq!(ctx.repository.ticket_count().await, 0);
}

#[tokio::test]
async fn test_cancel_command_mid_flow() {
    let ctx = TestContext::new().await;
    ctx.command(USER_A, "newticket").await.unwrap();
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::TITLE_PROMPT);

    ctx.command(USER_A, "cancel").await.unwrap();
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::CANCELLED);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::None);

    ctx.command(USER_A, "cancel").await.unwrap();
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::NOTHING_TO_CANCEL);
}

#[tokio::test]
async fn test_free_text_when_idle_points_to_help() {
    let ctx = TestContext::new().await;
    assert_ok!(ctx.text(USER_A, "hello?").await);

    assert_eq!(ctx.messenger.texts_to(USER_A), vec![view::UNRECOGNIZED_TEXT.to_string()]);
    assert_eq!(ctx.repository.ticket_count().await, 0);
    assert_eq!(ctx.repository.user_count().await, 0);
}

#[tokio::test]
async fn test_new_flow_overwrites_pending_comment() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "Printer broken", "Won't turn on").await;

    ctx.press(USER_A, &format!("add_comment_{}", ticket.id)).await.1.unwrap();
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::AwaitingComment);

    // Last flow wins: the pending comment is dropped silently
    ctx.press(USER_A, "create_ticket").await.1.unwrap();
    let context = ctx.workflow.state().load(USER_A).await.unwrap();
    assert_eq!(context.phase, ConversationPhase::AwaitingTitle);
    assert_eq!(context.pending_ticket_id, None);

    ctx.text(USER_A, "Scanner too").await.unwrap();
    assert!(ctx.repository.list_comments(ticket.id).await.unwrap().is_empty());
    let context = ctx.workflow.state().load(USER_A).await.unwrap();
    assert_eq!(context.draft.title.as_deref(), Some("Scanner too"));
}

#[tokio::test]
async fn test_overlong_title_keeps_phase() {
    let settings = TicketsConfig {
        max_title_length: 10,
        ..TicketsConfig::default()
    };
    let ctx = TestContext::with_settings(settings).await;
    ctx.press(USER_A, "create_ticket").await.1.unwrap();

    ctx.text(USER_A, "This title is far too long").await.unwrap();
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::AwaitingTitle);
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::text_too_long("title", 10));

    ctx.text(USER_A, "Short").await.unwrap();
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::AwaitingDescription);
}

#[tokio::test]
async fn test_text_while_confirming_repeats_prompt() {
    let ctx = TestContext::new().await;
    ctx.press(USER_A, "create_ticket").await.1.unwrap();
    ctx.text(USER_A, "Printer broken").await.unwrap();
    ctx.text(USER_A, "Won't turn on").await.unwrap();
    ctx.messenger.clear();

    ctx.text(USER_A, "did it work?").await.unwrap();

    let sent = ctx.messenger.sent_to(USER_A);
    assert_eq!(sent[0].text(), view::CONFIRM_HINT);
    assert_matches!(&sent[1], Sent::WithActions { .. });
    assert_eq!(sent[1].tokens(), vec!["confirm_ticket", "cancel_ticket"]);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::ConfirmPending);
}

#[tokio::test]
async fn test_same_chat_events_do_not_interleave() {
    let ctx = TestContext::new().await;
    ctx.press(USER_A, "create_ticket").await.1.unwrap();

    let first = {
        let workflow = ctx.workflow.clone();
        tokio::spawn(async move {
            workflow
                .handle_event(TestContext::event(USER_A, TicketDesk::messenger::EventKind::FreeText("one".into())))
                .await
        })
    };
    let second = {
        let workflow = ctx.workflow.clone();
        tokio::spawn(async move {
            workflow
                .handle_event(TestContext::event(USER_A, TicketDesk::messenger::EventKind::FreeText("two".into())))
                .await
        })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let context = ctx.workflow.state().load(USER_A).await.unwrap();
    assert_eq!(context.phase, ConversationPhase::ConfirmPending);
    let mut parts = vec![context.draft.title.unwrap(), context.draft.description.unwrap()];
    parts.sort();
    assert_eq!(parts, vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test]
async fn test_unreachable_admin_does_not_block_creation() {
    let ctx = TestContext::new().await;
    ctx.messenger.fail_for(ADMIN_B);

    let ticket = ctx.create_ticket(USER_A, "Printer broken", "Won't turn on").await;

    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ctx.messenger.sent_to(ADMIN_A).len(), 1);
    assert_eq!(ctx.messenger.sent_to(ADMIN_C).len(), 1);
    assert!(ctx.messenger.sent_to(ADMIN_B).is_empty());
    assert!(ctx.messenger.texts_to(USER_A).contains(&view::ticket_created(ticket.id)));
}
