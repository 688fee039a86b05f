//! Comment and reply flow tests

use tokio_test::assert_ok;
use TicketDesk::database::Repository;
use TicketDesk::models::{CommentAuthor, CreateTicketRequest, TicketStatus};
use TicketDesk::services::view;
use TicketDesk::state::ConversationPhase;

use crate::helpers::{CapturedLogs, TestContext, ADMIN_A, ADMIN_B, ADMIN_C, USER_A, USER_B};

fn filler(n: usize) -> CreateTicketRequest {
    CreateTicketRequest {
        title: format!("Filler {}", n),
        description: "padding".to_string(),
        priority: "normal".to_string(),
    }
}

#[tokio::test]
async fn test_staff_reply_notifies_only_the_creator() {
    let ctx = TestContext::new().await;
    for n in 1..=41 {
        ctx.repository.create_ticket(USER_B, filler(n)).await.unwrap();
    }
    let ticket = ctx.create_ticket(USER_A, "Printer broken", "Won't turn on").await;
    assert_eq!(ticket.id, 42);
    ctx.messenger.clear();

    assert_ok!(ctx.press(ADMIN_B, "reply_ticket_42").await.1);
    assert_eq!(ctx.messenger.last_to(ADMIN_B).unwrap().text(), view::REPLY_PROMPT);
    assert_ok!(ctx.text(ADMIN_B, "A technician is on the way").await);

    let to_creator = ctx.messenger.sent_to(USER_A);
    assert_eq!(to_creator.len(), 1);
    assert_eq!(
        to_creator[0].text(),
        view::staff_reply_notice(42, "A technician is on the way")
    );
    assert!(ctx.messenger.sent_to(ADMIN_C).is_empty());
    assert!(ctx.messenger.sent_to(ADMIN_A).is_empty());

    let comments = ctx.repository.list_comments(42).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, CommentAuthor::Admin(ctx.admin(ADMIN_B).id));
    assert_eq!(ctx.workflow.state().get(ADMIN_B).await, ConversationPhase::None);

    // The replying admin sees the refreshed transcript
    let refreshed = ctx.messenger.last_to(ADMIN_B).unwrap();
    assert!(refreshed.text().contains("[Staff] Bob Admin"));
    assert!(refreshed.text().contains("Engineer"));
    assert_eq!(
        refreshed.tokens(),
        vec!["reply_ticket_42", "close_ticket_42", "assign_ticket_42", "view_all_tickets"]
    );
}

#[tokio::test]
async fn test_user_comment_without_assignee_notifies_nobody() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;
    ctx.messenger.clear();

    ctx.press(USER_A, &format!("add_comment_{}", ticket.id)).await.1.unwrap();
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::COMMENT_PROMPT);
    assert_ok!(ctx.text(USER_A, "Still dropping").await);

    for admin in [ADMIN_A, ADMIN_B, ADMIN_C] {
        assert!(ctx.messenger.sent_to(admin).is_empty());
    }
    let comments = ctx.repository.list_comments(ticket.id).await.unwrap();
    let user = ctx.repository.find_user_by_identity(USER_A).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, CommentAuthor::User(user.id));

    let refreshed = ctx.messenger.last_to(USER_A).unwrap();
    assert!(refreshed.text().contains("User comment"));
    assert!(refreshed.text().contains("Still dropping"));
}

#[tokio::test]
async fn test_user_comment_notifies_the_assignee_only() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;
    let carol = ctx.admin(ADMIN_C).id;
    ctx.press(ADMIN_A, &format!("assign_to_{}_{}", ticket.id, carol)).await.1.unwrap();
    ctx.messenger.clear();

    ctx.press(USER_A, &format!("add_comment_{}", ticket.id)).await.1.unwrap();
    ctx.text(USER_A, "Still dropping").await.unwrap();

    assert_eq!(
        ctx.messenger.texts_to(ADMIN_C),
        vec![view::user_comment_notice(ticket.id, "Still dropping")]
    );
    assert!(ctx.messenger.sent_to(ADMIN_A).is_empty());
    assert!(ctx.messenger.sent_to(ADMIN_B).is_empty());
}

#[tokio::test]
async fn test_unreachable_creator_does_not_fail_the_reply() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "Printer broken", "Won't turn on").await;
    ctx.messenger.fail_for(USER_A);

    ctx.press(ADMIN_A, &format!("reply_ticket_{}", ticket.id)).await.1.unwrap();
    assert_ok!(ctx.text(ADMIN_A, "Rebooted it remotely").await);

    assert_eq!(ctx.repository.list_comments(ticket.id).await.unwrap().len(), 1);
    assert!(ctx.messenger.last_to(ADMIN_A).unwrap().text().contains("Rebooted it remotely"));
}

#[tokio::test]
async fn test_comment_on_ticket_closed_meanwhile_is_rejected() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;

    ctx.press(USER_A, &format!("add_comment_{}", ticket.id)).await.1.unwrap();
    ctx.press(ADMIN_A, &format!("close_ticket_{}", ticket.id)).await.1.unwrap();

    assert_ok!(ctx.text(USER_A, "Anyone there?").await);
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::TICKET_IS_CLOSED);
    assert!(ctx.repository.list_comments(ticket.id).await.unwrap().is_empty());
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::None);
}

#[tokio::test]
async fn test_comment_button_on_closed_ticket_starts_nothing() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;
    ctx.repository.close_ticket(ticket.id).await.unwrap();

    ctx.press(USER_A, &format!("add_comment_{}", ticket.id)).await.1.unwrap();
    assert_eq!(ctx.messenger.last_to(USER_A).unwrap().text(), view::TICKET_IS_CLOSED);
    assert_eq!(ctx.workflow.state().get(USER_A).await, ConversationPhase::None);
}

#[tokio::test]
async fn test_stored_comments_have_exactly_one_author() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;
    for (identity, token, text) in [
        (USER_A, "add_comment", "first"),
        (ADMIN_B, "reply_ticket", "second"),
        (USER_A, "add_comment", "third"),
        (ADMIN_A, "reply_ticket", "fourth"),
    ] {
        ctx.press(identity, &format!("{}_{}", token, ticket.id)).await.1.unwrap();
        ctx.text(identity, text).await.unwrap();
    }

    let comments = ctx.repository.all_comments().await;
    assert_eq!(comments.len(), 4);
    for comment in &comments {
        assert!(comment.author.user_id().is_some() != comment.author.admin_id().is_some());
    }
    let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third", "fourth"]);
}

#[tokio::test]
async fn test_comment_after_concurrent_close_is_not_stored() {
    let (ctx, closing) = TestContext::with_closing_repository().await;

    for (identity, token) in [(USER_A, "add_comment"), (ADMIN_B, "reply_ticket")] {
        let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;
        ctx.press(identity, &format!("{}_{}", token, ticket.id)).await.1.unwrap();
        assert_eq!(ctx.workflow.state().get(identity).await, ConversationPhase::AwaitingComment);

        // Another chat closes the ticket after the workflow has read it as open
        closing.close_after_next_read();
        assert_ok!(ctx.text(identity, "Any update?").await);

        assert_eq!(ctx.messenger.last_to(identity).unwrap().text(), view::TICKET_IS_CLOSED);
        assert_eq!(ctx.workflow.state().get(identity).await, ConversationPhase::None);
        assert!(ctx.repository.list_comments(ticket.id).await.unwrap().is_empty());
        assert_eq!(ctx.repository.get_ticket(ticket.id).await.unwrap().status, TicketStatus::Closed);
    }
}

#[tokio::test]
async fn test_failed_reply_notice_is_logged_against_the_creator_identity() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "Printer broken", "Won't turn on").await;
    ctx.messenger.fail_for(USER_A);
    ctx.press(ADMIN_A, &format!("reply_ticket_{}", ticket.id)).await.1.unwrap();

    let logs = CapturedLogs::default();
    let _guard = logs.install();
    ctx.text(ADMIN_A, "Rebooted it remotely").await.unwrap();

    let lines = logs.lines_with("Notification could not be delivered");
    assert_eq!(lines.len(), 1, "logs: {}", logs.contents());
    assert!(lines[0].contains(&format!("recipient={}", USER_A)));
    assert!(lines[0].contains("staff reply"));
}

#[tokio::test]
async fn test_failed_comment_notice_is_logged_against_the_assignee_identity() {
    let ctx = TestContext::new().await;
    let ticket = ctx.create_ticket(USER_A, "VPN", "Drops every hour").await;
    let carol = ctx.admin(ADMIN_C).id;
    ctx.press(ADMIN_A, &format!("assign_to_{}_{}", ticket.id, carol)).await.1.unwrap();
    ctx.messenger.fail_for(ADMIN_C);
    ctx.press(USER_A, &format!("add_comment_{}", ticket.id)).await.1.unwrap();

    let logs = CapturedLogs::default();
    let _guard = logs.install();
    assert_ok!(ctx.text(USER_A, "Still dropping").await);

    let lines = logs.lines_with("Notification could not be delivered");
    assert_eq!(lines.len(), 1, "logs: {}", logs.contents());
    assert!(lines[0].contains(&format!("recipient={}", ADMIN_C)));
    assert_eq!(ctx.repository.list_comments(ticket.id).await.unwrap().len(), 1);
}
