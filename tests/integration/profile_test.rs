//! Help menu, unknown commands and profile card tests

use assert_matches::assert_matches;
use TicketDesk::database::Repository;
use TicketDesk::messenger::EventKind;
use TicketDesk::services::view;

use crate::helpers::{Sent, TestContext, ADMIN_A, USER_A};

#[tokio::test]
async fn test_help_menu_depends_on_role() {
    let ctx = TestContext::new().await;

    ctx.command(USER_A, "start").await.unwrap();
    ctx.command(ADMIN_A, "help").await.unwrap();

    let user_menu = ctx.messenger.last_to(USER_A).unwrap();
    assert_eq!(user_menu.text(), view::HELP_TEXT);
    assert_eq!(user_menu.tokens(), vec!["create_ticket", "view_tickets", "get_info"]);

    let admin_menu = ctx.messenger.last_to(ADMIN_A).unwrap();
    assert_eq!(
        admin_menu.tokens(),
        vec!["create_ticket", "view_tickets", "get_info", "view_all_tickets"]
    );
}

#[tokio::test]
async fn test_unknown_command() {
    let ctx = TestContext::new().await;
    ctx.command(USER_A, "frobnicate").await.unwrap();
    assert_eq!(ctx.messenger.texts_to(USER_A), vec![view::UNKNOWN_COMMAND_TEXT.to_string()]);
}

#[tokio::test]
async fn test_profile_card_registers_user_lazily() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.repository.user_count().await, 0);

    ctx.command(USER_A, "getme").await.unwrap();
    assert_eq!(ctx.repository.user_count().await, 1);
    let user = ctx.repository.find_user_by_identity(USER_A).await.unwrap();
    assert_eq!(user.user_group, "Default");

    let card = ctx.messenger.last_to(USER_A).unwrap();
    assert_matches!(card, Sent::Text { .. });
    assert!(card.text().contains(&format!("User ID: {}", user.id)));
    assert!(card.text().contains(&format!("Full name: User{}", USER_A)));
    assert!(card.text().contains("Username: not set"));
    assert!(card.text().contains(&format!("Telegram ID: {}", USER_A)));

    // Asking again reuses the same record
    ctx.press(USER_A, "get_info").await.1.unwrap();
    assert_eq!(ctx.repository.user_count().await, 1);
}

#[tokio::test]
async fn test_profile_card_with_photo_and_username() {
    let ctx = TestContext::new().await;
    ctx.messenger.set_photo(USER_A, "photo-file-id");

    let mut event = TestContext::event(USER_A, EventKind::Command("getme".to_string()));
    event.sender.last_name = Some("Doe".to_string());
    event.sender.username = Some("jdoe".to_string());
    ctx.workflow.handle_event(event).await.unwrap();

    match ctx.messenger.last_to(USER_A).unwrap() {
        Sent::Image { image_ref, caption, .. } => {
            assert_eq!(image_ref, "photo-file-id");
            assert!(caption.contains(&format!("Full name: User{} Doe", USER_A)));
            assert!(caption.contains("Username: @jdoe"));
        }
        other => panic!("expected an image, got {:?}", other),
    }
}
