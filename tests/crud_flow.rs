mod common;

use chrono::{Duration, Utc};
use cms_admin::models::{
    BannerResource, CreateBanner, FaqResource, ListPage, UpdateFaq, Upload,
};
use cms_admin::notify::ToastQueue;
use cms_admin::query::keys;
use cms_admin::AdminError;
use common::TestServer;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn png(name: &str) -> Upload {
    Upload::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

#[tokio::test]
async fn test_banner_with_image_is_sent_as_multipart() {
    let server = TestServer::start().await;
    let toasts = ToastQueue::new();
    let ctx = server.context(&toasts);
    let module = ctx.module::<BannerResource>();

    let form = CreateBanner {
        title: Some("Summer sale".into()),
        subtitle: Some("Up to 50% off".into()),
        image: Some(png("summer.png")),
        expires_at: Some(Utc::now() + Duration::days(7)),
        ..Default::default()
    };
    let banner = assert_ok!(module.create(form).await);

    assert_eq!(banner.title, "Summer sale");
    assert_eq!(banner.image, "/uploads/summer.png");
    assert!(banner.is_active);

    let stored = server.backend.records("banners");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["subtitle"], json!("Up to 50% off"));
    assert_eq!(toasts.successes()[0].message, "Banner created successfully");
}

#[tokio::test]
async fn test_past_expiration_is_rejected_without_a_request() {
    let server = TestServer::start().await;
    let toasts = ToastQueue::new();
    let ctx = server.context(&toasts);
    let module = ctx.module::<BannerResource>();

    let form = CreateBanner {
        title: Some("Old news".into()),
        image: Some(png("old.png")),
        expires_at: Some(Utc::now() - Duration::days(1)),
        ..Default::default()
    };
    let err = assert_err!(module.create(form).await);

    match err {
        AdminError::Validation(errors) => {
            assert!(errors.has_code("expiresAt", "future_date_required"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(server.backend.requests(), 0);
    assert!(toasts.is_empty());
}

#[tokio::test]
async fn test_concurrent_list_fetches_share_one_request() {
    let server = TestServer::start().await;
    server.backend.seed("faqs", json!({ "question": "What is it?", "answer": "A CMS." }));
    let ctx = server.context(&ToastQueue::new());
    let module = ctx.module::<FaqResource>();

    let (a, b) = tokio::join!(module.fetch_list(), module.fetch_list());
    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    assert_eq!(server.backend.requests(), 1);

    // Served from cache while fresh
    module.fetch_list().await.unwrap();
    assert_eq!(server.backend.requests(), 1);
}

#[tokio::test]
async fn test_toggle_flips_the_flag_and_invalidates_cached_queries() {
    let server = TestServer::start().await;
    let id = server
        .backend
        .seed("faqs", json!({ "question": "Is it live?", "answer": "It is." }));
    let ctx = server.context(&ToastQueue::new());
    let module = ctx.module::<FaqResource>();

    let before = module.fetch_detail(id).await.unwrap();
    module.fetch_admin(None).await.unwrap();
    assert!(before.is_active);
    assert!(!ctx.queries.is_stale(&keys::detail::<FaqResource>(id)).await);

    let toggled = module.toggle(id).await.unwrap();
    assert!(!toggled.is_active);
    assert!(ctx.queries.is_stale(&keys::detail::<FaqResource>(id)).await);
    assert!(ctx.queries.is_stale(&keys::admin::<FaqResource>(None)).await);

    let after = module.fetch_detail(id).await.unwrap();
    assert!(!after.is_active);
}

#[tokio::test]
async fn test_update_sends_only_defined_fields() {
    let server = TestServer::start().await;
    let id = server
        .backend
        .seed("faqs", json!({ "question": "Old question?", "answer": "Kept answer" }));
    let ctx = server.context(&ToastQueue::new());
    let module = ctx.module::<FaqResource>();

    let draft = UpdateFaq {
        question: Some("New question?".into()),
        ..Default::default()
    };
    let faq = module.update(id, draft).await.unwrap();

    assert_eq!(faq.question, "New question?");
    assert_eq!(faq.answer, "Kept answer");
}

#[tokio::test]
async fn test_server_message_is_shown_in_error_toast() {
    let server = TestServer::start().await;
    let toasts = ToastQueue::new();
    let ctx = server.context(&toasts);
    let module = ctx.module::<BannerResource>();

    // The mock answers 409 for this title.
    let form = CreateBanner {
        title: Some("duplicate".into()),
        image: Some(png("dup.png")),
        expires_at: Some(Utc::now() + Duration::days(1)),
        ..Default::default()
    };
    let err = module.create(form).await.unwrap_err();

    assert_eq!(
        err,
        AdminError::Http {
            status: 409,
            message: "Title already exists".into()
        }
    );
    assert_eq!(toasts.errors()[0].message, "Title already exists");
    assert!(toasts.successes().is_empty());
    assert!(server.backend.records("banners").is_empty());
}

#[tokio::test]
async fn test_reorder_assigns_positions_in_order() {
    let server = TestServer::start().await;
    let first = server.backend.seed("faqs", json!({ "question": "First?", "answer": "One." }));
    let second = server.backend.seed("faqs", json!({ "question": "Second?", "answer": "Two." }));
    let third = server.backend.seed("faqs", json!({ "question": "Third?", "answer": "Three." }));
    let ctx = server.context(&ToastQueue::new());
    let module = ctx.module::<FaqResource>();

    module.reorder(&[third, first, second]).await.unwrap();

    let listed = match module.fetch_admin(None).await.unwrap() {
        ListPage::Plain(items) => items,
        ListPage::Paged(_) => panic!("faq admin list is not paginated"),
    };
    let ids: Vec<_> = listed.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![third, first, second]);
}

#[tokio::test]
async fn test_unsupported_operation_never_reaches_the_server() {
    let server = TestServer::start().await;
    let ctx = server.context(&ToastQueue::new());
    let module = ctx.module::<BannerResource>();

    let err = module.reorder(&[uuid::Uuid::new_v4()]).await.unwrap_err();
    assert!(matches!(err, AdminError::Unsupported(_)));
    assert_eq!(server.backend.requests(), 0);
}
