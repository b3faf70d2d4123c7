mod common;

use clap::Parser;
use cms_admin::cli::{self, Cli};
use cms_admin::notify::ToastQueue;
use cms_admin::AdminError;
use common::TestServer;
use pretty_assertions::assert_eq;
use serde_json::json;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("cms-admin").chain(args.iter().copied())).unwrap()
}

#[tokio::test]
async fn test_delete_with_yes_skips_the_prompt() {
    let server = TestServer::start().await;
    let keep = server
        .backend
        .seed("faqs", json!({ "question": "Keep me?", "answer": "Yes." }));
    let doomed = server
        .backend
        .seed("faqs", json!({ "question": "Remove me?", "answer": "Fine." }));
    let ctx = server.context(&ToastQueue::new());

    let id = doomed.to_string();
    cli::run(parse(&["delete", "faqs", &id, "--yes"]), &ctx)
        .await
        .unwrap();

    let remaining: Vec<_> = server
        .backend
        .records("faqs")
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(remaining, vec![json!(keep)]);
}

#[tokio::test]
async fn test_update_of_missing_singleton_asks_for_create() {
    let server = TestServer::start().await;
    let ctx = server.context(&ToastQueue::new());

    let err = cli::run(parse(&["update", "hero", "--set", "heading=New heading"]), &ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Unsupported(msg) if msg.contains("create")));
    assert!(server.backend.singleton("hero").is_none());
}
