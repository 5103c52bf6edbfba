//! Integration tests for `SendGridMailer` using wiremock HTTP mocks.

use adsreport_notify::{summary_message, NotifyError, ReportLink, SendGridMailer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_mailer(base_url: &str) -> SendGridMailer {
    SendGridMailer::with_base_url(
        Some("SG.test"),
        "reports@example.com",
        "Weekly Reports",
        30,
        "adsreport-test",
        base_url,
    )
    .expect("mailer construction should not fail")
}

fn message() -> adsreport_notify::Message {
    summary_message(
        "owner@example.com",
        Some("archive@example.com"),
        "January 4, 2026 \u{2013} January 10, 2026",
        "https://reports.example.com/",
        &[ReportLink {
            name: "Acme".into(),
            url: "https://reports.example.com/acme-jan4-10/".into(),
        }],
        "Weekly Reports",
    )
}

#[tokio::test]
async fn send_posts_plain_text_mail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer SG.test"))
        .and(body_partial_json(json!({
            "personalizations": [{
                "to": [{ "email": "owner@example.com" }],
                "bcc": [{ "email": "archive@example.com" }]
            }],
            "from": { "email": "reports@example.com", "name": "Weekly Reports" },
            "subject": "Weekly Google Ads Reports Ready - January 4, 2026 \u{2013} January 10, 2026"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    test_mailer(&server.uri()).send(&message()).await.unwrap();
}

#[tokio::test]
async fn rejected_mail_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"errors": [{"message": "invalid api key"}]})),
        )
        .mount(&server)
        .await;

    let err = test_mailer(&server.uri()).send(&message()).await.unwrap_err();
    match err {
        NotifyError::UnexpectedStatus { status, url, body } => {
            assert_eq!(status, 401);
            assert!(url.ends_with("/v3/mail/send"), "{url}");
            assert!(body.contains("invalid api key"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}
