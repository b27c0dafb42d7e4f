use super::*;
use crate::web::http::tests::ScriptedTransport;
use producer_point_shared::protocol::HttpMethod;

fn api(transport: &ScriptedTransport) -> ProducerPointApi<ScriptedTransport> {
    ProducerPointApi::new("http://api.test/", transport.clone())
}

fn link() -> RecoveryLink {
    RecoveryLink {
        mail: "ana@example.com".into(),
        time: "1700000000000".into(),
        token: "t0k".into(),
    }
}

#[tokio::test]
async fn test_sign_in_posts_credentials_and_decodes_session() {
    let transport = ScriptedTransport::new().respond(
        200,
        r#"{"token":"jwt-1","user":{"id":3,"name":"Ana","email":"ana@example.com"}}"#,
    );

    let res = api(&transport)
        .sign_in(Credentials {
            email: "ana@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(res.token, "jwt-1");
    assert_eq!(res.user.id.as_str(), "3");

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.url, "http://api.test/auth/signin");
    assert_eq!(sent.method, HttpMethod::Post);
    assert_eq!(sent.header("Content-Type"), Some("application/json"));
    assert_eq!(sent.header("Authorization"), None);
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"email": "ana@example.com", "password": "pw"})
    );
}

#[tokio::test]
async fn test_non_200_is_failure_even_when_2xx() {
    let transport = ScriptedTransport::new()
        .respond(204, "")
        .respond(401, "unauthorized");

    let api = api(&transport);
    assert_eq!(
        api.send_email_recovery("a@b.com").await,
        Err(ApiError::Status(204))
    );

    let err = api.validate_link(&link()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_status_only_endpoints_accept_any_body() {
    let transport = ScriptedTransport::new()
        .respond(200, "")
        .respond(200, r#"{"message":"ok"}"#)
        .respond(200, "true");

    let api = api(&transport);
    assert_eq!(api.send_email_recovery("a@b.com").await, Ok(()));
    assert_eq!(api.validate_link(&link()).await, Ok(()));
    assert_eq!(api.set_new_password(&link(), "n3w-pass").await, Ok(()));

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.url, "http://api.test/auth/recovery/password");
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    let transport = ScriptedTransport::new().fail("connection refused");

    let err = api(&transport).current_user().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Transport(HttpError::NetworkError(_))
    ));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_token_is_sent_as_bearer_and_get_has_no_body() {
    let transport = ScriptedTransport::new()
        .respond(200, r#"[{"value":1,"label":"Mel"}]"#);

    let list = api(&transport)
        .with_token("jwt-9")
        .list(EntityKind::Product)
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].label, "Mel");

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.url, "http://api.test/products");
    assert_eq!(sent.method, HttpMethod::Get);
    assert_eq!(sent.header("Authorization"), Some("Bearer jwt-9"));
    assert_eq!(sent.body, None);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let transport = ScriptedTransport::new().respond(200, "<html>");

    let err = api(&transport).list(EntityKind::Activity).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_delete_sends_target_in_body() {
    let transport = ScriptedTransport::new().respond(200, "");

    api(&transport)
        .with_token("jwt")
        .delete(EntityKind::Producer, EntityId::new("42"))
        .await
        .unwrap();

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.method, HttpMethod::Delete);
    assert_eq!(sent.url, "http://api.test/producers");
    assert_eq!(sent.body.as_deref(), Some(r#"{"value":"42"}"#));
}
