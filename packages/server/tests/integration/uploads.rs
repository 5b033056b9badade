use sea_orm::EntityTrait;
use serde_json::json;

use docuexpiry::entity::document;

use crate::common::{TestApp, routes};

async fn issue_token(app: &TestApp, token: &str, document_id: i32) -> serde_json::Value {
    let res = app
        .post_with_token(
            routes::UPLOAD_TOKEN,
            &json!({
                "documentId": document_id,
                "fileName": "policy.pdf",
                "fileSize": 2048,
            }),
            token,
        )
        .await;
    assert_eq!(res.status, 200, "upload token failed: {}", res.text);
    res.body
}

mod upload_token {
    use super::*;

    #[tokio::test]
    async fn issues_presigned_url_for_own_document() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;

        let body = issue_token(&app, &token, id).await;

        let pathname = body["pathname"].as_str().unwrap();
        assert!(pathname.starts_with(&format!("documents/{id}/")));
        assert!(pathname.ends_with("-policy.pdf"));
        assert!(
            body["uploadUrl"]
                .as_str()
                .unwrap()
                .starts_with(&format!("https://uploads.test/{pathname}"))
        );
        assert!(body["callbackToken"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(
            body["uploadHeaders"],
            json!({"content-length": "2048", "content-type": "application/pdf"})
        );
        assert_eq!(body["maximumSizeInBytes"], 1024 * 1024);
        assert!(
            body["allowedContentTypes"]
                .as_array()
                .unwrap()
                .contains(&json!("application/pdf"))
        );
        assert!(body["expiresAt"].is_string());
    }

    #[tokio::test]
    async fn each_token_gets_a_distinct_object_key() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;

        let first = issue_token(&app, &token, id).await;
        let second = issue_token(&app, &token, id).await;

        assert_ne!(first["pathname"], second["pathname"]);
    }

    #[tokio::test]
    async fn other_users_document_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");
        let id = app.create_named(&alice, "Policy", 100).await;

        let res = app
            .post_with_token(
                routes::UPLOAD_TOKEN,
                &json!({"documentId": id, "fileName": "policy.pdf"}),
                &bob,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn rejects_bad_file_metadata() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;

        let cases = [
            json!({"documentId": id, "fileName": "../etc/passwd"}),
            json!({"documentId": id, "fileName": ".hidden.pdf"}),
            json!({"documentId": id, "fileName": "   "}),
            json!({"documentId": id, "fileName": "script.sh"}),
            json!({"documentId": id, "fileName": "scan.pdf", "contentType": "text/html"}),
            json!({"documentId": id, "fileName": "scan.pdf", "fileSize": 0}),
            json!({"documentId": id, "fileName": "scan.pdf", "fileSize": 1024 * 1024 + 1}),
        ];
        for body in cases {
            let res = app.post_with_token(routes::UPLOAD_TOKEN, &body, &token).await;
            assert_eq!(res.status, 400, "expected 400 for {body}: {}", res.text);
            assert_eq!(res.code(), "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn content_type_is_guessed_from_extension() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "ID card", 100).await;

        let res = app
            .post_with_token(
                routes::UPLOAD_TOKEN,
                &json!({"documentId": id, "fileName": "front.JPG"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            res.body["uploadHeaders"],
            json!({"content-type": "image/jpeg"})
        );
    }
}

mod upload_completion {
    use super::*;

    #[tokio::test]
    async fn valid_callback_attaches_file() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;
        let issued = issue_token(&app, &token, id).await;
        let pathname = issued["pathname"].as_str().unwrap();

        let res = app
            .post_without_token(
                routes::UPLOAD_COMPLETE,
                &json!({
                    "url": format!("https://files.example/{pathname}"),
                    "pathname": pathname,
                    "tokenPayload": issued["callbackToken"],
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["updated"], true);

        let doc = document::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            doc.file_url.as_deref(),
            Some(format!("https://files.example/{pathname}").as_str())
        );
        assert_eq!(doc.file_pathname.as_deref(), Some(pathname));
        assert_eq!(doc.file_name.as_deref(), Some("policy.pdf"));
        assert_eq!(doc.file_size, Some(2048));
        assert_eq!(doc.file_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn empty_url_falls_back_to_object_url() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;
        let issued = issue_token(&app, &token, id).await;
        let pathname = issued["pathname"].as_str().unwrap();

        let res = app
            .post_without_token(
                routes::UPLOAD_COMPLETE,
                &json!({"pathname": pathname, "tokenPayload": issued["callbackToken"]}),
            )
            .await;
        assert_eq!(res.body["updated"], true, "{}", res.text);

        let doc = document::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            doc.file_url.as_deref(),
            Some(format!("https://cdn.test/{pathname}").as_str())
        );
    }

    #[tokio::test]
    async fn missing_or_forged_token_changes_nothing() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;
        let issued = issue_token(&app, &token, id).await;
        let pathname = issued["pathname"].as_str().unwrap();

        for payload in [
            json!(null),
            json!(""),
            json!("forged.token.value"),
            json!(token),
        ] {
            let res = app
                .post_without_token(
                    routes::UPLOAD_COMPLETE,
                    &json!({
                        "url": "https://files.example/x",
                        "pathname": pathname,
                        "tokenPayload": payload,
                    }),
                )
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
            assert_eq!(res.body["updated"], false);
        }

        let doc = document::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.file_url, None);
    }

    #[tokio::test]
    async fn different_pathname_is_ignored() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;
        let issued = issue_token(&app, &token, id).await;

        let res = app
            .post_without_token(
                routes::UPLOAD_COMPLETE,
                &json!({
                    "url": "https://files.example/documents/1/other.pdf",
                    "pathname": "documents/1/other.pdf",
                    "tokenPayload": issued["callbackToken"],
                }),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["updated"], false);
    }

    #[tokio::test]
    async fn deleted_document_is_not_updated() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");
        let id = app.create_named(&token, "Policy", 100).await;
        let issued = issue_token(&app, &token, id).await;
        let pathname = issued["pathname"].as_str().unwrap();

        let res = app.delete_with_token(&routes::document(id), &token).await;
        assert_eq!(res.status, 204);

        let res = app
            .post_without_token(
                routes::UPLOAD_COMPLETE,
                &json!({
                    "url": "https://files.example/x",
                    "pathname": pathname,
                    "tokenPayload": issued["callbackToken"],
                }),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["updated"], false);
    }
}
