use chrono::{Duration, Utc};
use sea_orm::EntityTrait;
use serde_json::json;

use docuexpiry::entity::user;
use docuexpiry::utils::jwt::{self, UPLOAD_AUDIENCE, UploadClaims};

use crate::common::{TestApp, routes, sign_session};

mod session_validation {
    use super::*;

    #[tokio::test]
    async fn missing_header_is_token_missing() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::DOCUMENTS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_token_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::DOCUMENTS, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn expired_session_is_token_invalid() {
        let app = TestApp::spawn().await;
        let token = sign_session("alice", Duration::hours(-2));

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn upload_token_cannot_be_used_as_session() {
        let app = TestApp::spawn().await;
        let claims = UploadClaims {
            aud: UPLOAD_AUDIENCE.into(),
            uid: "alice".into(),
            document_id: 1,
            pathname: "documents/1/x-file.pdf".into(),
            file_name: None,
            file_size: None,
            file_type: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = jwt::sign(&claims, crate::common::JWT_SECRET).unwrap();

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn every_user_endpoint_requires_a_session() {
        let app = TestApp::spawn().await;

        for path in [
            routes::ME,
            routes::DOCUMENTS,
            routes::CATEGORIES,
            routes::TAGS,
            routes::DASHBOARD_SUMMARY,
            routes::DASHBOARD_EXPIRING,
            routes::DASHBOARD_RECENT,
        ] {
            let res = app.get_without_token(path).await;
            assert_eq!(res.status, 401, "{path} should require auth");
        }

        let res = app
            .post_without_token(routes::DOCUMENTS, &json!({"name": "x", "expiresAt": "2030-01-01"}))
            .await;
        assert_eq!(res.status, 401);

        let res = app
            .post_without_token(
                routes::UPLOAD_TOKEN,
                &json!({"documentId": 1, "fileName": "a.pdf"}),
            )
            .await;
        assert_eq!(res.status, 401);
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_session_identity_and_mirrors_user() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], "alice");
        assert_eq!(res.body["name"], "User alice");
        assert_eq!(res.body["email"], "alice@example.com");
        assert!(res.body["image"].is_null());

        let row = user::Entity::find_by_id("alice".to_string())
            .one(&app.db)
            .await
            .unwrap()
            .expect("user row should exist after /me");
        assert_eq!(row.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn repeated_calls_keep_a_single_row() {
        let app = TestApp::spawn().await;
        let token = app.token_for("alice");

        for _ in 0..3 {
            let res = app.get_with_token(routes::ME, &token).await;
            assert_eq!(res.status, 200);
        }

        let users = user::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(users.len(), 1);
    }
}
