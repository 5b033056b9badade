use serde_json::json;

use crate::common::{TestApp, days_from_now, routes};

#[tokio::test]
async fn categories_are_listed_by_name_for_owner_only() {
    let app = TestApp::spawn().await;
    let alice = app.token_for("alice");
    let bob = app.token_for("bob");

    for category in ["Vehicle", "Finance", "Health"] {
        app.create_document(
            &alice,
            json!({"name": "Doc", "expiresAt": days_from_now(10), "newCategoryName": category}),
        )
        .await;
    }
    app.create_document(
        &bob,
        json!({"name": "Doc", "expiresAt": days_from_now(10), "newCategoryName": "Bob only"}),
    )
    .await;

    let res = app.get_with_token(routes::CATEGORIES, &alice).await;
    assert_eq!(res.status, 200);
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Finance", "Health", "Vehicle"]);
    assert!(res.body[0]["id"].is_i64());
}

#[tokio::test]
async fn tags_are_listed_by_name_for_owner_only() {
    let app = TestApp::spawn().await;
    let alice = app.token_for("alice");
    let bob = app.token_for("bob");

    app.create_document(
        &alice,
        json!({
            "name": "Policy",
            "expiresAt": days_from_now(10),
            "newTagNames": ["renewal", "annual", "insurance"],
        }),
    )
    .await;
    app.create_document(
        &bob,
        json!({"name": "Other", "expiresAt": days_from_now(10), "newTagNames": ["secret"]}),
    )
    .await;

    let res = app.get_with_token(routes::TAGS, &alice).await;
    assert_eq!(res.status, 200);
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["annual", "insurance", "renewal"]);
}

#[tokio::test]
async fn new_user_has_empty_taxonomy() {
    let app = TestApp::spawn().await;
    let token = app.token_for("carol");

    let categories = app.get_with_token(routes::CATEGORIES, &token).await;
    assert_eq!(categories.status, 200);
    assert_eq!(categories.body, json!([]));

    let tags = app.get_with_token(routes::TAGS, &token).await;
    assert_eq!(tags.status, 200);
    assert_eq!(tags.body, json!([]));
}
