mod common;

use axum::http::StatusCode;
use common::{TestApp, body_json};
use serde_json::json;

#[tokio::test]
async fn create_tag_trims_name() {
    let app = TestApp::new().await;
    let (_, cookie) = app.signup("alice", "alice@example.com").await;

    let resp = app
        .post_json("/api/tags", &json!({ "name": "  work  " }), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["data"]["tag"]["name"], "work");
}

#[tokio::test]
async fn duplicate_tag_name_is_rejected_per_user() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice", "alice@example.com").await;
    let (_, bob) = app.signup("bob", "bob@example.com").await;

    app.create_tag(&alice, "work").await;

    let resp = app
        .post_json("/api/tags", &json!({ "name": "work" }), Some(&alice))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["status"], "fail");

    // A different user may reuse the name.
    let resp = app
        .post_json("/api/tags", &json!({ "name": "work" }), Some(&bob))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn tags_are_listed_by_name_and_scoped_to_owner() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice", "alice@example.com").await;
    let (_, bob) = app.signup("bob", "bob@example.com").await;

    app.create_tag(&alice, "zulu").await;
    app.create_tag(&alice, "alpha").await;
    app.create_tag(&bob, "secret").await;

    let resp = app.get("/api/tags", Some(&alice)).await;
    let tags = body_json(resp).await["data"]["tags"].clone();
    let tags = tags.as_array().unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["alpha", "zulu"]);
}

#[tokio::test]
async fn linking_tags_is_idempotent() {
    let app = TestApp::new().await;
    let (_, cookie) = app.signup("alice", "alice@example.com").await;
    let t1 = app.create_tag(&cookie, "one").await;
    let t2 = app.create_tag(&cookie, "two").await;

    let note = app.create_note(&cookie, json!({ "title": "Linked" })).await;
    let id = note["id"].as_str().unwrap().to_string();

    let body = json!({ "tag_ids": [t1, t2] });
    let resp = app
        .post_json(&format!("/api/tags/link/{id}"), &body, Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Linking the same set again succeeds and changes nothing.
    let resp = app
        .post_json(&format!("/api/tags/link/{id}"), &body, Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tags = body_json(resp).await["data"]["tags"].clone();
    assert_eq!(tags.as_array().unwrap().len(), 2);

    let links: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM note_tags WHERE note_id = ?")
        .bind(&id)
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(links.0, 2);
}

#[tokio::test]
async fn linking_requires_owning_the_note() {
    let app = TestApp::new().await;
    let (_, alice) = app.signup("alice", "alice@example.com").await;
    let (_, bob) = app.signup("bob", "bob@example.com").await;
    let bobs_tag = app.create_tag(&bob, "bobs").await;

    let note = app.create_note(&alice, json!({ "title": "Alice's" })).await;
    let id = note["id"].as_str().unwrap();

    let resp = app
        .post_json(
            &format!("/api/tags/link/{id}"),
            &json!({ "tag_ids": [bobs_tag] }),
            Some(&bob),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn linking_rejects_an_empty_id_list() {
    let app = TestApp::new().await;
    let (_, cookie) = app.signup("alice", "alice@example.com").await;
    let note = app.create_note(&cookie, json!({ "title": "Note" })).await;
    let id = note["id"].as_str().unwrap();

    let resp = app
        .post_json(&format!("/api/tags/link/{id}"), &json!({ "tag_ids": [] }), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unlinking_tags_is_a_noop_for_absent_pairs() {
    let app = TestApp::new().await;
    let (_, cookie) = app.signup("alice", "alice@example.com").await;
    let t1 = app.create_tag(&cookie, "one").await;
    let t2 = app.create_tag(&cookie, "two").await;

    let note = app
        .create_note(&cookie, json!({ "title": "Linked", "tag_ids": [t1.clone(), t2] }))
        .await;
    let id = note["id"].as_str().unwrap().to_string();

    let mut conn = app.db.acquire().await.unwrap();
    notekeep::store::tags::unlink(&mut conn, &id, std::slice::from_ref(&t1))
        .await
        .unwrap();
    // Removing the same pair again succeeds without effect.
    notekeep::store::tags::unlink(&mut conn, &id, std::slice::from_ref(&t1))
        .await
        .unwrap();
    drop(conn);

    let resp = app.get(&format!("/api/notes/{id}"), Some(&cookie)).await;
    let tags = body_json(resp).await["data"]["note"]["tags"].clone();
    let tags = tags.as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["name"], "two");
}

#[tokio::test]
async fn deleting_a_tag_removes_links_but_keeps_notes() {
    let app = TestApp::new().await;
    let (_, cookie) = app.signup("alice", "alice@example.com").await;
    let tag = app.create_tag(&cookie, "ephemeral").await;

    let note = app
        .create_note(&cookie, json!({ "title": "Keeper", "tag_ids": [tag] }))
        .await;
    let id = note["id"].as_str().unwrap();

    sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(&tag)
        .execute(&app.db)
        .await
        .unwrap();

    let resp = app.get(&format!("/api/notes/{id}"), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let current = body_json(resp).await["data"]["note"].clone();
    assert_eq!(current["title"], "Keeper");
    assert_eq!(current["tags"], json!([]));
}
