//! Integration tests for record CRUD against a real database.
//!
//! Run with `DATABASE_URL` pointing at a disposable Postgres and
//! `cargo test -- --ignored`.

use roster_core::record::{ListOrder, RecordKind};
use roster_db::models::record::{CreateRecord, ImageUpdate, UpdateRecord};
use roster_db::repositories::RecordRepo;
use roster_db::store::{PgRecordStore, RecordStore};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_record(name: &str) -> CreateRecord {
    CreateRecord {
        name: name.to_string(),
        description: String::new(),
        image_url: None,
    }
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn create_inserts_exactly_one_row(pool: PgPool) {
    let kind = RecordKind::Characters;
    let before = RecordRepo::count(&pool, kind).await.unwrap();

    let created = RecordRepo::create(&pool, kind, &new_record("Aria"))
        .await
        .unwrap();

    assert_eq!(RecordRepo::count(&pool, kind).await.unwrap(), before + 1);
    assert_eq!(created.name, "Aria");
    assert_eq!(created.description, "");
    assert_eq!(created.image_url, None);

    let found = RecordRepo::find_by_id(&pool, kind, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, created);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn find_missing_returns_none(pool: PgPool) {
    let found = RecordRepo::find_by_id(&pool, RecordKind::Items, 9999)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn kinds_use_separate_tables(pool: PgPool) {
    RecordRepo::create(&pool, RecordKind::Items, &new_record("Sword"))
        .await
        .unwrap();

    assert_eq!(RecordRepo::count(&pool, RecordKind::Items).await.unwrap(), 1);
    assert_eq!(RecordRepo::count(&pool, RecordKind::Characters).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn list_orders_by_id_regardless_of_updates(pool: PgPool) {
    let kind = RecordKind::Characters;
    let first = RecordRepo::create(&pool, kind, &new_record("first")).await.unwrap();
    let second = RecordRepo::create(&pool, kind, &new_record("second")).await.unwrap();
    RecordRepo::update_name(&pool, kind, first.id, "renamed")
        .await
        .unwrap();

    let asc: Vec<_> = RecordRepo::list(&pool, kind, ListOrder::Asc)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(asc, vec![first.id, second.id]);

    let desc: Vec<_> = RecordRepo::list(&pool, kind, ListOrder::Desc)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(desc, vec![second.id, first.id]);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn full_update_replaces_fields(pool: PgPool) {
    let kind = RecordKind::Characters;
    let created = RecordRepo::create(
        &pool,
        kind,
        &CreateRecord {
            name: "Aria".into(),
            description: "bard".into(),
            image_url: Some("/uploads/1-aria.png".into()),
        },
    )
    .await
    .unwrap();

    let kept = RecordRepo::update(
        &pool,
        kind,
        created.id,
        &UpdateRecord {
            name: "Aria II".into(),
            description: String::new(),
            image: ImageUpdate::Keep,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(kept.name, "Aria II");
    assert_eq!(kept.description, "");
    assert_eq!(kept.image_url.as_deref(), Some("/uploads/1-aria.png"));

    let replaced = RecordRepo::update(
        &pool,
        kind,
        created.id,
        &UpdateRecord {
            name: "Aria II".into(),
            description: String::new(),
            image: ImageUpdate::Replace(Some("/uploads/2-aria.png".into())),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(replaced.image_url.as_deref(), Some("/uploads/2-aria.png"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn update_name_leaves_other_columns(pool: PgPool) {
    let kind = RecordKind::Items;
    let created = RecordRepo::create(
        &pool,
        kind,
        &CreateRecord {
            name: "Shield".into(),
            description: "wooden".into(),
            image_url: Some("data:image/png;base64,AAAA".into()),
        },
    )
    .await
    .unwrap();

    let renamed = RecordRepo::update_name(&pool, kind, created.id, "Buckler")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(renamed.name, "Buckler");
    assert_eq!(renamed.description, created.description);
    assert_eq!(renamed.image_url, created.image_url);
    assert_eq!(renamed.created_at, created.created_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn update_missing_returns_none(pool: PgPool) {
    let kind = RecordKind::Characters;
    let updated = RecordRepo::update(&pool, kind, 4242, &UpdateRecord::default())
        .await
        .unwrap();
    assert!(updated.is_none());
    assert!(RecordRepo::update_name(&pool, kind, 4242, "x")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn delete_removes_row(pool: PgPool) {
    let kind = RecordKind::Characters;
    let created = RecordRepo::create(&pool, kind, &new_record("Gone")).await.unwrap();

    assert!(RecordRepo::delete(&pool, kind, created.id).await.unwrap());
    assert!(RecordRepo::find_by_id(&pool, kind, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(!RecordRepo::delete(&pool, kind, created.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Store handle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn pg_store_delegates_to_repo(pool: PgPool) {
    let store = PgRecordStore::new(pool, RecordKind::Items, ListOrder::Desc);
    store.health_check().await.unwrap();

    let a = store.create(&new_record("a")).await.unwrap();
    let b = store.create(&new_record("b")).await.unwrap();

    let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    assert_eq!(store.kind(), RecordKind::Items);
}
