//! Store Integration Tests
//!
//! Add queue, staging and commit driven together through `MemoryStore`.

use crate::domain::Selection;
use crate::repository::{ListQuery, MemoryStore, DEFAULT_TOTAL_ITEMS};

fn setup_store() -> MemoryStore {
    MemoryStore::new(DEFAULT_TOTAL_ITEMS).expect("Failed to create store")
}

async fn committed_store(selected_ids: Vec<i64>, order: Vec<i64>) -> MemoryStore {
    let store = setup_store();
    store.stage_selection(Selection::new(selected_ids, order)).await;
    store.commit_selection().await.expect("Nothing to commit");
    store
}

#[tokio::test]
async fn test_enqueue_scenario() {
    let store = setup_store();

    assert_eq!(store.enqueue_add(&[5, 5, 6]).await, vec![5, 6]);
    assert!(store.enqueue_add(&[5]).await.is_empty());
    assert_eq!(store.queue_size().await, 2);
}

#[tokio::test]
async fn test_enqueue_skips_committed_ids() {
    let store = committed_store(vec![1, 2, 3], vec![3, 2, 1]).await;

    assert_eq!(store.enqueue_add(&[3, 4, 1]).await, vec![4]);
}

#[tokio::test]
async fn test_enqueue_ignores_pending_update() {
    // Only the committed selection counts for dedup
    let store = setup_store();
    store.stage_selection(Selection::new(vec![9], vec![9])).await;

    assert_eq!(store.enqueue_add(&[9]).await, vec![9]);
}

#[tokio::test]
async fn test_added_ids_visible_after_drain_and_commit() {
    let store = committed_store(vec![1, 2], vec![2, 1]).await;
    store.enqueue_add(&[7, 2, 8]).await;

    assert_eq!(store.selection().await, Selection::new(vec![1, 2], vec![2, 1]));

    let report = store.drain_add_queue().await.expect("Queue was not empty");
    assert_eq!(report.batch, 2);
    assert_eq!(store.queue_size().await, 0);

    // Staged, not yet committed
    assert_eq!(store.selection().await, Selection::new(vec![1, 2], vec![2, 1]));

    store.commit_selection().await;
    assert_eq!(
        store.selection().await,
        Selection::new(vec![1, 2, 7, 8], vec![2, 1, 7, 8])
    );
}

#[tokio::test]
async fn test_drain_and_commit_noop_when_idle() {
    let store = setup_store();

    assert!(store.drain_add_queue().await.is_none());
    assert!(store.commit_selection().await.is_none());
    assert!(store.selection().await.is_empty());
}

#[tokio::test]
async fn test_drain_registers_out_of_range_ids() {
    let store = setup_store();
    store.enqueue_add(&[1_000_001, 1_000_002, 10]).await;

    assert!(store.get_items_by_ids(&[1_000_001]).await.is_empty());

    let report = store.drain_add_queue().await.unwrap();
    assert_eq!(report.appended, 2);

    let items = store.get_items_by_ids(&[1_000_001, 1_000_002, 10]).await;
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1_000_001, 1_000_002, 10]);
}

#[tokio::test]
async fn test_direct_update_needs_commit() {
    let store = setup_store();
    store.stage_selection(Selection::new(vec![10, 20, 30], vec![30, 10, 20])).await;

    assert!(store.selection().await.is_empty());
    assert!(store.pending_selection().await.is_some());

    store.commit_selection().await;
    assert_eq!(
        store.selection().await,
        Selection::new(vec![10, 20, 30], vec![30, 10, 20])
    );
    assert!(store.pending_selection().await.is_none());
}

#[tokio::test]
async fn test_drain_merges_over_intervening_direct_update() {
    let store = setup_store();
    store.enqueue_add(&[4]).await;

    store.stage_selection(Selection::new(vec![1], vec![1])).await;
    store.commit_selection().await;

    store.drain_add_queue().await;
    store.commit_selection().await;
    assert_eq!(store.selection().await, Selection::new(vec![1, 4], vec![1, 4]));
}

#[tokio::test]
async fn test_remove_scenario() {
    let store = committed_store(vec![1, 2, 3], vec![2, 1, 3]).await;

    let outcome = store.remove_from_selection(&[2]).await;
    assert_eq!(outcome.removed, vec![2]);
    assert_eq!(outcome.selection.order, vec![1, 3]);
    assert!(outcome.selection.selected_ids.contains(&1));
    assert!(outcome.selection.selected_ids.contains(&3));

    // Immediate, no commit tick needed
    assert_eq!(store.selection().await, outcome.selection);

    let again = store.remove_from_selection(&[2]).await;
    assert!(again.removed.is_empty());
    assert_eq!(again.selection, outcome.selection);
}

#[tokio::test]
async fn test_pending_update_can_restore_removed_ids() {
    let store = committed_store(vec![1, 2], vec![1, 2]).await;
    store.stage_selection(Selection::new(vec![1, 2, 3], vec![1, 2, 3])).await;

    store.remove_from_selection(&[2]).await;
    store.commit_selection().await;

    assert_eq!(store.selection().await, Selection::new(vec![1, 2, 3], vec![1, 2, 3]));
}

#[tokio::test]
async fn test_write_selection_is_immediate() {
    let store = setup_store();
    store.write_selection(Selection::new(vec![5], vec![5])).await;

    assert_eq!(store.selection().await, Selection::new(vec![5], vec![5]));
    assert!(store.commit_selection().await.is_none());
}

#[tokio::test]
async fn test_listing_through_store() {
    let store = setup_store();
    let page = store.list_items(&ListQuery::page(0, 10)).await;

    assert_eq!(page.total, 1_000_000);
    let ids: Vec<i64> = page.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    assert_eq!(store.total_items().await, 1_000_000);
}

#[tokio::test]
async fn test_append_through_store() {
    let store = setup_store();

    assert_eq!(store.append_items(&[0, 5, 2_000_000]).await, vec![0, 2_000_000]);
    assert_eq!(store.get_items_by_ids(&[0]).await.len(), 1);
}
