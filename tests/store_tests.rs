/// Integration tests for the event store against an on-disk database
use logbuddy::{
    analytics, CsvExporter, EventQuery, EventStore, NewEvent, WebhookQueue,
};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn sqlite_url(dir: &TempDir) -> String {
    format!("sqlite:{}", dir.path().join("logbuddy.db").display())
}

#[tokio::test]
async fn test_events_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let url = sqlite_url(&dir);

    {
        let store = EventStore::connect(&url, 5).await.unwrap();
        store
            .insert(NewEvent::new("INFO", "first boot", "app"))
            .await
            .unwrap();
        store
            .insert(NewEvent::new("ERROR", "disk full", "database").with_user_id("ops"))
            .await
            .unwrap();
        store.close().await;
    }

    let reopened = EventStore::connect(&url, 5).await.unwrap();
    let events = reopened.all().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].user_id.as_deref(), Some("ops"));

    // Ids keep increasing after a restart
    let next = reopened
        .insert(NewEvent::new("INFO", "second boot", "app"))
        .await
        .unwrap();
    assert_eq!(next.id, 3);
}

#[tokio::test]
async fn test_ingest_query_analytics_export_pipeline() {
    let dir = TempDir::new().unwrap();
    let store = EventStore::connect(&sqlite_url(&dir), 5).await.unwrap();

    for (level, source) in [("INFO", "app"), ("WARNING", "monitoring"), ("ERROR", "database")] {
        store
            .insert(NewEvent::new(level, format!("{} event", level), source))
            .await
            .unwrap();
    }

    let (queue, workers) = WebhookQueue::spawn(store.clone(), 8, 2);
    let payload = json!({"type": "user_action", "user": "alice"});
    queue
        .submit(payload.as_object().unwrap().clone())
        .unwrap();
    drop(queue);
    workers.join(Duration::from_secs(5)).await;

    let errors = store
        .list(&EventQuery {
            level: Some("ERROR".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source, "database");

    let report = analytics::generate_report(&store).await.unwrap();
    assert_eq!(report.total, 4);
    assert_eq!(report.by_level.get("INFO"), Some(&2));
    assert_eq!(report.by_source.get("webhook"), Some(&1));
    assert_eq!(report.recent_activity.len(), 4);
    assert_eq!(report.recent_activity[3].source, "webhook");

    let export_dir = dir.path().join("exports");
    let result = CsvExporter::new(&export_dir).export(&store).await.unwrap();
    assert_eq!(result.record_count, 4);
    assert!(result.path.starts_with(&export_dir));
    assert!(result.path.exists());
}
