//! The store contract checked against every backend.

use std::path::PathBuf;
use std::sync::Arc;

use common::{ConfigEntry, QueryPattern};
use service::store::backends::{JsonFileBackend, MemoryBackend, SeaOrmBackend};
use service::{ConfigStore, StoreError, TabularBackend};
use uuid::Uuid;

fn tmp_json() -> PathBuf {
    std::env::temp_dir().join(format!("store_contract_{}/configs.json", Uuid::new_v4()))
}

async fn sqlite_store() -> anyhow::Result<ConfigStore<dyn TabularBackend>> {
    let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let backend = SeaOrmBackend::new(cfg, true);
    backend.initialize().await?;
    Ok(ConfigStore::new(Arc::new(backend) as Arc<dyn TabularBackend>))
}

async fn all_stores() -> anyhow::Result<Vec<ConfigStore<dyn TabularBackend>>> {
    let json = JsonFileBackend::open(tmp_json()).await?;
    Ok(vec![
        ConfigStore::new(Arc::new(MemoryBackend::new()) as Arc<dyn TabularBackend>),
        ConfigStore::new(Arc::new(json) as Arc<dyn TabularBackend>),
        sqlite_store().await?,
    ])
}

fn entry(set: &str, schema: &str, key: &str, value: &str) -> ConfigEntry {
    ConfigEntry::new(set, schema, key, value)
}

#[tokio::test]
async fn round_trip_and_full_scan() -> anyhow::Result<()> {
    for store in all_stores().await? {
        store.set(&[entry("env", "svc", "K", "V"), entry("env", "svc", "L", "W")]).await?;

        let one = store.get(&[QueryPattern::new("env", "svc", "K")]).await?;
        assert_eq!(one, vec![entry("env", "svc", "K", "V")], "{}", store.protocol());

        store.set(&[ConfigEntry::tombstone("env", "svc", "L")]).await?;
        let all = store.get(&[QueryPattern::all()]).await?;
        assert_eq!(all, vec![entry("env", "svc", "K", "V")], "{}", store.protocol());
    }
    Ok(())
}

#[tokio::test]
async fn last_write_wins_in_both_orders() -> anyhow::Result<()> {
    for store in all_stores().await? {
        store.set(&[entry("a", "b", "c", "1"), ConfigEntry::tombstone("a", "b", "c")]).await?;
        assert!(store.get(&[QueryPattern::new("a", "b", "c")]).await?.is_empty(), "{}", store.protocol());

        store.set(&[ConfigEntry::tombstone("a", "b", "c"), entry("a", "b", "c", "1")]).await?;
        assert_eq!(store.get(&[QueryPattern::new("a", "b", "c")]).await?, vec![entry("a", "b", "c", "1")]);

        // an existing row is deleted when the batch ends with its tombstone
        store.set(&[entry("a", "b", "c", "2"), ConfigEntry::tombstone("a", "b", "c")]).await?;
        assert!(store.get(&[QueryPattern::all()]).await?.is_empty(), "{}", store.protocol());
    }
    Ok(())
}

#[tokio::test]
async fn wildcard_queries_agree_across_backends() -> anyhow::Result<()> {
    let batch = [
        entry("eu", "prod", "A", "1"),
        entry("us", "prod", "B", "2"),
        entry("us", "stage", "A", "3"),
        entry("us", "stage", "C", "4"),
    ];
    let queries = [
        vec![QueryPattern::new("*", "prod", "*")],
        vec![QueryPattern::new("us", "*", "A")],
        vec![QueryPattern::new("eu", "*", "*"), QueryPattern::new("*", "*", "C")],
        vec![QueryPattern::new("nowhere", "*", "*")],
    ];
    let mut answers: Vec<Vec<Vec<ConfigEntry>>> = Vec::new();
    for store in all_stores().await? {
        store.set(&batch).await?;
        let mut per_store = Vec::new();
        for q in &queries {
            per_store.push(store.get(q).await?);
        }
        answers.push(per_store);
    }
    assert_eq!(answers[0][0].len(), 2);
    assert_eq!(answers[0][1], vec![entry("us", "stage", "A", "3")]);
    assert_eq!(answers[0][2].len(), 2);
    assert!(answers[0][3].is_empty());
    assert!(answers.iter().all(|a| a == &answers[0]));
    Ok(())
}

#[tokio::test]
async fn unready_backends_refuse_work() -> anyhow::Result<()> {
    let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let stores: Vec<ConfigStore<dyn TabularBackend>> = vec![
        ConfigStore::new(Arc::new(SeaOrmBackend::new(cfg, true)) as Arc<dyn TabularBackend>),
        ConfigStore::new(Arc::new(JsonFileBackend::new(tmp_json())) as Arc<dyn TabularBackend>),
        ConfigStore::new(Arc::new(MemoryBackend::uninitialized()) as Arc<dyn TabularBackend>),
    ];
    for store in stores {
        assert!(matches!(store.get(&[QueryPattern::all()]).await, Err(StoreError::NotInitialized(_))));
        assert!(matches!(store.set(&[entry("a", "b", "c", "v")]).await, Err(StoreError::NotInitialized(_))));
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_sets_on_distinct_keys_all_land() -> anyhow::Result<()> {
    let store = ConfigStore::new(Arc::new(JsonFileBackend::open(tmp_json()).await?) as Arc<dyn TabularBackend>);
    let mut handles = Vec::new();
    for i in 0..16 {
        let s = store.clone();
        handles.push(tokio::spawn(async move {
            s.set(&[entry("env", "svc", &format!("K{i}"), &i.to_string())]).await
        }));
    }
    for h in handles {
        h.await??;
    }
    assert_eq!(store.get(&[QueryPattern::all()]).await?.len(), 16);
    Ok(())
}
