use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub type StoredItems = serde_json::Map<String, Value>;

/// `set` replaces the keys it is given and leaves every other key alone.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, keys: &[&str]) -> anyhow::Result<StoredItems>;

    async fn set(&self, items: StoredItems) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<StoredItems>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: StoredItems) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    pub async fn snapshot(&self) -> StoredItems {
        self.items.lock().await.clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, keys: &[&str]) -> anyhow::Result<StoredItems> {
        let items = self.items.lock().await;
        Ok(select_keys(&items, keys))
    }

    async fn set(&self, new_items: StoredItems) -> anyhow::Result<()> {
        let mut items = self.items.lock().await;
        items.extend(new_items);
        Ok(())
    }
}

/// Stores all keys in one JSON object file.
///
/// Writes go to a temp file in the same directory which then replaces the
/// target, so a reader never sees a half-written file. The load/merge/save of
/// a write runs under an exclusive lock on `<file>.lock`, shared by every
/// handle and process using the same path.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for JsonFileStorage {
    async fn get(&self, keys: &[&str]) -> anyhow::Result<StoredItems> {
        let path = self.path.clone();
        let all = tokio::task::spawn_blocking(move || load_items(&path))
            .await
            .context("storage read task")??;
        Ok(select_keys(&all, keys))
    }

    async fn set(&self, new_items: StoredItems) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || update_items(&path, new_items))
            .await
            .context("storage write task")?
    }
}

fn storage_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn update_items(path: &Path, new_items: StoredItems) -> anyhow::Result<()> {
    let dir = storage_dir(path);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create storage directory: {}", dir.display()))?;

    let lock_path = lock_path(path);
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("failed to open storage lock: {}", lock_path.display()))?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock
        .write()
        .with_context(|| format!("failed to lock storage: {}", lock_path.display()))?;

    let mut items = load_items(path)?;
    items.extend(new_items);
    save_items(dir, path, &items)
}

fn select_keys(items: &StoredItems, keys: &[&str]) -> StoredItems {
    keys.iter()
        .filter_map(|k| items.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}

fn load_items(path: &Path) -> anyhow::Result<StoredItems> {
    if !path.exists() {
        return Ok(StoredItems::new());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read storage: {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(StoredItems::new());
    }

    match serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse storage: {}", path.display()))?
    {
        Value::Object(items) => Ok(items),
        other => anyhow::bail!(
            "storage {} holds {} instead of an object",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn save_items(dir: &Path, path: &Path, items: &StoredItems) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(items).context("encode storage JSON")?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(&json).context("write storage temp file")?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace storage: {}", path.display()))?;
    Ok(())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(v: Value) -> StoredItems {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn memory_set_only_replaces_given_keys() {
        let store = MemoryStorage::with_items(items(json!({ "theme": "light", "language": "auto" })));
        store.set(items(json!({ "theme": "dark" }))).await.unwrap();

        let got = store.get(&["theme", "language", "missing"]).await.unwrap();
        assert_eq!(Value::Object(got), json!({ "theme": "dark", "language": "auto" }));
    }

    #[tokio::test]
    async fn file_storage_round_trips_and_merges_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStorage::at_path(dir.path().join("nested").join("storage.json"));

        assert!(store.get(&["theme"]).await.unwrap().is_empty());

        store.set(items(json!({ "theme": "dark" }))).await.unwrap();
        store.set(items(json!({ "triggerMode": "manual" }))).await.unwrap();

        let got = store.get(&["theme", "triggerMode"]).await.unwrap();
        assert_eq!(
            Value::Object(got),
            json!({ "theme": "dark", "triggerMode": "manual" })
        );
    }

    #[tokio::test]
    async fn file_storage_rejects_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let store = JsonFileStorage::at_path(&path);
        assert!(store.get(&["theme"]).await.is_err());
        assert!(store.set(items(json!({ "theme": "dark" }))).await.is_err());
    }

    #[tokio::test]
    async fn concurrent_writers_keep_each_others_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileStorage::at_path(dir.path().join("s.json")));

        let mut tasks = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let mut update = StoredItems::new();
                update.insert(format!("key{i}"), json!(i));
                store.set(update).await.unwrap();
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let keys: Vec<String> = (0..8).map(|i| format!("key{i}")).collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        assert_eq!(store.get(&key_refs).await.unwrap().len(), 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn writers_on_separate_handles_keep_each_others_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keys: Vec<String> = (0..8).map(|i| format!("key{i}")).collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();

        for round in 0..20 {
            let path = dir.path().join(format!("round{round}.json"));

            let mut tasks = Vec::new();
            for i in 0..8 {
                let store = JsonFileStorage::at_path(&path);
                tasks.push(tokio::spawn(async move {
                    let mut update = StoredItems::new();
                    update.insert(format!("key{i}"), json!(i));
                    store.set(update).await.unwrap();
                }));
            }
            for t in tasks {
                t.await.unwrap();
            }

            let got = JsonFileStorage::at_path(&path).get(&key_refs).await.unwrap();
            assert_eq!(got.len(), 8, "round {round} lost keys: {got:?}");
        }
    }
}
