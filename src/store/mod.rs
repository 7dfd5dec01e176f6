use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::Status;

/// 本地覆盖条目: 用户修正过的备注与状态, 合并时优先于解析/推导值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub notes: String,
    pub status: Status,
}

/// 本地覆盖存储: 单一 JSON 槽位, 记录编号 -> {notes, status}.
/// 启动时读取一次; 每次状态切换整表重写.
/// 单写者假设: 仅状态切换流程写入, 不做并发防护
#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
}

impl OverrideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取覆盖表; 文件缺失或损坏一律按空表处理
    pub fn load(&self) -> HashMap<String, OverrideEntry> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read override store {:?}: {}", self.path, e);
                return HashMap::new();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("Corrupt override store {:?}, treating as empty: {}", self.path, e);
                HashMap::new()
            }
        }
    }

    /// 整表重写 (不做增量更新)
    pub fn save(&self, map: &HashMap<String, OverrideEntry>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_vec_pretty(map).map_err(io::Error::from)?;
        fs::write(&self.path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::new(dir.path().join("overrides.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_store_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        fs::write(&path, "{not valid json").unwrap();
        let store = OverrideStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_whole_map() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::new(dir.path().join("state").join("overrides.json"));

        let mut map = HashMap::new();
        map.insert(
            "INV-1".to_string(),
            OverrideEntry { notes: "Paid".to_string(), status: Status::Paid },
        );
        map.insert(
            "Q-2".to_string(),
            OverrideEntry { notes: String::new(), status: Status::Unaccepted },
        );
        store.save(&map).unwrap();

        assert_eq!(store.load(), map);
    }

    #[test]
    fn save_overwrites_previous_map() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::new(dir.path().join("overrides.json"));

        let mut first = HashMap::new();
        first.insert(
            "1".to_string(),
            OverrideEntry { notes: "a".to_string(), status: Status::Pending },
        );
        store.save(&first).unwrap();

        let second = HashMap::new();
        store.save(&second).unwrap();
        assert!(store.load().is_empty());
    }
}
