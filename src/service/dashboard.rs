use std::collections::HashMap;

use crate::models::{append_status_keyword, remove_status_keyword, Record};
use crate::store::{OverrideEntry, OverrideStore};

/// 仪表盘服务: 持有本会话权威的记录列表, 负责合并 / 排序 / 状态切换.
/// 跨会话的持久状态归覆盖存储所有, 两者只在构建与每次切换时对账
pub struct DashboardService {
    records: Vec<Record>,
    warning: Option<String>,
    store: OverrideStore,
}

impl DashboardService {
    /// 用解析结果与本地覆盖构建服务: 覆盖优先, 随后未完成态排前
    pub fn new(parsed: Vec<Record>, warning: Option<String>, store: OverrideStore) -> Self {
        let overrides = store.load();
        let mut records = merge_overrides(parsed, &overrides);
        sort_pending_first(&mut records);
        Self { records, warning, store }
    }

    /// 当前有序记录列表 (合并与排序已完成)
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// 加载降级时的非阻塞警告
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// 在记录本族内翻转完成状态:
    /// 1. 按编号定位记录, 未命中静默忽略
    /// 2. 计算翻转后的状态 (族内二元循环)
    /// 3. 同步备注关键字: 完成态追加 (已有则不重复), 未完成态整词移除
    /// 4. 以全量记录重建覆盖表并整表落盘
    /// 5. 重新排序 (未完成态在前)
    ///
    /// 返回是否发生了切换; 落盘失败只记日志, 内存状态照常生效
    pub fn toggle_status(&mut self, number: &str) -> bool {
        let Some(idx) = self.records.iter().position(|r| r.number == number) else {
            tracing::warn!("Toggle on unknown record number {}, ignoring", number);
            return false;
        };

        {
            let rec = &mut self.records[idx];
            let next = rec.status.toggled(rec.kind);
            let keyword = rec.kind.keyword();
            rec.notes = if next.is_complete() {
                append_status_keyword(&rec.notes, keyword)
            } else {
                remove_status_keyword(&rec.notes, keyword)
            };
            rec.status = next;
            tracing::info!("Record {} toggled to {}", rec.number, rec.status);
        }

        let map = self.override_map();
        if let Err(e) = self.store.save(&map) {
            tracing::error!("Failed to persist overrides to {:?}: {}", self.store.path(), e);
        }

        sort_pending_first(&mut self.records);
        true
    }

    /// 由当前全部记录重建覆盖表 (整表覆盖语义)
    fn override_map(&self) -> HashMap<String, OverrideEntry> {
        self.records
            .iter()
            .map(|r| {
                (
                    r.number.clone(),
                    OverrideEntry { notes: r.notes.clone(), status: r.status },
                )
            })
            .collect()
    }
}

/// 合并: 有覆盖条目时其 notes/status 优先于解析/推导值
fn merge_overrides(parsed: Vec<Record>, overrides: &HashMap<String, OverrideEntry>) -> Vec<Record> {
    parsed
        .into_iter()
        .map(|mut rec| {
            if let Some(saved) = overrides.get(&rec.number) {
                rec.notes = saved.notes.clone();
                rec.status = saved.status;
            }
            rec
        })
        .collect()
}

/// 稳定排序: 未完成态在前, 分区内保持插入顺序
pub fn sort_pending_first(records: &mut [Record]) {
    records.sort_by_key(|r| r.status.is_complete());
}
