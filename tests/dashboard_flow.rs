//! 端到端流程: 解析行 -> 合并覆盖 -> 状态切换 -> 落盘 -> 跨会话重建 -> 报表

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use invoice_dash_rust::models::{decode_items, items_total, Record, RecordKind, Status};
use invoice_dash_rust::service::reports;
use invoice_dash_rust::{DashboardService, OverrideStore};

fn record(number: &str, kind: RecordKind, notes: &str, items_json: &str, date: Option<NaiveDate>, customer: &str) -> Record {
    let items = decode_items(items_json);
    let total = items_total(&items);
    let status = Status::derive(kind, notes);
    Record {
        number: number.to_string(),
        kind,
        date,
        customer_name: customer.to_string(),
        items,
        total,
        notes: notes.to_string(),
        status,
    }
}

fn fixture() -> Vec<Record> {
    let jan = NaiveDate::from_ymd_opt(2024, 1, 10);
    let feb = NaiveDate::from_ymd_opt(2024, 2, 3);
    vec![
        record(
            "INV-1",
            RecordKind::Invoice,
            "paid by card",
            r#"[{"model":"W-100","description":"Widget","qty":4,"price":25}]"#,
            jan,
            "Acme",
        ),
        record(
            "INV-2",
            RecordKind::Invoice,
            "",
            r#"[{"model":"B-2","description":"Bracket","qty":2,"price":25}]"#,
            feb,
            "Acme",
        ),
        record("Q-1", RecordKind::Quotation, "", "not json", feb, "Acme"),
        record("D-1", RecordKind::Delivery, "leave at gate", "[]", None, ""),
    ]
}

#[test]
fn full_session_flow_with_persistence_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard-overrides.json");

    // 第一次会话: 无覆盖, 状态全部来自备注推导
    let mut svc = DashboardService::new(fixture(), None, OverrideStore::new(path.clone()));
    {
        let numbers: Vec<&str> = svc.records().iter().map(|r| r.number.as_str()).collect();
        // 未完成态在前, 分区内保持插入顺序
        assert_eq!(numbers, vec!["INV-2", "Q-1", "D-1", "INV-1"]);
    }

    // 切换 INV-2 为已收款
    assert!(svc.toggle_status("INV-2"));
    let inv2 = svc.records().iter().find(|r| r.number == "INV-2").unwrap();
    assert_eq!(inv2.status, Status::Paid);
    assert_eq!(inv2.notes, "Paid");

    // 第二次会话: 同一份表格重新解析, 覆盖必须获胜
    let mut svc = DashboardService::new(fixture(), None, OverrideStore::new(path.clone()));
    let inv2 = svc.records().iter().find(|r| r.number == "INV-2").unwrap();
    assert_eq!(inv2.status, Status::Paid);
    assert_eq!(inv2.notes, "Paid");

    // 报表: 两张发票均已收款
    let s = reports::summary(svc.records(), None);
    assert_eq!(s.grand_total, BigDecimal::from(150));
    assert_eq!(s.pending_total, BigDecimal::from(0));
    assert_eq!(s.pending_numbers, "None");

    let sales = reports::monthly_sales(svc.records());
    assert_eq!(sales["2024-01"], BigDecimal::from(100));
    assert_eq!(sales["2024-02"], BigDecimal::from(50));

    let buyers = reports::customer_summary(svc.records());
    assert_eq!(buyers["Acme"].orders, 2);
    assert_eq!(buyers["Acme"].quotations, 1);
    assert_eq!(buyers["Acme"].paid, BigDecimal::from(150));
    assert_eq!(buyers["Unknown"].orders, 0);

    // 切回未收款: 备注关键字被整词移除, 未完成态整体排在完成态之前
    assert!(svc.toggle_status("INV-2"));
    let inv2 = svc.records().iter().find(|r| r.number == "INV-2").unwrap();
    assert_eq!(inv2.status, Status::Unpaid);
    assert_eq!(inv2.notes, "");
    let boundary = svc
        .records()
        .iter()
        .position(|r| r.status.is_complete())
        .unwrap();
    assert!(svc.records()[..boundary].iter().all(|r| !r.status.is_complete()));
    assert!(svc.records()[boundary..].iter().all(|r| r.status.is_complete()));

    let s = reports::summary(svc.records(), Some("2024-02"));
    assert_eq!(s.grand_total, BigDecimal::from(0));
    assert_eq!(s.pending_total, BigDecimal::from(50));
    assert_eq!(s.pending_numbers, "INV-2");
}

#[test]
fn corrupt_store_degrades_to_derived_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard-overrides.json");
    std::fs::write(&path, "{broken json").unwrap();

    let svc = DashboardService::new(fixture(), None, OverrideStore::new(path));
    let inv1 = svc.records().iter().find(|r| r.number == "INV-1").unwrap();
    assert_eq!(inv1.status, Status::Paid);
    let inv2 = svc.records().iter().find(|r| r.number == "INV-2").unwrap();
    assert_eq!(inv2.status, Status::Unpaid);
}

#[test]
fn empty_record_set_serves_empty_reports() {
    let dir = tempfile::tempdir().unwrap();
    let store = OverrideStore::new(dir.path().join("overrides.json"));
    let svc = DashboardService::new(
        Vec::new(),
        Some("Failed to load sheet data: download failed. Dashboard will show with empty data.".to_string()),
        store,
    );

    assert!(svc.records().is_empty());
    assert!(svc.warning().is_some());

    let s = reports::summary(svc.records(), None);
    assert_eq!(s.grand_total, BigDecimal::from(0));
    assert_eq!(s.pending_numbers, "None");
    assert!(reports::months(svc.records()).is_empty());
    assert!(reports::monthly_sales(svc.records()).is_empty());
    assert!(reports::customer_summary(svc.records()).is_empty());
}
