//! Reference data loaded at start-up.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::entity::{
    ChatMessage, Customer, Dept, Employee, IssueLog, IssueStatus, Product, ProductionRecord, RecordStatus, Role,
};
use crate::model::global_error::{AppError, ErrorCode};
use crate::store::RecordStore;

pub fn employees() -> Vec<Employee> {
    vec![
        Employee::new("NV001", "Nguyễn Văn Admin", Dept::In, Role::Admin),
        Employee::new("NV002", "Trần Thị Sóng", Dept::Song, Role::User),
        Employee::new("NV003", "Lê Văn In", Dept::In, Role::User),
        Employee::new("NV004", "Phạm Thành Phẩm", Dept::ThanhPham, Role::User),
        Employee::new("NV005", "Hoàng Kho", Dept::Kho, Role::User),
    ]
}

fn timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::with_detail(ErrorCode::InternalError, format!("seed timestamp {}: {}", value, e)))
}

fn date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::with_detail(ErrorCode::InternalError, format!("seed date {}: {}", value, e)))
}

fn specs(dimensions: &str, material: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("dimensions".to_string(), dimensions.to_string()),
        ("material".to_string(), material.to_string()),
    ])
}

pub fn customers() -> Result<Vec<Customer>, AppError> {
    let r1 = ProductionRecord {
        id: "r1".to_string(),
        product_id: "p1".to_string(),
        production_code: "LSX-2023-11-001".to_string(),
        status: RecordStatus::Pending,
        last_updated: timestamp("2023-11-20T10:30:00Z")?,
        chat: vec![ChatMessage {
            id: "m1".to_string(),
            sender_id: "NV002".to_string(),
            sender_name: "Trần Thị Sóng".to_string(),
            text: "Phát hiện hở nắp ở bộ phận Sóng.".to_string(),
            images: vec!["https://picsum.photos/400/300?random=1".to_string()],
            timestamp: timestamp("2023-11-20T08:00:00Z")?,
            dept: Dept::Song,
            is_read: false,
            is_tagged: None,
        }],
        logs: vec![IssueLog {
            id: "l1".to_string(),
            date: date("2023-11-20")?,
            record_id: "r1".to_string(),
            dept: Dept::Song,
            error_content: "Hở nắp".to_string(),
            images: vec!["https://picsum.photos/400/300?random=1".to_string()],
            fix_content: "Điều chỉnh nhiệt độ lô sấy".to_string(),
            note: "Đã xử lý xong".to_string(),
            status: IssueStatus::Approved,
            approved_by: Some("NV001".to_string()),
            approved_at: Some(timestamp("2023-11-20T09:00:00Z")?),
        }],
    };

    let p1 = Product {
        id: "p1".to_string(),
        customer_id: "c1".to_string(),
        code: "SKU-TIGER-CRYSTAL-24".to_string(),
        name: "Thùng Tiger Crystal 24 lon 330ml".to_string(),
        specs: specs("405 x 265 x 125 mm", "Duplex 250"),
        records: vec![Arc::new(r1)],
    };

    let p2 = Product {
        id: "p2".to_string(),
        customer_id: "c1".to_string(),
        code: "SKU-LARUE-EX-12".to_string(),
        name: "Thùng Larue Biere Xuất Khẩu".to_string(),
        specs: specs("300 x 200 x 150 mm", "BC Flute"),
        records: vec![],
    };

    Ok(vec![
        Customer {
            id: "c1".to_string(),
            name: "HEINEKEN VIETNAM".to_string(),
            products: vec![Arc::new(p1), Arc::new(p2)],
        },
        Customer {
            id: "c2".to_string(),
            name: "SUNTORY PEPSICO".to_string(),
            products: vec![],
        },
        Customer {
            id: "c3".to_string(),
            name: "UNILEVER VIETNAM".to_string(),
            products: vec![],
        },
    ])
}

pub fn store() -> Result<RecordStore, AppError> {
    RecordStore::new(customers()?)
}
