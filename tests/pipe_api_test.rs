// ==========================================
// 管道 API 集成测试
// ==========================================
// 测试目标: 单条创建/更新/查询/删除（SQLite 文件库）
// ==========================================


use pipe_inventory::api::{ApiError, PipeApi};
use pipe_inventory::domain::{PipeDraft, PipeStatus};
use pipe_inventory::repository::PipeRepositoryImpl;
use std::sync::Arc;
use test_helpers::{create_test_db, BlindGuardRepository, MockPipeRepository};

fn draft(number: &str, status: PipeStatus, material: &str, diameter: f64) -> PipeDraft {
    PipeDraft {
        pipe_number: Some(number.to_string()),
        status: Some(status),
        material: Some(material.to_string()),
        diameter: Some(diameter),
        location: Some("Yard A".to_string()),
        manufacturer: Some("TMK".to_string()),
        batch_number: Some("B-1".to_string()),
        ..PipeDraft::default()
    }
}

fn sqlite_api() -> (tempfile::NamedTempFile, PipeApi<PipeRepositoryImpl>) {
    let (temp, db_path) = create_test_db().unwrap();
    let repo = PipeRepositoryImpl::new(&db_path).unwrap();
    (temp, PipeApi::new(Arc::new(repo)))
}

#[tokio::test]
async fn test_create_and_get() {
    let (_temp, api) = sqlite_api();

    let created = api
        .create_pipe(draft("P-1", PipeStatus::InStock, "Steel", 219.0))
        .await
        .unwrap();

    let by_id = api.get_pipe_by_id(created.id).await.unwrap();
    assert_eq!(by_id.as_ref(), Some(&created));

    let by_number = api.get_pipe_by_number(" P-1 ").await.unwrap();
    assert_eq!(by_number, Some(created));

    assert!(api.pipe_number_exists("P-1").await.unwrap());
    assert!(!api.pipe_number_exists("P-404").await.unwrap());
}

#[tokio::test]
async fn test_blank_number_lookup_is_invalid_input() {
    let (_temp, api) = sqlite_api();
    let err = api.get_pipe_by_number("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_filters_and_counts() {
    let (_temp, api) = sqlite_api();

    api.create_pipe(draft("P-1", PipeStatus::InStock, "Steel", 100.0))
        .await
        .unwrap();
    api.create_pipe(draft("P-2", PipeStatus::InStock, "PE", 200.0))
        .await
        .unwrap();
    let mut other = draft("P-3", PipeStatus::Damaged, "Steel", 300.0);
    other.location = Some("Yard B".to_string());
    other.batch_number = Some("B-2".to_string());
    api.create_pipe(other).await.unwrap();

    assert_eq!(api.list_pipes().await.unwrap().len(), 3);
    assert_eq!(api.list_by_status(PipeStatus::InStock).await.unwrap().len(), 2);
    assert_eq!(api.list_by_material("Steel").await.unwrap().len(), 2);
    assert_eq!(api.list_by_location("Yard B").await.unwrap().len(), 1);
    assert_eq!(api.list_by_manufacturer("TMK").await.unwrap().len(), 3);
    assert_eq!(api.list_by_batch("B-1").await.unwrap().len(), 2);

    let mid = api.list_by_diameter_range(150.0, 300.0).await.unwrap();
    let numbers: Vec<&str> = mid.iter().map(|p| p.pipe_number.as_str()).collect();
    assert_eq!(numbers, vec!["P-2", "P-3"]);

    assert_eq!(api.count_by_status(PipeStatus::InStock).await.unwrap(), 2);
    assert_eq!(api.count_by_status(PipeStatus::Scrapped).await.unwrap(), 0);
}

#[tokio::test]
async fn test_partial_update() {
    let (_temp, api) = sqlite_api();
    let created = api
        .create_pipe(draft("P-1", PipeStatus::New, "Steel", 100.0))
        .await
        .unwrap();

    let patch = PipeDraft {
        status: Some(PipeStatus::InUse),
        location: Some("Site 7".to_string()),
        ..PipeDraft::default()
    };
    let updated = api.update_pipe(created.id, patch).await.unwrap();

    assert_eq!(updated.status, PipeStatus::InUse);
    assert_eq!(updated.location.as_deref(), Some("Site 7"));
    assert_eq!(updated.material.as_deref(), Some("Steel"));
    assert_eq!(updated.diameter, Some(100.0));
    assert_eq!(updated.pipe_number, "P-1");
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_rejects_rename_onto_existing_number() {
    let (_temp, api) = sqlite_api();
    api.create_pipe(PipeDraft::with_number("P-1")).await.unwrap();
    let second = api.create_pipe(PipeDraft::with_number("P-2")).await.unwrap();

    let err = api
        .update_pipe(second.id, PipeDraft::with_number("P-1"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    // 改为自身编号不算冲突
    let same = api
        .update_pipe(second.id, PipeDraft::with_number("P-2"))
        .await
        .unwrap();
    assert_eq!(same.pipe_number, "P-2");
}

#[tokio::test]
async fn test_update_validates_and_reports_missing() {
    let (_temp, api) = sqlite_api();
    let created = api.create_pipe(PipeDraft::with_number("P-1")).await.unwrap();

    let mut bad = PipeDraft::default();
    bad.weight = Some(-3.0);
    let err = api.update_pipe(created.id, bad).await.unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    let err = api
        .update_pipe(9_999, PipeDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_delete() {
    let (_temp, api) = sqlite_api();
    let created = api.create_pipe(PipeDraft::with_number("P-1")).await.unwrap();

    api.delete_pipe(created.id).await.unwrap();
    assert!(api.get_pipe_by_id(created.id).await.unwrap().is_none());

    let err = api.delete_pipe(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_create_checks_guard_before_store() {
    let repo = Arc::new(MockPipeRepository::new());
    let api = PipeApi::new(Arc::clone(&repo));

    api.create_pipe(PipeDraft::with_number("M-1")).await.unwrap();
    let err = api
        .create_pipe(PipeDraft::with_number("M-1"))
        .await
        .unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(repo.create_calls(), 1);

    // 校验失败同样不触发写入
    let mut invalid = PipeDraft::with_number("M-2");
    invalid.length = Some(-1.0);
    assert!(api.create_pipe(invalid).await.is_err());
    assert_eq!(repo.create_calls(), 1);
}

#[tokio::test]
async fn test_unique_violation_maps_to_duplicate() {
    let repo = Arc::new(BlindGuardRepository::new());
    let api = PipeApi::new(Arc::clone(&repo));

    api.create_pipe(PipeDraft::with_number("U-1")).await.unwrap();
    let err = api
        .create_pipe(PipeDraft::with_number("U-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::DuplicateKey(ref n) if n == "U-1"));
    assert_eq!(repo.create_calls(), 2);
}
