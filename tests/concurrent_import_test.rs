// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 多文件并发导入时每个管道编号只落库一次
// ==========================================


use pipe_inventory::api::{ImportApi, PipeApi, UploadedFile};
use pipe_inventory::domain::RowStatus;
use pipe_inventory::logging;
use pipe_inventory::repository::PipeRepositoryImpl;
use std::sync::Arc;
use test_helpers::{build_xlsx, create_test_db, key_row};

#[tokio::test]
async fn test_upload_many_keeps_order_and_isolates_files() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();
    let api = ImportApi::open(&db_path).unwrap();

    let files = vec![
        UploadedFile::new("first.xlsx", build_xlsx(&[key_row("S-1"), key_row("S-2")])),
        UploadedFile::new("broken.xlsx", b"garbage".to_vec()),
        UploadedFile::new("notes.txt", b"hello".to_vec()),
        UploadedFile::new("second.xlsx", build_xlsx(&[key_row("S-2"), key_row("S-3")])),
    ];

    let results = api.upload_many(files).await;
    assert_eq!(results.len(), 4);

    // 不支持的格式仅影响自身
    assert!(results[2].is_err());

    let broken = results[1].as_ref().unwrap();
    assert!(!broken.success);
    assert_eq!(broken.total_records, 0);

    let first = results[0].as_ref().unwrap();
    let second = results[3].as_ref().unwrap();
    assert_eq!(first.successful_records + second.successful_records, 3);

    let skipped: usize = [first, second]
        .iter()
        .flat_map(|r| r.outcomes.iter())
        .filter(|o| o.status == RowStatus::SkippedDuplicate)
        .count();
    assert_eq!(skipped, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_uploads_never_duplicate_keys() {
    logging::init_test();
    let (_temp, db_path) = create_test_db().unwrap();

    // 每个任务独立连接，同一批编号互相竞争
    let mut handles = Vec::new();
    for _ in 0..4 {
        let db_path = db_path.clone();
        let bytes = build_xlsx(&[key_row("R-1"), key_row("R-2"), key_row("R-3")]);
        handles.push(tokio::spawn(async move {
            let api = ImportApi::open(&db_path).unwrap();
            api.upload_file("race.xlsx", &bytes).await.unwrap()
        }));
    }

    let mut successful = 0;
    for handle in handles {
        let report = handle.await.unwrap();
        assert_eq!(report.total_records, 3);
        assert_eq!(
            report.successful_records + report.failed_records,
            report.total_records
        );
        for outcome in &report.outcomes {
            assert!(matches!(
                outcome.status,
                RowStatus::Succeeded | RowStatus::SkippedDuplicate
            ));
        }
        successful += report.successful_records;
    }
    assert_eq!(successful, 3);

    let api = PipeApi::new(Arc::new(PipeRepositoryImpl::new(&db_path).unwrap()));
    assert_eq!(api.list_pipes().await.unwrap().len(), 3);
}
