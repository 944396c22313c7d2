// ==========================================
// 管道库存系统 - 命令行入口
// ==========================================
// 用法:
//   pipe-inventory import <file> [more files...]
//   pipe-inventory get <pipe_number>
//   pipe-inventory list [status]
//   pipe-inventory count <status>
// 输出: 格式化 JSON（stdout），日志写入 stderr
// ==========================================

use anyhow::{anyhow, bail, Context};
use pipe_inventory::app::{get_default_db_path, AppState};
use pipe_inventory::{PipeStatus, UploadedFile};
use serde::Serialize;
use std::path::Path;

const USAGE: &str =
    "usage: pipe-inventory <import FILE... | get PIPE_NUMBER | list [STATUS] | count STATUS>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pipe_inventory::logging::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;
    let rest: Vec<String> = args.collect();

    let db_path = get_default_db_path();
    tracing::info!(
        "{} v{}，数据库: {}",
        pipe_inventory::APP_NAME,
        pipe_inventory::VERSION,
        db_path
    );
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "import" => {
            if rest.is_empty() {
                bail!(USAGE);
            }
            let mut files = Vec::with_capacity(rest.len());
            for path in &rest {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("failed to read {}", path))?;
                let file_name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.clone());
                files.push(UploadedFile::new(file_name, bytes));
            }

            let results = state.import_api.upload_many(files).await;
            let mut reports = Vec::with_capacity(results.len());
            for (path, result) in rest.iter().zip(results) {
                match result {
                    Ok(report) => reports.push(report),
                    Err(e) => bail!("{}: {}", path, e),
                }
            }
            print_json(&reports)?;
        }
        "get" => {
            let number = rest.first().ok_or_else(|| anyhow!(USAGE))?;
            let pipe = state.pipe_api.get_pipe_by_number(number).await?;
            match pipe {
                Some(pipe) => print_json(&pipe)?,
                None => bail!("pipe not found: {}", number),
            }
        }
        "list" => {
            let pipes = match rest.first() {
                Some(raw) => {
                    let status: PipeStatus = raw.parse().map_err(|e: String| anyhow!(e))?;
                    state.pipe_api.list_by_status(status).await?
                }
                None => state.pipe_api.list_pipes().await?,
            };
            print_json(&pipes)?;
        }
        "count" => {
            let raw = rest.first().ok_or_else(|| anyhow!(USAGE))?;
            let status: PipeStatus = raw.parse().map_err(|e: String| anyhow!(e))?;
            let count = state.pipe_api.count_by_status(status).await?;
            print_json(&serde_json::json!({ "status": status, "count": count }))?;
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
