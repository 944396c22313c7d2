// ==========================================
// 管道库存系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 上传校验与工作表选择
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取单个上传文件的大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB（配置缺失或非法时）
    async fn get_max_upload_bytes(&self) -> Result<u64, Box<dyn Error + Send + Sync>>;

    /// 获取待导入的工作表名称
    ///
    /// # 返回
    /// - None: 使用第一个工作表
    async fn get_sheet_name(&self) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
}
