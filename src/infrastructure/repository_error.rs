/// リポジトリ共通のエラー型と書き込み結果
use thiserror::Error;

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// 保存済みアイテムの変換に失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 条件付き書き込みの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// 新規に保存された
    Created,
    /// 同じキーのアイテムが既に存在した
    AlreadyExists,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        assert_eq!(
            RepositoryError::WriteError("throttled".to_string()).to_string(),
            "Write error: throttled"
        );
        assert_eq!(
            RepositoryError::ReadError("timeout".to_string()).to_string(),
            "Read error: timeout"
        );
        assert_eq!(
            RepositoryError::SerializationError("Missing email field".to_string()).to_string(),
            "Serialization error: Missing email field"
        );
    }

    #[test]
    fn test_repository_error_equality() {
        assert_ne!(
            RepositoryError::WriteError("x".to_string()),
            RepositoryError::ReadError("x".to_string())
        );
    }
}
