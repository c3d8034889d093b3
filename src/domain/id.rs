/// プレフィックス付きID生成
///
/// すべてのエンティティIDは`<Kind>#<uuid>`形式をとる。
use uuid::Uuid;

/// ユーザーIDのプレフィックス
pub const USER_PREFIX: &str = "User";

/// 受給者IDのプレフィックス
pub const RECEIVER_PREFIX: &str = "Receiver";

/// `<prefix>#<uuid-v4>`形式の新しいIDを生成する
pub fn new_id(prefix: &str) -> String {
    format!("{}#{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_has_prefix() {
        let id = new_id(USER_PREFIX);
        assert!(id.starts_with("User#"));

        let suffix = id.trim_start_matches("User#");
        assert!(Uuid::parse_str(suffix).is_ok());
    }

    #[test]
    fn test_new_id_is_unique() {
        let first = new_id(RECEIVER_PREFIX);
        let second = new_id(RECEIVER_PREFIX);
        assert_ne!(first, second);
    }
}
