/// 介護イベントエントリ
///
/// 種別ごとのペイロード検証と、システムが付与するフィールド（ID、タイムスタンプ）の生成を行う。
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::event_kind::{EventError, EventKind};
use super::id::new_id;

/// 体重イベントのペイロード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightData {
    pub weight: f64,
}

/// 種別ごとの型付きペイロード
///
/// JSONでは`{"type": "<Kind>", "data": {...}}`の形をとり、
/// ペイロードを持たない種別では`data`が出力されない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    Shower,
    Medication,
    Urination,
    BowelMovement,
    Weight(WeightData),
}

impl EventPayload {
    /// 呼び出し元が指定したデータを種別のスキーマで厳密にデコードする
    ///
    /// - ペイロードを持たない種別: 省略、`null`、`{}`のみ許可
    /// - Weight: データ必須。未知フィールド、`weight`の欠落・型違いはエラー
    pub fn from_data(kind: EventKind, data: Option<&Value>) -> Result<Self, EventError> {
        let data = data.filter(|v| !v.is_null());

        let payload = match kind {
            EventKind::Shower => EventPayload::Shower,
            EventKind::Medication => EventPayload::Medication,
            EventKind::Urination => EventPayload::Urination,
            EventKind::BowelMovement => EventPayload::BowelMovement,
            EventKind::Weight => {
                let value = data.ok_or(EventError::MissingData(kind.name()))?;
                let weight = WeightData::deserialize(value).map_err(|e| EventError::InvalidData {
                    kind: kind.name(),
                    reason: e.to_string(),
                })?;
                return Ok(EventPayload::Weight(weight));
            }
        };

        match data {
            None => Ok(payload),
            Some(Value::Object(map)) if map.is_empty() => Ok(payload),
            Some(Value::Object(map)) => {
                let fields: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(EventError::InvalidData {
                    kind: kind.name(),
                    reason: format!("unknown fields: {}", fields.join(", ")),
                })
            }
            Some(_) => Err(EventError::InvalidData {
                kind: kind.name(),
                reason: "data must be an object".to_string(),
            }),
        }
    }

    /// ストアから読み出した属性からペイロードを復元する
    pub fn from_stored(kind: EventKind, weight: Option<f64>) -> Result<Self, EventError> {
        match weight {
            Some(weight) if kind.has_data() => Ok(EventPayload::Weight(WeightData { weight })),
            _ => Self::from_data(kind, None),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Shower => EventKind::Shower,
            EventPayload::Medication => EventKind::Medication,
            EventPayload::Urination => EventKind::Urination,
            EventPayload::BowelMovement => EventKind::BowelMovement,
            EventPayload::Weight(_) => EventKind::Weight,
        }
    }

    pub fn weight(&self) -> Option<f64> {
        match self {
            EventPayload::Weight(data) => Some(data.weight),
            _ => None,
        }
    }
}

/// イベント作成時の任意項目
#[derive(Debug, Clone, Default)]
pub struct EventOptions {
    pub timestamp: Option<String>,
    pub data: Option<Value>,
    pub note: Option<String>,
}

/// 受給者に記録された介護イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub event_id: String,
    pub receiver_id: String,
    pub user_id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub payload: EventPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EventEntry {
    /// 種別名からイベントを構築する
    ///
    /// # 処理フロー
    /// 1. 種別名を解決（未対応ならエラー）
    /// 2. データを種別のスキーマで検証
    /// 3. `<Kind>#<uuid>`のIDとタイムスタンプを付与
    pub fn new(
        receiver_id: impl Into<String>,
        user_id: impl Into<String>,
        kind_name: &str,
        options: EventOptions,
    ) -> Result<Self, EventError> {
        let kind = EventKind::from_name(kind_name)?;
        let payload = EventPayload::from_data(kind, options.data.as_ref())?;

        Ok(Self {
            event_id: new_id(kind.name()),
            receiver_id: receiver_id.into(),
            user_id: user_id.into(),
            timestamp: resolve_timestamp(options.timestamp.as_deref()),
            payload,
            note: options.note,
        })
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// 呼び出し元のタイムスタンプがRFC 3339として妥当ならそのまま使い、
/// それ以外は現在のUTC時刻（ミリ秒精度）を返す
pub fn resolve_timestamp(requested: Option<&str>) -> String {
    match requested {
        Some(ts) if DateTime::parse_from_rfc3339(ts).is_ok() => ts.to_string(),
        Some(ts) => {
            warn!(timestamp = ts, "不正なタイムスタンプのため現在時刻を使用");
            now_timestamp()
        }
        None => now_timestamp(),
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
