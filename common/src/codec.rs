//! レコードコーデック
//!
//! ExtractionRecordのディスク上JSONスキーマを定義し、
//! エンコード（正規形JSON）とデコード（キー存在検証付き）を行う。
//!
//! デコードはキーの存在と「文字列として扱える値」のみを検証する。
//! それ以上の型強制は行わない。

use crate::error::{Error, Result};
use crate::types::{ExtractionRecord, TestResult};
use serde_json::Value;

/// レコードを正規形JSONにエンコード
///
/// トップレベルは `report_title` と `test_results` の2キーのみ。
pub fn encode_record(record: &ExtractionRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// JSON文字列をレコードにデコード
///
/// 以下の場合に `Error::Decode` を返す:
/// - JSONとして不正
/// - `report_title` または `test_results` キーがない
/// - `test_results` が「4キーすべてを持つオブジェクト」の配列でない
pub fn decode_record(text: &str) -> Result<ExtractionRecord> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::Decode(format!("invalid JSON: {}", e)))?;

    let obj = value
        .as_object()
        .ok_or_else(|| Error::Decode("top-level JSON object expected".to_string()))?;

    let report_title = obj
        .get("report_title")
        .ok_or_else(|| Error::Decode("missing key: report_title".to_string()))
        .and_then(|v| {
            string_value(v)
                .ok_or_else(|| Error::Decode("report_title is not string-like".to_string()))
        })?;

    let rows = obj
        .get("test_results")
        .ok_or_else(|| Error::Decode("missing key: test_results".to_string()))?
        .as_array()
        .ok_or_else(|| Error::Decode("test_results must be an array".to_string()))?;

    let mut test_results = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row = row
            .as_object()
            .ok_or_else(|| Error::Decode(format!("test_results[{}] must be an object", i)))?;

        let field = |key: &str| -> Result<String> {
            let value = row.get(key).ok_or_else(|| {
                Error::Decode(format!("test_results[{}]: missing key: {}", i, key))
            })?;
            string_value(value).ok_or_else(|| {
                Error::Decode(format!("test_results[{}]: {} is not string-like", i, key))
            })
        };

        test_results.push(TestResult {
            test_name: field("test_name")?,
            value: field("value")?,
            unit: field("unit")?,
            range: field("range")?,
        });
    }

    Ok(ExtractionRecord {
        report_title,
        test_results,
    })
}

/// 文字列として扱える値を取り出す
///
/// 文字列はそのまま、数値・真偽値は文字列化して受け入れる。
/// null・配列・オブジェクトは文字列ではないのでNone。
fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ExtractionRecord {
        ExtractionRecord {
            report_title: "Blood Test Report".to_string(),
            test_results: vec![
                TestResult {
                    test_name: "Hemoglobin".to_string(),
                    value: "135".to_string(),
                    unit: "g/L".to_string(),
                    range: "130-175".to_string(),
                },
                TestResult {
                    test_name: "White Blood Cell Count".to_string(),
                    value: "6.2".to_string(),
                    unit: "10^9/L".to_string(),
                    range: "3.5-9.5".to_string(),
                },
            ],
        }
    }

    // =============================================
    // ラウンドトリップ
    // =============================================

    #[test]
    fn test_round_trip() {
        let record = sample_record();
        let encoded = encode_record(&record).unwrap();
        let decoded = decode_record(&encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_round_trip_empty_fields() {
        // 読み取れなかったセルは空文字のまま保持される
        let record = ExtractionRecord {
            report_title: "".to_string(),
            test_results: vec![TestResult::default()],
        };
        let encoded = encode_record(&record).unwrap();
        let decoded = decode_record(&encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_top_level_keys() {
        let encoded = encode_record(&sample_record()).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("report_title"));
        assert!(obj.contains_key("test_results"));
    }

    #[test]
    fn test_decode_preserves_row_order() {
        let record = decode_record(&encode_record(&sample_record()).unwrap()).unwrap();
        assert_eq!(record.test_results[0].test_name, "Hemoglobin");
        assert_eq!(record.test_results[1].test_name, "White Blood Cell Count");
    }

    // =============================================
    // デコード失敗
    // =============================================

    #[test]
    fn test_decode_not_json() {
        let result = decode_record("not json");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_not_an_object() {
        let result = decode_record(r#"["report_title"]"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_missing_report_title() {
        let result = decode_record(r#"{"test_results": []}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("report_title"));
    }

    #[test]
    fn test_decode_missing_test_results() {
        let result = decode_record(r#"{"report_title": "t"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("test_results"));
    }

    #[test]
    fn test_decode_test_results_not_array() {
        let result = decode_record(r#"{"report_title": "t", "test_results": {}}"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_row_missing_key() {
        let text = r#"{
            "report_title": "t",
            "test_results": [
                {"test_name": "WBC", "value": "6.2", "range": "3.5-9.5"}
            ]
        }"#;
        let err = decode_record(text).unwrap_err();
        assert!(err.to_string().contains("unit"));
        assert!(err.to_string().contains("test_results[0]"));
    }

    #[test]
    fn test_decode_row_not_object() {
        let text = r#"{"report_title": "t", "test_results": ["WBC"]}"#;
        assert!(matches!(decode_record(text), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_null_value_rejected() {
        let text = r#"{"report_title": null, "test_results": []}"#;
        assert!(matches!(decode_record(text), Err(Error::Decode(_))));
    }

    // =============================================
    // 文字列として扱える値
    // =============================================

    #[test]
    fn test_decode_numeric_value_accepted() {
        // モデルが数値をクォートせず返すことがある
        let text = r#"{
            "report_title": "t",
            "test_results": [
                {"test_name": "WBC", "value": 6.2, "unit": "10^9/L", "range": "3.5-9.5"}
            ]
        }"#;
        let record = decode_record(text).unwrap();
        assert_eq!(record.test_results[0].value, "6.2");
    }

    #[test]
    fn test_decode_empty_strings_accepted() {
        let text = r#"{
            "report_title": "",
            "test_results": [
                {"test_name": "", "value": "", "unit": "", "range": ""}
            ]
        }"#;
        let record = decode_record(text).unwrap();
        assert_eq!(record.report_title, "");
        assert_eq!(record.test_results.len(), 1);
    }
}
