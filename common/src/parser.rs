//! APIレスポンスパーサー
//!
//! モデルのテキストレスポンスからJSON部分を抽出し、
//! 抽出レコードをパースする

use crate::codec::decode_record;
use crate::error::{Error, Result};
use crate::types::ExtractionRecord;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 最外の {...} オブジェクト
/// 3. エラー
///
/// # Arguments
/// * `response` - APIレスポンス文字列
///
/// # Returns
/// * `Ok(&str)` - 抽出されたJSON文字列
/// * `Err` - JSONが見つからない場合
///
/// # Examples
/// ```
/// use report_ai_common::extract_json;
///
/// let response = "{\"report_title\": \"t\", \"test_results\": []}";
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("report_title"));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 最外の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 抽出レスポンスをパース
///
/// モデルのレスポンステキストからレコードを取り出す。
/// JSON抽出後のスキーマ検証はコーデックが行う。
///
/// # Arguments
/// * `response` - モデルのレスポンステキスト
///
/// # Returns
/// * `Ok(ExtractionRecord)` - パース成功
/// * `Err` - JSONが見つからないかスキーマ違反
pub fn parse_report_response(response: &str) -> Result<ExtractionRecord> {
    let json_str = extract_json(response)?;
    decode_record(json_str.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the extraction:
```json
{
  "report_title": "Blood Routine Test",
  "test_results": []
}
```
Some additional text."#;

        let json = extract_json(response).unwrap();
        assert!(json.contains("report_title"));
        assert!(json.contains("Blood Routine Test"));
    }

    #[test]
    fn test_extract_json_raw() {
        let response = r#"{"report_title": "t", "test_results": []}"#;

        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"report_title": "t", "test_results": []}"#);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Here is the result: {"key": "value"} and some more text."#;

        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"key": "value"}"#);
    }

    #[test]
    fn test_extract_json_nested_objects() {
        let response = r#"{"outer": {"inner": [1, 2]}, "test_results": []}"#;

        let json = extract_json(response).unwrap();
        assert!(json.contains("outer"));
        assert!(json.contains("inner"));
    }

    #[test]
    fn test_extract_json_error() {
        let response = "No JSON here, just plain text.";

        let result = extract_json(response);
        assert!(result.is_err());
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("JSONが見つかりません"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_extract_json_empty_response() {
        let response = "";

        let result = extract_json(response);
        assert!(result.is_err());
    }

    // =============================================
    // parse_report_response テスト
    // =============================================

    #[test]
    fn test_parse_report_response() {
        let response = r#"```json
{
  "report_title": "Urine Analysis Report",
  "test_results": [
    {"test_name": "pH", "value": "6.0", "unit": "", "range": "4.5-8.0"}
  ]
}
```"#;

        let record = parse_report_response(response).unwrap();
        assert_eq!(record.report_title, "Urine Analysis Report");
        assert_eq!(record.test_results.len(), 1);
        assert_eq!(record.test_results[0].test_name, "pH");
        assert_eq!(record.test_results[0].range, "4.5-8.0");
    }

    #[test]
    fn test_parse_report_response_raw_json() {
        let response = r#"{"report_title": "t", "test_results": []}"#;

        let record = parse_report_response(response).unwrap();
        assert_eq!(record.report_title, "t");
        assert!(record.test_results.is_empty());
    }

    #[test]
    fn test_parse_report_response_not_json() {
        let result = parse_report_response("not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_report_response_schema_violation() {
        // JSONとしては正しいがスキーマ違反
        let result = parse_report_response(r#"{"title": "wrong keys"}"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
