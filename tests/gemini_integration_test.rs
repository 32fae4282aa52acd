use report_ai_common::parse_report_response;
use serde_json::json;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[tokio::test]
async fn gemini_extraction_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let prompt = r#"Return ONLY a JSON object exactly in this format:
{
  "report_title": "integration-test",
  "test_results": [
    {
      "test_name": "WBC",
      "value": "6.2",
      "unit": "10^9/L",
      "range": "3.5-9.5"
    }
  ]
}
"#;

    let body = json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "temperature": 0.0,
            "responseMimeType": "application/json"
        }
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}?key={}", GEMINI_API_URL, api_key))
        .json(&body)
        .send()
        .await
        .expect("request failed");

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        panic!("gemini api failed with status {}: {}", status, text);
    }

    let payload: serde_json::Value = response.json().await.expect("invalid json response");
    let text = payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .expect("response text missing");

    let record = parse_report_response(text).expect("failed to parse extraction response");
    assert_eq!(record.report_title, "integration-test");
    assert_eq!(record.test_results.len(), 1);
    assert_eq!(record.test_results[0].test_name, "WBC");
}
