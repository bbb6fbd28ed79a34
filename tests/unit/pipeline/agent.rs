use std::sync::Mutex;

use super::*;

/// Replays canned responses in order; the last one repeats.
struct Scripted {
    responses: Vec<VibeResult<String>>,
    calls: Mutex<usize>,
}

impl Scripted {
    fn new(responses: Vec<VibeResult<String>>) -> Self {
        Self {
            responses,
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl TextGenerator for Scripted {
    fn generate(&self, _system: &str, _user: &str) -> VibeResult<String> {
        let mut calls = self.calls.lock().unwrap();
        let i = (*calls).min(self.responses.len() - 1);
        *calls += 1;
        match &self.responses[i] {
            Ok(s) => Ok(s.clone()),
            Err(e) => Err(VibeError::provider(e.to_string())),
        }
    }
}

#[derive(Debug, serde::Deserialize, PartialEq)]
struct Themes {
    key_themes: Vec<String>,
}

#[test]
fn strips_code_fences() {
    assert_eq!(clean_json_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    assert_eq!(clean_json_fences("  {\"a\":1} "), "{\"a\":1}");
}

#[test]
fn rejects_empty_and_malformed_payloads() {
    assert!(parse_agent_json("{}").is_err());
    assert!(parse_agent_json("null").is_err());
    assert!(parse_agent_json("not json").is_err());
    assert!(parse_agent_json("```json {\"a\": 1} ```").is_ok());
}

#[test]
fn succeeds_after_transient_failures() {
    let generator = Scripted::new(vec![
        Err(VibeError::provider("boom")),
        Ok("{}".to_string()),
        Ok("```json {\"key_themes\": [\"x\"]} ```".to_string()),
    ]);
    let outcome: AgentOutcome<Themes> = call_with_retry(&generator, 2, "s", "u");
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(
        outcome.into_result("Analyst").unwrap(),
        Themes {
            key_themes: vec!["x".to_string()]
        }
    );
    assert_eq!(generator.calls(), 3);
}

#[test]
fn exhausts_after_max_retries_plus_one() {
    let generator = Scripted::new(vec![Ok("{\"other\": 1}".to_string())]);
    let outcome: AgentOutcome<Themes> = call_with_retry(&generator, 2, "s", "u");
    assert!(!outcome.is_success());
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(generator.calls(), 3);
    let err = outcome.into_result("Analyst").unwrap_err();
    match err {
        VibeError::Pipeline(msg) => assert!(msg.contains("Analyst"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_retries_means_one_attempt() {
    let generator = Scripted::new(vec![Err(VibeError::provider("down"))]);
    let outcome: AgentOutcome<Themes> = call_with_retry(&generator, 0, "s", "u");
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(generator.calls(), 1);
}
