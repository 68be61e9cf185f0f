//! Requests to the language-model backed content source.

use std::future::Future;

use log::debug;
use serde::Deserialize;

use super::error::FetchError;
use super::types::TopicContent;

/// Subtopics kept per expansion.
pub const MAX_SUBTOPICS: usize = 4;

/// Separates ancestor topics in the `context` field. Never appears inside a topic.
pub const CONTEXT_DELIMITER: char = '|';

/// Produces explanations and subtopics. Stateless request/response.
pub trait ContentSource {
	/// Content for a brand-new root topic.
	fn create_map(&self, topic: &str) -> impl Future<Output = Result<TopicContent, FetchError>>;

	/// Content for `topic` reached through `ancestry` (root first). `generation` > 1 asks
	/// for subtopics distinct from earlier generations.
	fn expand(
		&self,
		topic: &str,
		ancestry: &[String],
		generation: u32,
	) -> impl Future<Output = Result<TopicContent, FetchError>>;
}

/// [`ContentSource`] speaking the `index.php?action=...` form-post protocol.
#[derive(Clone, Debug)]
pub struct HttpContentSource {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpContentSource {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			endpoint: endpoint.into(),
		}
	}

	async fn post(&self, action: &str, form: &[(&str, String)]) -> Result<TopicContent, FetchError> {
		let url = format!("{}?action={}", self.endpoint, action);
		debug!("POST {url}");
		let response = self
			.client
			.post(&url)
			.form(form)
			.send()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;
		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
				message: error_message(&body),
			});
		}
		parse_reply(&body)
	}
}

impl ContentSource for HttpContentSource {
	async fn create_map(&self, topic: &str) -> Result<TopicContent, FetchError> {
		self.post("create_mindmap", &[("topic", topic.to_string())])
			.await
	}

	async fn expand(
		&self,
		topic: &str,
		ancestry: &[String],
		generation: u32,
	) -> Result<TopicContent, FetchError> {
		let form = [
			("topic", topic.to_string()),
			("context", join_ancestry(ancestry)),
			("expandCount", generation.max(1).to_string()),
		];
		self.post("get_content", &form).await
	}
}

/// Joins ancestor topics with [`CONTEXT_DELIMITER`], replacing it inside topics.
pub fn join_ancestry(ancestry: &[String]) -> String {
	ancestry
		.iter()
		.map(|topic| topic.replace(CONTEXT_DELIMITER, "/"))
		.collect::<Vec<_>>()
		.join(&CONTEXT_DELIMITER.to_string())
}

/// Parses a reply body, isolating the first top-level JSON object if the body has noise
/// around it.
pub fn parse_reply(body: &str) -> Result<TopicContent, FetchError> {
	let parsed = match serde_json::from_str::<TopicContent>(body.trim()) {
		Ok(content) => content,
		Err(direct) => {
			let object = extract_json_object(body)
				.ok_or_else(|| FetchError::Malformed(format!("no JSON object: {direct}")))?;
			serde_json::from_str::<TopicContent>(object)
				.map_err(|e| FetchError::Malformed(e.to_string()))?
		}
	};
	Ok(TopicContent {
		content: parsed.content,
		subtopics: parsed
			.subtopics
			.into_iter()
			.map(|topic| topic.trim().to_string())
			.filter(|topic| !topic.is_empty())
			.take(MAX_SUBTOPICS)
			.collect(),
	})
}

/// The first balanced `{...}` block of `text`, ignoring braces inside JSON strings.
pub fn extract_json_object(text: &str) -> Option<&str> {
	let start = text.find('{')?;
	let mut depth = 0usize;
	let mut in_string = false;
	let mut escaped = false;
	for (offset, c) in text[start..].char_indices() {
		if in_string {
			match c {
				_ if escaped => escaped = false,
				'\\' => escaped = true,
				'"' => in_string = false,
				_ => {}
			}
			continue;
		}
		match c {
			'"' => in_string = true,
			'{' => depth += 1,
			'}' => {
				depth -= 1;
				if depth == 0 {
					return Some(&text[start..start + offset + 1]);
				}
			}
			_ => {}
		}
	}
	None
}

#[derive(Deserialize)]
struct ErrorBody {
	error: String,
}

fn error_message(body: &str) -> String {
	match serde_json::from_str::<ErrorBody>(body) {
		Ok(parsed) => parsed.error,
		Err(_) => body.trim().to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clean_reply_parses() {
		let reply = parse_reply(
			r#"{"content": "Coffee is brewed.", "subtopics": ["Beans", "Roasting", "Brewing", "Culture"]}"#,
		)
		.unwrap();
		assert_eq!(reply.content, "Coffee is brewed.");
		assert_eq!(reply.subtopics.len(), 4);
	}

	#[test]
	fn extra_subtopics_are_dropped() {
		let reply =
			parse_reply(r#"{"content": "x", "subtopics": ["a", "b", " ", "c", "d", "e"]}"#).unwrap();
		assert_eq!(reply.subtopics, vec!["a", "b", "c", "d"]);

		let few = parse_reply(r#"{"content": "x", "subtopics": ["a"]}"#).unwrap();
		assert_eq!(few.subtopics, vec!["a"]);
	}

	#[test]
	fn json_is_isolated_from_noise() {
		let body = "Sure! Here you go:\n```json\n{\"content\": \"Use {braces} \\\"wisely\\\"\", \"subtopics\": [\"a\"]}\n``` Anything {else}?";
		let reply = parse_reply(body).unwrap();
		assert_eq!(reply.content, "Use {braces} \"wisely\"");
		assert_eq!(reply.subtopics, vec!["a"]);
	}

	#[test]
	fn missing_fields_are_malformed() {
		assert!(matches!(
			parse_reply(r#"{"content": "only text"}"#),
			Err(FetchError::Malformed(_))
		));
		assert!(matches!(
			parse_reply("<html>502 Bad Gateway</html>"),
			Err(FetchError::Malformed(_))
		));
		assert!(matches!(
			parse_reply("{\"content\": \"never closed\""),
			Err(FetchError::Malformed(_))
		));
	}

	#[test]
	fn extraction_stops_at_first_balanced_block() {
		assert_eq!(
			extract_json_object(r#"a {"x": {"y": 1}} b {"z": 2}"#),
			Some(r#"{"x": {"y": 1}}"#)
		);
		assert_eq!(extract_json_object("no braces"), None);
	}

	#[test]
	fn ancestry_uses_reserved_delimiter() {
		let ancestry = vec!["Coffee".to_string(), "Beans | Origins".to_string()];
		assert_eq!(join_ancestry(&ancestry), "Coffee|Beans / Origins");
		assert_eq!(join_ancestry(&[]), "");
	}

	#[test]
	fn error_bodies_carry_server_message() {
		assert_eq!(error_message(r#"{"error": "Invalid action"}"#), "Invalid action");
		assert_eq!(error_message(" oops "), "oops");
		assert!(FetchError::Status { status: 500, message: String::new() }.is_network());
		assert!(!FetchError::Malformed(String::new()).is_network());
	}
}
