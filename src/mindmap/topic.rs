use super::error::MindMapError;

/// Labels keep at most this many words.
pub const MAX_LABEL_WORDS: usize = 4;

const ELLIPSIS: &str = "...";

/// A topic as shown on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayTopic {
	pub label: String,
	/// The full topic, present only when the label was shortened.
	pub tooltip: Option<String>,
}

/// Shortens `topic` to its first four words.
pub fn truncate(topic: &str) -> DisplayTopic {
	let words: Vec<&str> = topic.split_whitespace().collect();
	if words.len() <= MAX_LABEL_WORDS {
		return DisplayTopic {
			label: topic.to_string(),
			tooltip: None,
		};
	}
	DisplayTopic {
		label: format!("{}{}", words[..MAX_LABEL_WORDS].join(" "), ELLIPSIS),
		tooltip: Some(topic.to_string()),
	}
}

/// Trims user input, rejecting blank submissions.
pub fn validate(raw: &str) -> Result<String, MindMapError> {
	let topic = raw.trim();
	if topic.is_empty() {
		return Err(MindMapError::EmptyTopic);
	}
	Ok(topic.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn long_topics_keep_four_words() {
		let display = truncate("Solar System Formation And Evolution");
		assert_eq!(display.label, "Solar System Formation And...");
		assert_eq!(
			display.tooltip.as_deref(),
			Some("Solar System Formation And Evolution")
		);
	}

	#[test]
	fn short_topics_are_untouched() {
		let display = truncate("Black Holes");
		assert_eq!(display.label, "Black Holes");
		assert_eq!(display.tooltip, None);

		let four = truncate("One Two Three Four");
		assert_eq!(four.label, "One Two Three Four");
		assert!(four.tooltip.is_none());
	}

	#[test]
	fn blank_input_is_rejected() {
		assert!(matches!(validate("   \t"), Err(MindMapError::EmptyTopic)));
		assert_eq!(validate("  Coffee \n").unwrap(), "Coffee");
	}
}
