//! The exploration log shown next to the map, newest entry first.

/// Stable handle of a sidebar section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionBody {
	Loading,
	Paragraphs(Vec<String>),
	Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
	pub id: SectionId,
	pub title: String,
	pub body: SectionBody,
}

/// Most-recent-first stack of content sections plus the welcome placeholder.
#[derive(Clone, Debug)]
pub struct Sidebar {
	sections: Vec<Section>,
	next_id: u64,
	welcome_visible: bool,
}

impl Default for Sidebar {
	fn default() -> Self {
		Self {
			sections: Vec::new(),
			next_id: 0,
			welcome_visible: true,
		}
	}
}

impl Sidebar {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	/// Whether the welcome text is still shown. Hidden for good by the first content.
	pub fn welcome_visible(&self) -> bool {
		self.welcome_visible
	}

	/// Puts a loading placeholder on top and returns its handle.
	pub fn show_loading(&mut self, title: &str) -> SectionId {
		self.push(title, SectionBody::Loading)
	}

	/// Removes the placeholder `id`; false if it is already gone.
	pub fn remove_loading(&mut self, id: SectionId) -> bool {
		let before = self.sections.len();
		self.sections
			.retain(|section| !(section.id == id && section.body == SectionBody::Loading));
		self.sections.len() != before
	}

	pub fn show_content(&mut self, title: &str, text: &str) -> SectionId {
		self.welcome_visible = false;
		self.push(title, SectionBody::Paragraphs(split_paragraphs(text)))
	}

	pub fn show_error(&mut self, title: &str, message: &str) -> SectionId {
		self.push(title, SectionBody::Error(message.to_string()))
	}

	fn push(&mut self, title: &str, body: SectionBody) -> SectionId {
		self.next_id += 1;
		let id = SectionId(self.next_id);
		self.sections.insert(
			0,
			Section {
				id,
				title: title.to_string(),
				body,
			},
		);
		id
	}
}

/// Splits `text` for reading.
///
/// Blank lines win when present; otherwise the sentences are halved into two paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
	let explicit: Vec<String> = text
		.split("\n\n")
		.map(str::trim)
		.filter(|p| !p.is_empty())
		.map(String::from)
		.collect();
	if explicit.len() > 1 {
		return explicit;
	}

	let text = text.trim();
	if text.is_empty() {
		return Vec::new();
	}
	let sentences: Vec<&str> = text.split(". ").collect();
	let per_paragraph = sentences.len().div_ceil(2);
	sentences
		.chunks(per_paragraph)
		.map(|chunk| {
			let paragraph = chunk.join(". ");
			let paragraph = paragraph.trim();
			if paragraph.ends_with(['.', '!', '?']) {
				paragraph.to_string()
			} else {
				format!("{paragraph}.")
			}
		})
		.collect()
}
