//! Drives expansion: store, layout, highlighting, sidebar and fetches together.
//!
//! Every user event runs its synchronous part to completion before returning; the fetch it
//! needs is handed back as a future. When that future resolves it re-checks that the tree
//! it was started for still exists before touching anything.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use log::{debug, error, info, warn};

use super::config::MindMapConfig;
use super::error::{FetchError, MindMapError};
use super::fetch::{ContentSource, MAX_SUBTOPICS};
use super::layout::LayoutEngine;
use super::palette;
use super::path::{self, Highlight};
use super::placement::{self, Batch};
use super::sidebar::{SectionId, Sidebar};
use super::store::GraphStore;
use super::topic;
use super::types::{Expansion, Node, NodeId, Point, TopicContent};

const NODE_ERROR: &str = "Error loading content. Please try again.";
const MAP_ERROR: &str = "Error creating mind map. Please try again.";

/// Network failures are warnings; a reply that could not be parsed is an error.
fn report(context: &str, err: &FetchError) {
	if err.is_network() {
		warn!("{context} failed: {err}");
	} else {
		error!("{context} failed: {err}");
	}
}

/// Everything a mind-map session owns. Lives on the UI thread.
pub struct MindMapState<L> {
	pub store: GraphStore,
	pub sidebar: Sidebar,
	pub layout: L,
	selected: Option<NodeId>,
	hovered: Option<NodeId>,
	session: u64,
	next_id: u32,
	creating: bool,
}

impl<L: LayoutEngine> MindMapState<L> {
	pub fn new(layout: L) -> Self {
		Self {
			store: GraphStore::new(),
			sidebar: Sidebar::new(),
			layout,
			selected: None,
			hovered: None,
			session: 0,
			next_id: 1,
			creating: false,
		}
	}

	/// The node whose path is persistently highlighted.
	pub fn selected(&self) -> Option<NodeId> {
		self.selected
	}

	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	/// Whether the root's content is still being fetched.
	pub fn is_creating(&self) -> bool {
		self.creating
	}

	/// Bumped on every new root topic; responses from older sessions are dropped.
	pub fn session(&self) -> u64 {
		self.session
	}

	/// Starts a fresh tree. The sidebar log is kept.
	fn reset(&mut self) {
		self.store.clear();
		self.layout.clear();
		self.selected = None;
		self.hovered = None;
		self.next_id = 1;
		self.session += 1;
	}

	fn allocate_id(&mut self) -> NodeId {
		let id = NodeId(self.next_id);
		self.next_id += 1;
		id
	}

	fn is_live(&self, session: u64, id: NodeId) -> bool {
		self.session == session && self.store.get_node(id).is_some()
	}

	/// Re-applies the selection highlight over base styles.
	fn refresh_highlight(&mut self) {
		path::reset_styles(&mut self.store);
		if let Some(id) = self.selected {
			if !id.is_root() {
				path::highlight_path(
					&mut self.store,
					id,
					palette::SELECTED_PATH,
					Highlight::Persistent,
				);
			}
		}
	}

	fn neighbourhood(&self, id: NodeId) -> Vec<NodeId> {
		let mut ids = vec![id];
		ids.extend(self.store.connected_node_ids(id));
		ids
	}

	/// Adds up to [`MAX_SUBTOPICS`] children of `parent` and returns their ids.
	fn add_children(
		&mut self,
		parent: NodeId,
		subtopics: &[String],
		batch: Batch,
		config: &MindMapConfig,
	) -> Vec<NodeId> {
		let Some(parent_node) = self.store.get_node(parent) else {
			return Vec::new();
		};
		let mut child_path = parent_node.context_path.clone();
		child_path.push(parent_node.as_path_entry());

		let topics = &subtopics[..subtopics.len().min(MAX_SUBTOPICS)];
		let positions = self.child_positions(parent, topics.len(), batch, config);
		let additional_set = match batch {
			Batch::First => 0,
			Batch::Additional { generation } => generation,
		};

		let mut added = Vec::with_capacity(topics.len());
		for (index, subtopic) in topics.iter().enumerate() {
			let id = self.allocate_id();
			let mut child = Node::child(id, subtopic, child_path.clone(), additional_set);
			child.position = positions.get(index).copied();
			self.store.add_node(child);
			self.store
				.add_edge(parent, id, palette::edge_style(additional_set));
			self.layout.insert(id, positions.get(index).copied());
			self.layout.connect(parent, id);
			added.push(id);
		}
		debug!("node {parent}: added {} children ({batch:?})", added.len());
		added
	}

	fn child_positions(
		&self,
		parent: NodeId,
		count: usize,
		batch: Batch,
		config: &MindMapConfig,
	) -> Vec<Point> {
		// Without a laid-out parent the engine places children itself.
		let Some(origin) = self.layout.position(parent) else {
			return Vec::new();
		};
		let connected = self.store.connected_node_ids(parent);
		let occupied: Vec<Point> = connected
			.iter()
			.filter_map(|&id| self.layout.position(id))
			.collect();
		placement::place_children(
			origin,
			&occupied,
			connected.len(),
			count,
			batch,
			&config.placement,
		)
	}
}

/// What the asynchronous half of a node activation has to do.
enum Pending {
	First {
		topic: String,
		ancestry: Vec<String>,
		loading: SectionId,
	},
	More {
		topic: String,
		ancestry: Vec<String>,
		/// The generation being requested, one past the node's current count.
		generation: u32,
		/// Set when nothing was cached to show in place of the placeholder.
		loading: Option<SectionId>,
	},
}

/// Orchestrates the mind map on top of a [`ContentSource`] and a [`LayoutEngine`].
pub struct ExpansionController<S, L> {
	source: Rc<S>,
	state: Rc<RefCell<MindMapState<L>>>,
	config: Rc<MindMapConfig>,
	listener: Option<Rc<dyn Fn(&Sidebar)>>,
}

impl<S, L> Clone for ExpansionController<S, L> {
	fn clone(&self) -> Self {
		Self {
			source: self.source.clone(),
			state: self.state.clone(),
			config: self.config.clone(),
			listener: self.listener.clone(),
		}
	}
}

impl<S, L> ExpansionController<S, L>
where
	S: ContentSource + 'static,
	L: LayoutEngine + 'static,
{
	pub fn new(source: S, layout: L, config: MindMapConfig) -> Self {
		Self {
			source: Rc::new(source),
			state: Rc::new(RefCell::new(MindMapState::new(layout))),
			config: Rc::new(config),
			listener: None,
		}
	}

	/// Calls `listener` with the sidebar after every change to it.
	pub fn with_listener(mut self, listener: impl Fn(&Sidebar) + 'static) -> Self {
		self.listener = Some(Rc::new(listener));
		self
	}

	pub fn state(&self) -> Ref<'_, MindMapState<L>> {
		self.state.borrow()
	}

	/// Shared handle for the renderer.
	pub fn shared_state(&self) -> Rc<RefCell<MindMapState<L>>> {
		self.state.clone()
	}

	fn notify(&self) {
		if let Some(listener) = &self.listener {
			listener(&self.state.borrow().sidebar);
		}
	}

	/// Starts a new map for `raw`, discarding the current one.
	///
	/// Blank input is rejected without touching any state. Otherwise the root is created
	/// right away and the returned future fetches its content and first children.
	pub fn submit(&self, raw: &str) -> Result<impl Future<Output = ()> + use<S, L>, MindMapError> {
		let topic = match topic::validate(raw) {
			Ok(topic) => topic,
			Err(err) => {
				debug!("rejected empty topic");
				return Err(err);
			}
		};
		info!("new mind map for {topic:?}");

		let (session, loading) = {
			let mut state = self.state.borrow_mut();
			state.reset();
			let root = state.allocate_id();
			debug_assert!(root.is_root());
			let center = state.layout.viewport_center();
			let mut node = Node::root(&topic);
			node.position = Some(center);
			state.store.add_node(node);
			state.layout.insert(root, Some(center));
			state.selected = Some(root);
			state.creating = true;
			let loading = state.sidebar.show_loading(&topic);
			(state.session, loading)
		};
		self.notify();

		let this = self.clone();
		Ok(async move {
			let reply = this.source.create_map(&topic).await;
			this.finish_map(session, loading, &topic, reply);
		})
	}

	fn finish_map(
		&self,
		session: u64,
		loading: SectionId,
		topic: &str,
		reply: Result<TopicContent, FetchError>,
	) {
		{
			let mut state = self.state.borrow_mut();
			state.sidebar.remove_loading(loading);
			if !state.is_live(session, NodeId::ROOT) {
				debug!("dropping stale map for {topic:?}");
				drop(state);
				self.notify();
				return;
			}
			state.creating = false;
			match reply {
				Ok(reply) => {
					state.store.update_node(NodeId::ROOT, |root| {
						root.content = Some(reply.content.clone());
						root.expansion = Expansion::Expanded { count: 1 };
					});
					self.place_ring(&mut state, &reply.subtopics);
					state.sidebar.show_content(topic, &reply.content);
					state.refresh_highlight();
					let all = state.store.node_ids();
					state.layout.settle(self.config.settle_secs);
					state.layout.fit(&all, self.config.fit);
				}
				Err(err) => {
					report(&format!("creating mind map for {topic:?}"), &err);
					state.sidebar.show_error(topic, MAP_ERROR);
				}
			}
		}
		self.notify();
	}

	/// The root's first children go on a ring around it.
	fn place_ring(&self, state: &mut MindMapState<L>, subtopics: &[String]) {
		let Some(center) = state.layout.position(NodeId::ROOT) else {
			state.add_children(NodeId::ROOT, subtopics, Batch::First, &self.config);
			return;
		};
		let Some(root) = state.store.get_node(NodeId::ROOT) else {
			return;
		};
		let context = vec![root.as_path_entry()];
		let topics = &subtopics[..subtopics.len().min(MAX_SUBTOPICS)];
		let positions = placement::ring(center, topics.len(), &self.config.placement);
		for (subtopic, position) in topics.iter().zip(positions) {
			let id = state.allocate_id();
			let mut child = Node::child(id, subtopic, context.clone(), 0);
			child.position = Some(position);
			state.store.add_node(child);
			state.store.add_edge(NodeId::ROOT, id, palette::edge_style(0));
			state.layout.insert(id, Some(position));
			state.layout.connect(NodeId::ROOT, id);
		}
	}

	/// Handles a click on `id`.
	///
	/// Highlights and frames the node and shows a loading entry at once. The returned future
	/// fetches the first expansion, or one more generation if the node is already expanded.
	pub fn activate(&self, id: NodeId) -> impl Future<Output = ()> + use<S, L> {
		let started = self.begin_activation(id);
		self.notify();

		let this = self.clone();
		async move {
			let Some((session, pending)) = started else {
				return;
			};
			match pending {
				Pending::First {
					topic,
					ancestry,
					loading,
				} => {
					info!("expanding {topic:?}");
					let reply = this.source.expand(&topic, &ancestry, 1).await;
					this.finish_first(session, id, loading, reply);
				}
				Pending::More {
					topic,
					ancestry,
					generation,
					loading,
				} => {
					info!("requesting generation {generation} for {topic:?}");
					let reply = this.source.expand(&topic, &ancestry, generation).await;
					this.finish_more(session, id, loading, reply);
				}
			}
		}
	}

	fn begin_activation(&self, id: NodeId) -> Option<(u64, Pending)> {
		let mut state = self.state.borrow_mut();
		let node = state.store.get_node(id)?.clone();

		state.selected = Some(id);
		state.refresh_highlight();
		let framed = state.neighbourhood(id);
		state.layout.fit(&framed, self.config.fit);

		let loading = state.sidebar.show_loading(&node.full_topic);
		let ancestry: Vec<String> = path::ancestry_path(&state.store, id)
			.into_iter()
			.map(|entry| entry.topic)
			.collect();

		let pending = if !node.is_expanded() {
			Pending::First {
				topic: node.full_topic,
				ancestry,
				loading,
			}
		} else {
			let loading = match &node.content {
				Some(content) => {
					state.sidebar.remove_loading(loading);
					state.sidebar.show_content(&node.full_topic, content);
					None
				}
				None => Some(loading),
			};
			let generation = node.expand_count() + 1;
			Pending::More {
				topic: node.full_topic,
				ancestry,
				generation,
				loading,
			}
		};
		Some((state.session, pending))
	}

	fn finish_first(
		&self,
		session: u64,
		id: NodeId,
		loading: SectionId,
		reply: Result<TopicContent, FetchError>,
	) {
		{
			let mut state = self.state.borrow_mut();
			state.sidebar.remove_loading(loading);
			if !state.is_live(session, id) {
				debug!("dropping stale expansion of node {id}");
				drop(state);
				self.notify();
				return;
			}
			let Some(topic) = state.store.get_node(id).map(|node| node.full_topic.clone()) else {
				return;
			};
			match reply {
				Ok(reply) => {
					state.sidebar.show_content(&topic, &reply.content);
					let raced = state.store.get_node(id).is_some_and(Node::is_expanded);
					if raced {
						debug!("node {id} was expanded meanwhile; keeping its children");
					} else {
						state.store.update_node(id, |node| {
							node.content = Some(reply.content.clone());
							node.expansion = Expansion::Expanded { count: 1 };
						});
						state.add_children(id, &reply.subtopics, Batch::First, &self.config);
						self.settle_around(&mut state, id);
					}
				}
				Err(err) => {
					report(&format!("expanding node {id}"), &err);
					state.sidebar.show_error(&topic, NODE_ERROR);
				}
			}
		}
		self.notify();
	}

	fn finish_more(
		&self,
		session: u64,
		id: NodeId,
		loading: Option<SectionId>,
		reply: Result<TopicContent, FetchError>,
	) {
		{
			let mut state = self.state.borrow_mut();
			if let Some(loading) = loading {
				state.sidebar.remove_loading(loading);
			}
			if !state.is_live(session, id) {
				debug!("dropping stale re-expansion of node {id}");
				drop(state);
				self.notify();
				return;
			}
			match reply {
				Ok(reply) => {
					let Some(node) = state.store.get_node(id) else {
						return;
					};
					let generation = node.expand_count();
					let topic = node.full_topic.clone();
					let uncached = node.content.is_none();
					state.add_children(
						id,
						&reply.subtopics,
						Batch::Additional { generation },
						&self.config,
					);
					state.store.update_node(id, |node| {
						node.expansion = Expansion::Expanded {
							count: generation + 1,
						};
						if uncached {
							node.content = Some(reply.content.clone());
						}
					});
					if loading.is_some() {
						state.sidebar.show_content(&topic, &reply.content);
					}
					self.settle_around(&mut state, id);
				}
				// Already visible content stays as it is.
				Err(err) => report(&format!("fetching more subtopics for node {id}"), &err),
			}
		}
		self.notify();
	}

	/// Strong physics, then frame the parent and its children.
	fn settle_around(&self, state: &mut MindMapState<L>, id: NodeId) {
		state.refresh_highlight();
		let framed = state.neighbourhood(id);
		state.layout.settle(self.config.settle_secs);
		state.layout.fit(&framed, self.config.fit);
	}

	/// Transient highlight of the path to `id`, drawn over the selection.
	pub fn hover(&self, id: NodeId) {
		let mut state = self.state.borrow_mut();
		if state.store.get_node(id).is_none() {
			return;
		}
		state.hovered = Some(id);
		path::highlight_path(&mut state.store, id, palette::HOVER_PATH, Highlight::Transient);
	}

	/// Ends hover highlighting and restores the selection's path.
	pub fn unhover(&self) {
		let mut state = self.state.borrow_mut();
		state.hovered = None;
		state.refresh_highlight();
	}
}
