use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render::{self, node_extent};
use super::state::ForceLayout;
use crate::mindmap::{ExpansionController, HttpContentSource, NodeId};

/// Controller driving the browser mind map.
pub type MindMapController = ExpansionController<HttpContentSource, ForceLayout>;

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Tells the controller about a hover change once no borrow of its state is held.
fn apply_hover(controller: &MindMapController, change: Option<Option<NodeId>>) {
	match change {
		Some(Some(id)) => {
			controller.unhover();
			controller.hover(id);
		}
		Some(None) => controller.unhover(),
		None => {}
	}
}

#[component]
pub fn MindMapCanvas(controller: MindMapController) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = controller.shared_state();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas has no 2d context");
			return;
		};
		state_init.borrow_mut().layout.resize(w, h);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			state_resize.borrow_mut().layout.resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// A fetch callback may hold the state; skip the frame instead of panicking
			if let Ok(mut s) = state_anim.try_borrow_mut() {
				s.layout.tick(0.016);
				render::render(&s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_md.borrow_mut();
		let s = &mut *guard;
		match s.layout.node_at_position(x, y, |id| node_extent(&s.store, id)) {
			Some(id) => s.layout.begin_drag(id, x, y),
			None => s.layout.begin_pan(x, y),
		}
	};

	let (state_mm, controller_mm) = (state.clone(), controller.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let change = {
			let mut guard = state_mm.borrow_mut();
			let s = &mut *guard;
			let mut change = None;
			if !s.layout.drag.active {
				let hovered = s.layout.node_at_position(x, y, |id| node_extent(&s.store, id));
				if s.layout.set_hover(hovered) {
					change = Some(hovered);
				}
			}
			s.layout.drag_to(x, y);
			change
		};
		apply_hover(&controller_mm, change);
	};

	let (state_mu, controller_mu) = (state.clone(), controller.clone());
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu.borrow_mut().layout.end_drag();
		if let Some(id) = clicked {
			spawn_local(controller_mu.activate(id));
		}
	};

	let (state_ml, controller_ml) = (state.clone(), controller.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let change = {
			let mut s = state_ml.borrow_mut();
			s.layout.end_drag();
			s.layout.set_hover(None).then_some(None)
		};
		apply_hover(&controller_ml, change);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		state_wh.borrow_mut().layout.zoom_at(x, y, factor);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="mind-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
