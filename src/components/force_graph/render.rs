use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use crate::layout::{SimulationEdge, SimulationNode};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Stroke width for an edge: thicker for larger recorded amounts.
fn edge_weight(amount: Option<f64>) -> f64 {
	match amount {
		Some(a) if a > 0.0 => 1.0 + (a.log10() - 3.0).clamp(0.0, 4.0) * 0.6,
		_ => 1.0,
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let frame = state.frame.borrow();
	for edge in &frame.edges {
		draw_edge(state, ctx, &frame.nodes, edge);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	draw_nodes(state, ctx, &frame.nodes);
	ctx.restore();
}

fn draw_edge(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	nodes: &[SimulationNode],
	edge: &SimulationEdge,
) {
	let (Some(n1), Some(n2)) = (nodes.get(edge.source), nodes.get(edge.target)) else {
		return;
	};
	let k = state.transform.k;
	let info = edge.relationship.info();
	let (line_width, dash, gap, arrow_size) = (
		edge_weight(edge.amount) / k,
		8.0 / k,
		4.0 / k,
		8.0 / k,
	);
	let t = ease_out_cubic(state.hover.highlight_t);

	let (dx, dy) = (n2.x - n1.x, n2.y - n1.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	// Highlighted edges brighten while the rest fade.
	let is_highlighted =
		state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
	let (edge_alpha, width) = if is_highlighted {
		(0.6 + 0.3 * t, line_width * (1.0 + 0.3 * t))
	} else {
		(0.6 - 0.45 * t, line_width * (1.0 - 0.3 * t))
	};

	ctx.set_global_alpha(edge_alpha);
	ctx.set_stroke_style_str(info.color);
	ctx.set_line_width(width);
	if info.dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(-(state.flow_time * 30.0) % (dash + gap));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	let (ux, uy) = (dx / dist, dy / dist);
	ctx.begin_path();
	ctx.move_to(n1.x + ux * n1.radius, n1.y + uy * n1.radius);
	ctx.line_to(
		n2.x - ux * (n2.radius + arrow_size),
		n2.y - uy * (n2.radius + arrow_size),
	);
	ctx.stroke();

	ctx.set_fill_style_str(info.color);
	let (tip_x, tip_y) = (n2.x - ux * n2.radius, n2.y - uy * n2.radius);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
	ctx.set_global_alpha(1.0);
}

fn draw_label(ctx: &CanvasRenderingContext2d, node: &SimulationNode, radius: f64, k: f64, alpha: f64) {
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha));
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(&node.label, node.x + radius + 3.0, node.y + 3.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, nodes: &[SimulationNode]) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	for (idx, node) in nodes.iter().enumerate() {
		if has_highlight && state.is_highlighted(idx) {
			continue;
		}
		let (alpha, radius) = (1.0 - 0.7 * t, node.radius * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.node_type.color());
		ctx.fill();
		if node.is_pinned() {
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(1.0 / k);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);
		draw_label(ctx, node, radius, k, alpha * 0.8);
	}

	if !has_highlight {
		return;
	}

	for (idx, node) in nodes.iter().enumerate() {
		if !state.is_highlighted(idx) {
			continue;
		}
		let (x, y) = (node.x, node.y);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(node.radius * (1.0 + 0.35 * t), node.radius * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(node.radius * (1.0 + 0.2 * t), node.radius * (1.4 + 0.6 * t))
		} else {
			(node.radius, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.node_type.color());
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_label(ctx, node, radius, k, 1.0);
	}
}
