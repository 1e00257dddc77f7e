//! Layout parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Steps until alpha reaches `alpha_min` under the derived decay rate.
const DEFAULT_SETTLE_STEPS: f64 = 300.0;

/// Tunables for the force simulation. Every field has a default, so a JSON
/// override only needs the fields it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
	/// Canvas width in layout units.
	pub width: f64,
	/// Canvas height in layout units.
	pub height: f64,
	/// Pairwise charge. Negative values repel.
	pub charge_strength: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Base collision radius. Donors use 1.5 times this.
	pub collision_radius: f64,
	/// Fraction of velocity lost per step.
	pub velocity_decay: f64,
	/// Strength of the pull toward the canvas centre.
	pub center_strength: f64,
	/// Alpha below which the simulation is settled.
	pub alpha_min: f64,
	/// Per-step alpha decay. Derived from `alpha_min` when unset.
	pub alpha_decay: Option<f64>,
	/// Alpha floor applied while a node is being dragged.
	pub drag_alpha: f64,
	/// Radius around the centre in which nodes start.
	pub jitter_radius: f64,
	/// Steps between snapshots handed to subscribers.
	pub emit_interval: usize,
	/// Seed for initial placement.
	pub seed: u64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			charge_strength: -300.0,
			link_distance: 80.0,
			collision_radius: 8.0,
			velocity_decay: 0.4,
			center_strength: 0.05,
			alpha_min: 0.001,
			alpha_decay: None,
			drag_alpha: 0.3,
			jitter_radius: 50.0,
			emit_interval: 2,
			seed: 0x5eed,
		}
	}
}

impl LayoutConfig {
	/// Defaults for a canvas of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Self::default()
		}
	}

	/// Parse overrides from JSON and reject nonsensical values.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values the simulator cannot use.
	pub fn validate(&self) -> Result<()> {
		let mut problems = Vec::new();
		if !(self.width.is_finite() && self.width > 0.0) {
			problems.push("width must be positive");
		}
		if !(self.height.is_finite() && self.height > 0.0) {
			problems.push("height must be positive");
		}
		if !self.charge_strength.is_finite() {
			problems.push("chargeStrength must be finite");
		}
		if !(self.link_distance.is_finite() && self.link_distance >= 0.0) {
			problems.push("linkDistance must not be negative");
		}
		if !(self.collision_radius.is_finite() && self.collision_radius >= 0.0) {
			problems.push("collisionRadius must not be negative");
		}
		if !(0.0..=1.0).contains(&self.velocity_decay) {
			problems.push("velocityDecay must be within [0, 1]");
		}
		if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
			problems.push("alphaMin must be within (0, 1)");
		}
		if self.alpha_decay.is_some_and(|d| !(d > 0.0 && d < 1.0)) {
			problems.push("alphaDecay must be within (0, 1)");
		}
		if self.emit_interval == 0 {
			problems.push("emitInterval must be at least 1");
		}
		if problems.is_empty() {
			Ok(())
		} else {
			Err(Error::config(problems.join("; ")))
		}
	}

	/// A copy with every out-of-range value replaced by its default.
	pub fn sanitized(&self) -> Self {
		let defaults = Self::default();
		let finite_or = |v: f64, min: f64, fallback: f64| {
			if v.is_finite() && v >= min { v } else { fallback }
		};
		let mut config = self.clone();
		if !(config.width.is_finite() && config.width > 0.0) {
			config.width = defaults.width;
		}
		if !(config.height.is_finite() && config.height > 0.0) {
			config.height = defaults.height;
		}
		if !config.charge_strength.is_finite() {
			config.charge_strength = defaults.charge_strength;
		}
		config.link_distance = finite_or(config.link_distance, 0.0, defaults.link_distance);
		config.collision_radius = finite_or(config.collision_radius, 0.0, defaults.collision_radius);
		config.center_strength = finite_or(config.center_strength, 0.0, defaults.center_strength);
		config.jitter_radius = finite_or(config.jitter_radius, 0.0, defaults.jitter_radius);
		config.drag_alpha = finite_or(config.drag_alpha, 0.0, defaults.drag_alpha).min(1.0);
		if !(0.0..=1.0).contains(&config.velocity_decay) {
			config.velocity_decay = defaults.velocity_decay;
		}
		if !(config.alpha_min > 0.0 && config.alpha_min < 1.0) {
			config.alpha_min = defaults.alpha_min;
		}
		if config.alpha_decay.is_some_and(|d| !(d > 0.0 && d < 1.0)) {
			config.alpha_decay = None;
		}
		config.emit_interval = config.emit_interval.max(1);
		config
	}

	/// Per-step alpha decay actually applied.
	pub fn effective_alpha_decay(&self) -> f64 {
		self.alpha_decay
			.unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / DEFAULT_SETTLE_STEPS))
	}

	/// Centre of the canvas.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}
