//! Reactive views over plain data.
//!
//! Wrap an [`Object`] with [`reactive`] (or one of its siblings), read it from
//! inside an [`effect`], and the effect re-runs every time one of the keys it
//! read is written through a view:
//!
//! ```
//! use observe_reactive::{effect, Object};
//!
//! let state = Object::from_iter([("count", 1)]).reactive();
//!
//! let runner = effect({
//! 	let state = state.clone();
//! 	move || state.get("count").as_f64()
//! });
//!
//! state.set("count", 2).unwrap();
//! assert_eq!(runner.run(), Some(2.0));
//! ```
//!
//! Everything is single threaded: the running-effect stack, the dependency
//! graph and the view registry are thread-local.

pub mod macros;

mod addr;
mod dependencies;
mod effect;
mod error;
mod evaluation;
#[cfg(feature = "json")]
mod json;
mod object;
mod registry;
mod value;
mod view;

use std::rc::Rc;

use dependencies::Dep;

pub use effect::{effect, effect_with_name, Effect, Runner};
pub use error::Error;
pub use evaluation::is_tracking;
pub use object::{Key, Object};
pub use value::Value;
pub use view::View;

/// A computation the dependency graph can notify.
pub(crate) trait Derived: 'static {
	/// Re-run the computation.
	fn update(self: Rc<Self>);

	fn is_active(&self) -> bool;

	/// Remember `dep` so the computation can leave it on stop.
	fn depends_on(&self, dep: Dep);

	fn name(&self) -> &'static str;
}

/// Flavor of a [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
	Mutable,
	ShallowMutable,
	Readonly,
	ShallowReadonly,
}

impl Variant {
	pub const COUNT: usize = 4;

	pub const ALL: [Variant; Variant::COUNT] = [
		Variant::Mutable,
		Variant::ShallowMutable,
		Variant::Readonly,
		Variant::ShallowReadonly,
	];

	pub fn is_readonly(self) -> bool {
		matches!(self, Variant::Readonly | Variant::ShallowReadonly)
	}

	pub fn is_shallow(self) -> bool {
		matches!(self, Variant::ShallowMutable | Variant::ShallowReadonly)
	}
}

/// Mutable view, nested objects are wrapped on access.
///
/// Non-composite values and existing views are returned unchanged.
pub fn reactive(value: impl Into<Value>) -> Value {
	registry::wrap_value(value.into(), Variant::Mutable)
}

/// Mutable view that only tracks top-level keys.
pub fn shallow_reactive(value: impl Into<Value>) -> Value {
	registry::wrap_value(value.into(), Variant::ShallowMutable)
}

/// Write-rejecting view, nested objects are wrapped as readonly on access.
pub fn readonly(value: impl Into<Value>) -> Value {
	registry::wrap_value(value.into(), Variant::Readonly)
}

/// Write-rejecting view over the top level only.
pub fn shallow_readonly(value: impl Into<Value>) -> Value {
	registry::wrap_value(value.into(), Variant::ShallowReadonly)
}

pub fn is_reactive(value: &Value) -> bool {
	value.as_view().map_or(false, View::is_reactive)
}

pub fn is_readonly(value: &Value) -> bool {
	value.as_view().map_or(false, View::is_readonly)
}

/// Strips the view from `value`, if any.
pub fn to_raw(value: &Value) -> Value {
	match value {
		Value::View(view) => Value::Object(view.raw()),
		other => other.clone(),
	}
}
