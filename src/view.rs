use std::fmt::Debug;
use std::rc::{Rc, Weak};

use crate::dependencies::{track, trigger};
use crate::object::Key;
use crate::{registry, Error, Object, Value, Variant};

/// Reactive view over a raw [`Object`].
///
/// Reads through a view are tracked by the running effect, writes notify
/// every effect that read the written key. What exactly happens depends on
/// the view's [`Variant`]:
///
/// | variant            | reads tracked | nested objects      | writes   |
/// |--------------------|---------------|---------------------|----------|
/// | `Mutable`          | yes           | wrapped as mutable  | allowed  |
/// | `ShallowMutable`   | top level     | returned raw        | allowed  |
/// | `Readonly`         | yes           | wrapped as readonly | rejected |
/// | `ShallowReadonly`  | top level     | returned raw        | rejected |
///
/// Views are handles: clones are the same view. For a given object and
/// variant there is at most one live view.
#[derive(Clone)]
pub struct View {
	pub(crate) body: Rc<ViewBody>,
}

pub struct ViewBody {
	target: Object,
	variant: Variant,
}

impl View {
	pub(crate) fn new(target: Object, variant: Variant) -> Self {
		View {
			body: Rc::new(ViewBody { target, variant }),
		}
	}

	pub(crate) fn downgrade(&self) -> Weak<ViewBody> {
		Rc::downgrade(&self.body)
	}

	/// Reads `key`, recording the read for the running effect.
	///
	/// Composite values come back wrapped in a view of the same family
	/// unless this view is shallow.
	pub fn get(&self, key: &str) -> Value {
		let target = &self.body.target;
		let value = target.get(key);
		track(target, key);

		let variant = self.body.variant;
		if variant.is_shallow() {
			return value;
		}

		let nested = if variant.is_readonly() {
			Variant::Readonly
		} else {
			Variant::Mutable
		};

		registry::wrap_value(value, nested)
	}

	/// Writes `key` and returns the previous value.
	///
	/// Effects that read `key` re-run before this returns, unless the new
	/// value equals the old one. On a readonly view nothing is written, a
	/// warning is reported and [`Error::Readonly`] is returned.
	pub fn replace(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<Value, Error> {
		let key = key.into();
		let target = &self.body.target;

		if self.is_readonly() {
			tracing::warn!(
				key = %key,
				?target,
				"set operation on key \"{}\" failed: target is readonly",
				key
			);
			return Err(Error::Readonly { key });
		}

		let value = value.into();
		let old = target.set(key.clone(), value.clone());
		if old != value {
			trigger(target, &key);
		}

		Ok(old)
	}

	#[inline]
	pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<(), Error> {
		self.replace(key, value).map(|_| ())
	}

	/// Reads `key`, applies `func` and writes the result back.
	pub fn update(&self, key: &str, func: impl FnOnce(Value) -> Value) -> Result<(), Error> {
		let value = func(self.get(key));
		self.set(key, value)
	}

	/// Deep views answer `true`, shallow ones `false`.
	pub fn is_reactive(&self) -> bool {
		!self.body.variant.is_shallow()
	}

	pub fn is_readonly(&self) -> bool {
		self.body.variant.is_readonly()
	}

	pub fn is_shallow(&self) -> bool {
		self.body.variant.is_shallow()
	}

	pub fn variant(&self) -> Variant {
		self.body.variant
	}

	/// The wrapped object. Access through it is not tracked.
	pub fn raw(&self) -> Object {
		self.body.target.clone()
	}

	pub fn ptr_eq(&self, other: &View) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}
}

impl Debug for View {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("View")
			.field("variant", &self.body.variant)
			.field("target", &self.body.target)
			.finish()
	}
}
