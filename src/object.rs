use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::addr::WeakAddr;
use crate::registry;
use crate::{Value, Variant, View};

/// Property key of an [`Object`].
pub type Key = Rc<str>;

type Fields = IndexMap<Key, Value, FxBuildHasher>;

/// Raw composite data.
///
/// `Object` is a handle: clones share the same fields and the same identity.
/// Access through the handle itself is never tracked and never notifies
/// anybody; wrap it in a [`View`] to get reactive behavior.
#[derive(Clone)]
pub struct Object {
	pub(crate) body: Rc<ObjectBody>,
}

pub struct ObjectBody {
	fields: RefCell<Fields>,
}

impl Default for Object {
	fn default() -> Self {
		Object::new()
	}
}

impl Object {
	pub fn new() -> Self {
		Object {
			body: Rc::new(ObjectBody {
				fields: RefCell::new(Fields::default()),
			}),
		}
	}

	/// Reads a field. Missing fields read as [`Value::Null`].
	pub fn get(&self, key: &str) -> Value {
		self.body
			.fields
			.borrow()
			.get(key)
			.cloned()
			.unwrap_or_default()
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.body.fields.borrow().contains_key(key)
	}

	/// Writes a field and returns the previous value.
	pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> Value {
		let key = key.into();
		let value = value.into();
		self.body
			.fields
			.borrow_mut()
			.insert(key, value)
			.unwrap_or_default()
	}

	pub fn remove(&self, key: &str) -> Value {
		self.body
			.fields
			.borrow_mut()
			.shift_remove(key)
			.unwrap_or_default()
	}

	pub fn keys(&self) -> Vec<Key> {
		self.body.fields.borrow().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.body.fields.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.body.fields.borrow().is_empty()
	}

	pub fn ptr_eq(&self, other: &Object) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}

	#[inline]
	pub fn reactive(&self) -> View {
		registry::wrap(self, Variant::Mutable)
	}

	#[inline]
	pub fn readonly(&self) -> View {
		registry::wrap(self, Variant::Readonly)
	}

	#[inline]
	pub fn shallow_readonly(&self) -> View {
		registry::wrap(self, Variant::ShallowReadonly)
	}

	pub(crate) fn addr(&self) -> WeakAddr<ObjectBody> {
		WeakAddr::of(&self.body)
	}

	pub(crate) fn for_each(&self, mut func: impl FnMut(&Key, &Value)) {
		for (key, value) in self.body.fields.borrow().iter() {
			func(key, value)
		}
	}

	pub(crate) fn addr_ptr(&self) -> *const () {
		Rc::as_ptr(&self.body) as *const ()
	}
}

impl<K, V> FromIterator<(K, V)> for Object
where
	K: Into<Key>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let object = Object::new();
		for (key, value) in iter {
			object.set(key, value);
		}
		object
	}
}

/// Prints one level of fields. Nested composites are elided, so data that
/// contains itself prints fine.
impl Debug for Object {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map()
			.entries(
				self.body
					.fields
					.borrow()
					.iter()
					.map(|(key, value)| (key, Elided(value))),
			)
			.finish()
	}
}

struct Elided<'a>(&'a Value);

impl Debug for Elided<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.0 {
			Value::Object(_) => f.write_str("Object(..)"),
			Value::View(view) => write!(f, "View({:?}, ..)", view.variant()),
			scalar => scalar.fmt(f),
		}
	}
}
