use std::cell::RefCell;
use std::rc::Weak;

use fxhash::FxHashMap;

use crate::addr::WeakAddr;
use crate::object::ObjectBody;
use crate::view::ViewBody;
use crate::{Object, Value, Variant, View};

const SWEEP_MIN: usize = 64;

/// Identity cache of one variant: raw object -> its view.
///
/// Holds no strong references. An entry whose view has been dropped is
/// replaced on the next wrap of the same object.
struct Cache {
	views: FxHashMap<WeakAddr<ObjectBody>, Weak<ViewBody>>,
	sweep_at: usize,
}

impl Cache {
	fn new() -> Self {
		Cache {
			views: FxHashMap::default(),
			sweep_at: SWEEP_MIN,
		}
	}

	fn get(&self, raw: &Object) -> Option<View> {
		self.views
			.get(&raw.addr())
			.and_then(Weak::upgrade)
			.map(|body| View { body })
	}

	fn insert(&mut self, raw: &Object, view: &View) {
		if self.views.len() >= self.sweep_at {
			self.views.retain(|_, weak| weak.strong_count() > 0);
			self.sweep_at = (self.views.len() * 2).max(SWEEP_MIN);
		}

		self.views.insert(raw.addr(), view.downgrade());
	}
}

struct Registry {
	caches: [Cache; Variant::COUNT],
}

impl Registry {
	fn cache(&mut self, variant: Variant) -> &mut Cache {
		&mut self.caches[variant as usize]
	}
}

thread_local! {
	static REGISTRY: RefCell<Registry> = RefCell::new(Registry {
		caches: Variant::ALL.map(|_| Cache::new()),
	});
}

/// Returns the single view of `raw` for `variant`, creating it on first use.
pub(crate) fn wrap(raw: &Object, variant: Variant) -> View {
	REGISTRY.with(|registry| {
		let mut registry = registry.borrow_mut();
		let cache = registry.cache(variant);
		if let Some(view) = cache.get(raw) {
			return view;
		}

		tracing::trace!(?variant, "new view");
		let view = View::new(raw.clone(), variant);
		cache.insert(raw, &view);
		view
	})
}

/// Wraps a composite value. Scalars and existing views come back unchanged.
pub(crate) fn wrap_value(value: Value, variant: Variant) -> Value {
	match value {
		Value::Object(raw) => Value::View(wrap(&raw, variant)),
		other => other,
	}
}

#[cfg(test)]
fn cached(variant: Variant) -> usize {
	REGISTRY.with(|registry| registry.borrow_mut().cache(variant).views.len())
}
