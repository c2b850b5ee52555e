use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fxhash::{FxBuildHasher, FxHashMap};
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use crate::addr::WeakAddr;
use crate::evaluation::Evaluation;
use crate::object::{Key, ObjectBody};
use crate::{Derived, Object};

/// Graph entries for dead objects are swept once the graph reaches this many
/// targets, and after that whenever it doubles.
pub(crate) const SWEEP_MIN: usize = 64;

/// Computations subscribed to one `(object, key)` pair, in subscription order.
#[derive(Clone)]
pub(crate) struct Dep {
	subscribers: Rc<RefCell<IndexSet<WeakAddr<dyn Derived>, FxBuildHasher>>>,
}

impl Dep {
	fn new() -> Self {
		Dep {
			subscribers: Rc::new(RefCell::new(IndexSet::default())),
		}
	}

	fn subscribe(&self, derived: &Rc<dyn Derived>) -> bool {
		self.subscribers.borrow_mut().insert(WeakAddr::of(derived))
	}

	pub(crate) fn unsubscribe(&self, derived: &WeakAddr<dyn Derived>) {
		self.subscribers.borrow_mut().shift_remove(derived);
	}

	fn snapshot(&self) -> SmallVec<[Weak<dyn Derived>; 8]> {
		self.subscribers
			.borrow()
			.iter()
			.map(|addr| Weak::clone(addr))
			.collect()
	}

	#[cfg(test)]
	fn len(&self) -> usize {
		self.subscribers.borrow().len()
	}
}

struct Graph {
	targets: FxHashMap<WeakAddr<ObjectBody>, IndexMap<Key, Dep, FxBuildHasher>>,
	sweep_at: usize,
}

impl Graph {
	fn dep(&mut self, target: &Object, key: &str) -> Dep {
		let addr = target.addr();
		if !self.targets.contains_key(&addr) {
			self.sweep();
		}

		let keys = self.targets.entry(addr).or_default();
		if let Some(dep) = keys.get(key) {
			return dep.clone();
		}

		let dep = Dep::new();
		keys.insert(key.into(), dep.clone());
		dep
	}

	fn find(&self, target: &Object, key: &str) -> Option<Dep> {
		self.targets
			.get(&target.addr())
			.and_then(|keys| keys.get(key))
			.cloned()
	}

	fn sweep(&mut self) {
		if self.targets.len() < self.sweep_at {
			return;
		}

		let before = self.targets.len();
		self.targets.retain(|addr, _| addr.is_alive());
		self.sweep_at = (self.targets.len() * 2).max(SWEEP_MIN);

		tracing::trace!(
			before,
			after = self.targets.len(),
			"swept dependency graph"
		);
	}
}

thread_local! {
	static GRAPH: RefCell<Graph> = RefCell::new(Graph {
		targets: FxHashMap::default(),
		sweep_at: SWEEP_MIN,
	});
}

/// Records that the running computation read `key` of `target`.
///
/// Does nothing outside of a running computation. Reading the same key
/// again during the same run does not add a second subscription.
pub(crate) fn track(target: &Object, key: &str) {
	let Some(derived) = Evaluation::current() else {
		return;
	};

	// stopped from inside its own callback
	if !derived.is_active() {
		return;
	}

	let dep = GRAPH.with(|graph| graph.borrow_mut().dep(target, key));
	if dep.subscribe(&derived) {
		derived.depends_on(dep);
	}
}

/// Re-runs every computation subscribed to `key` of `target`, except the one
/// currently running.
///
/// Subscribers are copied out before any of them runs, because a re-run may
/// subscribe or unsubscribe while the fan-out is in progress. A subscriber
/// stopped by an earlier one still runs in this fan-out, untracked.
pub(crate) fn trigger(target: &Object, key: &str) {
	let Some(dep) = GRAPH.with(|graph| graph.borrow().find(target, key)) else {
		return;
	};

	let subscribers = dep.snapshot();
	tracing::trace!(key, subscribers = subscribers.len(), "trigger");

	for weak in subscribers {
		let Some(derived) = weak.upgrade() else {
			continue;
		};

		if Evaluation::is_current(&derived) {
			continue;
		}

		derived.update();
	}
}

#[cfg(test)]
pub(crate) fn subscribers(target: &Object, key: &str) -> usize {
	GRAPH.with(|graph| graph.borrow().find(target, key).map_or(0, |dep| dep.len()))
}
