use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::addr::WeakAddr;
use crate::dependencies::Dep;
use crate::evaluation::Evaluation;
use crate::Derived;

/// A computation that re-runs when something it read through a view is
/// written.
///
/// `Effect` is a handle, clones share the same computation. The engine only
/// keeps weak references to it: once the last handle is dropped the
/// computation is detached from everything it was subscribed to.
pub struct Effect<R: 'static = ()> {
	pub(crate) body: Rc<EffectBody<R>>,
}

pub struct EffectBody<R: 'static> {
	func: Box<dyn Fn() -> R>,
	name: &'static str,
	active: Cell<bool>,
	deps: RefCell<SmallVec<[Dep; 4]>>,
	this: Weak<EffectBody<R>>,
}

impl<R: 'static> Clone for Effect<R> {
	fn clone(&self) -> Self {
		Effect {
			body: self.body.clone(),
		}
	}
}

impl<R: 'static> Effect<R> {
	/// Creates a computation without running it.
	#[must_use]
	pub fn new(func: impl Fn() -> R + 'static) -> Self {
		Self::new_with_name("<unnamed>", func)
	}

	#[must_use]
	pub fn new_with_name(name: &'static str, func: impl Fn() -> R + 'static) -> Self {
		Effect {
			body: Rc::new_cyclic(|this| EffectBody {
				func: Box::new(func),
				name,
				active: Cell::new(true),
				deps: RefCell::new(SmallVec::new()),
				this: this.clone(),
			}),
		}
	}

	/// Runs the callback and returns its result.
	///
	/// An active effect becomes the running computation for the duration of
	/// the call, so reads through views subscribe it. A stopped effect just
	/// calls the callback.
	pub fn run(&self) -> R {
		let body = &self.body;
		if !body.active.get() {
			tracing::trace!(name = body.name, "untracked run");
			return (body.func)();
		}

		let _frame = Evaluation::enter(body.clone());
		tracing::trace!(name = body.name, "run");
		(body.func)()
	}

	/// Unsubscribes from everything and stops reacting to writes.
	pub fn stop(&self) {
		if !self.body.active.replace(false) {
			return;
		}

		tracing::trace!(name = self.body.name, "stop");
		let deps = std::mem::take(&mut *self.body.deps.borrow_mut());
		self.body.unsubscribe(deps);
	}

	pub fn is_active(&self) -> bool {
		self.body.active.get()
	}

	pub fn name(&self) -> &'static str {
		self.body.name
	}

	/// Number of subscriber sets this effect belongs to.
	pub fn dependencies(&self) -> usize {
		self.body.deps.borrow().len()
	}

	pub fn ptr_eq(&self, other: &Effect<R>) -> bool {
		Rc::ptr_eq(&self.body, &other.body)
	}
}

impl<R: 'static> EffectBody<R> {
	fn unsubscribe(&self, deps: SmallVec<[Dep; 4]>) {
		let this = WeakAddr::new(self.this.clone() as Weak<dyn Derived>);
		for dep in deps {
			dep.unsubscribe(&this);
		}
	}
}

impl<R: 'static> Drop for EffectBody<R> {
	fn drop(&mut self) {
		let deps = std::mem::take(self.deps.get_mut());
		self.unsubscribe(deps);
	}
}

impl<R: 'static> Derived for EffectBody<R> {
	fn update(self: Rc<Self>) {
		let _ = Effect { body: self }.run();
	}

	fn is_active(&self) -> bool {
		self.active.get()
	}

	fn depends_on(&self, dep: Dep) {
		self.deps.borrow_mut().push(dep);
	}

	fn name(&self) -> &'static str {
		self.name
	}
}

impl<R: 'static> std::fmt::Debug for Effect<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Effect")
			.field("name", &self.body.name)
			.field("active", &self.body.active.get())
			.finish()
	}
}

/// Returned by [`effect`]: re-runs the callback on demand and carries the
/// underlying [`Effect`].
pub struct Runner<R: 'static = ()> {
	effect: Effect<R>,
}

impl<R: 'static> Clone for Runner<R> {
	fn clone(&self) -> Self {
		Runner {
			effect: self.effect.clone(),
		}
	}
}

impl<R: 'static> Runner<R> {
	#[inline]
	pub fn run(&self) -> R {
		self.effect.run()
	}

	#[inline]
	pub fn effect(&self) -> &Effect<R> {
		&self.effect
	}

	#[inline]
	pub fn stop(&self) {
		self.effect.stop()
	}
}

impl<R: 'static> std::fmt::Debug for Runner<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.effect.fmt(f)
	}
}

/// Registers `func` and runs it once right away.
///
/// The callback re-runs synchronously whenever a key it read through a view
/// is written with a different value. Keep the returned runner: dropping it
/// drops the effect.
#[must_use = "the effect is dropped together with its runner"]
pub fn effect<R: 'static>(func: impl Fn() -> R + 'static) -> Runner<R> {
	effect_with_name("<unnamed>", func)
}

#[must_use = "the effect is dropped together with its runner"]
pub fn effect_with_name<R: 'static>(
	name: &'static str,
	func: impl Fn() -> R + 'static,
) -> Runner<R> {
	let effect = Effect::new_with_name(name, func);
	let _ = effect.run();
	Runner { effect }
}
