use std::cell::RefCell;
use std::rc::Rc;

use crate::addr::same_rc;
use crate::Derived;

thread_local! {
	static STACK: RefCell<Vec<Rc<dyn Derived>>> = RefCell::new(Vec::new());
}

/// A running computation.
///
/// While an `Evaluation` is alive its computation sits on top of the
/// thread-local context stack and every tracked read is attributed to it.
/// The frame is popped on drop, which also covers unwinding out of the
/// callback.
pub(crate) struct Evaluation {
	derived: Rc<dyn Derived>,
}

impl Evaluation {
	pub fn enter(derived: Rc<dyn Derived>) -> Self {
		STACK.with(|stack| stack.borrow_mut().push(derived.clone()));
		Evaluation { derived }
	}

	/// The computation currently collecting dependencies, if any.
	pub fn current() -> Option<Rc<dyn Derived>> {
		STACK.with(|stack| stack.borrow().last().cloned())
	}

	pub fn is_current(derived: &Rc<dyn Derived>) -> bool {
		STACK.with(|stack| {
			stack
				.borrow()
				.last()
				.map_or(false, |top| same_rc(top, derived))
		})
	}
}

impl Drop for Evaluation {
	fn drop(&mut self) {
		let popped = STACK.try_with(|stack| stack.borrow_mut().pop()).ok().flatten();
		if let Some(popped) = popped {
			debug_assert!(
				same_rc(&popped, &self.derived),
				"evaluation stack mismatch: expected `{}`, got `{}`",
				self.derived.name(),
				popped.name()
			);
		}
	}
}

/// Returns `true` when a computation is currently collecting dependencies.
pub fn is_tracking() -> bool {
	STACK.with(|stack| !stack.borrow().is_empty())
}
