use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::{Rc, Weak};

/// Identity key over a `Weak` pointer.
///
/// Two keys are equal when they point at the same allocation. Only the data
/// address takes part in comparisons, so the same value seen through
/// different trait objects still compares equal. A dead key keeps its
/// allocation reserved, so its address can not be reused by a live value.
pub struct WeakAddr<T: ?Sized> {
	ptr: Weak<T>,
}

impl<T: ?Sized> WeakAddr<T> {
	pub fn new(ptr: Weak<T>) -> Self {
		WeakAddr { ptr }
	}

	pub fn of(rc: &Rc<T>) -> Self {
		WeakAddr {
			ptr: Rc::downgrade(rc),
		}
	}

	pub fn addr(&self) -> *const () {
		Weak::as_ptr(&self.ptr) as *const ()
	}

	pub fn is_alive(&self) -> bool {
		self.ptr.strong_count() > 0
	}
}

impl<T: ?Sized> Clone for WeakAddr<T> {
	fn clone(&self) -> Self {
		WeakAddr {
			ptr: self.ptr.clone(),
		}
	}
}

impl<T: ?Sized> Deref for WeakAddr<T> {
	type Target = Weak<T>;
	fn deref(&self) -> &Self::Target {
		&self.ptr
	}
}

impl<T: ?Sized> PartialEq for WeakAddr<T> {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl<T: ?Sized> Eq for WeakAddr<T> {}

impl<T: ?Sized> Hash for WeakAddr<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.addr().hash(state)
	}
}

/// Compares two `Rc`s by the address of their data only.
pub fn same_rc<A: ?Sized, B: ?Sized>(a: &Rc<A>, b: &Rc<B>) -> bool {
	Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use fxhash::FxHashSet;

	use super::*;

	trait Named {
		fn name(&self) -> &'static str;
	}

	struct Thing;

	impl Named for Thing {
		fn name(&self) -> &'static str {
			"thing"
		}
	}

	#[test]
	fn same_allocation_through_trait_object() {
		let thing = Rc::new(Thing);
		let dynamic = thing.clone() as Rc<dyn Named>;

		let a = WeakAddr::of(&dynamic);
		let b = WeakAddr::new(Rc::downgrade(&dynamic));
		assert!(a == b);
		assert!(same_rc(&thing, &dynamic));
		assert_eq!(dynamic.name(), "thing");
	}

	#[test]
	fn dead_keys_stay_distinct() {
		let mut set = FxHashSet::default();

		let first = Rc::new(1);
		set.insert(WeakAddr::of(&first));
		let dead = WeakAddr::of(&first);
		std::mem::drop(first);

		let second = Rc::new(2);
		set.insert(WeakAddr::of(&second));

		assert!(!dead.is_alive());
		assert_eq!(set.len(), 2);
		assert!(set.contains(&dead));
	}
}
