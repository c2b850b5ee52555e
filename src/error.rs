use crate::object::Key;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A write went through a readonly view. The target was not modified.
	#[error("set operation on key \"{key}\" failed: target is readonly")]
	Readonly { key: Key },
}
