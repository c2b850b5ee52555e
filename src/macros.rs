pub use enclose::*;

/// Registers an effect, cloning the listed captures into the closure.
///
/// ```
/// use observe_reactive::{effect, Object};
///
/// let state = Object::from_iter([("name", "a")]).reactive();
/// let runner = effect!((state) state.get("name"));
/// assert_eq!(runner.run().as_str(), Some("a"));
/// ```
#[macro_export]
macro_rules! effect {
    (( $($d_tt:tt)* ) $($b:tt)*) => {
        $crate::effect($crate::macros::enclose!(($( $d_tt )*) move || { $($b)* }))
    };
    ($name:literal, ( $($d_tt:tt)* ) $($b:tt)*) => {
        $crate::effect_with_name($name, $crate::macros::enclose!(($( $d_tt )*) move || { $($b)* }))
    };
}
