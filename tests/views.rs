use std::cell::Cell;
use std::rc::Rc;

use observe_reactive::{
	effect, is_reactive, is_readonly, reactive, readonly, shallow_reactive, shallow_readonly, to_raw, Error, Object,
	Value, Variant,
};

fn document() -> Object {
	Object::from_iter([
		("title", Value::from("draft")),
		("nested", Value::from(Object::from_iter([("v", 1)]))),
	])
}

fn nested_v(value: &Value) -> Option<f64> {
	match value {
		Value::View(view) => view.get("v").as_f64(),
		Value::Object(object) => object.get("v").as_f64(),
		_ => None,
	}
}

#[test]
fn identity_is_stable() {
	let raw = document();

	let a = reactive(raw.clone());
	let b = reactive(raw.clone());
	assert_eq!(a, b);
	assert!(raw.reactive().ptr_eq(a.as_view().unwrap()));

	assert_eq!(reactive(a.clone()), a);
	assert_eq!(readonly(a.clone()), a);
	assert_eq!(shallow_readonly(a.clone()), a);

	let r = readonly(raw.clone());
	assert_ne!(a, r);
	assert_eq!(reactive(r.clone()), r);
}

#[test]
fn scalars_pass_through() {
	assert_eq!(reactive(42), Value::Number(42.0));
	assert_eq!(readonly("text"), Value::from("text"));
	assert_eq!(shallow_readonly(true), Value::Bool(true));
	assert_eq!(reactive(Value::Null), Value::Null);
	assert!(!is_reactive(&reactive(42)));
}

#[test]
fn nested_identity_is_stable() {
	let view = document().reactive();

	let first = view.get("nested");
	let second = view.get("nested");
	assert!(first.as_view().is_some());
	assert_eq!(first, second);
}

#[test]
fn deep_views_track_nested_writes() {
	let view = document().reactive();
	let runs = Rc::new(Cell::new(0));

	let _runner = effect({
		let view = view.clone();
		let runs = runs.clone();
		move || {
			nested_v(&view.get("nested"));
			runs.set(runs.get() + 1);
		}
	});

	let nested = view.get("nested");
	let nested = nested.as_view().unwrap();
	assert_eq!(nested.variant(), Variant::Mutable);

	nested.set("v", 2).unwrap();
	assert_eq!(runs.get(), 2);
}

#[test]
fn shallow_readonly_returns_raw_nested() {
	let raw = document();
	let view = raw.shallow_readonly();
	let runs = Rc::new(Cell::new(0));

	let _runner = effect({
		let view = view.clone();
		let runs = runs.clone();
		move || {
			nested_v(&view.get("nested"));
			runs.set(runs.get() + 1);
		}
	});

	let nested = view.get("nested");
	let inner = nested.as_object().expect("raw nested object");
	assert!(!is_reactive(&nested));

	inner.set("v", 5);
	assert_eq!(inner.get("v").as_f64(), Some(5.0));
	assert_eq!(runs.get(), 1);

	assert!(view.set("title", "final").is_err());
	assert_eq!(raw.get("title").as_str(), Some("draft"));
}

#[test]
fn readonly_rejects_writes_but_tracks_reads() {
	let raw = document();
	let view = raw.readonly();
	let seen = Rc::new(Cell::new(0.0));

	let _runner = effect({
		let view = view.clone();
		let seen = seen.clone();
		move || seen.set(nested_v(&view.get("nested")).unwrap_or_default())
	});

	assert_eq!(
		view.set("title", "final"),
		Err(Error::Readonly { key: "title".into() })
	);
	assert_eq!(raw.get("title").as_str(), Some("draft"));

	let nested = view.get("nested");
	let nested = nested.as_view().unwrap();
	assert!(nested.is_readonly());
	assert!(nested.set("v", 10).is_err());
	assert_eq!(seen.get(), 1.0);

	raw.reactive().get("nested").as_view().unwrap().set("v", 3).unwrap();
	assert_eq!(seen.get(), 3.0);
}

#[test]
fn shallow_reactive_tracks_top_level_only() {
	let raw = document();
	let view = shallow_reactive(raw.clone());
	let view = view.as_view().unwrap().clone();
	let runs = Rc::new(Cell::new(0));

	let _runner = effect({
		let view = view.clone();
		let runs = runs.clone();
		move || {
			view.get("title");
			nested_v(&view.get("nested"));
			runs.set(runs.get() + 1);
		}
	});

	view.get("nested").as_object().unwrap().set("v", 9);
	assert_eq!(runs.get(), 1);

	view.set("title", "final").unwrap();
	assert_eq!(runs.get(), 2);
	assert!(view.is_shallow() && !view.is_readonly());
}

#[test]
fn same_value_does_not_trigger() {
	let raw = document();
	let view = raw.reactive();
	let inner = raw.get("nested");
	let runs = Rc::new(Cell::new(0));

	let _runner = effect({
		let view = view.clone();
		let runs = runs.clone();
		move || {
			view.get("nested");
			view.get("title");
			runs.set(runs.get() + 1);
		}
	});

	view.set("nested", inner).unwrap();
	view.set("title", "draft").unwrap();
	assert_eq!(runs.get(), 1);

	view.set("nested", Object::new()).unwrap();
	assert_eq!(runs.get(), 2);
}

#[test]
fn replace_returns_previous_value() {
	let view = document().reactive();

	let old = view.replace("title", "final").unwrap();
	assert_eq!(old.as_str(), Some("draft"));
	assert_eq!(view.replace("missing", 1).unwrap(), Value::Null);
}

#[test]
fn introspection_is_untracked() {
	let raw = document();
	let view = reactive(raw.clone());
	let frozen = readonly(raw.clone());

	let runner = effect({
		let view = view.clone();
		move || {
			let view = view.as_view().unwrap();
			(view.is_reactive(), view.is_readonly(), view.raw().len())
		}
	});

	assert_eq!(runner.run(), (true, false, 2));
	assert_eq!(runner.effect().dependencies(), 0);

	assert!(is_reactive(&view));
	assert!(is_reactive(&frozen));
	assert!(!is_reactive(&shallow_readonly(raw.clone())));
	assert!(!is_reactive(&shallow_reactive(raw.clone())));
	assert!(is_readonly(&shallow_readonly(raw.clone())));
	assert_eq!(shallow_readonly(shallow_readonly(raw.clone())), shallow_readonly(raw.clone()));
	assert!(!is_readonly(&view));
	assert!(is_readonly(&frozen));
	assert!(!is_reactive(&Value::Object(raw.clone())));

	assert_eq!(to_raw(&view), Value::Object(raw.clone()));
	assert_eq!(to_raw(&frozen), Value::Object(raw));
	assert_eq!(to_raw(&Value::from(7)), Value::Number(7.0));
}
