use crate::{Object, Value};

/// Arrays become objects keyed by their decimal indices.
impl From<serde_json::Value> for Value {
	fn from(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(value) => Value::Bool(value),
			serde_json::Value::Number(number) => number.as_f64().map(Value::Number).unwrap_or_default(),
			serde_json::Value::String(value) => Value::String(value.into()),
			serde_json::Value::Array(items) => Value::Object(
				items
					.into_iter()
					.enumerate()
					.map(|(index, item)| (index.to_string(), Value::from(item)))
					.collect(),
			),
			serde_json::Value::Object(map) => Value::Object(
				map.into_iter()
					.map(|(key, item)| (key, Value::from(item)))
					.collect(),
			),
		}
	}
}

impl Value {
	/// Snapshot of the current data, views are read through their raw
	/// objects so nothing gets tracked.
	///
	/// Non-finite numbers become `null`, and so does a reference back to an
	/// object that is already being converted.
	pub fn to_json(&self) -> serde_json::Value {
		self.to_json_within(&mut Vec::new())
	}

	fn to_json_within(&self, open: &mut Vec<*const ()>) -> serde_json::Value {
		match self {
			Value::Null => serde_json::Value::Null,
			Value::Bool(value) => serde_json::Value::Bool(*value),
			Value::Number(value) => serde_json::Number::from_f64(*value)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::String(value) => serde_json::Value::String(value.to_string()),
			Value::Object(object) => object.to_json_within(open),
			Value::View(view) => view.raw().to_json_within(open),
		}
	}
}

impl Object {
	pub fn to_json(&self) -> serde_json::Value {
		self.to_json_within(&mut Vec::new())
	}

	fn to_json_within(&self, open: &mut Vec<*const ()>) -> serde_json::Value {
		let addr = self.addr_ptr();
		if open.contains(&addr) {
			return serde_json::Value::Null;
		}

		open.push(addr);
		let mut map = serde_json::Map::new();
		self.for_each(|key, value| {
			map.insert(key.to_string(), value.to_json_within(open));
		});
		open.pop();

		serde_json::Value::Object(map)
	}
}
