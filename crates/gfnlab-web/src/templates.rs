//! minijinja environment with the embedded page templates.

use minijinja::{Environment, Value};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("experiment_list.html", include_str!("../templates/experiment_list.html")),
    ("experiment_run.html", include_str!("../templates/experiment_run.html")),
];

/// Build the environment once at startup; it is shared read-only afterwards.
pub fn build_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_filter("index", index);
    env.add_filter("to", to);
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// `seq|index(n)`: item `n` of a sequence, or an empty string when the
/// position is out of range or the value is not indexable.
pub fn index(sequence: Value, position: usize) -> Value {
    sequence
        .get_item_by_index(position)
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_none())
        .unwrap_or_else(|| Value::from(""))
}

/// `start|to(end)`: the integers `start..end`.
pub fn to(start: i64, end: i64) -> Vec<i64> {
    (start..end).collect()
}
