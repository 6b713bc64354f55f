use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named, pure predicate comparing a resolved document value (`a`) with a
/// rule's literal operand (`b`).
pub trait Compare: Send + Sync {
    fn name(&self) -> &str;
    fn compare(&self, a: &Value, b: &Value) -> bool;
}

/// Result of looking a comparer up by name. An unknown name is an explicit
/// outcome, and a leaf that gets it evaluates to `false`.
pub enum Lookup<'a> {
    Found(&'a dyn Compare),
    NotFound,
}

impl fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(c) => f.debug_tuple("Found").field(&c.name()).finish(),
            Lookup::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Thread-safe comparer registry. Clones share storage until one of them
/// registers something.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<String, Arc<dyn Compare>>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut map: HashMap<String, Arc<dyn Compare>> = HashMap::new();
        let all: [Arc<dyn Compare>; 7] = [
            Arc::new(builtins::Eq),
            Arc::new(builtins::Neq),
            Arc::new(builtins::Gt),
            Arc::new(builtins::Gte),
            Arc::new(builtins::Lt),
            Arc::new(builtins::Lte),
            Arc::new(builtins::Contains),
        ];
        for c in all {
            map.insert(c.name().to_string(), c);
        }
        Self { inner: Arc::new(map) }
    }

    /// Add a comparer, replacing any existing one with the same name.
    pub fn register<C: Compare + 'static>(&mut self, c: C) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(c.name().to_string(), Arc::new(c));
    }

    /// Register a closure under `name`.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.register(FnComparer { name: name.into(), f });
    }

    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        match self.inner.get(name) {
            Some(c) => Lookup::Found(c.as_ref()),
            None => Lookup::NotFound,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("comparers", &names).finish()
    }
}

struct FnComparer<F> {
    name: String,
    f: F,
}

impl<F> Compare for FnComparer<F>
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    fn name(&self) -> &str { &self.name }
    fn compare(&self, a: &Value, b: &Value) -> bool { (self.f)(a, b) }
}

pub mod builtins {
    use super::*;
    use crate::comparison::{cmp_numbers, contains};
    use std::cmp::Ordering;

    pub struct Eq;
    impl Compare for Eq {
        fn name(&self) -> &str { "eq" }
        fn compare(&self, a: &Value, b: &Value) -> bool { a == b }
    }

    pub struct Neq;
    impl Compare for Neq {
        fn name(&self) -> &str { "neq" }
        fn compare(&self, a: &Value, b: &Value) -> bool { a != b }
    }

    pub struct Gt;
    impl Compare for Gt {
        fn name(&self) -> &str { "gt" }
        fn compare(&self, a: &Value, b: &Value) -> bool {
            cmp_numbers(a, b, |o| o == Ordering::Greater)
        }
    }

    pub struct Gte;
    impl Compare for Gte {
        fn name(&self) -> &str { "gte" }
        fn compare(&self, a: &Value, b: &Value) -> bool {
            cmp_numbers(a, b, |o| o != Ordering::Less)
        }
    }

    pub struct Lt;
    impl Compare for Lt {
        fn name(&self) -> &str { "lt" }
        fn compare(&self, a: &Value, b: &Value) -> bool {
            cmp_numbers(a, b, |o| o == Ordering::Less)
        }
    }

    pub struct Lte;
    impl Compare for Lte {
        fn name(&self) -> &str { "lte" }
        fn compare(&self, a: &Value, b: &Value) -> bool {
            cmp_numbers(a, b, |o| o != Ordering::Greater)
        }
    }

    pub struct Contains;
    impl Compare for Contains {
        fn name(&self) -> &str { "contains" }
        fn compare(&self, a: &Value, b: &Value) -> bool { contains(a, b) }
    }
}
