use crate::recognition::RecognitionResult;
use std::collections::HashMap;

/// Symbol name → last-known value, as reported by assignment results.
///
/// Grows only through `apply_assignments`; a later assignment for an
/// existing name overwrites the value. Entries are never removed
/// individually, only dropped wholesale by `clear` on reset.
#[derive(Debug, Default)]
pub struct VariableStore {
    bindings: HashMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every result flagged as an assignment, keyed by its
    /// expression. Non-assignment results are ignored here.
    pub fn apply_assignments(&mut self, results: &[RecognitionResult]) {
        for result in results {
            if result.is_assignment {
                self.bindings
                    .insert(result.expr.clone(), result.value.clone());
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn bindings(&self) -> &HashMap<String, String> {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
