use std::collections::HashMap;

use log::trace;

/// A symbol observed with a size that differs from the one it was first bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConflict {
    pub symbol: String,
    pub bound: usize,
    pub observed: usize,
}

/// Sizes observed for each symbolic dimension during one validation pass.
///
/// Bindings are write-once: the first observation of a symbol fixes its size and every
/// later observation must agree with it.
#[derive(Debug, Clone, Default)]
pub struct ShapeBinding {
    sizes: HashMap<String, usize>,
}

impl ShapeBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, symbol: &str, observed: usize) -> Result<(), BindingConflict> {
        match self.sizes.get(symbol) {
            Some(&bound) if bound == observed => Ok(()),
            Some(&bound) => Err(BindingConflict {
                symbol: symbol.to_string(),
                bound,
                observed,
            }),
            None => {
                trace!("binding symbol {} = {}", symbol, observed);
                self.sizes.insert(symbol.to_string(), observed);
                Ok(())
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<usize> {
        self.sizes.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
