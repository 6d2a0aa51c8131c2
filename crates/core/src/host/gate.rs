//! Feature gating consulted before every public operation.

use rustc_hash::FxHashSet;

use super::Operation;

pub trait FeatureGate {
    fn allows(&self, op: Operation) -> bool;
}

/// Gate that allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl FeatureGate for AllowAll {
    fn allows(&self, _op: Operation) -> bool {
        true
    }
}

/// Gate that refuses a fixed set of operations.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    denied: FxHashSet<Operation>,
}

impl DenyList {
    pub fn new<I: IntoIterator<Item = Operation>>(ops: I) -> Self {
        Self {
            denied: ops.into_iter().collect(),
        }
    }

    pub fn deny(&mut self, op: Operation) {
        self.denied.insert(op);
    }
}

impl FeatureGate for DenyList {
    fn allows(&self, op: Operation) -> bool {
        !self.denied.contains(&op)
    }
}

impl<G: FeatureGate + ?Sized> FeatureGate for &G {
    fn allows(&self, op: Operation) -> bool {
        (**self).allows(op)
    }
}
