//! Override lookup along a priority chain.
//!
//! Consumers resolve per-timeline asset overrides by walking an ancestor
//! chain and taking the first candidate that exists: a timeline that ships
//! its own illustration wins over the one it inherits from.

use std::path::{Path, PathBuf};

use crate::ident::Ident;

/// First probe hit along `chain`, in priority order.
pub fn first_existing<P>(chain: &[Ident], mut probe: P) -> Option<PathBuf>
where
    P: FnMut(&Ident) -> Option<PathBuf>,
{
    chain.iter().find_map(|ancestor| probe(ancestor))
}

/// First existing file of the form `dir/<ancestor-name><suffix>` along
/// `chain`.
pub fn find_override(dir: &Path, chain: &[Ident], suffix: &str) -> Option<PathBuf> {
    first_existing(chain, |ancestor| {
        let candidate = dir.join(format!("{}{}", ancestor.name(), suffix));
        candidate.is_file().then_some(candidate)
    })
}
