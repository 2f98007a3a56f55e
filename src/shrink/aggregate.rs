//! Shrinking for collections, strings, options and tuples.

use std::collections::{BTreeMap, BTreeSet};

use super::Shrink;

/// Most candidates a tuple yields from its Cartesian product.
pub const MAX_TUPLE_CANDIDATES: usize = 4_096;

/// Empty, then every single removal (for two or more elements), then every
/// single-position substitution by that element's own candidates.
impl<T: Shrink + Clone> Shrink for Vec<T> {
    fn shrink(&self) -> Vec<Self> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut candidates = vec![Vec::new()];
        if self.len() > 1 {
            for skip in 0..self.len() {
                let mut smaller = self.clone();
                smaller.remove(skip);
                candidates.push(smaller);
            }
        }
        for (position, element) in self.iter().enumerate() {
            for replacement in element.shrink() {
                let mut substituted = self.clone();
                substituted[position] = replacement;
                candidates.push(substituted);
            }
        }
        candidates
    }
}

impl Shrink for String {
    fn shrink(&self) -> Vec<Self> {
        let chars: Vec<char> = self.chars().collect();
        if let [single] = chars.as_slice() {
            let mut candidates: Vec<String> =
                single.shrink().into_iter().map(String::from).collect();
            candidates.push(String::new());
            return candidates;
        }
        chars
            .shrink()
            .into_iter()
            .map(|candidate| candidate.into_iter().collect())
            .collect()
    }
}

/// Keys are kept; only values shrink.
impl<K: Ord + Clone, V: Shrink + Clone> Shrink for BTreeMap<K, V> {
    fn shrink(&self) -> Vec<Self> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut candidates = vec![BTreeMap::new()];
        if self.len() > 1 {
            for key in self.keys() {
                let mut smaller = self.clone();
                smaller.remove(key);
                candidates.push(smaller);
            }
        }
        for (key, value) in self {
            for replacement in value.shrink() {
                let mut substituted = self.clone();
                substituted.insert(key.clone(), replacement);
                candidates.push(substituted);
            }
        }
        candidates
    }
}

impl<T: Shrink + Ord + Clone> Shrink for BTreeSet<T> {
    fn shrink(&self) -> Vec<Self> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut candidates = vec![BTreeSet::new()];
        if self.len() > 1 {
            for element in self {
                let mut smaller = self.clone();
                smaller.remove(element);
                candidates.push(smaller);
            }
        }
        for element in self {
            for replacement in element.shrink() {
                let mut substituted = self.clone();
                substituted.remove(element);
                substituted.insert(replacement);
                if !candidates.contains(&substituted) {
                    candidates.push(substituted);
                }
            }
        }
        candidates
    }
}

impl<T: Shrink + Clone> Shrink for Option<T> {
    fn shrink(&self) -> Vec<Self> {
        match self {
            None => Vec::new(),
            Some(value) => std::iter::once(None)
                .chain(value.shrink().into_iter().map(Some))
                .collect(),
        }
    }
}

impl Shrink for () {
    fn shrink(&self) -> Vec<Self> {
        Vec::new()
    }
}

/// Each axis contributes `{itself} ∪ shrink(itself)`; every combination but
/// the all-original one is a candidate, the first axis varying fastest.
macro_rules! shrink_tuple {
    ($(($ty:ident, $axis:ident, $idx:tt)),+) => {
        impl<$($ty: Shrink + Clone),+> Shrink for ($($ty,)+) {
            #[allow(unused_assignments)]
            fn shrink(&self) -> Vec<Self> {
                $(
                    let $axis: Vec<$ty> = std::iter::once(self.$idx.clone())
                        .chain(self.$idx.shrink())
                        .collect();
                )+
                let radices = [$($axis.len()),+];
                let total = radices
                    .iter()
                    .try_fold(1usize, |acc, n| acc.checked_mul(*n))
                    .unwrap_or(usize::MAX)
                    .min(MAX_TUPLE_CANDIDATES.saturating_add(1));
                let mut candidates = Vec::with_capacity(total.saturating_sub(1));
                for index in 1..total {
                    let mut rest = index;
                    candidates.push(($(
                        {
                            let digit = rest % radices[$idx];
                            rest /= radices[$idx];
                            $axis[digit].clone()
                        },
                    )+));
                }
                candidates
            }
        }
    };
}

shrink_tuple!((A, a, 0), (B, b, 1));
shrink_tuple!((A, a, 0), (B, b, 1), (C, c, 2));
shrink_tuple!((A, a, 0), (B, b, 1), (C, c, 2), (D, d, 3));
shrink_tuple!((A, a, 0), (B, b, 1), (C, c, 2), (D, d, 3), (E, e, 4));
shrink_tuple!((A, a, 0), (B, b, 1), (C, c, 2), (D, d, 3), (E, e, 4), (F, f, 5));
