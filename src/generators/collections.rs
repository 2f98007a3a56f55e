//! Collection generators.
//!
//! Lengths are drawn with the integer generator centered at the minimum, so
//! early runs produce short collections and later ones approach the maximum.
//! Elements are then drawn in order with [`sequence`].

use std::collections::{BTreeMap, BTreeSet};

use crate::computation::{Gen, Step, rand, sequence, zip};

use super::ConfigError;
use super::numeric::integer;
use super::options::{Center, GenOptions};

/// Longest default collection.
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// Length computation shared by strings and collections.
///
/// Defaults: `min = 0`, `max = min + DEFAULT_MAX_LENGTH`, center at `min`.
pub(crate) fn length(options: &GenOptions<usize>) -> Result<Gen<usize>, ConfigError> {
    let min = options.min.unwrap_or(0);
    let max = options
        .max
        .unwrap_or_else(|| min.saturating_add(DEFAULT_MAX_LENGTH));
    integer(&GenOptions {
        min: Some(min),
        max: Some(max),
        center: Some(options.center.unwrap_or(Center::Min)),
        charset: None,
        inclusive: options.inclusive,
    })
}

/// Vectors of independent `element` draws.
pub fn array<T: 'static>(
    element: &Gen<T>,
    options: &GenOptions<usize>,
) -> Result<Gen<Vec<T>>, ConfigError> {
    let element = element.clone();
    Ok(length(options)?.bind(move |n| sequence(vec![element.clone(); n])))
}

/// Maps built from `options`-many key/value draws; a repeated key keeps the
/// last value drawn for it.
pub fn map<K, V>(
    key: &Gen<K>,
    value: &Gen<V>,
    options: &GenOptions<usize>,
) -> Result<Gen<BTreeMap<K, V>>, ConfigError>
where
    K: Ord + Clone + 'static,
    V: 'static,
{
    Ok(array(&zip(key, value), options)?.map(|entries| entries.into_iter().collect()))
}

/// Sets of `options`-many draws. Collisions make the set smaller than the
/// drawn length.
pub fn set<T: Ord + 'static>(
    element: &Gen<T>,
    options: &GenOptions<usize>,
) -> Result<Gen<BTreeSet<T>>, ConfigError> {
    Ok(array(element, options)?.map(|values| values.into_iter().collect()))
}

/// Maps with a fixed set of keys, each drawn by its own generator in order.
pub fn record<V: 'static>(fields: Vec<(String, Gen<V>)>) -> Gen<BTreeMap<String, V>> {
    let (names, generators): (Vec<String>, Vec<Gen<V>>) = fields.into_iter().unzip();
    sequence(generators).map(move |values| names.iter().cloned().zip(values).collect())
}

/// `None` one time in four, otherwise `Some` of a draw from `inner`.
pub fn optional<T: 'static>(inner: &Gen<T>) -> Gen<Option<T>> {
    let inner = inner.clone();
    rand(4).bind(move |roll| {
        if roll == 0 {
            Gen::new(|_, size| Step::success(None, size))
        } else {
            inner.map(Some)
        }
    })
}
