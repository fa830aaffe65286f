//! Dot-separated property paths.
//!
//! A path like `tests.1.components.0.name` names record properties by their
//! declared name and container elements by zero-based index. The empty path
//! is the root itself.

use super::Introspect;
use crate::error::{EditError, PathError};

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

fn join(done: &str, segment: &str) -> String {
    if done.is_empty() {
        segment.to_string()
    } else {
        format!("{done}.{segment}")
    }
}

/// Follow `path` from `root`.
///
/// The final value is returned as declared, so an absent optional at the end
/// of the path resolves; absent values in the middle do not.
pub fn resolve<'a>(root: &'a dyn Introspect, path: &str) -> Result<&'a dyn Introspect, PathError> {
    let mut current = root;
    let mut done = String::new();
    for segment in segments(path) {
        let node = current
            .node()
            .ok_or_else(|| PathError::Absent(done.clone()))?;
        let next = match (segment.parse::<usize>(), node.elements()) {
            (Ok(index), Some(elements)) => elements.get(index).copied(),
            _ => node.property(segment).map(|p| p.value),
        };
        current = next.ok_or_else(|| PathError::NotFound {
            path: done.clone(),
            segment: segment.to_string(),
        })?;
        done = join(&done, segment);
    }
    Ok(current)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(
    root: &'a mut dyn Introspect,
    path: &str,
) -> Result<&'a mut dyn Introspect, PathError> {
    let mut current = root;
    let mut done = String::new();
    for segment in segments(path) {
        let node = current
            .node_mut()
            .ok_or_else(|| PathError::Absent(done.clone()))?;
        let index = segment
            .parse::<usize>()
            .ok()
            .filter(|_| node.elements().is_some());
        let declared = node.property(segment).is_some();
        let next = match index {
            Some(index) => node.element_mut(index),
            None => node.property_mut(segment),
        };
        current = match next {
            Some(next) => next,
            None if index.is_none() && declared => {
                return Err(PathError::ReadOnly(join(&done, segment)));
            }
            None => {
                return Err(PathError::NotFound {
                    path: done,
                    segment: segment.to_string(),
                });
            }
        };
        done = join(&done, segment);
    }
    Ok(current)
}

/// Parse `text` into the scalar at `path`.
pub fn assign_path(root: &mut dyn Introspect, path: &str, text: &str) -> Result<(), EditError> {
    resolve_mut(root, path)?.assign(text)?;
    Ok(())
}
