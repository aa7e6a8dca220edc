//! Batch results
//!
//! A batch of exactly one request collapses to that request's bare result;
//! anything larger is keyed by submission index.

use crate::error::Result;
use crate::projector::Projected;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Shaped results of one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchResult {
    /// The batch held exactly one request
    Single(Projected),
    /// Results keyed by submission index, `0..n`
    Many(BTreeMap<usize, Projected>),
}

impl BatchResult {
    /// Apply the collapse rule to results in index order.
    ///
    /// Returns `None` for an empty batch.
    pub fn collapse(results: Vec<Projected>) -> Option<Self> {
        let mut results = results;
        match results.len() {
            0 => None,
            1 => results.pop().map(Self::Single),
            _ => Some(Self::Many(results.into_iter().enumerate().collect())),
        }
    }

    /// Number of results
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(map) => map.len(),
        }
    }

    /// Always `false`: empty batches produce no result at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` when the result was collapsed to a single value
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Result for submission `index`
    pub fn get(&self, index: usize) -> Option<&Projected> {
        match self {
            Self::Single(projected) => (index == 0).then_some(projected),
            Self::Many(map) => map.get(&index),
        }
    }

    /// The bare value of a collapsed batch
    pub fn as_single(&self) -> Option<&Projected> {
        match self {
            Self::Single(projected) => Some(projected),
            Self::Many(_) => None,
        }
    }

    /// The keyed results of a multi-request batch
    pub fn as_many(&self) -> Option<&BTreeMap<usize, Projected>> {
        match self {
            Self::Single(_) => None,
            Self::Many(map) => Some(map),
        }
    }

    /// Iterate over `(index, result)` in index order
    pub fn iter(&self) -> Box<dyn Iterator<Item = (usize, &Projected)> + '_> {
        match self {
            Self::Single(projected) => Box::new(std::iter::once((0, projected))),
            Self::Many(map) => Box::new(map.iter().map(|(i, p)| (*i, p))),
        }
    }
}

/// A collapsed batch serializes as its bare value; a larger batch as a JSON
/// array in index order.
impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Single(projected) => projected.serialize(serializer),
            Self::Many(map) => serializer.collect_seq(map.values()),
        }
    }
}

/// What one `send` produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    result: Option<BatchResult>,
}

impl Response {
    /// Wrap a batch result
    pub fn new(result: Option<BatchResult>) -> Self {
        Self { result }
    }

    /// The batch result, or `None` when nothing was sent
    pub fn get_response(&self) -> Option<&BatchResult> {
        self.result.as_ref()
    }

    /// The batch result as JSON text, or `None` when nothing was sent
    pub fn get_response_json(&self) -> Result<Option<String>> {
        self.result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(Into::into)
    }

    /// Take the batch result
    pub fn into_result(self) -> Option<BatchResult> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_empty() {
        assert_eq!(BatchResult::collapse(Vec::new()), None);
    }

    #[test]
    fn test_collapse_single() {
        let result = BatchResult::collapse(vec![Projected::Status(200)]).unwrap();

        assert!(result.is_single());
        assert_eq!(result.as_single(), Some(&Projected::Status(200)));
        assert_eq!(result.get(0), Some(&Projected::Status(200)));
        assert_eq!(result.get(1), None);
    }

    #[test]
    fn test_many_keys_are_submission_indices() {
        let result = BatchResult::collapse(vec![
            Projected::Status(200),
            Projected::Status(404),
            Projected::Status(0),
        ])
        .unwrap();

        let keys: Vec<_> = result.as_many().unwrap().keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(result.get(1), Some(&Projected::Status(404)));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_json_forms() {
        let single = Response::new(BatchResult::collapse(vec![Projected::Body(
            Bytes::from_static(b"hi"),
        )]));
        assert_eq!(single.get_response_json().unwrap().as_deref(), Some("\"hi\""));

        let many = Response::new(BatchResult::collapse(vec![
            Projected::Status(200),
            Projected::Status(500),
        ]));
        assert_eq!(many.get_response_json().unwrap().as_deref(), Some("[200,500]"));
    }

    #[test]
    fn test_empty_response_is_none() {
        let response = Response::default();

        assert!(response.get_response().is_none());
        assert_eq!(response.get_response_json().unwrap(), None);
    }
}
