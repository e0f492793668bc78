use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// In-memory handoff between pipeline steps, scoped to one run. A step
/// publishes under (its step id, a slot key); a downstream step pulls by
/// naming the same pair. Values are stored as JSON, so a published batch
/// is a list of field-mappings rather than a live Rust value.
#[derive(Debug, Default)]
pub struct Handoff {
    slots: HashMap<(String, String), Value>,
}

impl Handoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish<T: Serialize>(&mut self, step_id: &str, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.slots.insert((step_id.into(), key.into()), value);
        Ok(())
    }

    /// `Ok(None)` when nothing was published under the pair; the caller
    /// decides whether that is a problem.
    pub fn pull<T: DeserializeOwned>(&self, step_id: &str, key: &str) -> Result<Option<T>> {
        self.slots
            .get(&(step_id.into(), key.into()))
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BookRecord;

    #[test]
    fn publish_then_pull_round_trips_a_batch() {
        let batch = vec![BookRecord {
            title: "T".into(),
            author: "A".into(),
            price: "9".into(),
            rating: "5 out of 5 stars".into(),
        }];
        let mut handoff = Handoff::new();
        handoff.publish("fetch_books", "amazonbooks", &batch).unwrap();

        let pulled: Option<Vec<BookRecord>> =
            handoff.pull("fetch_books", "amazonbooks").unwrap();
        assert_eq!(pulled.unwrap(), batch);
    }

    #[test]
    fn pull_of_absent_slot_is_none() {
        let handoff = Handoff::new();
        let pulled: Option<Vec<BookRecord>> = handoff.pull("fetch_books", "missing").unwrap();
        assert!(pulled.is_none());
    }

    #[test]
    fn slots_are_scoped_by_step_id() {
        let mut handoff = Handoff::new();
        handoff.publish("step_a", "key", &1u32).unwrap();
        let other: Option<u32> = handoff.pull("step_b", "key").unwrap();
        assert!(other.is_none());
    }
}
