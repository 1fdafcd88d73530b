//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port, method and request input.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct RequestKey {
    port: String,
    method: String,
    input: String,
}

impl RequestKey {
    fn new(port: &str, method: &str, input: &serde_json::Value) -> Self {
        Self { port: port.to_string(), method: method.to_string(), input: input.to_string() }
    }
}

/// Replays interactions from a loaded cassette.
///
/// Interactions are matched on port, method and input, so requests that
/// completed in a different order while recording still replay correctly.
/// Repeated identical requests are served in recorded order.
pub struct CassetteReplayer {
    queues: HashMap<RequestKey, Vec<Interaction>>,
    cursors: HashMap<RequestKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<RequestKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = RequestKey::new(&interaction.port, &interaction.method, &interaction.input);
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next recorded interaction matching the request, if any.
    ///
    /// Once every recording of a request has been served, the last one is
    /// repeated.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Option<&Interaction> {
        let key = RequestKey::new(port, method, input);
        let queue = self.queues.get(&key)?;
        let cursor = self.cursors.entry(key).or_insert(0);
        let index = (*cursor).min(queue.len().saturating_sub(1));
        *cursor += 1;
        queue.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            source: ".".into(),
            interactions,
        }
    }

    fn fetch(seq: u64, path: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "fetch".into(),
            method: "fetch_text".into(),
            input: json!({ "path": path }),
            output,
        }
    }

    #[test]
    fn matches_on_input_regardless_of_order() {
        let cassette = make_cassette(vec![
            fetch(0, "b/tree.json", json!({"Ok": "tree"})),
            fetch(1, "b/readme.html", json!({"Ok": "readme"})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        let readme = replayer.next_interaction("fetch", "fetch_text", &json!({"path": "b/readme.html"}));
        assert_eq!(readme.unwrap().seq, 1);
        let tree = replayer.next_interaction("fetch", "fetch_text", &json!({"path": "b/tree.json"}));
        assert_eq!(tree.unwrap().seq, 0);
    }

    #[test]
    fn repeated_requests_advance_then_stick_to_last() {
        let cassette = make_cassette(vec![
            fetch(0, "a", json!({"Err": "HTTP 503"})),
            fetch(1, "a", json!({"Ok": "body"})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let input = json!({"path": "a"});

        assert_eq!(replayer.next_interaction("fetch", "fetch_text", &input).unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("fetch", "fetch_text", &input).unwrap().seq, 1);
        assert_eq!(replayer.next_interaction("fetch", "fetch_text", &input).unwrap().seq, 1);
    }

    #[test]
    fn unknown_request_is_none() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        assert!(replayer.next_interaction("fetch", "fetch_text", &json!({"path": "x"})).is_none());
    }
}
