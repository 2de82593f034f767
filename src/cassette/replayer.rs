//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette.
///
/// Interactions are queued per port/method pair. Sequential ports take
/// them in order; ports whose calls run concurrently are recorded in
/// completion order and take them by matching input instead.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination, naming what was requested and what remains.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let queue = self.queue(port, method);
        let Some(interaction) = queue.pop_front() else {
            panic!(
                "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                 have been consumed."
            );
        };
        interaction
    }

    /// Takes the first remaining interaction whose recorded input equals `input`.
    ///
    /// # Panics
    ///
    /// Panics if no remaining interaction for the port/method pair matches.
    pub fn next_matching(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Interaction {
        let queue = self.queue(port, method);
        let found = queue.iter().position(|i| &i.input == input).and_then(|p| queue.remove(p));
        let Some(interaction) = found else {
            panic!(
                "Cassette exhausted: no remaining interaction for port={port:?} \
                 method={method:?} with input {input}. {} unmatched interaction(s) left.",
                queue.len()
            );
        };
        interaction
    }

    fn queue(&mut self, port: &str, method: &str) -> &mut VecDeque<Interaction> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };
        if !self.queues.contains_key(&key) {
            let available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        }
        self.queues.entry(key).or_default()
    }
}
