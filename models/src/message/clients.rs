use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which front-end surface a socket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientRole {
    #[serde(rename = "vsc")]
    Editor,
    #[serde(rename = "excalidraw")]
    Canvas,
}

impl ClientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientRole::Editor => "vsc",
            ClientRole::Canvas => "excalidraw",
        }
    }
}

/// Server notification of how many sockets are attached per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedClients {
    /// Keyed by the wire role name; roles this client does not know are kept.
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
}

impl ConnectedClients {
    /// Connection count for `role`, zero when the server omitted it.
    pub fn count(&self, role: ClientRole) -> u32 {
        self.counts.get(role.as_str()).copied().unwrap_or(0)
    }
}
