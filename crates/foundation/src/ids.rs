use serde::{Deserialize, Serialize};

/// Stable identifier for an animated agent within one agent set.
///
/// Ids restart at zero every time the set is re-initialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn new(n: u32) -> Self {
        AgentId(n)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::AgentId;

    #[test]
    fn displays_with_prefix() {
        assert_eq!(AgentId::new(7).to_string(), "agent-7");
        assert_eq!(AgentId::new(7).index(), 7);
    }
}
