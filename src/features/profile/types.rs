use serde::{Deserialize, Serialize};

/// Editable profile fields. Some screens keep these only on the device, others
/// also send them to the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ProfileFields {
    /// Fills fields left unset here from `base`. Links are replaced only when at
    /// least one is given.
    #[must_use]
    pub fn merged_over(self, base: Self) -> Self {
        Self {
            position: self.position.or(base.position),
            about: self.about.or(base.about),
            links: if self.links.is_empty() {
                base.links
            } else {
                self.links
            },
        }
    }
}
