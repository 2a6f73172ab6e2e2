use serde::{Deserialize, Serialize};

/// Navigation target of the editor client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Login,
    Register,
    Dashboard,
    Profile,
    Editor,
    Preview,
    PublicResume,
}
