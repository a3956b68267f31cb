// src/schema.rs
// =============================================================================
// Response shapes for the endpoints the dashboard reads.
//
// A controller hands back whatever JSON the server sent. Before a view uses
// it, it checks the payload against one of these types (a "shape guard").
// Anything that does not fit is treated as "no usable data".
//
// Each type implements Schema, which just gives it a name for error
// messages and a one-call guard.
// =============================================================================

use crate::error::Result;
use crate::fetch::FetchState;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

pub trait Schema: DeserializeOwned {
    const NAME: &'static str;

    /// Decodes the state's data, or reports a ShapeMismatch.
    fn from_state(state: &FetchState) -> Result<Self> {
        state.parse(Self::NAME)
    }
}

/// The signed-in user, as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserSidebar {
    pub name: String,
    pub login: String,
    pub image: String,
}

impl Schema for UserSidebar {
    const NAME: &'static str = "user";
}

/// Language name -> bytes of code, summed across repositories.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Languages(pub BTreeMap<String, u64>);

impl Languages {
    /// Languages sorted by share, largest first, as (name, percent).
    pub fn breakdown(&self) -> Vec<(String, f64)> {
        let total: u64 = self.0.values().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut shares: Vec<(String, f64)> = self
            .0
            .iter()
            .map(|(name, bytes)| (name.clone(), *bytes as f64 * 100.0 / total as f64))
            .collect();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        shares
    }
}

impl Schema for Languages {
    const NAME: &'static str = "languages";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub url: String,
    #[serde(default)]
    pub private: bool,
}

impl Schema for Vec<Repository> {
    const NAME: &'static str = "repositories";
}

/// One bar of the commits graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyCommits {
    pub date: String,
    pub count: u32,
}

impl Schema for Vec<DailyCommits> {
    const NAME: &'static str = "commits";
}

/// One row of a commits breakdown table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitRow {
    pub sha: String,
    pub repository: String,
    pub date: String,
    pub changes: u32,
    pub url: String,
}

impl CommitRow {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

impl Schema for Vec<CommitRow> {
    const NAME: &'static str = "commit breakdown";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
}

impl Schema for Vec<PullRequest> {
    const NAME: &'static str = "pull requests";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u32,
}

impl Schema for Vec<Contributor> {
    const NAME: &'static str = "contributors";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoStatistics {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
}

impl Schema for RepoStatistics {
    const NAME: &'static str = "statistics";
}
