// src/views/user.rs
// =============================================================================
// "Your Stats": commits graph, languages, recent repositories and a
// breakdown of the last week's commits.
//
// Five controllers, fetched in parallel. Each panel renders on its own, so
// a failing languages endpoint does not hide the commits graph.
// =============================================================================

use super::{truncate, write_panel, View};
use crate::fetch::{FetchContext, FetchController, FetchRequest};
use crate::http::HttpMethod;
use crate::schema::{CommitRow, DailyCommits, Languages, Repository};
use std::fmt::{self, Write};

const COMMITS: &str = "/api/commits";
const LANGUAGES: &str = "/api/repositories/languages";
const REPOSITORIES: &str = "/api/repositories";
const RECENT_REPOSITORIES: &str = "/api/repositories/recent";
const COMMIT_BREAKDOWN: &str = "/api/commits/breakdown";

pub struct UserPage {
    commits: FetchController,
    languages: FetchController,
    repositories: FetchController,
    recent_repos: FetchController,
    repo_commits: FetchController,
}

impl UserPage {
    pub fn new(context: &FetchContext) -> Self {
        Self {
            commits: context.controller(HttpMethod::Get),
            languages: context.controller(HttpMethod::Get),
            repositories: context.controller(HttpMethod::Get),
            recent_repos: context.controller(HttpMethod::Get),
            repo_commits: context.controller(HttpMethod::Get),
        }
    }

    /// Triggers every panel's fetch once and waits for all of them.
    pub async fn load(&self) {
        futures::join!(
            self.commits.fetch_data(FetchRequest::new(COMMITS)),
            self.languages.fetch_data(FetchRequest::new(LANGUAGES)),
            self.repositories.fetch_data(FetchRequest::new(REPOSITORIES)),
            self.recent_repos.fetch_data(FetchRequest::new(RECENT_REPOSITORIES)),
            self.repo_commits.fetch_data(FetchRequest::new(COMMIT_BREAKDOWN)),
        );
    }
}

impl View for UserPage {
    fn panels(&self) -> Vec<(&'static str, &FetchController)> {
        vec![
            ("commits", &self.commits),
            ("languages", &self.languages),
            ("repositories", &self.repositories),
            ("recent_repos", &self.recent_repos),
            ("repo_commits", &self.repo_commits),
        ]
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "📊 Your Stats")?;
        if let Some(repos) = self.repositories.state().usable::<Vec<Repository>>() {
            writeln!(out, "   across {} repositories", repos.len())?;
        }
        writeln!(out)?;

        write_panel::<Vec<DailyCommits>>(
            out,
            "Your Commits",
            "Track how your commits compare day to day",
            &self.commits.state(),
            write_commits_graph,
        )?;

        write_panel::<Languages>(
            out,
            "Your Languages",
            "Your favourite languages across all your repositories",
            &self.languages.state(),
            |out, languages| {
                for (name, percent) in languages.breakdown() {
                    writeln!(out, "   {:<20} {:>5.1}%", name, percent)?;
                }
                Ok(())
            },
        )?;

        write_panel::<Vec<Repository>>(
            out,
            "Recent Repositories",
            "Your recent pushed to repositories",
            &self.recent_repos.state(),
            |out, repos| {
                for repo in repos {
                    writeln!(out, "   {:<40} {}", truncate(&repo.name, 40), repo.updated_at)?;
                }
                Ok(())
            },
        )?;

        write_panel::<Vec<CommitRow>>(
            out,
            "Commits Breakdown",
            "See the details behind your commits for the last 7 days",
            &self.repo_commits.state(),
            write_commit_table,
        )
    }
}

fn write_commits_graph(out: &mut String, days: &Vec<DailyCommits>) -> fmt::Result {
    let max = days.iter().map(|d| d.count).max().unwrap_or(0).max(1);
    for day in days {
        // Scale bars to at most 40 columns
        let width = (day.count as usize * 40).div_ceil(max as usize);
        writeln!(out, "   {:<12} {:<40} {}", day.date, "█".repeat(width), day.count)?;
    }
    Ok(())
}

/// Shared with the repositories page.
pub(crate) fn write_commit_table(out: &mut String, rows: &Vec<CommitRow>) -> fmt::Result {
    writeln!(
        out,
        "   {:<9} {:<30} {:<12} {:>8}  {}",
        "SHA", "REPOSITORY", "DATE", "CHANGES", "🔗"
    )?;
    for row in rows {
        writeln!(
            out,
            "   {:<9} {:<30} {:<12} {:>8}  {}",
            row.short_sha(),
            truncate(&row.repository, 30),
            row.date,
            row.changes,
            row.url
        )?;
    }
    Ok(())
}
