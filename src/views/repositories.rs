// src/views/repositories.rs
// =============================================================================
// "Your Repositories": the repository table, then language, statistics,
// contributor and pull request panels, then the commits breakdown.
// =============================================================================

use super::user::write_commit_table;
use super::{truncate, write_panel, View};
use crate::fetch::{FetchContext, FetchController, FetchRequest};
use crate::http::HttpMethod;
use crate::schema::{CommitRow, Contributor, Languages, PullRequest, RepoStatistics, Repository};
use std::fmt::{self, Write};

const REPOSITORIES: &str = "/api/repositories";
const LANGUAGES: &str = "/api/repositories/languages";
const STATISTICS: &str = "/api/repositories/statistics";
const CONTRIBUTORS: &str = "/api/repositories/contributors";
const PULL_REQUESTS: &str = "/api/repositories/pulls";
const COMMIT_BREAKDOWN: &str = "/api/commits/breakdown";

pub struct RepositoriesPage {
    repos: FetchController,
    languages: FetchController,
    statistics: FetchController,
    contributors: FetchController,
    prs: FetchController,
    commits: FetchController,
}

impl RepositoriesPage {
    pub fn new(context: &FetchContext) -> Self {
        Self {
            repos: context.controller(HttpMethod::Get),
            languages: context.controller(HttpMethod::Get),
            statistics: context.controller(HttpMethod::Get),
            contributors: context.controller(HttpMethod::Get),
            prs: context.controller(HttpMethod::Get),
            commits: context.controller(HttpMethod::Get),
        }
    }

    pub async fn load(&self) {
        futures::join!(
            self.repos.fetch_data(FetchRequest::new(REPOSITORIES)),
            self.languages.fetch_data(FetchRequest::new(LANGUAGES)),
            self.statistics.fetch_data(FetchRequest::new(STATISTICS)),
            self.contributors.fetch_data(FetchRequest::new(CONTRIBUTORS)),
            self.prs.fetch_data(FetchRequest::new(PULL_REQUESTS)),
            self.commits.fetch_data(FetchRequest::new(COMMIT_BREAKDOWN)),
        );
    }
}

impl View for RepositoriesPage {
    fn panels(&self) -> Vec<(&'static str, &FetchController)> {
        vec![
            ("repos", &self.repos),
            ("languages", &self.languages),
            ("statistics", &self.statistics),
            ("contributors", &self.contributors),
            ("prs", &self.prs),
            ("commits", &self.commits),
        ]
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "📁 Your Repositories")?;
        writeln!(out)?;

        write_panel::<Vec<Repository>>(
            out,
            "Your Repositories",
            "Overview of your repositories",
            &self.repos.state(),
            |out, repos| {
                writeln!(
                    out,
                    "   {:<32} {:<12} {:<12} {:<8} {}",
                    "REPO NAME", "CREATED", "UPDATED", "PRIVATE", "🔗"
                )?;
                for repo in repos {
                    writeln!(
                        out,
                        "   {:<32} {:<12} {:<12} {:<8} {}",
                        truncate(&repo.name, 32),
                        truncate(&repo.created_at, 12),
                        truncate(&repo.updated_at, 12),
                        if repo.private { "yes" } else { "no" },
                        repo.url
                    )?;
                }
                Ok(())
            },
        )?;

        write_panel::<Languages>(
            out,
            "Language Breakdown",
            "This repository's languages breakdown",
            &self.languages.state(),
            |out, languages| {
                for (name, percent) in languages.breakdown() {
                    writeln!(out, "   {:<20} {:>5.1}%", name, percent)?;
                }
                Ok(())
            },
        )?;

        write_panel::<RepoStatistics>(
            out,
            "Statistics",
            "This repo in numbers",
            &self.statistics.state(),
            |out, stats| {
                writeln!(out, "   ⭐ Stars:       {}", stats.stars)?;
                writeln!(out, "   🍴 Forks:       {}", stats.forks)?;
                writeln!(out, "   👀 Watchers:    {}", stats.watchers)?;
                writeln!(out, "   🐛 Open issues: {}", stats.open_issues)
            },
        )?;

        write_panel::<Vec<Contributor>>(
            out,
            "Contributors",
            "Everyone who's contributed to this repo",
            &self.contributors.state(),
            |out, contributors| {
                for contributor in contributors {
                    writeln!(
                        out,
                        "   {:<30} {:>6} commits",
                        truncate(&contributor.login, 30),
                        contributor.contributions
                    )?;
                }
                Ok(())
            },
        )?;

        write_panel::<Vec<PullRequest>>(
            out,
            "Pull Requests",
            "Open and recently closed pull requests",
            &self.prs.state(),
            |out, prs| {
                for pr in prs {
                    writeln!(out, "   #{:<6} {:<8} {}", pr.number, pr.state, truncate(&pr.title, 56))?;
                }
                Ok(())
            },
        )?;

        write_panel::<Vec<CommitRow>>(
            out,
            "Repository Commits Breakdown",
            "The details behind this repository's commits over the last 21 days",
            &self.commits.state(),
            write_commit_table,
        )
    }
}
