// src/views/sidebar.rs
// =============================================================================
// The navigation shell printed above every page: the "Squares" brand, the
// nav links, and the account widget for whoever is signed in.
//
// The account widget only ever shows two things: a "Name / Username"
// placeholder while loading, or the real user once the payload passes its
// guard. On error or a bad payload it shows nothing at all.
// =============================================================================

use super::{Render, View};
use crate::fetch::{FetchContext, FetchController, FetchRequest};
use crate::http::HttpMethod;
use crate::schema::UserSidebar;
use std::fmt::{self, Write};

const USERS: &str = "/api/users";

/// (label, path) pairs, top to bottom.
pub const NAV_LINKS: [(&str, &str); 4] = [
    ("Dashboard", "/"),
    ("Repositories", "/repositories"),
    ("Commits", "/commits"),
    ("Settings", "/settings"),
];

pub struct UserAccount {
    users: FetchController,
}

impl UserAccount {
    pub fn new(context: &FetchContext) -> Self {
        Self {
            users: context.controller(HttpMethod::Get),
        }
    }

    pub async fn load(&self) {
        self.users.fetch_data(FetchRequest::new(USERS)).await;
    }
}

impl View for UserAccount {
    fn panels(&self) -> Vec<(&'static str, &FetchController)> {
        vec![("users", &self.users)]
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        match Render::<UserSidebar>::from_state(&self.users.state()) {
            Render::Ready(user) => {
                writeln!(out, "👤 {}", user.name)?;
                writeln!(out, "   {}", user.login)?;
            }
            Render::Loading => {
                writeln!(out, "👤 Name")?;
                writeln!(out, "   Username")?;
            }
            Render::Failed(_) | Render::Empty => {}
        }
        Ok(())
    }
}

pub struct Sidebar {
    /// Path of the page being shown, marked in the nav
    active: &'static str,
    account: UserAccount,
}

impl Sidebar {
    pub fn new(context: &FetchContext, active: &'static str) -> Self {
        Self {
            active,
            account: UserAccount::new(context),
        }
    }

    pub async fn load(&self) {
        self.account.load().await;
    }
}

impl View for Sidebar {
    fn panels(&self) -> Vec<(&'static str, &FetchController)> {
        self.account.panels()
    }

    fn render(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "🟩 Squares")?;
        let nav: Vec<String> = NAV_LINKS
            .iter()
            .map(|(label, path)| {
                if *path == self.active {
                    format!("[{}]", label)
                } else {
                    label.to_string()
                }
            })
            .collect();
        writeln!(out, "   {}", nav.join("  ·  "))?;
        self.account.render(out)?;
        writeln!(out, "{}", "=".repeat(72))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockHttpClient};
    use std::sync::Arc;
    use url::Url;

    fn context(mock: &MockHttpClient) -> FetchContext {
        FetchContext::new(
            Arc::new(mock.clone()),
            Url::parse("http://localhost:3000").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_account_shows_user_when_guard_passes() {
        let mock = MockHttpClient::new();
        mock.add_response(
            "GET /api/users",
            Ok(HttpResponse::new(
                200,
                r#"{"name":"Mona Lisa","login":"octocat","image":"https://avatars.example.com/1"}"#,
            )),
        );
        let sidebar = Sidebar::new(&context(&mock), "/repositories");
        sidebar.load().await;

        let mut out = String::new();
        sidebar.render(&mut out).unwrap();
        assert!(out.contains("Mona Lisa"));
        assert!(out.contains("octocat"));
        assert!(out.contains("[Repositories]"));
        assert!(!out.contains("[Dashboard]"));
    }

    #[tokio::test]
    async fn test_account_placeholder_while_loading() {
        let mock = MockHttpClient::new();
        let trigger = mock.add_response_with_trigger(
            "GET /api/users",
            Ok(HttpResponse::new(200, r#"{"name":"Mona"}"#)),
        );
        let account = Arc::new(UserAccount::new(&context(&mock)));
        let task = {
            let account = account.clone();
            tokio::spawn(async move { account.load().await })
        };
        while mock.call_count() < 1 {
            tokio::task::yield_now().await;
        }

        let mut out = String::new();
        account.render(&mut out).unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("Username"));

        trigger.send(()).unwrap();
        task.await.unwrap();

        // Missing login/image: the guard fails and the widget renders nothing
        let mut out = String::new();
        account.render(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_account_hides_on_error() {
        let mock = MockHttpClient::new();
        mock.add_response("GET /api/users", Ok(HttpResponse::new(401, "{}")));
        let account = UserAccount::new(&context(&mock));
        account.load().await;

        let mut out = String::new();
        account.render(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
