//! GitHub pull requests for changelog updates
//!
//! Talks to the REST API (`api.github.com` or a GitHub Enterprise base URL)
//! with a bearer token. Only the four calls the update flow needs are
//! covered: create a pull request, label it, assign it, request reviews.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;

use logbook_changelog::{Changelog, YearWeek};
use logbook_core::RepoSlug;

use crate::error::{DeliveryError, Result};

const USER_AGENT: &str = concat!("logbook/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Request body for creating a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub maintainer_can_modify: bool,
}

/// A created pull request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// A pull request together with the people and label it should carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestProposal {
    pub pull: NewPullRequest,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
}

impl PullRequestProposal {
    /// Proposal for the changelog living in `directory` (root-relative,
    /// `/`-separated), merging `head` into `base`.
    pub fn new(directory: &str, week: YearWeek, head: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            pull: NewPullRequest {
                title: format!("{}: Changelog for `/{}`", week, directory),
                body: format!("Please review and merge the changelog for `/{}`.", directory),
                head: head.into(),
                base: base.into(),
                maintainer_can_modify: true,
            },
            labels: Vec::new(),
            assignees: Vec::new(),
            reviewers: Vec::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Assign the changelog's `Notify` list and request reviews from its `Owner` list
    pub fn with_recipients(mut self, changelog: &Changelog) -> Self {
        self.assignees = changelog.notify.clone();
        self.reviewers = changelog.owner.clone();
        self
    }

    /// Set whether maintainers may push to the branch
    pub fn maintainer_can_modify(mut self, allowed: bool) -> Self {
        self.pull.maintainer_can_modify = allowed;
        self
    }
}

/// GitHub REST client scoped to one repository
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    token: String,
    repo: RepoSlug,
}

impl GitHubClient {
    /// Create a client for `repo` against the API rooted at `api_url`
    pub fn new(api_url: &str, token: impl Into<String>, repo: RepoSlug) -> Result<Self> {
        let mut base = Url::parse(api_url).map_err(|e| DeliveryError::invalid_url(api_url, e))?;
        if base.cannot_be_a_base() {
            return Err(DeliveryError::invalid_url(api_url, "cannot be used as a base URL"));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_url: base,
            token: token.into(),
            repo,
        })
    }

    /// The repository this client targets
    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let relative = format!("repos/{}/{}/{}", self.repo.owner, self.repo.name, path);
        self.api_url
            .join(&relative)
            .map_err(|e| DeliveryError::invalid_url(&relative, e))
    }

    /// Make an authenticated POST request
    async fn post<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("API request: POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response.json().await?)
    }

    /// Open a pull request
    #[instrument(skip(self, pull), fields(head = %pull.head, base = %pull.base))]
    pub async fn create_pull(&self, pull: &NewPullRequest) -> Result<PullRequest> {
        let body = serde_json::to_value(pull)?;
        let created: PullRequest = self.post("pulls", &body).await?;
        info!(number = created.number, url = %created.html_url, "created pull request");
        Ok(created)
    }

    /// Add labels to an issue or pull request
    #[instrument(skip(self))]
    pub async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let _: serde_json::Value = self
            .post(&format!("issues/{}/labels", number), &json!({ "labels": labels }))
            .await?;
        Ok(())
    }

    /// Assign users to an issue or pull request
    #[instrument(skip(self))]
    pub async fn add_assignees(&self, number: u64, assignees: &[String]) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                &format!("issues/{}/assignees", number),
                &json!({ "assignees": assignees }),
            )
            .await?;
        Ok(())
    }

    /// Request reviews on a pull request
    #[instrument(skip(self))]
    pub async fn request_reviewers(&self, number: u64, reviewers: &[String]) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                &format!("pulls/{}/requested_reviewers", number),
                &json!({ "reviewers": reviewers }),
            )
            .await?;
        Ok(())
    }

    /// Create the pull request, then label, assign and request reviews,
    /// skipping each follow-up whose list is empty.
    pub async fn open(&self, proposal: &PullRequestProposal) -> Result<PullRequest> {
        let pull = self.create_pull(&proposal.pull).await?;

        if proposal.labels.is_empty() {
            debug!("No labels configured.");
        } else {
            self.add_labels(pull.number, &proposal.labels).await?;
        }

        if proposal.assignees.is_empty() {
            debug!("No assignees found.");
        } else {
            self.add_assignees(pull.number, &proposal.assignees).await?;
        }

        if proposal.reviewers.is_empty() {
            debug!("No reviewers found.");
        } else {
            self.request_reviewers(pull.number, &proposal.reviewers).await?;
        }

        Ok(pull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::serve;

    const CREATED: &str = r#"{"number": 12, "html_url": "https://github.com/octo-org/widgets/pull/12"}"#;

    fn slug() -> RepoSlug {
        RepoSlug::new("octo-org", "widgets")
    }

    fn week() -> YearWeek {
        YearWeek { year: 2023, week: 8 }
    }

    #[test]
    fn test_proposal_text() {
        let proposal = PullRequestProposal::new("apps/web", week(), "2023-8-apps-web", "main");
        assert_eq!(proposal.pull.title, "2023.08: Changelog for `/apps/web`");
        assert_eq!(
            proposal.pull.body,
            "Please review and merge the changelog for `/apps/web`."
        );
        assert!(proposal.pull.maintainer_can_modify);
        assert!(proposal.labels.is_empty());
    }

    #[test]
    fn test_proposal_recipients() {
        let changelog = Changelog::parse("Owner: alice, bob\nNotify: carol\n---\n## 2023.08\n* x");
        let proposal = PullRequestProposal::new("web", week(), "b", "main")
            .with_label("Changelog")
            .with_recipients(&changelog)
            .maintainer_can_modify(false);

        assert_eq!(proposal.labels, vec!["Changelog"]);
        assert_eq!(proposal.reviewers, vec!["alice", "bob"]);
        assert_eq!(proposal.assignees, vec!["carol"]);
        assert!(!proposal.pull.maintainer_can_modify);
    }

    #[test]
    fn test_endpoint_under_enterprise_prefix() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3", "t", slug()).unwrap();
        assert_eq!(
            client.endpoint("pulls").unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/octo-org/widgets/pulls"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let result = GitHubClient::new("not a url", "t", slug());
        assert!(matches!(result, Err(DeliveryError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_pull() {
        let (base, server) = serve(vec![("201 Created", CREATED)]).await;
        let client = GitHubClient::new(&base, "t0ken", slug()).unwrap();

        let proposal = PullRequestProposal::new("web", week(), "2023-8-web", "main");
        let pull = client.create_pull(&proposal.pull).await.unwrap();
        assert_eq!(pull.number, 12);

        let requests = server.await.unwrap();
        assert_eq!(requests[0].request_line, "POST /repos/octo-org/widgets/pulls HTTP/1.1");
        assert!(requests[0]
            .headers
            .to_lowercase()
            .contains("authorization: bearer t0ken"));

        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["head"], "2023-8-web");
        assert_eq!(body["base"], "main");
        assert_eq!(body["maintainer_can_modify"], true);
    }

    #[tokio::test]
    async fn test_api_error() {
        let (base, server) = serve(vec![(
            "422 Unprocessable Entity",
            r#"{"message": "Validation Failed"}"#,
        )])
        .await;
        let client = GitHubClient::new(&base, "t", slug()).unwrap();

        let proposal = PullRequestProposal::new("web", week(), "b", "main");
        let result = client.create_pull(&proposal.pull).await;
        match result {
            Err(DeliveryError::Api { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.contains("Validation Failed"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_open_skips_empty_lists() {
        let (base, server) = serve(vec![("201 Created", CREATED), ("200 OK", "[]")]).await;
        let client = GitHubClient::new(&base, "t", slug()).unwrap();

        let proposal = PullRequestProposal::new("web", week(), "b", "main").with_label("Changelog");
        let pull = client.open(&proposal).await.unwrap();
        assert_eq!(pull.html_url, "https://github.com/octo-org/widgets/pull/12");

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].request_line,
            "POST /repos/octo-org/widgets/issues/12/labels HTTP/1.1"
        );
        assert_eq!(requests[1].body, r#"{"labels":["Changelog"]}"#);
    }

    #[tokio::test]
    async fn test_open_with_recipients() {
        let (base, server) = serve(vec![
            ("201 Created", CREATED),
            ("201 Created", "{}"),
            ("201 Created", "{}"),
        ])
        .await;
        let client = GitHubClient::new(&base, "t", slug()).unwrap();

        let changelog = Changelog::parse("Owner: alice\nNotify: carol\n---\n## 2023.08\n* x");
        let proposal = PullRequestProposal::new("web", week(), "b", "main").with_recipients(&changelog);
        client.open(&proposal).await.unwrap();

        let requests = server.await.unwrap();
        let lines: Vec<_> = requests.iter().map(|r| r.request_line.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "POST /repos/octo-org/widgets/pulls HTTP/1.1",
                "POST /repos/octo-org/widgets/issues/12/assignees HTTP/1.1",
                "POST /repos/octo-org/widgets/pulls/12/requested_reviewers HTTP/1.1",
            ]
        );
    }
}
