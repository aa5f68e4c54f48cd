//! Logbook Delivery - getting changelog updates in front of people
//!
//! Opens pull requests for updated changelogs on GitHub and announces merged
//! changes to a Slack incoming webhook.

pub mod error;
pub mod github;
pub mod slack;

#[cfg(test)]
mod mock;

pub use error::{DeliveryError, Result};
pub use github::{GitHubClient, NewPullRequest, PullRequest, PullRequestProposal};
pub use slack::{convert_markdown_links_to_slack_style, Announcement, SlackNotifier};
