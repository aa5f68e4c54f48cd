//! Change-set extraction from the body

use crate::patterns::{BLANK_LINE, BULLET, HEADING};
use crate::types::ChangeSet;

/// Extract change-sets in heading order.
///
/// A change-set spans from its heading line to the next heading. Each bullet
/// starts a change that runs until the next bullet or blank line; narrative
/// text around the bullets is not a change.
pub fn parse_change_sets(body: &str) -> Vec<ChangeSet> {
    let headings: Vec<(usize, usize, &str)> = HEADING
        .captures_iter(body)
        .filter_map(|caps| {
            let heading = caps.get(0)?;
            let title = caps.name("title")?;
            Some((heading.start(), heading.end(), title.as_str()))
        })
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, &(_, content_start, title))| {
            let content_end = headings
                .get(i + 1)
                .map_or(body.len(), |&(next_start, _, _)| next_start);

            ChangeSet::new(title, parse_changes(&body[content_start..content_end]))
        })
        .collect()
}

fn parse_changes(content: &str) -> Vec<String> {
    BULLET
        .split(content)
        .skip(1)
        .map(|fragment| match BLANK_LINE.find(fragment) {
            Some(blank) => &fragment[..blank.start()],
            None => fragment,
        })
        .map(str::trim)
        .filter(|change| !change.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_change_sets_in_order() {
        let sets = parse_change_sets("## 2023.07\n* first\n* second\n## 2023.06\n* third");

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].title, "2023.07");
        assert_eq!(sets[0].changes, vec!["first", "second"]);
        assert_eq!(sets[1].title, "2023.06");
        assert_eq!(sets[1].changes, vec!["third"]);
    }

    #[test]
    fn test_no_headings() {
        assert!(parse_change_sets("* orphan bullet\nSome narrative.").is_empty());
        assert!(parse_change_sets("").is_empty());
    }

    #[test]
    fn test_heading_without_bullets() {
        let sets = parse_change_sets("## 2023.07\nQuiet week.\n## 2023.06");
        assert_eq!(sets.len(), 2);
        assert!(sets[0].is_empty());
        assert!(sets[1].is_empty());
    }

    #[test]
    fn test_indented_bullets_and_continuations() {
        let sets = parse_change_sets(
            "## 2023.07\n  * first line\n    continues here\n\t* second\n",
        );
        assert_eq!(sets[0].changes, vec!["first line\n    continues here", "second"]);
    }

    #[test]
    fn test_narrative_is_not_a_change() {
        let sets = parse_change_sets(
            "## 2023.08\nHighlights below.\n* new item\n\nWelcome to the changelog.\n\n## 2023.07\n* old item",
        );
        assert_eq!(sets[0].changes, vec!["new item"]);
        assert_eq!(sets[1].changes, vec!["old item"]);
    }

    #[test]
    fn test_non_label_headings_belong_to_previous_set() {
        let sets = parse_change_sets("## 2023.07\n* first\n\n## Notes for ops\n* second");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].changes, vec!["first", "second"]);
    }
}
