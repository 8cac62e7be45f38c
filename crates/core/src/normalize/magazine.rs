//! Magazine name and issue detection.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// A magazine split into its name and issue token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MagazineKey {
    pub name: String,
    pub issue: String,
}

impl MagazineKey {
    /// Folder-style name of this issue, see [`compose_magazine_issue_key`].
    pub fn issue_key(&self) -> String {
        compose_magazine_issue_key(&self.name, &self.issue)
    }

    /// Lowercased name, used to group records of one magazine.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// Issue shapes, tried in order; the first match wins.
///
/// Seasonal, volume and `#` issues come before the generic trailing-number
/// shape, which would otherwise swallow `Autumn` or `Vol.` into the name.
static MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("seasonal", r"^(.*) ((?:Spring|Summer|Autumn|Winter) \d+.*)$"),
        ("volume", r"^(.*) ((?i:vol)\.\d+)"),
        ("volume_spaced", r"^(.*) ((?i:vol)\. \d+)"),
        ("sharp", r"^(.*) (#\d+)"),
        ("number", r"^(.*) (\d+.*)$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

/// Splits the first entry of a comma-joined magazine field into name and issue.
pub fn normalize_magazine_key(magazine_field: &str) -> Option<MagazineKey> {
    let first = magazine_field.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }

    MATCHERS.iter().find_map(|(_, re)| {
        let caps = re.captures(first)?;
        let name = caps.get(1)?.as_str().trim();
        let issue = caps.get(2)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        Some(MagazineKey {
            name: name.to_string(),
            issue: issue.to_string(),
        })
    })
}

/// Renders the display name of one issue.
///
/// `#`-issues become `name #N`, volume issues `name - Volume NN`, anything
/// else `name [issue]`.
pub fn compose_magazine_issue_key(name: &str, issue: &str) -> String {
    if issue.starts_with('#') {
        return format!("{name} {issue}");
    }
    if issue.to_lowercase().contains("vol") {
        let digits: String = issue.chars().filter(|c| c.is_ascii_digit()).collect();
        if let Ok(number) = digits.parse::<u32>() {
            return format!("{name} - Volume {number:02}");
        }
    }
    format!("{name} [{issue}]")
}

/// The year of a date-shaped issue such as `2021-03`.
pub fn published_year(issue: &str) -> Option<String> {
    let year: String = issue.chars().take(4).collect();
    (year.len() == 4 && year.starts_with("20") && year.chars().all(|c| c.is_ascii_digit()))
        .then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, issue: &str) -> Option<MagazineKey> {
        Some(MagazineKey {
            name: name.into(),
            issue: issue.into(),
        })
    }

    #[test]
    fn test_generic_number_issue() {
        assert_eq!(normalize_magazine_key("COMIC Alpha 2021-03"), key("COMIC Alpha", "2021-03"));
    }

    #[test]
    fn test_only_first_entry_is_used() {
        assert_eq!(
            normalize_magazine_key("COMIC Alpha 2021-03, COMIC Beta 2020-01"),
            key("COMIC Alpha", "2021-03")
        );
    }

    #[test]
    fn test_seasonal_before_number() {
        assert_eq!(
            normalize_magazine_key("Girls Form Autumn 2019"),
            key("Girls Form", "Autumn 2019")
        );
        assert_eq!(
            normalize_magazine_key("Girls Form Spring 2020 Special"),
            key("Girls Form", "Spring 2020 Special")
        );
    }

    #[test]
    fn test_volume_shapes() {
        assert_eq!(normalize_magazine_key("Comic X Vol.1"), key("Comic X", "Vol.1"));
        assert_eq!(normalize_magazine_key("Comic X Vol. 12"), key("Comic X", "Vol. 12"));
    }

    #[test]
    fn test_sharp_before_number() {
        assert_eq!(normalize_magazine_key("Weekly Y #5 2020"), key("Weekly Y", "#5"));
    }

    #[test]
    fn test_unmatched_shapes() {
        assert_eq!(normalize_magazine_key(""), None);
        assert_eq!(normalize_magazine_key("FAKKU"), None);
        assert_eq!(normalize_magazine_key("2021"), None);
    }

    #[test]
    fn test_compose_issue_key() {
        assert_eq!(compose_magazine_issue_key("Weekly Y", "#5"), "Weekly Y #5");
        assert_eq!(compose_magazine_issue_key("Comic X", "Vol.1"), "Comic X - Volume 01");
        assert_eq!(compose_magazine_issue_key("Comic X", "Vol. 12"), "Comic X - Volume 12");
        assert_eq!(
            compose_magazine_issue_key("COMIC Alpha", "2021-03"),
            "COMIC Alpha [2021-03]"
        );
        assert_eq!(
            compose_magazine_issue_key("Girls Form", "Autumn 2019"),
            "Girls Form [Autumn 2019]"
        );
    }

    #[test]
    fn test_published_year() {
        assert_eq!(published_year("2021-03"), Some("2021".to_string()));
        assert_eq!(published_year("1999-12"), None);
        assert_eq!(published_year("Vol.1"), None);
        assert_eq!(published_year("#20"), None);
        assert_eq!(published_year("20"), None);
    }
}
