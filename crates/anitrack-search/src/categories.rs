// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter and category names accepted by each search site.

use anitrack_core::AnitrackError;

pub const NYAA_FILTERS: &[(&str, &str)] = &[
    ("show all", "0"),
    ("filter remakes", "1"),
    ("trusted only", "2"),
    ("a+ only", "3"),
];

pub const NYAA_CATEGORIES: &[(&str, &str)] = &[
    ("all categories", "0_0"),
    ("anime", "1_0"),
    ("anime - anime music video", "1_32"),
    ("anime - english-translated", "1_37"),
    ("anime - non-english-translated", "1_38"),
    ("anime - raw", "1_11"),
    ("audio", "3_0"),
    ("audio - lossless", "3_14"),
    ("audio - lossy", "3_15"),
    ("literature", "2_0"),
    ("literature - english-translated", "2_12"),
    ("literature - non-english-translated", "2_39"),
    ("literature - raw", "2_13"),
    ("live action", "5_0"),
    ("live action - english-translated", "5_19"),
    ("live action - idol/promotion video", "5_22"),
    ("live action - non-english-translated", "5_21"),
    ("live action - raw", "5_20"),
    ("pictures", "4_0"),
    ("pictures - graphics", "4_18"),
    ("pictures - photos", "4_17"),
    ("software", "6_0"),
    ("software - applications", "6_23"),
    ("software - games", "6_24"),
];

pub const PANTSU_FILTERS: &[(&str, &str)] = &[
    ("show all", "0"),
    ("filter remakes", "2"),
    ("trusted", "3"),
    ("a+", "4"),
];

pub const PANTSU_CATEGORIES: &[(&str, &str)] = &[
    ("all categories", "_"),
    ("anime", "3_"),
    ("anime - anime music video", "3_12"),
    ("anime - english-translated", "3_5"),
    ("anime - non-english-translated", "3_13"),
    ("anime - raw", "3_6"),
    ("audio", "2_"),
    ("audio - lossless", "2_3"),
    ("audio - lossy", "2_4"),
    ("literature", "4_"),
    ("literature - english-translated", "4_7"),
    ("literature - non-english-translated", "4_14"),
    ("literature - raw", "4_8"),
    ("live action", "5_"),
    ("live action - english-translated", "5_9"),
    ("live action - idol/promotion video", "5_10"),
    ("live action - non-english-translated", "5_18"),
    ("live action - raw", "5_11"),
    ("pictures", "6_"),
    ("pictures - graphics", "6_15"),
    ("pictures - photos", "6_16"),
    ("software", "1_"),
    ("software - applications", "1_1"),
    ("software - games", "1_2"),
];

pub const TOKYOTOSHO_CATEGORIES: &[(&str, &str)] = &[
    ("all", "0"),
    ("anime", "1"),
    ("non-english", "10"),
    ("manga", "3"),
    ("drama", "8"),
    ("music", "2"),
    ("music video", "9"),
    ("raws", "7"),
    ("hentai", "4"),
    ("hentai (anime)", "12"),
    ("hentai (manga)", "13"),
    ("hentai (games)", "14"),
    ("batch", "11"),
    ("jav", "15"),
    ("other", "5"),
];

/// Resolve a configured name (case-insensitive) to the site's code.
///
/// `None` selects the first entry. `key` names the setting in error messages.
pub fn resolve(
    key: &str,
    table: &[(&'static str, &'static str)],
    name: Option<&str>,
) -> Result<&'static str, AnitrackError> {
    let Some(name) = name else {
        return Ok(table.first().map(|(_, code)| *code).unwrap_or_default());
    };
    let wanted = name.trim().to_lowercase();
    table
        .iter()
        .find(|(known, _)| *known == wanted)
        .map(|(_, code)| *code)
        .ok_or_else(|| {
            let known: Vec<&str> = table.iter().map(|(n, _)| *n).collect();
            AnitrackError::Config(format!(
                "{key} = {name:?} is not recognized; expected one of: {}",
                known.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_case_insensitively() {
        assert_eq!(resolve("nyaa.filter", NYAA_FILTERS, Some("Trusted Only")).unwrap(), "2");
        assert_eq!(resolve("tokyotoshokan.category", TOKYOTOSHO_CATEGORIES, Some("JAV")).unwrap(), "15");
    }

    #[test]
    fn missing_name_selects_the_default() {
        assert_eq!(resolve("nyaa.category", NYAA_CATEGORIES, None).unwrap(), "0_0");
        assert_eq!(resolve("nyaapantsu.category", PANTSU_CATEGORIES, None).unwrap(), "_");
        assert_eq!(resolve("nyaapantsu.filter", PANTSU_FILTERS, None).unwrap(), "0");
    }

    #[test]
    fn unknown_name_lists_known_names() {
        let err = resolve("nyaapantsu.filter", PANTSU_FILTERS, Some("trusted only")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nyaapantsu.filter"));
        assert!(message.contains("show all, filter remakes, trusted, a+"));
    }
}
