//! Release extraction from Composer `packages` documents
//!
//! A document has the shape `{ "packages": { "<vendor/name>": [...] } }` and
//! may describe several packages. [`parse_packages_response`] reads a single
//! document and never fails. [`parse_packages_responses`] merges several
//! documents (e.g. the stable and `~dev` metadata files) and refuses to
//! produce a result if any document is malformed, since a partially merged
//! release list would silently miss versions.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::release::{ComposerRelease, parse_releases};
use crate::version::types::{Release, ReleaseResult};

/// Releases of `package_name` in a single document, or none if the
/// document does not have the expected shape
pub fn parse_packages_response(package_name: &str, response: &Value) -> Vec<ComposerRelease> {
    response
        .get("packages")
        .and_then(Value::as_object)
        .and_then(|packages| packages.get(package_name))
        .map(parse_releases)
        .unwrap_or_default()
}

/// Merge the releases of `package_name` from every document
///
/// Returns `None` when any document is malformed, or when no release of the
/// package was found at all.
pub fn parse_packages_responses(package_name: &str, responses: &[Value]) -> Option<ReleaseResult> {
    let mut releases = Vec::new();

    for (index, response) in responses.iter().enumerate() {
        let Some(packages) = packages_map(response) else {
            debug!(
                "Rejecting metadata for {}: document {} is malformed",
                package_name, index
            );
            return None;
        };

        if let Some(entries) = packages.get(package_name) {
            releases.extend(parse_releases(entries));
        }
    }

    extract_release_result(releases)
}

/// Fold normalized releases into a [`ReleaseResult`]
///
/// Homepage and source URL are package-level data and come from the first
/// release only.
pub fn extract_release_result(releases: Vec<ComposerRelease>) -> Option<ReleaseResult> {
    let first = releases.first()?;
    let homepage = first.homepage().map(str::to_string);
    let source_url = first.source_url().map(str::to_string);

    let releases = releases.into_iter().map(to_release).collect();

    Some(ReleaseResult {
        homepage,
        source_url,
        releases,
    })
}

/// `packages` of a well-formed document: an object of arrays
fn packages_map(response: &Value) -> Option<&Map<String, Value>> {
    let packages = response.get("packages")?.as_object()?;
    packages
        .values()
        .all(Value::is_array)
        .then_some(packages)
}

fn to_release(release: ComposerRelease) -> Release {
    let version = release
        .version
        .strip_prefix('v')
        .unwrap_or(&release.version)
        .to_string();

    let constraints = release.require.map(|require| {
        require
            .into_iter()
            .map(|(name, constraint)| (name, vec![constraint]))
            .collect::<IndexMap<_, _>>()
    });

    Release {
        version,
        git_ref: release.version,
        release_timestamp: release.time,
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn versions(releases: &[ComposerRelease]) -> Vec<&str> {
        releases.iter().map(|r| r.version.as_str()).collect()
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!({}))]
    #[case(json!({ "packages": "123" }))]
    #[case(json!({ "packages": {} }))]
    #[case(json!({ "packages": { "foo/bar": "nonsense" } }))]
    fn parse_packages_response_returns_empty_for_unusable_documents(#[case] input: Value) {
        assert!(parse_packages_response("foo/bar", &input).is_empty());
    }

    #[test]
    fn parse_packages_response_selects_requested_package() {
        let releases = parse_packages_response(
            "foo/bar",
            &json!({
                "packages": {
                    "foo/bar": [{ "version": "1.2.3" }],
                    "baz/qux": [{ "version": "4.5.6" }]
                }
            }),
        );

        assert_eq!(versions(&releases), vec!["1.2.3"]);
    }

    #[test]
    fn parse_packages_response_expands_minified_fields() {
        let releases = parse_packages_response(
            "foo/bar",
            &json!({
                "packages": {
                    "foo/bar": [
                        { "version": "3.3.3", "require": { "php": "^8.0" } },
                        { "version": "2.2.2" },
                        { "version": "1.1.1" },
                        { "version": "0.0.4", "require": { "php": "^7.0" } },
                        { "version": "0.0.3" },
                        { "version": "0.0.2", "require": "__unset" },
                        { "version": "0.0.1" }
                    ]
                }
            }),
        );

        let php: Vec<Option<&str>> = releases
            .iter()
            .map(|r| {
                r.require
                    .as_ref()
                    .and_then(|req| req.get("php"))
                    .map(String::as_str)
            })
            .collect();

        assert_eq!(
            versions(&releases),
            vec!["3.3.3", "2.2.2", "1.1.1", "0.0.4", "0.0.3", "0.0.2", "0.0.1"]
        );
        assert_eq!(
            php,
            vec![
                Some("^8.0"),
                Some("^8.0"),
                Some("^8.0"),
                Some("^7.0"),
                Some("^7.0"),
                None,
                None
            ]
        );
        assert!(releases[5].require.is_none());
    }

    #[rstest]
    #[case(json!([null]))]
    #[case(json!([{}]))]
    #[case(json!([{ "packages": "123" }]))]
    #[case(json!([{ "packages": {} }]))]
    #[case(json!([{ "packages": { "foo/bar": {} } }]))]
    #[case(json!([
        { "packages": { "foo/bar": [{ "version": "1.0.0" }] } },
        { "packages": { "baz/qux": "garbage" } }
    ]))]
    fn parse_packages_responses_returns_none_for_invalid_input(#[case] input: Value) {
        let responses = input.as_array().unwrap();
        assert_eq!(parse_packages_responses("foo/bar", responses), None);
    }

    #[test]
    fn parse_packages_responses_returns_none_for_no_documents() {
        assert_eq!(parse_packages_responses("foo/bar", &[]), None);
    }

    #[test]
    fn parse_packages_responses_merges_documents_in_order() {
        let responses = vec![
            json!({
                "packages": {
                    "foo/bar": [{
                        "version": "v1.1.1",
                        "time": "111",
                        "homepage": "https://example.com/1",
                        "source": { "url": "git@example.com:foo/bar-1" },
                        "require": { "php": "^8.0" }
                    }],
                    "baz/qux": [{
                        "version": "v2.2.2",
                        "time": "222",
                        "homepage": "https://example.com/2",
                        "source": { "url": "git@example.com:baz/qux-2" }
                    }]
                }
            }),
            json!({
                "packages": {
                    "foo/bar": [{
                        "version": "v3.3.3",
                        "time": "333",
                        "homepage": "https://example.com/3",
                        "source": { "url": "git@example.com:foo/bar-3" },
                        "require": { "php": "^7.0" }
                    }],
                    "baz/qux": [{
                        "version": "v4.4.4",
                        "time": "444",
                        "homepage": "https://example.com/4",
                        "source": { "url": "git@example.com:baz/qux-3" }
                    }]
                }
            }),
        ];

        let result = parse_packages_responses("foo/bar", &responses).unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "homepage": "https://example.com/1",
                "sourceUrl": "git@example.com:foo/bar-1",
                "releases": [
                    {
                        "version": "1.1.1",
                        "gitRef": "v1.1.1",
                        "releaseTimestamp": "111",
                        "constraints": { "php": ["^8.0"] }
                    },
                    {
                        "version": "3.3.3",
                        "gitRef": "v3.3.3",
                        "releaseTimestamp": "333",
                        "constraints": { "php": ["^7.0"] }
                    }
                ]
            })
        );
    }

    #[test]
    fn parse_packages_responses_skips_documents_without_the_package() {
        let responses = vec![
            json!({ "packages": { "baz/qux": [{ "version": "9.9.9" }] } }),
            json!({ "packages": { "foo/bar": [{ "version": "1.0.0" }] } }),
        ];

        let result = parse_packages_responses("foo/bar", &responses).unwrap();

        assert_eq!(result.versions(), vec!["1.0.0"]);
    }

    #[test]
    fn extract_release_result_uses_first_release_only_for_package_metadata() {
        let releases = parse_releases(&json!([
            { "version": "2.0.0", "homepage": 42, "source": "nonsense" },
            {
                "version": "1.0.0",
                "homepage": "https://example.com",
                "source": { "url": "https://example.com/repo.git" }
            }
        ]));

        let result = extract_release_result(releases).unwrap();

        assert_eq!(result.homepage, None);
        assert_eq!(result.source_url, None);
    }

    #[rstest]
    #[case("v1.1.1", "1.1.1")]
    #[case("1.2.3", "1.2.3")]
    #[case("vv1.0.0", "v1.0.0")]
    #[case("dev-main", "dev-main")]
    #[case("", "")]
    fn extract_release_result_strips_single_leading_v(
        #[case] published: &str,
        #[case] expected: &str,
    ) {
        let releases = parse_releases(&json!([{ "version": published }]));

        let result = extract_release_result(releases).unwrap();

        assert_eq!(result.releases[0].version, expected);
        assert_eq!(result.releases[0].git_ref, published);
    }

    #[test]
    fn extract_release_result_wraps_every_requirement() {
        let releases = parse_releases(&json!([
            { "version": "1.0.0", "require": { "php": ">=8.1", "psr/log": "^1.0 || ^2.0" } },
            { "version": "0.1.0", "require": "__unset" }
        ]));

        let result = extract_release_result(releases).unwrap();

        assert_eq!(
            serde_json::to_value(&result.releases[0].constraints).unwrap(),
            json!({ "php": [">=8.1"], "psr/log": ["^1.0 || ^2.0"] })
        );
        assert_eq!(result.releases[1].constraints, None);
        assert_eq!(result.releases[1].release_timestamp, None);
    }

    #[test]
    fn extract_release_result_returns_none_without_releases() {
        assert_eq!(extract_release_result(Vec::new()), None);
    }
}
