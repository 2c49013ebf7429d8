use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_fetch_defaults() {
    match parse(&["safefetch", "fetch", "https://example.com/"]) {
        CliCommand::Fetch {
            url,
            follow_redirects,
            redirect_limit,
            allow_credentials,
            include_headers,
            output,
        } => {
            assert_eq!(url, "https://example.com/");
            assert!(!follow_redirects);
            assert!(redirect_limit.is_none());
            assert!(!allow_credentials);
            assert!(!include_headers);
            assert!(output.is_none());
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_all_flags() {
    match parse(&[
        "safefetch",
        "fetch",
        "http://example.com/a",
        "--follow-redirects",
        "--redirect-limit",
        "3",
        "--allow-credentials",
        "--include-headers",
        "-o",
        "out.html",
    ]) {
        CliCommand::Fetch {
            follow_redirects,
            redirect_limit,
            allow_credentials,
            include_headers,
            output,
            ..
        } => {
            assert!(follow_redirects);
            assert_eq!(redirect_limit, Some(3));
            assert!(allow_credentials);
            assert!(include_headers);
            assert_eq!(output, Some(PathBuf::from("out.html")));
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_zero_limit() {
    match parse(&["safefetch", "fetch", "http://x", "--redirect-limit", "0"]) {
        CliCommand::Fetch { redirect_limit, .. } => assert_eq!(redirect_limit, Some(0)),
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_fetch_rejects_bad_limit() {
    assert!(Cli::try_parse_from(["safefetch", "fetch", "http://x", "--redirect-limit", "-1"]).is_err());
    assert!(Cli::try_parse_from(["safefetch", "fetch", "http://x", "--redirect-limit", "many"]).is_err());
}

#[test]
fn cli_fetch_requires_url() {
    assert!(Cli::try_parse_from(["safefetch", "fetch"]).is_err());
}
