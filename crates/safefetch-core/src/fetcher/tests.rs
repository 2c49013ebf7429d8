use std::collections::VecDeque;
use std::net::Ipv4Addr;

use super::*;
use crate::dns::StaticResolver;
use crate::error::InvalidUrlReason;
use crate::transport::TransportError;

/// Transport that replays scripted responses and records what it was asked.
#[derive(Default)]
struct ScriptedTransport {
    responses: VecDeque<Result<TransportResponse, TransportError>>,
    targets: Vec<String>,
    options: Vec<(TransportOption, bool)>,
    resets: usize,
}

impl ScriptedTransport {
    fn respond(mut self, status_code: u32, location: Option<&str>, body: &str) -> Self {
        self.responses.push_back(Ok(TransportResponse {
            status_code,
            headers: format!("HTTP/1.1 {status_code} X\r\n\r\n").into_bytes(),
            body: body.as_bytes().to_vec(),
            redirect_target: location.map(str::to_string),
        }));
        self
    }

    fn redirect(self, location: &str) -> Self {
        self.respond(302, Some(location), "")
    }

    fn fail(mut self, message: &str) -> Self {
        self.responses.push_back(Err(TransportError::new(message)));
        self
    }
}

impl Transport for ScriptedTransport {
    fn set_target(&mut self, target: &ValidationResult) -> Result<(), TransportError> {
        self.targets.push(target.normalized_url.clone());
        Ok(())
    }

    fn set_option(&mut self, option: TransportOption, enabled: bool) -> Result<(), TransportError> {
        self.options.push((option, enabled));
        Ok(())
    }

    fn perform(&mut self) -> Result<TransportResponse, TransportError> {
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response left")))
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

fn validator() -> Arc<UrlValidator> {
    let resolver = StaticResolver::new()
        .with_host("public.example", [Ipv4Addr::new(93, 184, 216, 34)])
        .with_host("cdn.example", [Ipv4Addr::new(151, 101, 1, 1)])
        .with_host("internal.example", [Ipv4Addr::new(10, 0, 0, 7)])
        .with_host("metadata.example", [Ipv4Addr::new(169, 254, 169, 254)]);
    Arc::new(UrlValidator::with_default_policy(resolver))
}

fn following(limit: u32) -> FetchOptions {
    FetchOptions {
        follow_redirects: true,
        redirect_limit: limit,
        output_headers: false,
    }
}

#[test]
fn plain_fetch_returns_body_and_configures_transport() {
    let mut transport = ScriptedTransport::default().respond(200, None, "hello");
    let body = SafeFetcher::new(&mut transport, validator())
        .execute("http://PUBLIC.example/index.html")
        .unwrap();
    assert_eq!(body, b"hello");
    assert_eq!(transport.targets, ["http://public.example/index.html"]);
    assert_eq!(
        transport.options,
        [
            (TransportOption::Ipv4Only, true),
            (TransportOption::NoAutoRedirect, true),
            (TransportOption::CaptureFullResponse, true),
        ]
    );
    assert_eq!(transport.resets, 1);
}

#[test]
fn redirects_are_returned_as_is_when_not_following() {
    let mut transport = ScriptedTransport::default().respond(302, Some("http://cdn.example/"), "moved");
    let body = SafeFetcher::new(&mut transport, validator())
        .execute("http://public.example/")
        .unwrap();
    assert_eq!(body, b"moved");
    assert_eq!(transport.targets.len(), 1);
}

#[test]
fn follows_redirect_chain() {
    let mut transport = ScriptedTransport::default()
        .redirect("https://cdn.example/a")
        .respond(301, Some("https://cdn.example/b"), "")
        .respond(200, None, "final");
    let outcome = SafeFetcher::new(&mut transport, validator())
        .with_options(following(0))
        .fetch("http://public.example/")
        .unwrap();
    assert_eq!(outcome.body, b"final");
    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.redirects(), 2);
    assert_eq!(
        transport.targets,
        ["http://public.example/", "https://cdn.example/a", "https://cdn.example/b"]
    );
}

#[test]
fn redirect_limit_one_allows_exactly_one_redirect() {
    let mut transport = ScriptedTransport::default()
        .redirect("http://cdn.example/")
        .respond(200, None, "ok");
    let body = SafeFetcher::new(&mut transport, validator())
        .with_options(following(1))
        .execute("http://public.example/")
        .unwrap();
    assert_eq!(body, b"ok");

    let mut transport = ScriptedTransport::default()
        .redirect("http://cdn.example/1")
        .redirect("http://cdn.example/2")
        .respond(200, None, "never");
    let err = SafeFetcher::new(&mut transport, validator())
        .with_options(following(1))
        .execute("http://public.example/")
        .unwrap_err();
    assert_eq!(err, FetchError::RedirectLimitExceeded);
    assert_eq!(transport.targets.len(), 2);
    assert_eq!(transport.resets, 1);
}

#[test]
fn zero_limit_is_unlimited() {
    let mut transport = ScriptedTransport::default();
    for i in 0..25 {
        transport = transport.redirect(&format!("http://cdn.example/{i}"));
    }
    transport = transport.respond(200, None, "done");
    let body = SafeFetcher::new(&mut transport, validator())
        .with_options(following(0))
        .execute("http://public.example/")
        .unwrap();
    assert_eq!(body, b"done");
    assert_eq!(transport.targets.len(), 26);
}

#[test]
fn redirect_to_blacklisted_address_fails_whole_fetch() {
    for target in [
        "http://internal.example/admin",
        "http://metadata.example/latest/meta-data/",
        "http://127.0.0.1/",
    ] {
        let mut transport = ScriptedTransport::default()
            .redirect(target)
            .respond(200, None, "secret");
        let err = SafeFetcher::new(&mut transport, validator())
            .with_options(following(0))
            .execute("http://public.example/")
            .unwrap_err();
        assert_eq!(err.reason(), Some(InvalidUrlReason::IpBlacklisted), "{target}");
        // The blocked target was never handed to the transport.
        assert_eq!(transport.targets, ["http://public.example/"]);
        assert_eq!(transport.resets, 1);
    }
}

#[test]
fn redirect_targets_get_full_policy_checks() {
    let cases = [
        ("http://0.0.0.0:123", InvalidUrlReason::PortNotWhitelisted),
        ("gopher://cdn.example/", InvalidUrlReason::SchemeNotWhitelisted),
        ("http://user:pw@cdn.example/", InvalidUrlReason::CredentialsNotAllowed),
        ("/relative/path", InvalidUrlReason::NoHost),
    ];
    for (target, expected) in cases {
        let mut transport = ScriptedTransport::default().redirect(target);
        let err = SafeFetcher::new(&mut transport, validator())
            .with_options(following(5))
            .execute("http://public.example/")
            .unwrap_err();
        assert_eq!(err.reason(), Some(expected), "{target}");
    }
}

#[test]
fn redirect_without_location_is_an_empty_url() {
    let mut transport = ScriptedTransport::default().respond(307, None, "");
    let err = SafeFetcher::new(&mut transport, validator())
        .with_options(following(0))
        .execute("http://public.example/")
        .unwrap_err();
    assert_eq!(err.reason(), Some(InvalidUrlReason::EmptyUrl));
}

#[test]
fn invalid_original_url_never_reaches_transport() {
    let mut transport = ScriptedTransport::default().respond(200, None, "x");
    let err = SafeFetcher::new(&mut transport, validator())
        .execute("http://internal.example/")
        .unwrap_err();
    assert_eq!(err.reason(), Some(InvalidUrlReason::IpBlacklisted));
    assert!(transport.targets.is_empty());
    assert_eq!(transport.resets, 1);
}

#[test]
fn transport_failure_keeps_message_and_resets() {
    let mut transport = ScriptedTransport::default()
        .redirect("http://cdn.example/")
        .fail("Couldn't connect to server");
    let err = SafeFetcher::new(&mut transport, validator())
        .with_options(following(0))
        .execute("http://public.example/")
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::Transport {
            message: "Couldn't connect to server".to_string()
        }
    );
    assert_eq!(transport.resets, 1);
}

#[test]
fn output_headers_prefixes_body() {
    let mut transport = ScriptedTransport::default().respond(200, None, "body");
    let bytes = SafeFetcher::new(&mut transport, validator())
        .with_options(FetchOptions {
            output_headers: true,
            ..FetchOptions::default()
        })
        .execute("http://public.example/")
        .unwrap();
    assert_eq!(bytes, b"HTTP/1.1 200 X\r\n\r\nbody");
}

#[test]
fn cancelled_token_stops_before_next_hop() {
    let token = CancelToken::new();
    token.cancel();
    let mut transport = ScriptedTransport::default().respond(200, None, "x");
    let err = SafeFetcher::new(&mut transport, validator())
        .with_cancel_token(token)
        .execute("http://public.example/")
        .unwrap_err();
    assert_eq!(err, FetchError::Cancelled);
    assert!(transport.targets.is_empty());
}

#[test]
fn fetcher_is_reusable_across_calls() {
    let mut fetcher = SafeFetcher::new(
        ScriptedTransport::default()
            .respond(200, None, "one")
            .respond(200, None, "two"),
        validator(),
    );
    assert_eq!(fetcher.execute("http://public.example/1").unwrap(), b"one");
    assert!(fetcher.execute("http://10.0.0.1/").is_err());
    assert_eq!(fetcher.execute("http://public.example/2").unwrap(), b"two");
    assert_eq!(fetcher.transport().resets, 3);
}

#[test]
fn outcome_into_bytes() {
    let outcome = FetchOutcome {
        status_code: 200,
        headers: b"HTTP/1.1 200 OK\r\n\r\n".to_vec(),
        body: b"body".to_vec(),
        chain: Vec::new(),
    };
    assert_eq!(outcome.clone().into_bytes(false), b"body");
    assert_eq!(outcome.into_bytes(true), b"HTTP/1.1 200 OK\r\n\r\nbody");
}
