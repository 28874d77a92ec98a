use entity_flow::network::identity::IdentityProfile;
use reqwest::header::HeaderMap;

#[test]
fn test_profile_is_stable_per_url() {
    let a = IdentityProfile::for_url("https://example.com/hospitals");
    let b = IdentityProfile::for_url("https://example.com/hospitals");
    assert_eq!(a, b);
    assert!(a.user_agent.starts_with("Mozilla/5.0"));
}

#[test]
fn test_apply_to_headers_integrity() {
    let profile = IdentityProfile::default();
    let mut headers = HeaderMap::new();
    profile.apply_to_headers(&mut headers);

    let ua = headers.get("User-Agent").unwrap().to_str().unwrap();
    assert_eq!(ua, profile.user_agent);
    assert!(headers.get("accept").unwrap().to_str().unwrap().contains("text/html"));
    assert_eq!(headers.get("upgrade-insecure-requests").unwrap(), "1");
}

#[test]
fn test_headers_matches_apply() {
    let profile = IdentityProfile::for_url("https://example.org");
    let mut applied = HeaderMap::new();
    profile.apply_to_headers(&mut applied);
    assert_eq!(profile.headers(), applied);
}
