use super::*;

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, "ytwh-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_resource_and_key_first() {
    let client = test_client("https://www.googleapis.com/youtube/v3");
    let url = client.build_url(Resource::Videos, &[("part", "statistics")]);
    assert_eq!(
        url.as_str(),
        "https://www.googleapis.com/youtube/v3/videos?key=test-key&part=statistics"
    );
}

#[test]
fn build_url_tolerates_trailing_slash() {
    let client = test_client("https://www.googleapis.com/youtube/v3/");
    let url = client.build_url(Resource::VideoCategories, &[("regionCode", "US")]);
    assert_eq!(
        url.as_str(),
        "https://www.googleapis.com/youtube/v3/videoCategories?key=test-key&regionCode=US"
    );
}

#[test]
fn build_url_encodes_comma_joined_ids() {
    let client = test_client("https://www.googleapis.com/youtube/v3");
    let url = client.build_url(Resource::Channels, &[("id", "UCa,UCb")]);
    assert!(
        url.as_str().ends_with("channels?key=test-key&id=UCa%2CUCb"),
        "ids should be percent-encoded: {url}"
    );
}

#[test]
fn build_url_on_bare_host() {
    let client = test_client("http://127.0.0.1:8080");
    let url = client.build_url(Resource::Channels, &[]);
    assert_eq!(url.as_str(), "http://127.0.0.1:8080/channels?key=test-key");
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = YoutubeClient::with_base_url("k", 5, "ua", "not a url");
    assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
}

#[test]
fn resource_paths() {
    assert_eq!(Resource::Videos.path(), "videos");
    assert_eq!(Resource::Channels.path(), "channels");
    assert_eq!(Resource::VideoCategories.to_string(), "videoCategories");
}
