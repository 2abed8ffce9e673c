use httpmock::prelude::*;
use ion_prefixlist::core::grouper;
use ion_prefixlist::{PlatformClient, Reconciler, SaseClient, Settings};
use serde_json::json;
use std::io::Write;

fn test_settings(server: &MockServer) -> Settings {
    Settings {
        client_id: "svc@1234.iam.panserviceaccount.com".to_string(),
        client_secret: "secret".to_string(),
        tsg_id: "1234567890".to_string(),
        api_base: Some(server.base_url()),
        auth_base: Some(server.base_url()),
    }
}

fn mock_login(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/oauth2/access_token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": "test-token", "token_type": "Bearer"}));
    })
}

fn mock_inventory(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/sdwan/v4.11/api/sites")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body(json!({"items": [
            {"id": "site-1", "name": "EMEA DC"},
            {"id": "site-2", "name": "NAM DC"}
        ]}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/sdwan/v3.1/api/elements")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body(json!({"items": [
            {"id": "elem-1", "name": "ion-emea-1", "site_id": "site-1"},
            {"id": "elem-2", "name": "ion-nam-1", "site_id": "site-2"},
            {"id": "elem-9", "name": "ion-unclaimed", "site_id": null}
        ]}));
    });
}

#[tokio::test]
async fn test_end_to_end_creates_missing_prefix_list() {
    let server = MockServer::start();
    let login = mock_login(&server);
    mock_inventory(&server);

    let get_lists = server.mock(|when, then| {
        when.method(GET)
            .path("/sdwan/v15.0/api/sites/site-1/elements/elem-1/routing_prefixlists");
        then.status(200).json_body(json!({"items": []}));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/sdwan/v15.0/api/sites/site-1/elements/elem-1/routing_prefixlists")
            .json_body_partial(r#"{"name": "SiteA-Allow", "auto_generated": false}"#);
        then.status(200).json_body(json!({"id": "pl-1"}));
    });

    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         EMEA DC,SiteA-Allow,192.168.1.0/24,,\n\
         ,,10.10.0.0/16,,\n"
    )
    .unwrap();

    let definitions = grouper::load_definitions(csv_file.path()).unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].entries.len(), 2);

    let client = SaseClient::new(test_settings(&server)).unwrap();
    client.login().await.unwrap();

    let report = Reconciler::new(&client).apply_all(&definitions).await;
    assert!(report.is_clean(), "failures: {:?}", report.failures);
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);

    login.assert();
    get_lists.assert();
    create.assert();
}

#[tokio::test]
async fn test_end_to_end_updates_in_place_preserving_etag() {
    let server = MockServer::start();
    mock_login(&server);
    mock_inventory(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/sdwan/v15.0/api/sites/site-2/elements/elem-2/routing_prefixlists");
        then.status(200).json_body(json!({"items": [{
            "id": "pl-9",
            "name": "SiteC-Specific",
            "_etag": 7,
            "description": "stale description",
            "tags": null,
            "auto_generated": false,
            "prefix_filter_list": [
                {"order": 10, "permit": true, "prefix": "198.51.100.0/24", "ipv6_prefix": null, "ge": 0, "le": 0}
            ]
        }]}));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/sdwan/v15.0/api/sites/site-2/elements/elem-2/routing_prefixlists/pl-9")
            .json_body_partial(r#"{"id": "pl-9", "_etag": 7}"#);
        then.status(200).json_body(json!({"id": "pl-9"}));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/sdwan/v15.0/api/sites/site-2/elements/elem-2/routing_prefixlists");
        then.status(200);
    });

    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         NAM DC,SiteC-Specific,203.0.113.0/24,28,32\n"
    )
    .unwrap();
    let definitions = grouper::load_definitions(csv_file.path()).unwrap();

    let client = SaseClient::new(test_settings(&server)).unwrap();
    client.login().await.unwrap();

    let report = Reconciler::new(&client).apply_all(&definitions).await;
    assert!(report.is_clean(), "failures: {:?}", report.failures);
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 1);

    update.assert();
    assert_eq!(create.hits(), 0);
}

#[tokio::test]
async fn test_unresolvable_site_is_reported_but_does_not_block_others() {
    let server = MockServer::start();
    mock_login(&server);
    mock_inventory(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/sdwan/v15.0/api/sites/site-1/elements/elem-1/routing_prefixlists");
        then.status(200).json_body(json!({"items": []}));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/sdwan/v15.0/api/sites/site-1/elements/elem-1/routing_prefixlists");
        then.status(200);
    });

    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         \"Ghost Site,EMEA DC\",SiteA-Allow,192.168.1.0/24,,\n"
    )
    .unwrap();
    let definitions = grouper::load_definitions(csv_file.path()).unwrap();

    let client = SaseClient::new(test_settings(&server)).unwrap();
    client.login().await.unwrap();

    let report = Reconciler::new(&client).apply_all(&definitions).await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].site, "Ghost Site");
    assert_eq!(report.created, 1);
    create.assert();
}

#[tokio::test]
async fn test_failed_create_call_is_accumulated_per_device() {
    let server = MockServer::start();
    mock_login(&server);
    mock_inventory(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/sdwan/v15.0/api/sites/site-1/elements/elem-1/routing_prefixlists");
        then.status(200).json_body(json!({"items": []}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/sdwan/v15.0/api/sites/site-1/elements/elem-1/routing_prefixlists");
        then.status(500).body("internal error");
    });

    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         EMEA DC,SiteA-Allow,192.168.1.0/24,,\n"
    )
    .unwrap();
    let definitions = grouper::load_definitions(csv_file.path()).unwrap();

    let client = SaseClient::new(test_settings(&server)).unwrap();
    client.login().await.unwrap();

    let report = Reconciler::new(&client).apply_all(&definitions).await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].device.as_deref(), Some("ion-emea-1"));
    assert!(report.failures[0].reason.contains("500"));
    assert_eq!(report.created + report.updated, 0);
}

#[tokio::test]
async fn test_login_failure_surfaces_as_login_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/oauth2/access_token");
        then.status(401).body("invalid_client");
    });

    let client = SaseClient::new(test_settings(&server)).unwrap();
    let err = client.login().await.unwrap_err();
    assert!(matches!(err, ion_prefixlist::IonError::LoginError { .. }));
}
