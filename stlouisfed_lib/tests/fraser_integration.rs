use stlouisfed_lib::{Error, Fraser};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/xml; charset=utf-8")
}

fn fraser(server: &MockServer) -> Fraser {
    Fraser::with_base_url(&format!("{}/oai", server.uri())).unwrap()
}

const PAGE_ONE: &str = r#"<OAI-PMH><ListIdentifiers>
    <header><identifier>oai:fraser.stlouisfed.org:title:1</identifier><datestamp>2020-01-01</datestamp><setSpec>title</setSpec></header>
    <header status="deleted"><identifier>oai:fraser.stlouisfed.org:title:2</identifier><datestamp>2020-01-02</datestamp></header>
    <resumptionToken cursor="0" completeListSize="3">1469299598:2</resumptionToken>
</ListIdentifiers></OAI-PMH>"#;

const PAGE_TWO: &str = r#"<OAI-PMH><ListIdentifiers>
    <header><identifier>oai:fraser.stlouisfed.org:title:3</identifier><datestamp>2020-01-03</datestamp></header>
    <resumptionToken cursor="2" completeListSize="3"></resumptionToken>
</ListIdentifiers></OAI-PMH>"#;

async fn mount_identifier_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("verb", "ListIdentifiers"))
        .and(query_param("metadataPrefix", "mods"))
        .and(query_param("set", "title"))
        .and(query_param_is_missing("resumptionToken"))
        .respond_with(xml(PAGE_ONE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("verb", "ListIdentifiers"))
        .and(query_param("resumptionToken", "1469299598:2"))
        .and(query_param_is_missing("metadataPrefix"))
        .respond_with(xml(PAGE_TWO))
        .mount(server)
        .await;
}

#[tokio::test]
async fn identifiers_follow_resumption_tokens() {
    let server = MockServer::start().await;
    mount_identifier_pages(&server).await;

    let headers = fraser(&server)
        .list_identifiers(Some("title"), false)
        .await
        .unwrap();
    let ids: Vec<&str> = headers.iter().map(|h| h.identifier.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "oai:fraser.stlouisfed.org:title:1",
            "oai:fraser.stlouisfed.org:title:2",
            "oai:fraser.stlouisfed.org:title:3"
        ]
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleted_headers_can_be_skipped() {
    let server = MockServer::start().await;
    mount_identifier_pages(&server).await;

    let headers = fraser(&server)
        .list_identifiers(Some("title"), true)
        .await
        .unwrap();
    assert_eq!(headers.len(), 2);
    assert!(headers.iter().all(|h| !h.deleted));
}

#[tokio::test]
async fn page_limit_stops_the_harvest() {
    let server = MockServer::start().await;
    mount_identifier_pages(&server).await;

    let headers = fraser(&server)
        .with_max_pages(1)
        .list_identifiers(Some("title"), false)
        .await
        .unwrap();
    assert_eq!(headers.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn no_records_match_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("verb", "ListRecords"))
        .respond_with(xml(
            r#"<OAI-PMH><error code="noRecordsMatch">The combination of the values results in an empty list.</error></OAI-PMH>"#,
        ))
        .mount(&server)
        .await;

    let records = fraser(&server).list_records(Some("empty"), false).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn other_protocol_errors_are_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("verb", "GetRecord"))
        .and(query_param("identifier", "oai:fraser.stlouisfed.org:title:0"))
        .respond_with(xml(
            r#"<OAI-PMH><error code="idDoesNotExist">No matching identifier</error></OAI-PMH>"#,
        ))
        .mount(&server)
        .await;

    let err = fraser(&server)
        .get_record("oai:fraser.stlouisfed.org:title:0")
        .await
        .unwrap_err();
    match err {
        Error::RemoteProtocol { code, message, url } => {
            assert_eq!(code, "idDoesNotExist");
            assert_eq!(message, "No matching identifier");
            assert!(url.contains("verb=GetRecord"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn get_record_keeps_raw_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("verb", "GetRecord"))
        .and(query_param("metadataPrefix", "mods"))
        .respond_with(xml(
            r#"<OAI-PMH><GetRecord><record>
                <header><identifier>oai:fraser.stlouisfed.org:title:176</identifier><datestamp>2023-11-02</datestamp></header>
                <metadata><mods><titleInfo><title>Annual Report</title></titleInfo></mods></metadata>
            </record></GetRecord></OAI-PMH>"#,
        ))
        .mount(&server)
        .await;

    let record = fraser(&server)
        .get_record("oai:fraser.stlouisfed.org:title:176")
        .await
        .unwrap();
    assert_eq!(record.header.identifier, "oai:fraser.stlouisfed.org:title:176");
    assert_eq!(
        record.metadata.as_deref(),
        Some("<mods><titleInfo><title>Annual Report</title></titleInfo></mods>")
    );
}

#[tokio::test]
async fn http_failures_are_remote_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = fraser(&server).list_sets().await.unwrap_err();
    assert!(matches!(err, Error::RemoteStatus { status: 503, .. }));
}
