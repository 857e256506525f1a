use anyhow::Result;
use economic_client::{
    ClientConfig, CustomerLookup, CustomerUpdate, EconomicClient, EconomicError, NewCustomer,
    Params,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

const NAMESPACE: &str = "http://e-conomic.com";

fn wsdl(endpoint: &str) -> String {
    let operations = [
        "Connect",
        "Debtor_Create",
        "Debtor_FindByEmail",
        "Debtor_SetCurrency",
        "Debtor_SetCity",
        "DebtorGroup_GetAll",
    ]
    .iter()
    .map(|op| format!(r#"<wsdl:operation name="{}"/>"#, op))
    .collect::<Vec<_>>()
    .join("");

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                  xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
                  targetNamespace="{NAMESPACE}">
  <wsdl:portType name="EconomicWebServiceSoap">{operations}</wsdl:portType>
  <wsdl:binding name="EconomicWebServiceSoap" type="tns:EconomicWebServiceSoap">
    <wsdl:operation name="Connect">
      <soap:operation soapAction="{NAMESPACE}/Connect" style="document"/>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="EconomicWebService">
    <wsdl:port name="EconomicWebServiceSoap" binding="tns:EconomicWebServiceSoap">
      <soap:address location="{endpoint}"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>"#
    )
}

fn soap_response(operation: &str, result: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><{operation}Response xmlns="{NAMESPACE}">{result}</{operation}Response></soap:Body></soap:Envelope>"#
    )
}

fn soap_fault(message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>{message}</faultstring></soap:Fault></soap:Body></soap:Envelope>"#
    )
}

fn operation_marker(operation: &str) -> String {
    format!(r#"<{} xmlns="{}">"#, operation, NAMESPACE)
}

fn serve_wsdl(server: &MockServer) -> httpmock::Mock<'_> {
    let body = wsdl(&server.url("/service.asmx"));
    server.mock(|when, then| {
        when.method(GET).path("/service.wsdl");
        then.status(200)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(body);
    })
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(123456, "api-user", "secret", server.url("/service.wsdl"))
}

#[tokio::test]
async fn test_connect_and_create_customer_over_http() -> Result<()> {
    let server = MockServer::start();
    let wsdl_mock = serve_wsdl(&server);

    let connect_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/service.asmx")
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"http://e-conomic.com/Connect\"")
            .body_contains(operation_marker("Connect"))
            .body_contains("<agreementNumber>123456</agreementNumber>")
            .body_contains("<userName>api-user</userName>")
            .body_contains("<password>secret</password>");
        then.status(200)
            .header("Set-Cookie", "ASP.NET_SessionId=abc123; path=/")
            .body(soap_response(
                "Connect",
                "<ConnectResult><Number>1</Number></ConnectResult>",
            ));
    });

    let groups_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/service.asmx")
            .header("SOAPAction", "\"http://e-conomic.com/DebtorGroup_GetAll\"")
            .body_contains(operation_marker("DebtorGroup_GetAll"));
        then.status(200).body(soap_response(
            "DebtorGroup_GetAll",
            "<DebtorGroup_GetAllResult><DebtorGroupHandle><Number>1</Number></DebtorGroupHandle><DebtorGroupHandle><Number>2</Number></DebtorGroupHandle></DebtorGroup_GetAllResult>",
        ));
    });

    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/service.asmx")
            .header("Cookie", "ASP.NET_SessionId=abc123")
            .body_contains(operation_marker("Debtor_Create"))
            .body_contains("<number>7</number><name>Acme</name><vatZone>HomeCountry</vatZone><debtorGroupHandle><Number>1</Number></debtorGroupHandle>");
        then.status(200).body(soap_response(
            "Debtor_Create",
            "<Debtor_CreateResult><Number>7</Number></Debtor_CreateResult>",
        ));
    });

    let currency_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/service.asmx")
            .body_contains(operation_marker("Debtor_SetCurrency"))
            .body_contains("<debtorHandle><Number>7</Number></debtorHandle><valueHandle><Code>DKK</Code></valueHandle>");
        then.status(200)
            .body(soap_response("Debtor_SetCurrency", ""));
    });

    let client = EconomicClient::connect(&config_for(&server)).await?;
    let handle = client
        .create_customer(NewCustomer::new("7", "Acme").currency("DKK"))
        .await?;

    assert_eq!(handle, json!({"Number": "7"}));
    wsdl_mock.assert();
    connect_mock.assert();
    groups_mock.assert();
    create_mock.assert();
    currency_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_find_customer_returns_parsed_handles() -> Result<()> {
    let server = MockServer::start();
    serve_wsdl(&server);
    server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Connect"));
        then.status(200).body(soap_response("Connect", ""));
    });
    let find_mock = server.mock(|when, then| {
        when.method(POST)
            .body_contains(operation_marker("Debtor_FindByEmail"))
            .body_contains("<email>info@acme.dk</email>");
        then.status(200).body(soap_response(
            "Debtor_FindByEmail",
            "<Debtor_FindByEmailResult><DebtorHandle><Number>7</Number></DebtorHandle><DebtorHandle><Number>9</Number></DebtorHandle></Debtor_FindByEmailResult>",
        ));
    });

    let client = EconomicClient::connect(&config_for(&server)).await?;
    let result = client
        .find_customer(CustomerLookup::ByEmail("info@acme.dk".to_string()))
        .await?;

    find_mock.assert();
    assert_eq!(
        result,
        json!({"DebtorHandle": [{"Number": "7"}, {"Number": "9"}]})
    );
    Ok(())
}

#[tokio::test]
async fn test_rejected_connect_surfaces_fault() {
    let server = MockServer::start();
    serve_wsdl(&server);
    server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Connect"));
        then.status(500)
            .body(soap_fault("Incorrect user name or password."));
    });

    let result = EconomicClient::connect(&config_for(&server)).await;

    match result {
        Err(EconomicError::SoapFault { code, message }) => {
            assert_eq!(code, "soap:Server");
            assert_eq!(message, "Incorrect user name or password.");
        }
        Err(other) => panic!("expected SOAP fault, got {:?}", other),
        Ok(_) => panic!("expected connect to fail"),
    }
}

#[tokio::test]
async fn test_unknown_operation_sends_no_request() -> Result<()> {
    let server = MockServer::start();
    serve_wsdl(&server);
    let connect_mock = server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Connect"));
        then.status(200).body(soap_response("Connect", ""));
    });
    let any_other_post = server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Debtor_Delete"));
        then.status(200).body(soap_response("Debtor_Delete", ""));
    });

    let client = EconomicClient::connect(&config_for(&server)).await?;
    let result = client.call("Debtor_Delete", Params::new()).await;

    assert!(matches!(result, Err(EconomicError::UnknownOperation { .. })));
    connect_mock.assert_hits(1);
    any_other_post.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_update_halts_on_http_error() -> Result<()> {
    let server = MockServer::start();
    serve_wsdl(&server);
    server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Connect"));
        then.status(200).body(soap_response("Connect", ""));
    });
    let city_mock = server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Debtor_SetCity"));
        then.status(503).body("Service Unavailable");
    });
    let currency_mock = server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Debtor_SetCurrency"));
        then.status(200).body(soap_response("Debtor_SetCurrency", ""));
    });

    let client = EconomicClient::connect(&config_for(&server)).await?;
    let update = CustomerUpdate::new().currency("EUR").city("Odense");
    let result = client.update_customer(json!({"Number": "7"}), update).await;

    match result {
        Err(EconomicError::UnexpectedStatus {
            operation, status, ..
        }) => {
            assert_eq!(operation, "Debtor_SetCity");
            assert_eq!(status, 503);
        }
        other => panic!("expected HTTP status error, got {:?}", other),
    }
    currency_mock.assert_hits(1);
    city_mock.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_missing_service_description_fails_construction() {
    let server = MockServer::start();
    let wsdl_mock = server.mock(|when, then| {
        when.method(GET).path("/service.wsdl");
        then.status(404);
    });

    let result = EconomicClient::connect(&config_for(&server)).await;

    wsdl_mock.assert();
    assert!(matches!(
        result,
        Err(EconomicError::ServiceDescriptionError { .. })
    ));
}

#[tokio::test]
async fn test_invalid_config_rejected_before_any_request() {
    let server = MockServer::start();
    let wsdl_mock = serve_wsdl(&server);

    let config = ClientConfig::new(0, "", "secret", server.url("/service.wsdl"));
    let result = EconomicClient::connect(&config).await;

    assert!(matches!(
        result,
        Err(EconomicError::InvalidConfigValueError { .. })
    ));
    wsdl_mock.assert_hits(0);
}

#[tokio::test]
async fn test_transport_timeout_bounds_slow_calls() {
    let server = MockServer::start();
    serve_wsdl(&server);
    server.mock(|when, then| {
        when.method(POST).body_contains(operation_marker("Connect"));
        then.status(200)
            .delay(Duration::from_secs(3))
            .body(soap_response("Connect", ""));
    });

    let mut config = config_for(&server);
    config.transport.timeout_seconds = Some(1);
    let result = EconomicClient::connect(&config).await;

    match result {
        Err(EconomicError::HttpError(e)) => assert!(e.is_timeout()),
        Err(other) => panic!("expected timeout, got {:?}", other),
        Ok(_) => panic!("expected connect to time out"),
    }
}
