use crate::adapters::soap::xml::XmlElement;
use crate::utils::error::{EconomicError, Result};
use reqwest::Client;
use std::collections::{BTreeSet, HashMap};

/// WSDL 中本客戶端需要的部分：命名空間、端點、操作清單與 SOAPAction
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescription {
    target_namespace: String,
    endpoint: String,
    operations: BTreeSet<String>,
    soap_actions: HashMap<String, String>,
}

fn description_error(message: impl Into<String>) -> EconomicError {
    EconomicError::ServiceDescriptionError {
        message: message.into(),
    }
}

impl ServiceDescription {
    pub fn parse(wsdl: &str) -> Result<Self> {
        let root = XmlElement::parse(wsdl).map_err(|e| description_error(e.to_string()))?;
        if root.name != "definitions" {
            return Err(description_error(format!(
                "expected <definitions> root, found <{}>",
                root.name
            )));
        }

        let target_namespace = root
            .attribute("targetNamespace")
            .ok_or_else(|| description_error("missing targetNamespace"))?
            .to_string();

        let operations: BTreeSet<String> = root
            .children_named("portType")
            .flat_map(|port_type| port_type.children_named("operation"))
            .filter_map(|operation| operation.attribute("name"))
            .map(str::to_string)
            .collect();

        if operations.is_empty() {
            return Err(description_error("no operations declared in portType"));
        }

        // 多個 binding（SOAP 1.1 / 1.2）時以第一個為準
        let mut soap_actions = HashMap::new();
        for binding in root.children_named("binding") {
            for operation in binding.children_named("operation") {
                let Some(name) = operation.attribute("name") else {
                    continue;
                };
                let action = operation
                    .child("operation")
                    .and_then(|soap_op| soap_op.attribute("soapAction"));
                if let Some(action) = action {
                    soap_actions
                        .entry(name.to_string())
                        .or_insert_with(|| action.to_string());
                }
            }
        }

        let endpoint = root
            .children_named("service")
            .flat_map(|service| service.children_named("port"))
            .filter_map(|port| port.child("address"))
            .find_map(|address| address.attribute("location"))
            .ok_or_else(|| description_error("no service port address"))?
            .to_string();

        Ok(Self {
            target_namespace,
            endpoint,
            operations,
            soap_actions,
        })
    }

    /// 從 http(s) URL、file:// URL 或本地路徑載入
    pub async fn load(locator: &str, client: &Client) -> Result<Self> {
        let content = if locator.starts_with("http://") || locator.starts_with("https://") {
            tracing::debug!("Fetching service description from {}", locator);
            let response = client.get(locator).send().await?;
            if !response.status().is_success() {
                return Err(description_error(format!(
                    "fetching {} returned HTTP {}",
                    locator,
                    response.status()
                )));
            }
            response.text().await?
        } else if locator.starts_with("file://") {
            let path = url::Url::parse(locator)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| description_error(format!("invalid file URL: {}", locator)))?;
            tokio::fs::read_to_string(path).await?
        } else {
            tokio::fs::read_to_string(locator).await?
        };

        let description = Self::parse(&content)?;
        tracing::debug!(
            "Service description loaded: {} operations, endpoint {}",
            description.operations.len(),
            description.endpoint
        );
        Ok(description)
    }

    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(String::as_str)
    }

    pub fn has_operation(&self, operation: &str) -> bool {
        self.operations.contains(operation)
    }

    pub fn soap_action(&self, operation: &str) -> String {
        self.soap_actions
            .get(operation)
            .cloned()
            .unwrap_or_else(|| {
                format!("{}/{}", self.target_namespace.trim_end_matches('/'), operation)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wsdl(endpoint: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
                  xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
                  xmlns:soap12="http://schemas.xmlsoap.org/wsdl/soap12/"
                  xmlns:tns="http://e-conomic.com"
                  targetNamespace="http://e-conomic.com">
  <wsdl:portType name="EconomicWebServiceSoap">
    <wsdl:operation name="Connect"><wsdl:input message="tns:ConnectSoapIn"/></wsdl:operation>
    <wsdl:operation name="Debtor_Create"/>
    <wsdl:operation name="Debtor_FindByNumber"/>
    <wsdl:operation name="Debtor_SetCurrency"/>
    <wsdl:operation name="DebtorGroup_GetAll"/>
  </wsdl:portType>
  <wsdl:binding name="EconomicWebServiceSoap" type="tns:EconomicWebServiceSoap">
    <soap:binding transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="Connect">
      <soap:operation soapAction="http://e-conomic.com/Connect" style="document"/>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:binding name="EconomicWebServiceSoap12" type="tns:EconomicWebServiceSoap">
    <wsdl:operation name="Connect">
      <soap12:operation soapAction="urn:soap12/Connect" style="document"/>
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

    #[test]
    fn test_parse_operations_and_endpoint() {
        let description =
            ServiceDescription::parse(&sample_wsdl("https://api.e-conomic.com/secure/api1/EconomicWebservice.asmx"))
                .unwrap();

        assert_eq!(description.target_namespace(), "http://e-conomic.com");
        assert_eq!(
            description.endpoint(),
            "https://api.e-conomic.com/secure/api1/EconomicWebservice.asmx"
        );
        assert!(description.has_operation("Debtor_Create"));
        assert!(description.has_operation("Connect"));
        assert!(!description.has_operation("Debtor_Delete"));
        assert_eq!(description.operations().count(), 5);
    }

    #[test]
    fn test_soap_action_prefers_first_binding_then_falls_back() {
        let description = ServiceDescription::parse(&sample_wsdl("http://localhost/ws")).unwrap();

        assert_eq!(description.soap_action("Connect"), "http://e-conomic.com/Connect");
        assert_eq!(
            description.soap_action("Debtor_Create"),
            "http://e-conomic.com/Debtor_Create"
        );
    }

    #[test]
    fn test_rejects_non_wsdl_documents() {
        let result = ServiceDescription::parse("<html><body>Not found</body></html>");
        assert!(matches!(
            result,
            Err(EconomicError::ServiceDescriptionError { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_address() {
        let wsdl = r#"<definitions targetNamespace="http://e-conomic.com">
  <portType name="P"><operation name="Connect"/></portType>
</definitions>"#;
        assert!(ServiceDescription::parse(wsdl).is_err());
    }

    #[tokio::test]
    async fn test_load_from_local_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("economic.wsdl");
        std::fs::write(&path, sample_wsdl("http://localhost/ws")).unwrap();

        let client = Client::new();
        let description = ServiceDescription::load(path.to_str().unwrap(), &client)
            .await
            .unwrap();
        assert!(description.has_operation("DebtorGroup_GetAll"));

        let missing = ServiceDescription::load("/nonexistent/economic.wsdl", &client).await;
        assert!(matches!(missing, Err(EconomicError::IoError(_))));
    }
}
