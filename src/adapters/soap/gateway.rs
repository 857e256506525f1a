use crate::adapters::soap::envelope::build_envelope;
use crate::adapters::soap::response::parse_response;
use crate::adapters::soap::wsdl::ServiceDescription;
use crate::config::TransportConfig;
use crate::domain::model::Params;
use crate::domain::ports::Gateway;
use crate::utils::error::{EconomicError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

/// 以 WSDL 描述為準的 SOAP 1.1 閘道
pub struct SoapGateway {
    client: Client,
    description: ServiceDescription,
}

impl SoapGateway {
    pub fn new(client: Client, description: ServiceDescription) -> Self {
        Self {
            client,
            description,
        }
    }

    /// cookie store 保留 Connect 建立的 session
    pub fn build_client(transport: &TransportConfig) -> Result<Client> {
        let mut builder = Client::builder().cookie_store(true);

        if let Some(timeout) = transport.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &transport.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(builder.build()?)
    }

    pub async fn load(wsdl_url: &str, transport: &TransportConfig) -> Result<Self> {
        let client = Self::build_client(transport)?;
        let description = ServiceDescription::load(wsdl_url, &client).await?;
        Ok(Self::new(client, description))
    }

    pub fn description(&self) -> &ServiceDescription {
        &self.description
    }

    pub fn endpoint(&self) -> &str {
        self.description.endpoint()
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.description.operations()
    }
}

#[async_trait]
impl Gateway for SoapGateway {
    fn has_operation(&self, operation: &str) -> bool {
        self.description.has_operation(operation)
    }

    async fn invoke(&self, operation: &str, params: Params) -> Result<Value> {
        let envelope = build_envelope(self.description.target_namespace(), operation, &params)?;

        tracing::debug!(
            "📡 POST {} ({}, {} bytes)",
            self.description.endpoint(),
            operation,
            envelope.len()
        );

        let response = self
            .client
            .post(self.description.endpoint())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header(
                "SOAPAction",
                format!("\"{}\"", self.description.soap_action(operation)),
            )
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📡 {} responded with status {}", operation, status);

        match parse_response(operation, &body) {
            Err(fault @ EconomicError::SoapFault { .. }) => {
                tracing::warn!("⚠️ {} failed: {}", operation, fault);
                Err(fault)
            }
            result if status.is_success() => result,
            _ => Err(EconomicError::UnexpectedStatus {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            }),
        }
    }
}
