use crate::adapters::soap::SoapGateway;
use crate::config::ClientConfig;
use crate::domain::model::{
    AttributeCall, CustomerLookup, CustomerQuery, CustomerUpdate, Handle, NewCustomer, Params,
};
use crate::domain::ports::{ConnectionSettings, Gateway};
use crate::utils::error::{EconomicError, Result};
use crate::utils::validation::Validate;
use serde_json::Value;

const DEBTOR_GROUP_GET_ALL: &str = "DebtorGroup_GetAll";
const DEBTOR_GROUP_HANDLE: &str = "DebtorGroupHandle";

/// e-conomic SOAP API 的簡易封裝
///
/// ```no_run
/// # async fn demo() -> economic_client::Result<()> {
/// use economic_client::{ClientConfig, CustomerLookup, EconomicClient, NewCustomer, Params};
///
/// let config = ClientConfig::from_file("economic.toml")?;
/// let client = EconomicClient::connect(&config).await?;
///
/// let debtors = client.call("Debtor_GetAll", Params::new()).await?;
/// client.create_customer(NewCustomer::new("7", "Mr. White Hat Spammer")).await?;
/// let customer = client.find_customer(CustomerLookup::ByNumber("7".into())).await?;
/// # Ok(())
/// # }
/// ```
///
/// 所有呼叫依序執行，一次只有一個請求在途中。
pub struct EconomicClient<G: Gateway = SoapGateway> {
    gateway: G,
}

impl EconomicClient<SoapGateway> {
    /// 載入 WSDL 並以設定中的帳號資訊登入
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let gateway = SoapGateway::load(config.wsdl_url(), &config.transport).await?;
        Self::with_gateway(gateway, config).await
    }
}

impl<G: Gateway> EconomicClient<G> {
    pub async fn with_gateway<C: ConnectionSettings>(gateway: G, settings: &C) -> Result<Self> {
        let client = Self { gateway };

        let params = Params::new()
            .with("agreementNumber", settings.agreement_number())
            .with("userName", settings.user_name())
            .with("password", settings.password());
        client.call("Connect", params).await?;

        tracing::info!(
            "🔐 Connected to e-conomic agreement {} as {}",
            settings.agreement_number(),
            settings.user_name()
        );
        Ok(client)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// 呼叫任何 e-conomic API 操作，例如
    /// `client.call("TermOfPayment_FindByName", Params::new().with("name", "Net 8 days"))`
    pub async fn call(&self, operation: &str, params: Params) -> Result<Value> {
        if !self.gateway.has_operation(operation) {
            return Err(EconomicError::UnknownOperation {
                operation: operation.to_string(),
            });
        }

        tracing::debug!("Calling {} with arguments {:?}", operation, params.names());
        self.gateway.invoke(operation, params).await
    }

    /// 回傳 DebtorHandle；查詢值為空時不會送出請求
    pub async fn find_customer(&self, lookup: CustomerLookup) -> Result<Value> {
        if lookup.value().is_empty() {
            return Err(EconomicError::InvalidArguments {
                message: format!("{} needs a non-empty {}", lookup.operation(), lookup.argument()),
            });
        }
        self.call(lookup.operation(), lookup.params()).await
    }

    /// 六個條件中必須剛好提供一個
    pub async fn find_customer_by(&self, query: CustomerQuery) -> Result<Value> {
        self.find_customer(CustomerLookup::try_from(query)?).await
    }

    pub async fn create_customer(&self, customer: NewCustomer) -> Result<Handle> {
        let group_handle = match customer.group_handle() {
            Some(handle) => handle,
            None => self.default_group_handle().await?,
        };

        let debtor = self
            .call("Debtor_Create", customer.create_params(group_handle))
            .await?;

        self.apply(&debtor, customer.attribute_calls()).await?;

        tracing::info!("✅ Created debtor {} ({})", customer.number, customer.name);
        Ok(debtor)
    }

    /// 只送出有提供的欄位；回傳原本的 handle
    pub async fn update_customer(
        &self,
        debtor_handle: Handle,
        update: CustomerUpdate,
    ) -> Result<Handle> {
        let calls = update.attribute_calls();
        let count = calls.len();
        self.apply(&debtor_handle, calls).await?;

        tracing::debug!("Updated {} debtor attributes", count);
        Ok(debtor_handle)
    }

    // 失敗時立即中止，已套用的設定不回復
    async fn apply(&self, debtor_handle: &Handle, calls: Vec<AttributeCall>) -> Result<()> {
        for call in calls {
            self.call(call.operation, call.params(debtor_handle)).await?;
        }
        Ok(())
    }

    async fn default_group_handle(&self) -> Result<Handle> {
        let groups = self.call(DEBTOR_GROUP_GET_ALL, Params::new()).await?;

        let first = match groups.get(DEBTOR_GROUP_HANDLE) {
            Some(Value::Array(handles)) => handles.first().cloned(),
            Some(Value::Null) | None => None,
            Some(single) => Some(single.clone()),
        };

        first.ok_or_else(|| EconomicError::EmptyResult {
            operation: DEBTOR_GROUP_GET_ALL.to_string(),
            field: DEBTOR_GROUP_HANDLE.to_string(),
        })
    }
}
