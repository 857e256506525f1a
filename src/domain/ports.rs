use crate::domain::model::Params;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// 遠端操作閘道：依名稱呼叫 WSDL 中宣告的操作
#[async_trait]
pub trait Gateway: Send + Sync {
    fn has_operation(&self, operation: &str) -> bool;

    async fn invoke(&self, operation: &str, params: Params) -> Result<Value>;
}

pub trait ConnectionSettings: Send + Sync {
    fn agreement_number(&self) -> u64;
    fn user_name(&self) -> &str;
    fn password(&self) -> &str;
    fn wsdl_url(&self) -> &str;
}
