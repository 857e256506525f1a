use crate::utils::error::{EconomicError, Result};
use serde_json::{Map, Value};

/// 遠端服務回傳或接收的不透明 handle
pub type Handle = Value;

pub const DEFAULT_VAT_ZONE: &str = "HomeCountry";

/// 依序排列的遠端呼叫參數
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// 單鍵 value handle，例如 `{"Id": 3}`
pub fn value_handle(field: &str, value: impl Into<Value>) -> Value {
    let mut map = Map::new();
    map.insert(field.to_string(), value.into());
    Value::Object(map)
}

/// 判斷選填參數是否有提供（空字串與 0 視為未提供）
pub trait Supplied {
    fn is_supplied(&self) -> bool;
}

impl Supplied for String {
    fn is_supplied(&self) -> bool {
        !self.is_empty()
    }
}

impl Supplied for i64 {
    fn is_supplied(&self) -> bool {
        *self != 0
    }
}

impl<T: Supplied> Supplied for Option<T> {
    fn is_supplied(&self) -> bool {
        self.as_ref().is_some_and(|v| v.is_supplied())
    }
}

/// 客戶查詢方式，每個 variant 對應一個 `Debtor_FindBy*` 操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerLookup {
    ByName(String),
    ByNumber(String),
    ByCiNumber(String),
    ByEan(String),
    ByEmail(String),
    ByPartialName(String),
}

impl CustomerLookup {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ByName(_) => "Debtor_FindByName",
            Self::ByNumber(_) => "Debtor_FindByNumber",
            Self::ByCiNumber(_) => "Debtor_FindByCINumber",
            Self::ByEan(_) => "Debtor_FindByEan",
            Self::ByEmail(_) => "Debtor_FindByEmail",
            Self::ByPartialName(_) => "Debtor_FindByPartialName",
        }
    }

    /// 遠端參數名稱；ciNumber 與 partialName 的大小寫和本地欄位不同
    pub fn argument(&self) -> &'static str {
        match self {
            Self::ByName(_) => "name",
            Self::ByNumber(_) => "number",
            Self::ByCiNumber(_) => "ciNumber",
            Self::ByEan(_) => "ean",
            Self::ByEmail(_) => "email",
            Self::ByPartialName(_) => "partialName",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::ByName(v)
            | Self::ByNumber(v)
            | Self::ByCiNumber(v)
            | Self::ByEan(v)
            | Self::ByEmail(v)
            | Self::ByPartialName(v) => v,
        }
    }

    pub fn params(&self) -> Params {
        Params::new().with(self.argument(), self.value())
    }
}

/// 未型別化的查詢條件；轉為 [`CustomerLookup`] 時必須剛好提供一個欄位
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    pub name: Option<String>,
    pub number: Option<String>,
    pub ci_number: Option<String>,
    pub ean: Option<String>,
    pub email: Option<String>,
    pub partial_name: Option<String>,
}

impl TryFrom<CustomerQuery> for CustomerLookup {
    type Error = EconomicError;

    fn try_from(query: CustomerQuery) -> Result<Self> {
        let candidates: [(Option<String>, fn(String) -> CustomerLookup); 6] = [
            (query.name, CustomerLookup::ByName),
            (query.number, CustomerLookup::ByNumber),
            (query.ci_number, CustomerLookup::ByCiNumber),
            (query.ean, CustomerLookup::ByEan),
            (query.email, CustomerLookup::ByEmail),
            (query.partial_name, CustomerLookup::ByPartialName),
        ];

        let mut supplied: Vec<CustomerLookup> = candidates
            .into_iter()
            .filter(|(value, _)| value.is_supplied())
            .filter_map(|(value, variant)| value.map(variant))
            .collect();

        if supplied.len() != 1 {
            return Err(EconomicError::InvalidArguments {
                message: format!(
                    "customer lookup needs exactly one argument, got {}",
                    supplied.len()
                ),
            });
        }

        Ok(supplied.remove(0))
    }
}

/// 依序套用到 debtor handle 的單一設定呼叫
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeCall {
    pub operation: &'static str,
    pub argument: &'static str,
    pub value: Value,
}

impl AttributeCall {
    fn plain(operation: &'static str, value: impl Into<Value>) -> Self {
        Self {
            operation,
            argument: "value",
            value: value.into(),
        }
    }

    fn handle(operation: &'static str, field: &str, value: impl Into<Value>) -> Self {
        Self {
            operation,
            argument: "valueHandle",
            value: value_handle(field, value),
        }
    }

    pub fn params(&self, debtor_handle: &Handle) -> Params {
        Params::new()
            .with("debtorHandle", debtor_handle.clone())
            .with(self.argument, self.value.clone())
    }
}

fn push_plain(calls: &mut Vec<AttributeCall>, operation: &'static str, value: &Option<String>) {
    if let Some(value) = value.as_ref().filter(|v| v.is_supplied()) {
        calls.push(AttributeCall::plain(operation, value.as_str()));
    }
}

fn push_handle(
    calls: &mut Vec<AttributeCall>,
    operation: &'static str,
    field: &str,
    value: Option<Value>,
) {
    if let Some(value) = value {
        calls.push(AttributeCall::handle(operation, field, value));
    }
}

fn supplied_id(id: Option<i64>) -> Option<Value> {
    id.filter(|id| id.is_supplied()).map(Value::from)
}

fn supplied_text(text: &Option<String>) -> Option<Value> {
    text.as_ref()
        .filter(|t| t.is_supplied())
        .map(|t| Value::from(t.as_str()))
}

/// 共用的聯絡與地址欄位，create 與 update 依相同順序套用
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDetails {
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub www: Option<String>,
    pub vat_number: Option<String>,
}

impl ContactDetails {
    fn append_calls(&self, calls: &mut Vec<AttributeCall>) {
        push_plain(calls, "Debtor_SetAddress", &self.address);
        push_plain(calls, "Debtor_SetCity", &self.city);
        push_plain(calls, "Debtor_SetPostalCode", &self.postal_code);
        push_plain(calls, "Debtor_SetCountry", &self.country);
        push_plain(calls, "Debtor_SetEmail", &self.email);
        push_plain(calls, "Debtor_SetWebsite", &self.www);
        push_plain(calls, "Debtor_SetVatNumber", &self.vat_number);
    }
}

macro_rules! contact_setters {
    () => {
        pub fn address(mut self, address: impl Into<String>) -> Self {
            self.contact.address = Some(address.into());
            self
        }

        pub fn city(mut self, city: impl Into<String>) -> Self {
            self.contact.city = Some(city.into());
            self
        }

        pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
            self.contact.postal_code = Some(postal_code.into());
            self
        }

        pub fn country(mut self, country: impl Into<String>) -> Self {
            self.contact.country = Some(country.into());
            self
        }

        pub fn email(mut self, email: impl Into<String>) -> Self {
            self.contact.email = Some(email.into());
            self
        }

        pub fn www(mut self, www: impl Into<String>) -> Self {
            self.contact.www = Some(www.into());
            self
        }

        pub fn vat_number(mut self, vat_number: impl Into<String>) -> Self {
            self.contact.vat_number = Some(vat_number.into());
            self
        }

        pub fn term_of_payment(mut self, id: i64) -> Self {
            self.term_of_payment_id = Some(id);
            self
        }

        pub fn group(mut self, group_handle_id: i64) -> Self {
            self.group_handle_id = Some(group_handle_id);
            self
        }

        pub fn currency(mut self, code: impl Into<String>) -> Self {
            self.currency_code = Some(code.into());
            self
        }
    };
}

/// 建立新客戶的請求
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub number: String,
    pub name: String,
    pub term_of_payment_id: Option<i64>,
    pub group_handle_id: Option<i64>,
    pub vat_zone: String,
    pub currency_code: Option<String>,
    pub contact: ContactDetails,
}

impl NewCustomer {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            term_of_payment_id: None,
            group_handle_id: None,
            vat_zone: DEFAULT_VAT_ZONE.to_string(),
            currency_code: None,
            contact: ContactDetails::default(),
        }
    }

    pub fn vat_zone(mut self, vat_zone: impl Into<String>) -> Self {
        self.vat_zone = vat_zone.into();
        self
    }

    contact_setters!();

    /// 指定的群組 handle；未提供時由呼叫端取得預設群組
    pub fn group_handle(&self) -> Option<Value> {
        supplied_id(self.group_handle_id).map(|id| value_handle("Number", id))
    }

    pub fn create_params(&self, group_handle: Handle) -> Params {
        Params::new()
            .with("number", self.number.as_str())
            .with("name", self.name.as_str())
            .with("vatZone", self.vat_zone.as_str())
            .with("debtorGroupHandle", group_handle)
    }

    /// 建立後的設定呼叫，順序固定
    pub fn attribute_calls(&self) -> Vec<AttributeCall> {
        let mut calls = Vec::new();
        push_handle(
            &mut calls,
            "Debtor_SetTermOfPayment",
            "Id",
            supplied_id(self.term_of_payment_id),
        );
        push_handle(
            &mut calls,
            "Debtor_SetCurrency",
            "Code",
            supplied_text(&self.currency_code),
        );
        self.contact.append_calls(&mut calls);
        calls
    }
}

/// 更新既有客戶；未提供的欄位保持不變
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub term_of_payment_id: Option<i64>,
    pub group_handle_id: Option<i64>,
    pub vat_zone: Option<String>,
    pub currency_code: Option<String>,
    pub contact: ContactDetails,
}

impl CustomerUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn vat_zone(mut self, vat_zone: impl Into<String>) -> Self {
        self.vat_zone = Some(vat_zone.into());
        self
    }

    contact_setters!();

    pub fn attribute_calls(&self) -> Vec<AttributeCall> {
        let mut calls = Vec::new();
        push_plain(&mut calls, "Debtor_SetName", &self.name);
        push_handle(
            &mut calls,
            "Debtor_SetDebtorGroup",
            "Number",
            supplied_id(self.group_handle_id),
        );
        push_plain(&mut calls, "Debtor_SetVatZone", &self.vat_zone);
        push_handle(
            &mut calls,
            "Debtor_SetTermOfPayment",
            "Id",
            supplied_id(self.term_of_payment_id),
        );
        push_handle(
            &mut calls,
            "Debtor_SetCurrency",
            "Code",
            supplied_text(&self.currency_code),
        );
        self.contact.append_calls(&mut calls);
        calls
    }
}
