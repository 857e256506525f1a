use crate::adapters::soap::xml::XmlElement;
use crate::utils::error::{EconomicError, Result};
use serde_json::{Map, Value};

/// 解析 SOAP 回應：Fault 轉成錯誤，否則回傳 `<Op>Result` 的內容
pub fn parse_response(operation: &str, body: &str) -> Result<Value> {
    let malformed = |message: &str| EconomicError::MalformedResponse {
        operation: operation.to_string(),
        message: message.to_string(),
    };

    let envelope = XmlElement::parse(body).map_err(|e| malformed(&e.to_string()))?;
    if envelope.name != "Envelope" {
        return Err(malformed("response is not a SOAP envelope"));
    }

    let body = envelope
        .child("Body")
        .ok_or_else(|| malformed("missing SOAP body"))?;

    let Some(payload) = body.children.first() else {
        return Ok(Value::Null);
    };

    if payload.name == "Fault" {
        return Err(fault_error(payload));
    }

    let result_name = format!("{}Result", operation);
    let result = payload
        .child(&result_name)
        .or_else(|| payload.children.iter().find(|c| c.name.ends_with("Result")));

    Ok(result.map(element_to_value).unwrap_or(Value::Null))
}

fn fault_error(fault: &XmlElement) -> EconomicError {
    // SOAP 1.1: faultcode/faultstring；SOAP 1.2: Code/Value 與 Reason/Text
    let code = fault
        .child("faultcode")
        .map(|c| c.text.clone())
        .or_else(|| {
            fault
                .child("Code")
                .and_then(|c| c.child("Value"))
                .map(|v| v.text.clone())
        })
        .unwrap_or_default();

    let message = fault
        .child("faultstring")
        .map(|s| s.text.clone())
        .or_else(|| {
            fault
                .child("Reason")
                .and_then(|r| r.child("Text"))
                .map(|t| t.text.clone())
        })
        .unwrap_or_default();

    EconomicError::SoapFault { code, message }
}

/// 葉節點轉為字串，重複的子元素轉為陣列
pub fn element_to_value(element: &XmlElement) -> Value {
    if element.is_nil() {
        return Value::Null;
    }
    if element.children.is_empty() {
        return Value::String(element.text.clone());
    }

    let mut fields = Map::new();
    for child in &element.children {
        let value = element_to_value(child);
        match fields.get_mut(&child.name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                fields.insert(child.name.clone(), value);
            }
        }
    }
    Value::Object(fields)
}
