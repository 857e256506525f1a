use crate::domain::model::Params;
use crate::utils::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;
use std::io::Write;

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// 建立 SOAP 1.1 請求；參數依序寫入操作元素
pub fn build_envelope(namespace: &str, operation: &str, params: &Params) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("soap:Envelope").with_attributes([
        ("xmlns:soap", SOAP_ENVELOPE_NS),
        ("xmlns:xsi", XSI_NS),
        ("xmlns:xsd", XSD_NS),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("soap:Body")))?;
    writer.write_event(Event::Start(
        BytesStart::new(operation).with_attributes([("xmlns", namespace)]),
    ))?;

    for (name, value) in params.iter() {
        write_value(&mut writer, name, value)?;
    }

    writer.write_event(Event::End(BytesEnd::new(operation)))?;
    writer.write_event(Event::End(BytesEnd::new("soap:Body")))?;
    writer.write_event(Event::End(BytesEnd::new("soap:Envelope")))?;

    Ok(writer.into_inner())
}

fn write_value<W: Write>(writer: &mut Writer<W>, name: &str, value: &Value) -> Result<()> {
    match value {
        // 省略 null，與未提供參數相同
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                write_value(writer, name, item)?;
            }
        }
        Value::Object(fields) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (field, field_value) in fields {
                write_value(writer, field, field_value)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::String(text) => write_text(writer, name, text)?,
        Value::Bool(flag) => write_text(writer, name, &flag.to_string())?,
        Value::Number(number) => write_text(writer, name, &number.to_string())?,
    }
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
